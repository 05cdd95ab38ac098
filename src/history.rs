use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::term::Term;

/// Head symbol of the expression the history is exposed as.
pub const HISTORY_TAG: &str = "Messages";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry of the dialog log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: Role,
    pub content: Term,
    pub created_at: DateTime<Utc>,
}

impl Utterance {
    pub fn new(role: Role, content: Term) -> Self {
        Self {
            role,
            content,
            created_at: Utc::now(),
        }
    }

    /// Term form exposed to programs.
    ///
    /// Input messages are exposed exactly as they were received; every other
    /// entry is wrapped as `(role content)`.
    pub fn to_term(&self) -> Term {
        match self.role {
            Role::User => self.content.clone(),
            role => Term::tagged(role.to_string(), self.content.clone()),
        }
    }
}

/// Chooses which part of the log is exposed to a program.
///
/// The log itself is append-only; a window only narrows what a run sees.
pub trait HistoryWindow: Send + Sync {
    fn visible<'a>(&self, entries: &'a [Utterance]) -> &'a [Utterance];
}

/// Exposes the whole log.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unbounded;

impl HistoryWindow for Unbounded {
    fn visible<'a>(&self, entries: &'a [Utterance]) -> &'a [Utterance] {
        entries
    }
}

/// Exposes only the most recent `n` entries.
#[derive(Debug, Clone, Copy)]
pub struct LastEntries(pub usize);

impl HistoryWindow for LastEntries {
    fn visible<'a>(&self, entries: &'a [Utterance]) -> &'a [Utterance] {
        let start = entries.len().saturating_sub(self.0);
        &entries[start..]
    }
}

/// Append-only conversation log owned by a dialog agent.
pub struct DialogHistory {
    entries: Vec<Utterance>,
    window: Box<dyn HistoryWindow>,
}

impl Default for DialogHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogHistory {
    pub fn new() -> Self {
        Self::with_window(Unbounded)
    }

    pub fn with_window<W: HistoryWindow + 'static>(window: W) -> Self {
        Self {
            entries: Vec::new(),
            window: Box::new(window),
        }
    }

    pub fn append_utterance(&mut self, role: Role, content: Term) {
        debug!(%role, index = self.entries.len(), "history append");
        self.entries.push(Utterance::new(role, content));
    }

    pub fn entries(&self) -> &[Utterance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible(&self) -> &[Utterance] {
        self.window.visible(&self.entries)
    }

    /// `(Messages e1 e2 ...)` over the visible entries.
    pub fn to_term(&self) -> Term {
        let mut children = vec![Term::symbol(HISTORY_TAG)];
        children.extend(self.visible().iter().map(Utterance::to_term));
        Term::Expression(children)
    }

    /// Full log as JSON, independent of the window.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}

impl fmt::Debug for DialogHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogHistory")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}
