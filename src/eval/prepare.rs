use tracing::debug;

use super::context::{
    Binding, ContextError, ContextResult, ExecutionContext, HISTORY_NAME, MESSAGES_NAME,
    RESERVED_NAMES,
};
use crate::history::{DialogHistory, Role};
use crate::term::Term;

/// Named bindings registered into every context, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    entries: Vec<(String, Binding)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, binding: Binding) -> ContextResult<()> {
        let name = name.into();
        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(ContextError::ReservedName(name));
        }
        if self.contains(&name) {
            return Err(ContextError::DuplicateBinding(name));
        }
        self.entries.push((name, binding));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries.iter().map(|(n, b)| (n.as_str(), b))
    }
}

/// Populates a fresh [`ExecutionContext`] before a run.
pub struct ContextPreparer<'a> {
    bindings: &'a Bindings,
}

impl<'a> ContextPreparer<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self { bindings }
    }

    /// Registers every binding and binds `message` under `messages`.
    pub fn prepare(&self, context: &mut ExecutionContext, message: &Term) -> ContextResult<()> {
        for (name, binding) in self.bindings.iter() {
            context.register(name, binding.clone())?;
        }
        context.define(MESSAGES_NAME, message.clone())?;
        debug!(
            trace_id = %context.trace_id(),
            bindings = self.bindings.len(),
            "context prepared"
        );
        Ok(())
    }

    /// [`Self::prepare`], then binds the history as it stood before this turn
    /// under `history` and appends `message` to it.
    pub fn prepare_dialog(
        &self,
        context: &mut ExecutionContext,
        message: &Term,
        history: &mut DialogHistory,
    ) -> ContextResult<()> {
        self.prepare(context, message)?;
        context.define(HISTORY_NAME, history.to_term())?;
        history.append_utterance(Role::User, message.clone());
        Ok(())
    }
}
