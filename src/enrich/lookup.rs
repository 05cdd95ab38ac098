use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use mockall::automock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::EnrichmentResult;

/// Descriptive record for one domain identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl DomainRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[automock]
#[async_trait]
pub trait DomainLookup: Send + Sync {
    /// Records for the given identifiers. Unknown identifiers are omitted.
    async fn lookup(&self, ids: &[String]) -> EnrichmentResult<Vec<DomainRecord>>;
}

/// In-memory lookup table.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    records: Arc<DashMap<String, DomainRecord>>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: DomainRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<DomainRecord> for StaticLookup {
    fn from_iter<T: IntoIterator<Item = DomainRecord>>(iter: T) -> Self {
        let lookup = StaticLookup::new();
        for record in iter {
            lookup.insert(record);
        }
        lookup
    }
}

#[async_trait]
impl DomainLookup for StaticLookup {
    async fn lookup(&self, ids: &[String]) -> EnrichmentResult<Vec<DomainRecord>> {
        let records: Vec<DomainRecord> = ids
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| r.value().clone()))
            .collect();
        debug!(requested = ids.len(), found = records.len(), "static lookup");
        Ok(records)
    }
}
