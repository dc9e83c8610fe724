//! Source adapters: the seam through which API clients and scrapers hand
//! records to the engine.
//!
//! Every adapter implements the same fixed interface and delivers one of
//! the closed set of [`SourceRecord`] shapes.

use std::collections::HashMap;

use liner_core::model::SourceRecord;
use liner_core::provenance::SourceId;

use crate::error::ResolveResult;

/// A collaborator that can fetch raw credits for a track.
///
/// Implementations do their own I/O, timeouts and rate limiting. A failed
/// fetch is reported as [`ResolveError::Fetch`](crate::ResolveError::Fetch);
/// the engine logs it and carries on with the other sources.
pub trait CreditSource: Send + Sync {
    /// The source this adapter speaks for.
    fn id(&self) -> SourceId;

    /// Fetch every record this source knows for `track_ref`. Zero records
    /// is a valid answer.
    fn fetch(&self, track_ref: &str) -> ResolveResult<Vec<SourceRecord>>;
}

/// An in-memory source, for tests, fixtures and manual entry.
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: SourceId,
    records: HashMap<String, Vec<SourceRecord>>,
}

impl StaticSource {
    #[must_use]
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            records: HashMap::new(),
        }
    }

    /// Register records for a track, appending to any already present.
    #[must_use]
    pub fn with_records(mut self, track_ref: impl Into<String>, records: Vec<SourceRecord>) -> Self {
        self.records.entry(track_ref.into()).or_default().extend(records);
        self
    }
}

impl CreditSource for StaticSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn fetch(&self, track_ref: &str) -> ResolveResult<Vec<SourceRecord>> {
        Ok(self.records.get(track_ref).cloned().unwrap_or_default())
    }
}
