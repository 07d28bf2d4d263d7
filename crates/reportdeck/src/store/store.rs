//! The dataset collection and its lifecycle operations.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::dataset::Dataset;
use crate::error::{DeckError, Result};
use crate::input::{DataTable, SourceInfo};

/// What to do with a batch when some of its files fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestPolicy {
    /// Keep nothing from the batch and report every failure at once.
    #[default]
    AllOrNothing,
    /// Keep the files that parsed and report the rest.
    Partial,
}

/// Outcome of a batch ingest that was committed.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Ids added to the store, in batch order.
    pub ingested: Vec<String>,
    /// Files left out (only ever non-empty under [`IngestPolicy::Partial`]).
    pub failures: Vec<DeckError>,
}

impl IngestReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns every ingested dataset, in ingestion order.
///
/// Lifecycle operations on an id that is not in the store do nothing; they
/// never touch another dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    datasets: Vec<Dataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Dataset> {
        let found = self.datasets.iter_mut().find(|d| d.id == id);
        if found.is_none() {
            debug!(dataset = id, "ignoring operation on unknown dataset");
        }
        found
    }

    /// All datasets in ingestion order.
    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(|d| d.active)
    }

    pub fn inactive(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(|d| !d.active)
    }

    /// Add a table under `id`, ingested now.
    pub fn ingest(&mut self, id: impl Into<String>, table: DataTable) -> Result<&Dataset> {
        self.ingest_at(id, table, Utc::now())
    }

    /// Add a table under `id` with an explicit ingestion time.
    pub fn ingest_at(
        &mut self,
        id: impl Into<String>,
        table: DataTable,
        ingested_at: DateTime<Utc>,
    ) -> Result<&Dataset> {
        let id = id.into();
        table.validate(&id)?;
        let source = SourceInfo::for_table(&id, &table);
        self.ingest_parsed(table, source, ingested_at)
    }

    /// Add a parsed table; its id is the source file name.
    pub fn ingest_parsed(
        &mut self,
        table: DataTable,
        source: SourceInfo,
        ingested_at: DateTime<Utc>,
    ) -> Result<&Dataset> {
        if self.contains(&source.file) {
            return Err(DeckError::DuplicateDataset(source.file));
        }
        Ok(self.commit(table, source, ingested_at))
    }

    fn commit(
        &mut self,
        table: DataTable,
        source: SourceInfo,
        ingested_at: DateTime<Utc>,
    ) -> &Dataset {
        info!(
            dataset = source.file.as_str(),
            rows = table.row_count(),
            "ingested dataset"
        );
        let id = source.file.clone();
        self.datasets.push(Dataset::new(id, table, source, ingested_at));
        &self.datasets[self.datasets.len() - 1]
    }

    /// Add the results of parsing several files at once.
    ///
    /// Duplicate ids (against the store or within the batch) count as
    /// failures. Under [`IngestPolicy::AllOrNothing`] any failure leaves the
    /// store untouched and comes back as a single [`DeckError::BatchIngest`].
    pub fn ingest_batch(
        &mut self,
        parsed: Vec<Result<(DataTable, SourceInfo)>>,
        ingested_at: DateTime<Utc>,
        policy: IngestPolicy,
    ) -> Result<IngestReport> {
        let attempted = parsed.len();
        let mut accepted = Vec::new();
        let mut failures = Vec::new();
        let mut seen = HashSet::new();

        for result in parsed {
            match result {
                Ok((table, source)) => {
                    if self.contains(&source.file) || !seen.insert(source.file.clone()) {
                        failures.push(DeckError::DuplicateDataset(source.file));
                    } else {
                        accepted.push((table, source));
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() && policy == IngestPolicy::AllOrNothing {
            warn!(
                failed = failures.len(),
                attempted, "batch rejected, no datasets added"
            );
            return Err(DeckError::BatchIngest {
                failures,
                attempted,
            });
        }

        let mut report = IngestReport {
            ingested: Vec::with_capacity(accepted.len()),
            failures,
        };
        for (table, source) in accepted {
            let dataset = self.commit(table, source, ingested_at);
            report.ingested.push(dataset.id.clone());
        }

        if !report.is_complete() {
            warn!(
                failed = report.failures.len(),
                attempted, "batch partially ingested"
            );
        }
        Ok(report)
    }

    /// Set the active flag. Returns false for unknown ids.
    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        match self.get_mut(id) {
            Some(dataset) => {
                dataset.active = active;
                true
            }
            None => false,
        }
    }

    /// Flip the active flag, returning the new value.
    pub fn toggle_active(&mut self, id: &str) -> Option<bool> {
        let dataset = self.get_mut(id)?;
        dataset.active = !dataset.active;
        Some(dataset.active)
    }

    /// Add a tag. Tags are trimmed; blank tags and tags already present are
    /// ignored. Returns true if the tag was added.
    pub fn add_tag(&mut self, id: &str, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(dataset) => dataset.tags.insert(tag.to_string()),
            None => false,
        }
    }

    /// Remove a tag, keeping the order of the rest. Returns true if removed.
    pub fn remove_tag(&mut self, id: &str, tag: &str) -> bool {
        match self.get_mut(id) {
            Some(dataset) => dataset.tags.shift_remove(tag.trim()),
            None => false,
        }
    }

    /// Drop a dataset from the store.
    pub fn remove(&mut self, id: &str) -> Option<Dataset> {
        let index = self.datasets.iter().position(|d| d.id == id);
        if index.is_none() {
            debug!(dataset = id, "ignoring removal of unknown dataset");
        }
        index.map(|i| self.datasets.remove(i))
    }
}
