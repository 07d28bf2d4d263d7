//! Bucketing active datasets by ingestion day or by tag.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::store::Dataset;

/// Title of the single group produced by [`GroupMode::None`].
pub const ALL_REPORTS: &str = "All Reports";
/// Title of the tag group for datasets without tags.
pub const UNTAGGED: &str = "Untagged";
/// Title of the section listing inactive datasets.
pub const INACTIVE_REPORTS: &str = "Inactive Reports";

/// How active datasets are partitioned for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMode {
    /// One group with every active dataset.
    #[default]
    None,
    /// One group per UTC calendar day of ingestion.
    Date,
    /// One group per tag; a dataset shows up under each of its tags.
    Tags,
}

impl GroupMode {
    pub fn label(&self) -> &'static str {
        match self {
            GroupMode::None => "No Grouping",
            GroupMode::Date => "Date",
            GroupMode::Tags => "Tags",
        }
    }
}

impl FromStr for GroupMode {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(GroupMode::None),
            "date" => Ok(GroupMode::Date),
            "tags" | "tag" => Ok(GroupMode::Tags),
            _ => Err(DeckError::UnknownGroupMode(s.to_string())),
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupMode::None => write!(f, "none"),
            GroupMode::Date => write!(f, "date"),
            GroupMode::Tags => write!(f, "tags"),
        }
    }
}

/// Grouping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingConfig {
    /// `chrono` strftime pattern for date group titles.
    pub date_format: String,
    /// Order date groups by day instead of by first occurrence.
    pub chronological_dates: bool,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            date_format: "%-m/%-d/%Y".to_string(),
            chronological_dates: false,
        }
    }
}

impl GroupingConfig {
    /// Use a different title pattern. Fails if chrono cannot parse it.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(DeckError::InvalidDateFormat(format));
        }
        self.date_format = format;
        Ok(self)
    }

    pub fn with_chronological_dates(mut self, chronological: bool) -> Self {
        self.chronological_dates = chronological;
        self
    }
}

/// A titled bucket of datasets. Borrowed from the store; never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Group<'a> {
    pub title: String,
    pub datasets: Vec<&'a Dataset>,
    pub count: usize,
}

impl<'a> Group<'a> {
    pub fn new(title: impl Into<String>, datasets: Vec<&'a Dataset>) -> Self {
        Self {
            title: title.into(),
            count: datasets.len(),
            datasets,
        }
    }

    /// Ids of the member datasets.
    pub fn ids(&self) -> Vec<&'a str> {
        self.datasets.iter().map(|d| d.id.as_str()).collect()
    }
}

/// Partition the active datasets of `datasets` according to `mode`.
///
/// Groups appear in the order their key is first met while walking the
/// input (except date groups with `chronological_dates`). Inactive datasets
/// are skipped.
pub fn group<'a, I>(datasets: I, mode: GroupMode, config: &GroupingConfig) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a Dataset>,
{
    let active = datasets.into_iter().filter(|d| d.active);

    match mode {
        GroupMode::None => vec![Group::new(ALL_REPORTS, active.collect())],
        GroupMode::Date => group_by_date(active, config),
        GroupMode::Tags => group_by_tags(active),
    }
}

fn group_by_date<'a>(
    datasets: impl Iterator<Item = &'a Dataset>,
    config: &GroupingConfig,
) -> Vec<Group<'a>> {
    let mut buckets: IndexMap<NaiveDate, Vec<&'a Dataset>> = IndexMap::new();
    for dataset in datasets {
        buckets
            .entry(dataset.ingested_at.date_naive())
            .or_default()
            .push(dataset);
    }

    if config.chronological_dates {
        buckets.sort_keys();
    }

    buckets
        .into_iter()
        .map(|(day, members)| Group::new(date_title(day, &config.date_format), members))
        .collect()
}

fn group_by_tags<'a>(datasets: impl Iterator<Item = &'a Dataset>) -> Vec<Group<'a>> {
    let mut buckets: IndexMap<&'a str, Vec<&'a Dataset>> = IndexMap::new();
    for dataset in datasets {
        if dataset.tags.is_empty() {
            buckets.entry(UNTAGGED).or_default().push(dataset);
        }
        for tag in dataset.tags() {
            buckets.entry(tag).or_default().push(dataset);
        }
    }

    buckets
        .into_iter()
        .map(|(tag, members)| Group::new(tag, members))
        .collect()
}

fn date_title(day: NaiveDate, format: &str) -> String {
    let mut title = String::new();
    if write!(title, "{}", day.format(format)).is_err() {
        return day.format("%Y-%m-%d").to_string();
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DataTable;
    use crate::store::DatasetStore;
    use chrono::{TimeZone, Utc};

    fn store_with(entries: &[(&str, (i32, u32, u32, u32), &[&str])]) -> DatasetStore {
        let mut store = DatasetStore::new();
        for (id, (y, m, d, h), tags) in entries {
            let at = Utc.with_ymd_and_hms(*y, *m, *d, *h, 0, 0).unwrap();
            store
                .ingest_at(*id, DataTable::from_strs(&["a"], &[&["1"]]), at)
                .unwrap();
            for tag in *tags {
                store.add_tag(id, tag);
            }
        }
        store
    }

    fn summary(groups: &[Group<'_>]) -> Vec<(String, usize)> {
        groups.iter().map(|g| (g.title.clone(), g.count)).collect()
    }

    #[test]
    fn test_none_mode_single_group() {
        let mut store = store_with(&[("a", (2024, 1, 5, 9), &[]), ("b", (2024, 1, 6, 9), &[])]);
        store.set_active("b", false);

        let groups = group(store.iter(), GroupMode::None, &GroupingConfig::default());

        assert_eq!(summary(&groups), vec![(ALL_REPORTS.to_string(), 1)]);
        assert_eq!(groups[0].ids(), vec!["a"]);
    }

    #[test]
    fn test_none_mode_empty_store_still_has_group() {
        let store = DatasetStore::new();
        let groups = group(store.iter(), GroupMode::None, &GroupingConfig::default());

        assert_eq!(summary(&groups), vec![(ALL_REPORTS.to_string(), 0)]);
    }

    #[test]
    fn test_date_groups_first_occurrence_order() {
        let store = store_with(&[
            ("a", (2024, 3, 2, 10), &[]),
            ("b", (2024, 3, 1, 10), &[]),
            ("c", (2024, 3, 2, 23), &[]),
        ]);

        let groups = group(store.iter(), GroupMode::Date, &GroupingConfig::default());

        assert_eq!(
            summary(&groups),
            vec![("3/2/2024".to_string(), 2), ("3/1/2024".to_string(), 1)]
        );
        assert_eq!(groups[0].ids(), vec!["a", "c"]);
    }

    #[test]
    fn test_date_groups_chronological() {
        let store = store_with(&[("a", (2024, 3, 2, 10), &[]), ("b", (2024, 3, 1, 10), &[])]);
        let config = GroupingConfig::default()
            .with_date_format("%Y-%m-%d")
            .unwrap()
            .with_chronological_dates(true);

        let groups = group(store.iter(), GroupMode::Date, &config);

        assert_eq!(
            summary(&groups),
            vec![("2024-03-01".to_string(), 1), ("2024-03-02".to_string(), 1)]
        );
    }

    #[test]
    fn test_tags_fan_out() {
        let store = store_with(&[
            ("a", (2024, 1, 1, 0), &[]),
            ("b", (2024, 1, 1, 0), &["Q"]),
            ("c", (2024, 1, 1, 0), &["x", "Q"]),
        ]);

        let groups = group(store.iter(), GroupMode::Tags, &GroupingConfig::default());

        assert_eq!(
            summary(&groups),
            vec![
                (UNTAGGED.to_string(), 1),
                ("Q".to_string(), 2),
                ("x".to_string(), 1),
            ]
        );
        assert_eq!(groups[1].ids(), vec!["b", "c"]);
        // Same dataset, not a copy.
        assert!(std::ptr::eq(groups[1].datasets[1], groups[2].datasets[0]));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("Tags".parse::<GroupMode>().unwrap(), GroupMode::Tags);
        assert_eq!("date".parse::<GroupMode>().unwrap(), GroupMode::Date);
        assert!("week".parse::<GroupMode>().is_err());
    }

    #[test]
    fn test_invalid_date_format_rejected() {
        assert!(GroupingConfig::default().with_date_format("%Q").is_err());
    }
}
