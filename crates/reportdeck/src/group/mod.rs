//! Grouping of active datasets for display.

mod grouping;

pub use grouping::{
    group, Group, GroupMode, GroupingConfig, ALL_REPORTS, INACTIVE_REPORTS, UNTAGGED,
};
