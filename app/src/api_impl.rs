//! Business logic behind the dashboard server functions.
//!
//! Kept outside the `#[server]` macros so it can be tested directly. The
//! dashboard never writes: every call re-reads the records file, so it sees
//! whatever the bot last saved.

use crate::projection::{RegionDetails, RegionRow};
use crate::store::load_records;
use std::path::Path;

pub fn list_regions_impl(path: &Path) -> Vec<String> {
    load_records(path).into_keys().collect()
}

pub fn region_details_impl(path: &Path, name: &str) -> Option<RegionDetails> {
    let records = load_records(path);
    records
        .get(name)
        .map(|record| RegionDetails::from_row(RegionRow::from_record(name, record)))
}
