use crate::error::{Result, RiskError};
use crate::types::{RegionRecord, Records};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// In-memory mapping of region name to record, backed by a JSON file.
///
/// Mutations only touch memory; callers persist with [`RecordStore::save`]
/// once a logical operation has fully succeeded. Regions keep the order in
/// which they were added, in memory and on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: Records,
}

impl RecordStore {
    /// Load the store, degrading to an empty one when the file is missing
    /// or unreadable. Corrupt state is logged, never raised.
    ///
    /// A file that exists but cannot be parsed is copied to
    /// `<file>.corrupt` first, since the next save replaces it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match read_records(&path) {
            Ok(records) => records,
            Err(RiskError::Json(e)) => {
                warn!("Malformed data in {}: {}, starting empty", path.display(), e);
                backup_corrupt(&path);
                Records::new()
            }
            Err(e) => {
                log_unreadable(&path, &e);
                Records::new()
            }
        };
        Self { path, records }
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Records::new(),
        }
    }

    /// Rewrite the whole file. Writes go through a sibling temp file and a
    /// rename so readers never see a half-written document.
    pub fn save(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.records.serialize(&mut ser)?;

        let tmp = sibling(&self.path, ".tmp");
        fs::write(&tmp, &buf)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }

        debug!(
            "Saved {} region(s) to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn get(&self, name: &str) -> Option<&RegionRecord> {
        self.records.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegionRecord> {
        self.records.get_mut(name)
    }

    pub fn put(&mut self, name: impl Into<String>, record: RegionRecord) -> Option<RegionRecord> {
        self.records.insert(name.into(), record)
    }

    /// Remove a region; the regions after it move up one place.
    pub fn delete(&mut self, name: &str) -> Option<RegionRecord> {
        self.records.shift_remove(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.records.get_index_of(name)
    }

    /// Put a region back at a given position, undoing [`RecordStore::delete`].
    pub fn restore(&mut self, index: usize, name: impl Into<String>, record: RegionRecord) {
        let index = index.min(self.records.len());
        self.records.shift_insert(index, name.into(), record);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read the records file, or an empty mapping if it is absent or corrupt.
///
/// Read-only: used by the dashboard, which never writes or backs up.
pub fn load_records(path: &Path) -> Records {
    match read_records(path) {
        Ok(records) => records,
        Err(RiskError::Json(e)) => {
            warn!("Malformed data in {}: {}, starting empty", path.display(), e);
            Records::new()
        }
        Err(e) => {
            log_unreadable(path, &e);
            Records::new()
        }
    }
}

fn read_records(path: &Path) -> Result<Records> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn log_unreadable(path: &Path, e: &RiskError) {
    match e {
        RiskError::Io(io) if io.kind() == ErrorKind::NotFound => {
            debug!("No data file at {}, starting empty", path.display());
        }
        _ => warn!("Failed to read {}: {}, starting empty", path.display(), e),
    }
}

fn backup_corrupt(path: &Path) {
    let backup = sibling(path, ".corrupt");
    match fs::copy(path, &backup) {
        Ok(_) => warn!("Kept a copy of the unreadable file at {}", backup.display()),
        Err(e) => warn!("Failed to back up {}: {}", path.display(), e),
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
