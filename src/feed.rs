//! Feed archive access: validation, extraction into a scoped working area,
//! and header-mapped row reading of the extracted files.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::FeedError;

/// Files every feed archive must contain for an import.
pub const REQUIRED_FILES: [&str; 4] =
    ["routes.txt", "stops.txt", "stop_times.txt", "trips.txt"];

/// Scoped extraction directory for a single import.
///
/// The directory is removed when the handle drops, on the success and
/// failure paths alike. Each import owns its working area exclusively; there
/// is no shared process-wide temp path.
pub struct WorkingArea {
    dir: TempDir,
}

impl WorkingArea {
    pub fn new() -> Result<Self, FeedError> {
        let dir = TempDir::with_prefix("gtfs-import-")?;
        debug!(path = %dir.path().display(), "Created working area");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of an extracted feed file inside the working area.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Check that the archive's listing contains every required feed file.
///
/// Fails naming the first missing file, before anything is extracted.
pub fn validate_archive(archive_path: &Path) -> Result<(), FeedError> {
    let file = File::open(archive_path)?;
    let archive = zip::ZipArchive::new(file)?;
    let names: HashSet<&str> = archive.file_names().collect();
    for required in REQUIRED_FILES {
        if !names.contains(required) {
            return Err(FeedError::MissingFile(required.to_string()));
        }
    }
    Ok(())
}

/// Extract exactly the required feed files into the working area.
pub fn extract(archive_path: &Path, area: &WorkingArea) -> Result<(), FeedError> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    for name in REQUIRED_FILES {
        let mut entry = archive.by_name(name)?;
        let mut out = File::create(area.file(name))?;
        io::copy(&mut entry, &mut out)?;
    }
    info!(files = REQUIRED_FILES.len(), "Extracted feed files to working area");
    Ok(())
}

/// An extracted feed file opened for a single forward pass over its rows.
///
/// The header line is read up front into a column-name -> position map;
/// rows are then streamed one at a time and never buffered.
pub struct FeedFile {
    name: String,
    reader: csv::Reader<File>,
    columns: HashMap<String, usize>,
}

impl FeedFile {
    pub fn open(path: &Path) -> Result<Self, FeedError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(FeedError::Format(format!("{name} has no header line")));
        }
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, col)| (col.to_string(), i))
            .collect();
        Ok(Self {
            name,
            reader,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of a header column, if present.
    pub fn column(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Position of a header column, failing with a format error naming the
    /// file and column when absent.
    pub fn require_column(&self, column: &str) -> Result<usize, FeedError> {
        self.column(column).ok_or_else(|| {
            FeedError::Format(format!("{} is missing column {column}", self.name))
        })
    }

    /// Single-pass iterator over the data rows.
    pub fn records(&mut self) -> csv::StringRecordsIter<'_, File> {
        self.reader.records()
    }
}
