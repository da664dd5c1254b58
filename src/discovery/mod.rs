//! # Folder & Series Discovery
//!
//! Enumerates experiment folders under a root directory and the numbered
//! series files inside one folder. Both listings are naturally sorted so
//! `results_2` precedes `results_10` and `run_9` precedes `run_10`.
//!
//! Discovery is read-only. A folder whose name matches a naming but does not
//! decode is reported as a [`FolderFailure`]; its siblings are unaffected.
pub mod naming;
pub mod natural;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};

pub use naming::{DimensionNaming, FolderNaming, SuffixNaming, TspNaming, TspParams};
pub use natural::{natural_cmp, natural_sort_by_key};

/// An experiment folder whose name decoded to `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentFolder<P> {
    pub name: String,
    pub path: PathBuf,
    pub params: P,
}

/// A folder that could not be processed, with the reason.
#[derive(Debug)]
pub struct FolderFailure {
    pub folder: String,
    pub error: AnalysisError,
}

impl FolderFailure {
    pub fn new(folder: impl Into<String>, error: AnalysisError) -> Self {
        Self {
            folder: folder.into(),
            error,
        }
    }
}

/// Decoded folders and the candidates that failed to decode, both in natural order.
#[derive(Debug)]
pub struct Discovery<P> {
    pub folders: Vec<ExperimentFolder<P>>,
    pub failures: Vec<FolderFailure>,
}

/// Names of the entries of `root` that satisfy `keep`, naturally sorted.
fn list_names<F>(root: &Path, keep: F) -> Result<Vec<(String, PathBuf)>>
where
    F: Fn(&Path) -> bool,
{
    let mut entries = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !keep(&entry.path()) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, entry.path())),
            Err(raw) => debug!(name = ?raw, "skipping non UTF-8 entry"),
        }
    }
    natural_sort_by_key(&mut entries, |(name, _)| name.as_str());
    Ok(entries)
}

/// Lists the directories directly under `root` that `naming` accepts.
///
/// # Errors
///
/// Returns `AnalysisError::Io` if `root` cannot be read. Per-folder decoding
/// errors are collected in `Discovery::failures` instead.
pub fn discover_folders<N: FolderNaming>(root: &Path, naming: &N) -> Result<Discovery<N::Params>> {
    let mut folders = Vec::new();
    let mut failures = Vec::new();

    for (name, path) in list_names(root, |p| p.is_dir())? {
        match naming.decode(&name) {
            None => {}
            Some(Ok(params)) => folders.push(ExperimentFolder { name, path, params }),
            Some(Err(error)) => {
                warn!(folder = %name, error = %error, "skipping undecodable folder");
                failures.push(FolderFailure::new(name, error));
            }
        }
    }

    debug!(
        root = %root.display(),
        folders = folders.len(),
        failures = failures.len(),
        "discovered experiment folders"
    );
    Ok(Discovery { folders, failures })
}

/// File name shape of a numbered series: `<prefix><key><suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPattern {
    prefix: String,
    suffix: String,
}

impl SeriesPattern {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// The key between prefix and suffix, if `name` has this shape and the key is not empty.
    pub fn key<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
            .filter(|key| !key.is_empty())
    }

    /// File name for `key`.
    pub fn file_name(&self, key: &str) -> String {
        format!("{}{}{}", self.prefix, key, self.suffix)
    }
}

/// A file that matched a `SeriesPattern`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesFile {
    pub key: String,
    pub path: PathBuf,
}

/// Lists the files directly under `dir` that match `pattern`, naturally sorted by name.
pub fn discover_series(dir: &Path, pattern: &SeriesPattern) -> Result<Vec<SeriesFile>> {
    let files: Vec<SeriesFile> = list_names(dir, |p| p.is_file())?
        .into_iter()
        .filter_map(|(name, path)| {
            pattern.key(&name).map(|key| SeriesFile {
                key: key.to_string(),
                path,
            })
        })
        .collect();
    debug!(dir = %dir.display(), files = files.len(), "discovered series files");
    Ok(files)
}
