//! Build directory layout: per-edition metadata, aggregate metadata, reports

use crate::analysis::metadata::MetadataRecord;
use crate::analysis::rarity::RarityReport;
use crate::io::configuration::{METADATA_LIST_FILE, RARITY_CSV_FILE};
use crate::io::error::{GenerationError, Result, file_system};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output tree rooted at a build directory
///
/// ```text
/// build/
///   images/<edition>.<ext>
///   json/<edition>.json
///   json/_metadata.json
///   rarity.csv
/// ```
#[derive(Debug, Clone)]
pub struct BuildDirectory {
    root: PathBuf,
}

impl BuildDirectory {
    /// Build directory at `root`; nothing is created yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory receiving rendered artifacts
    pub fn images_dir(&self) -> PathBuf {
        self.root.join("images")
    }

    /// Directory receiving metadata files
    pub fn json_dir(&self) -> PathBuf {
        self.root.join("json")
    }

    /// Path of the aggregate metadata file
    pub fn metadata_list_path(&self) -> PathBuf {
        self.json_dir().join(METADATA_LIST_FILE)
    }

    /// Path of the rarity report
    pub fn rarity_csv_path(&self) -> PathBuf {
        self.root.join(RARITY_CSV_FILE)
    }

    /// Remove any previous build and recreate the empty tree
    ///
    /// # Errors
    ///
    /// Returns an error if the old tree cannot be removed or a directory cannot be created
    pub fn setup(&self) -> Result<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)
                .map_err(|e| file_system(&self.root, "remove build directory", e))?;
        }
        for dir in [self.json_dir(), self.images_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| file_system(&dir, "create directory", e))?;
        }
        Ok(())
    }

    /// Write `json/<edition>.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or written
    pub fn write_edition_metadata(&self, record: &MetadataRecord) -> Result<()> {
        let path = self.json_dir().join(format!("{}.json", record.edition));
        write_json(&path, record)
    }

    /// Write the aggregate metadata file
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be serialized or written
    pub fn write_metadata_list(&self, records: &[MetadataRecord]) -> Result<()> {
        write_json(&self.metadata_list_path(), &records)
    }

    /// Read the aggregate metadata file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a list of records
    pub fn read_metadata_list(&self) -> Result<Vec<MetadataRecord>> {
        let path = self.metadata_list_path();
        let text = std::fs::read_to_string(&path)
            .map_err(|e| file_system(&path, "read metadata", e))?;
        serde_json::from_str(&text).map_err(|e| GenerationError::Serialization { path, source: e })
    }

    /// Write the rarity report as CSV
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn write_rarity_csv(&self, report: &RarityReport) -> Result<()> {
        let path = self.rarity_csv_path();
        std::fs::write(&path, report.to_csv()).map_err(|e| file_system(&path, "write rarity report", e))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_system(parent, "create directory", e))?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|e| GenerationError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, text).map_err(|e| file_system(path, "write metadata", e))
}
