//! Dataverse dataset - metadata blocks plus a snapshot of repository files

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::block::MetadataBlock;
use super::citation::Citation;
use super::client::{CreatedDataset, DataverseClient};
use super::linking::LinkingTemplate;
use crate::metadata::MetadataDocument;
use crate::{Error, Result};

/// Directories never included in a snapshot, relative to the snapshot root.
pub const EXCLUDED_DIRS: &[&str] = &[".git", ".dvc/cache", ".dvc/tmp"];

/// Block key Dataverse requires on every dataset.
pub const CITATION_BLOCK: &str = "citation";

/// One file captured by [`DataverseDataset::add_directory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path relative to the snapshot root, `/`-separated
    pub path: String,
    /// Absolute location on disk
    #[serde(skip)]
    pub source: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// Hex SHA-256 of the content
    pub sha256: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl FileEntry {
    /// Directory part of `path`, empty for files at the root.
    #[must_use]
    pub fn directory_label(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(dir, _)| dir)
    }

    /// File name part of `path`.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit_once('/').map_or(self.path.as_str(), |(_, name)| name)
    }

    /// File name sent in the upload form, control characters replaced by `_`.
    #[must_use]
    pub fn upload_name(&self) -> String {
        self.file_name()
            .chars()
            .map(|c| if c.is_control() { '_' } else { c })
            .collect()
    }
}

/// Receipt of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Created dataset
    pub dataset: CreatedDataset,
    /// Number of files uploaded
    pub files_uploaded: usize,
}

/// A dataset ready for upload: metadata blocks keyed by block name and
/// the files to attach.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataverseDataset {
    blocks: BTreeMap<String, MetadataBlock>,
    files: Vec<FileEntry>,
}

impl DataverseDataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a metadata document through `template` into a new dataset.
    #[must_use]
    pub fn from_document(doc: &MetadataDocument, template: &LinkingTemplate) -> Self {
        let mut dataset = Self::new();
        dataset.add_metadata_block(&template.block, template.map_document(doc));
        dataset
    }

    /// Add or replace a metadata block.
    pub fn add_metadata_block(&mut self, name: impl Into<String>, block: MetadataBlock) {
        self.blocks.insert(name.into(), block);
    }

    /// Add the citation block.
    ///
    /// # Errors
    ///
    /// `Error::Schema` if the citation lacks a required field.
    pub fn add_citation(&mut self, citation: &Citation) -> Result<()> {
        self.add_metadata_block(CITATION_BLOCK, citation.to_block()?);
        Ok(())
    }

    /// Get a metadata block by name.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&MetadataBlock> {
        self.blocks.get(name)
    }

    /// Get the snapshot files, sorted by path.
    #[must_use]
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Snapshot every regular file under `root`, skipping [`EXCLUDED_DIRS`]
    /// and symlinks. Replaces any previous snapshot.
    ///
    /// Returns the number of files captured.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if `root` does not exist, `Error::Io` on read failures.
    pub fn add_directory(&mut self, root: impl AsRef<Path>) -> Result<usize> {
        let root = root.as_ref();
        let mut files = Vec::new();
        walk(root, root, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let total: u64 = files.iter().map(|f| f.size_bytes).sum();
        info!(root = %root.display(), files = files.len(), bytes = total, "snapshotted directory");
        self.files = files;
        Ok(self.files.len())
    }

    /// Native API payload for dataset creation.
    ///
    /// # Errors
    ///
    /// `Error::Schema` if the citation block is missing.
    pub fn payload(&self) -> Result<serde_json::Value> {
        if !self.blocks.contains_key(CITATION_BLOCK) {
            return Err(Error::Schema(
                "dataset has no citation block".to_string(),
            ));
        }
        Ok(serde_json::json!({
            "datasetVersion": {
                "metadataBlocks": serde_json::to_value(&self.blocks)?,
            }
        }))
    }

    /// Create the dataset in `collection` and upload every snapshot file.
    ///
    /// Nothing is retried or rolled back: the first failure is returned and
    /// the partially populated dataset stays on the server.
    ///
    /// # Errors
    ///
    /// `Error::Schema` from [`DataverseDataset::payload`], otherwise
    /// whatever the client reports.
    pub fn upload(&self, client: &DataverseClient, collection: &str) -> Result<UploadReceipt> {
        let payload = self.payload()?;
        let dataset = client.create_dataset(collection, &payload)?;
        info!(
            collection,
            persistent_id = %dataset.persistent_id,
            "created dataset"
        );

        for file in &self.files {
            client.add_file(&dataset.persistent_id, file)?;
            debug!(path = %file.path, "uploaded file");
        }
        info!(files = self.files.len(), "uploaded snapshot");

        Ok(UploadReceipt {
            dataset,
            files_uploaded: self.files.len(),
        })
    }
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<FileEntry>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::from_io(dir, e))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let relative = relative_path(root, &path);
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if EXCLUDED_DIRS.contains(&relative.as_str()) {
                debug!(path = %relative, "skipping excluded directory");
                continue;
            }
            walk(root, &path, out)?;
        } else if file_type.is_file() {
            out.push(snapshot_file(path, relative)?);
        }
    }
    Ok(())
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn snapshot_file(source: PathBuf, path: String) -> Result<FileEntry> {
    let metadata = std::fs::metadata(&source)?;
    let mut hasher = Sha256::new();
    let mut file = File::open(&source)?;
    let mut buf = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    let sha256 = hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();

    Ok(FileEntry {
        path,
        source,
        size_bytes: metadata.len(),
        sha256,
        modified: metadata.modified().map(DateTime::<Utc>::from)?,
    })
}
