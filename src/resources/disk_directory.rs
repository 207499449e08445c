//! Maps file names to the extent they were saved into.
//!
//! Saving a name twice just replaces the entry, the old sectors are not reclaimed.
use super::FileExtent;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
pub struct DiskDirectory {
    files: Arc<RwLock<HashMap<String, FileExtent>>>,
}

impl DiskDirectory {
    pub fn new() -> DiskDirectory {
        DiskDirectory {
            files: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn enter(&self, name: &str, extent: FileExtent) {
        let mut files = self.files.write().await;
        if let Some(old) = files.insert(name.to_string(), extent) {
            debug!("File {} replaced, was {} now {}", name, old, extent);
        }
    }

    pub async fn lookup(&self, name: &str) -> Result<FileExtent, DiskDirectoryError> {
        let files = self.files.read().await;
        files
            .get(name)
            .copied()
            .ok_or_else(|| DiskDirectoryError::FileNotFound(name.to_string()))
    }

    /// Every entry sorted by name
    pub async fn entries(&self) -> Vec<(String, FileExtent)> {
        let files = self.files.read().await;
        let mut entries: Vec<(String, FileExtent)> =
            files.iter().map(|(k, v)| (k.clone(), *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

impl Default for DiskDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum DiskDirectoryError {
    #[error("No file named {0} has been saved")]
    FileNotFound(String),
}
