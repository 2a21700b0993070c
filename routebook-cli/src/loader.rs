use routebook_engine::{DataLoader, Dataset, DatasetError};
use std::path::{Path, PathBuf};

/// Loads a dataset from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid dataset in {path}: {source}")]
    Dataset { path: PathBuf, source: DatasetError },
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataLoader for FileLoader {
    type Error = FileLoadError;

    fn load_dataset(&self) -> Result<Dataset, Self::Error> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| FileLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        Dataset::from_json(&text).map_err(|source| FileLoadError::Dataset {
            path: self.path.clone(),
            source,
        })
    }
}
