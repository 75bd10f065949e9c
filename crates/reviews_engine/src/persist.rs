use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use reviews_core::{ReviewSet, TrackedSource};
use reviews_logging::reviews_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

const SOURCES_FILENAME: &str = "sources.json";
const REVIEWS_FILENAME: &str = "reviews.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed table {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// The tracked-source table and the accumulated reviews, stored as JSON
/// files in one directory.
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_sources(&self) -> Result<Vec<TrackedSource>, PersistError> {
        self.load(SOURCES_FILENAME)
    }

    pub fn save_sources(&self, rows: &[TrackedSource]) -> Result<PathBuf, PersistError> {
        self.save(SOURCES_FILENAME, rows)
    }

    pub fn load_reviews(&self) -> Result<ReviewSet, PersistError> {
        self.load(REVIEWS_FILENAME)
    }

    pub fn save_reviews(&self, reviews: &ReviewSet) -> Result<PathBuf, PersistError> {
        self.save(REVIEWS_FILENAME, reviews)
    }

    fn load<T: DeserializeOwned + Default>(&self, filename: &str) -> Result<T, PersistError> {
        let path = self.dir.join(filename);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                reviews_debug!("No table at {:?}, starting empty", path);
                return Ok(T::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&content).map_err(|source| PersistError::Json { path, source })
    }

    fn save<T: Serialize + ?Sized>(&self, filename: &str, value: &T) -> Result<PathBuf, PersistError> {
        let content = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
            path: self.dir.join(filename),
            source,
        })?;
        AtomicFileWriter::new(self.dir.clone()).write(filename, &content)
    }
}
