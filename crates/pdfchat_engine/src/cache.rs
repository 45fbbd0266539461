use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cache directory missing or not writable: {0}")]
    CacheDir(String),
    #[error("refusing to cache document with unsafe name {0:?}")]
    UnsafeName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the cache directory exists; create if missing.
pub fn ensure_cache_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::CacheDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::CacheDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::CacheDir(e.to_string()))?;
    }
    Ok(())
}

/// Local copies of fetched documents, written temp-file-then-rename so a
/// viewer never opens a half-written PDF.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
}

impl DocumentCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn store(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let file_name = Path::new(name)
            .file_name()
            .filter(|file_name| *file_name == name)
            .ok_or_else(|| PersistError::UnsafeName(name.to_string()))?;
        ensure_cache_dir(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace an older copy of the same document.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
