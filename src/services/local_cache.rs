//! Durable local cache
//!
//! One JSON text blob holding the serialized canonical question array.
//! Read once at session start, rewritten on every replacement. The content
//! is untrusted on the way back in (the file is hand-editable), so `load`
//! hands back raw values for the sanitizer.

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::question::Question;

#[derive(Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the cached array. A missing file is an empty cache, not an
    /// error; any other failure is reported to the caller.
    pub fn load(&self) -> Result<Vec<Value>> {
        if !self.path.exists() {
            debug!("no cache file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let content =
            std::fs::read_to_string(&self.path).map_err(|source| CacheError::ReadFailed {
                path: self.path.display().to_string(),
                source,
            })?;
        let raw: Vec<Value> =
            serde_json::from_str(&content).map_err(|source| CacheError::InvalidJson {
                path: self.path.display().to_string(),
                source,
            })?;
        Ok(raw)
    }

    /// Persist the canonical sequence.
    ///
    /// Serializing the typed records is the defensive re-copy: every field
    /// goes out as its primitive wire shape, nothing else can leak in.
    pub fn save(&self, questions: &[Question]) -> Result<()> {
        let blob = serde_json::to_string(questions).map_err(|source| CacheError::InvalidJson {
            path: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, blob).map_err(|source| CacheError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        debug!("💾 cached {} records to {}", questions.len(), self.path.display());
        Ok(())
    }
}
