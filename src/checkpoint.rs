//! Persisting the loader watermark between runs.
//!
//! The file is a small JSON document:
//!
//! ```json
//! { "site": "github.com", "watermark": "2011-01-11T22:37:56Z" }
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{LoaderError, Result};
use crate::loader::LoaderState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub site: String,
    pub watermark: Option<DateTime<Utc>>,
}

impl Checkpoint {
    /// Snapshot of `state`, or `None` if it has no site to key on.
    pub fn from_state(state: &LoaderState) -> Option<Self> {
        state.site.as_ref().map(|site| Self {
            site: site.clone(),
            watermark: state.watermark,
        })
    }
}

/// Read a checkpoint.  A missing file is not an error.
pub fn read(path: &Path) -> Result<Option<Checkpoint>> {
    match fs::read_to_string(path) {
        Ok(body) => Ok(Some(serde_json::from_str(&body)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(storage_error(path, err)),
    }
}

/// Write a checkpoint, replacing the file atomically.
///
/// The body goes to a uniquely named temp file in the same directory, which
/// is then renamed over `path`.
pub fn write(path: &Path, checkpoint: &Checkpoint) -> Result<()> {
    let body = serde_json::to_string_pretty(checkpoint)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| storage_error(dir, err))?;
    if let Err(err) = write_body(&mut tmp, body.as_bytes()) {
        return Err(storage_error(tmp.path(), err));
    }
    tmp.persist(path)
        .map_err(|err| storage_error(path, err.error))?;
    Ok(())
}

fn write_body(tmp: &mut NamedTempFile, body: &[u8]) -> io::Result<()> {
    tmp.write_all(body)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()
}

/// Watermark to resume from for `site`, if the checkpoint belongs to it.
pub fn resume_watermark(checkpoint: Option<&Checkpoint>, site: &str) -> Option<DateTime<Utc>> {
    checkpoint
        .filter(|c| c.site == site)
        .and_then(|c| c.watermark)
}

fn storage_error(path: &Path, err: io::Error) -> LoaderError {
    LoaderError::Storage(format!("{}: {err}", path.display()))
}
