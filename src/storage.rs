//! Reading and writing persisted snapshots.

use crate::error::{NetDriftError, Result, StorageErrorKind};
use crate::model::Snapshot;
use std::path::Path;

/// Conventional location of the working baseline.
pub const DEFAULT_STATE_FILE: &str = "working_state.json";

/// Write a snapshot as pretty-printed JSON.
///
/// The document goes to a sibling temporary file first and is then renamed
/// over `path`, so a concurrent reader sees either the old or the new
/// baseline. Missing parent directories are created.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|e| {
        NetDriftError::storage(
            format!("saving {}", path.display()),
            StorageErrorKind::Serialization(e.to_string()),
        )
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| NetDriftError::io(parent, e))?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, json).map_err(|e| NetDriftError::io(&tmp_path, e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| NetDriftError::io(path, e))?;

    tracing::debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

/// Load a snapshot written by [`save_snapshot`].
///
/// Derived fields are taken from the document as-is.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(NetDriftError::snapshot_not_found(path));
        }
        Err(e) => return Err(NetDriftError::io(path, e)),
    };

    let snapshot: Snapshot = serde_json::from_str(&content)
        .map_err(|e| NetDriftError::malformed_snapshot(path, e.to_string()))?;

    tracing::debug!(
        path = %path.display(),
        scope = %snapshot.scope(),
        "loaded snapshot"
    );
    Ok(snapshot)
}
