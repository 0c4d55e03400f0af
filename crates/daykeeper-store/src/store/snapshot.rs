//! Whole-collection JSON snapshots on disk.

use crate::model::UserMap;
use daykeeper_core::error::DaykeeperError;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Read a snapshot. A missing file is an empty collection; an unparsable
/// file is moved aside to `<name>.corrupt` and also read as empty.
pub(crate) fn read_snapshot<T: DeserializeOwned>(
    path: &Path,
) -> Result<UserMap<T>, DaykeeperError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(UserMap::new()),
        Err(e) => {
            return Err(DaykeeperError::Store(format!(
                "failed to read {}: {e}",
                path.display()
            )))
        }
    };

    if content.trim().is_empty() {
        return Ok(UserMap::new());
    }

    match serde_json::from_str(&content) {
        Ok(map) => Ok(map),
        Err(e) => {
            let aside = corrupt_path(path);
            error!(
                "snapshot {} is unreadable ({e}), moving it to {}",
                path.display(),
                aside.display()
            );
            if let Err(re) = std::fs::rename(path, &aside) {
                warn!("failed to move corrupt snapshot aside: {re}");
            }
            Ok(UserMap::new())
        }
    }
}

/// Write serialized snapshot text atomically (temp file, fsync, rename).
///
/// Blocking; callers on the runtime go through `spawn_blocking`.
pub(crate) fn write_json(path: &Path, json: &str) -> Result<(), DaykeeperError> {
    let tmp_path = tmp_path(path);

    let mut file = std::fs::File::create(&tmp_path).map_err(|e| {
        DaykeeperError::Store(format!(
            "failed to create temp file '{}': {e}",
            tmp_path.display()
        ))
    })?;
    file.write_all(json.as_bytes())
        .map_err(|e| DaykeeperError::Store(format!("failed to write temp file: {e}")))?;
    file.sync_all()
        .map_err(|e| DaykeeperError::Store(format!("failed to sync temp file: {e}")))?;
    drop(file);

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        DaykeeperError::Store(format!(
            "failed to replace snapshot '{}': {e}",
            path.display()
        ))
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn corrupt_path(path: &Path) -> PathBuf {
    path.with_extension("json.corrupt")
}
