// ── Registry file I/O ──
//
// The on-disk form is a single JSON array of records. Writes go to a
// uniquely named sibling file first and are renamed into place, so a
// reader never observes a half-written collection.

use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::DeviceRecord;

/// Read the full collection. `Ok(None)` when the file does not exist yet.
pub(crate) async fn load(path: &Path) -> Result<Option<Vec<DeviceRecord>>, CoreError> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CoreError::StorageRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&raw)
        .map(Some)
        .map_err(|source| CoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

/// Replace the full collection on disk.
pub(crate) async fn store(path: &Path, records: &[DeviceRecord]) -> Result<(), CoreError> {
    let payload = serde_json::to_vec_pretty(records)?;
    let write_err = |source| CoreError::StorageWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let temp_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
    tokio::fs::write(&temp_path, payload)
        .await
        .map_err(write_err)?;

    if let Err(source) = tokio::fs::rename(&temp_path, path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
            warn!(path = %temp_path.display(), error = %cleanup, "failed to remove temp registry file");
        }
        return Err(write_err(source));
    }

    Ok(())
}
