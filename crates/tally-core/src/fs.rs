//! Filesystem utilities for atomic writes.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, TallyError};

/// Write `data` to `destination` without ever exposing a half-written file.
///
/// The bytes go to a sibling temp file which is synced and then renamed over
/// the destination.
///
/// # Errors
///
/// Returns `TallyError::Export` if the temp file cannot be created, written,
/// or renamed into place. The temp file is removed on failure.
pub fn write_atomic(destination: &Path, data: &[u8]) -> Result<()> {
    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            TallyError::Export(format!("Invalid export path: {}", destination.display()))
        })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TallyError::Export(format!("System time error: {}", e)))?
        .as_nanos();
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let written = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        });
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(TallyError::Export(format!(
            "Failed to write {}: {}",
            temp_path.display(),
            err
        )));
    }

    rename_with_fallback(&temp_path, destination)
        .map_err(|e| TallyError::Export(format!("Atomic rename failed: {}", e)))
}

/// Rename, retrying once after removing the destination for platforms where
/// rename refuses to replace an existing file. Cleans up `temp_path` on failure.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!("initial: {}, retry: {}", initial_err, retry_err),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_new_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("export.csv");

        write_atomic(&dest, b"date,category,amount,note\n").unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "date,category,amount,note\n"
        );
        // No temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("export.csv");
        fs::write(&dest, "old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_missing_directory_is_export_error() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("export.csv");

        let err = write_atomic(&dest, b"x").unwrap_err();
        assert!(matches!(err, TallyError::Export(_)));
    }
}
