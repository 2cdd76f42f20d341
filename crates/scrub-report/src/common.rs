//! Shared file helpers.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scrub_model::{Result, ScrubError};

/// Ensure the parent directory of `path` exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ScrubError::export(parent, err))?;
    }
    Ok(())
}

/// Replace `path` with `bytes` via a temp file and rename, so a failed run
/// never leaves a half-written output behind.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    if let Err(err) = write_synced(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(ScrubError::export(&temp_path, err));
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(ScrubError::export(path, err));
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_overwrites() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("out.txt");
        write_atomic(&path, b"first").expect("first write");
        write_atomic(&path, b"second").expect("second write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "second");
        assert!(!dir.path().join("nested").join("out.txt.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("out.json");
        fs::create_dir(&path).expect("directory in the way");

        let error = write_atomic(&path, b"{}").expect_err("rename onto a directory");
        assert!(matches!(error, ScrubError::Export { .. }), "{error}");
        assert!(!dir.path().join("out.json.tmp").exists());
        assert!(path.is_dir());
    }
}
