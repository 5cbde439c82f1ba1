//! Data directory provisioning.

use std::fs;
use std::path::Path;

use crate::error::BootstrapError;

/// Create `path` and any missing parents. An existing directory is fine;
/// anything else in the way is fatal.
pub fn ensure_data_dir(path: &Path) -> Result<(), BootstrapError> {
    fs::create_dir_all(path).map_err(|source| BootstrapError::CreateDataDir {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Data directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("deep/nested/data");
        ensure_data_dir(&data).unwrap();
        assert!(data.is_dir());
        // Second call is a no-op.
        ensure_data_dir(&data).unwrap();
    }

    #[test]
    fn test_file_in_the_way_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a dir").unwrap();

        let err = ensure_data_dir(&blocker).unwrap_err();
        assert!(matches!(err, BootstrapError::CreateDataDir { .. }));

        let err = ensure_data_dir(&blocker.join("child")).unwrap_err();
        assert!(matches!(err, BootstrapError::CreateDataDir { .. }));
    }
}
