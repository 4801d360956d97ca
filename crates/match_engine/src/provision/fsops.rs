//! Blocking directory-tree primitives used by the provisioner.
//!
//! These run on the blocking thread pool via `spawn_blocking`; nothing in
//! here may be called directly from the simulation flow.

use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Recursively copies `src` into `dest`, byte-for-byte, creating
/// directories as needed.
pub(crate) fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    if src.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            copy_tree(&entry.path(), &dest.join(entry.file_name()))?;
        }
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

/// Recursively deletes `path`, retrying entries that resist removal with a
/// permissions-clearing pass before giving up on them.
///
/// Returns whether the tree is fully gone. Failures are logged and left
/// behind; a leaked disposable instance is preferable to stalling the
/// round cycle.
pub(crate) fn remove_tree(path: &Path) -> bool {
    if !path.exists() {
        return true;
    }

    if fs::remove_dir_all(path).is_ok() {
        return true;
    }

    // Plain removal was refused somewhere in the tree; clear read-only
    // permissions bottom-up and retry per entry.
    force_remove(path)
}

fn force_remove(path: &Path) -> bool {
    if path.is_dir() {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {} for removal: {e}", path.display());
                return false;
            }
        };
        let mut all_removed = true;
        for entry in entries.flatten() {
            all_removed &= force_remove(&entry.path());
        }
        if !all_removed {
            return false;
        }
        if let Err(e) = fs::remove_dir(path) {
            warn!("Failed to delete directory {}: {e}", path.display());
            return false;
        }
        true
    } else {
        clear_readonly(path);
        if let Err(e) = fs::remove_file(path) {
            warn!("Failed to delete file {}: {e}", path.display());
            return false;
        }
        true
    }
}

fn clear_readonly(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            let _ = fs::set_permissions(path, permissions);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_replicates_nested_directories_byte_for_byte() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("template");
        fs::create_dir_all(src.join("region/data")).unwrap();
        fs::write(src.join("manifest.dat"), b"top-level").unwrap();
        fs::write(src.join("region/data/chunk_0_0.bin"), vec![7u8; 2048]).unwrap();

        let dest = dir.path().join("12345");
        copy_tree(&src, &dest).unwrap();

        assert_eq!(fs::read(dest.join("manifest.dat")).unwrap(), b"top-level");
        assert_eq!(
            fs::read(dest.join("region/data/chunk_0_0.bin")).unwrap(),
            vec![7u8; 2048]
        );
    }

    #[test]
    fn copy_tree_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_tree(&dir.path().join("absent"), &dir.path().join("out"));
        assert!(result.is_err());
    }

    #[test]
    fn remove_tree_deletes_nested_content_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("instance");
        fs::create_dir_all(target.join("deep/deeper")).unwrap();
        fs::write(target.join("deep/deeper/file.bin"), b"x").unwrap();

        assert!(remove_tree(&target));
        assert!(!target.exists());

        // Already gone counts as success.
        assert!(remove_tree(&target));
    }

    #[test]
    fn remove_tree_clears_readonly_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("instance");
        fs::create_dir_all(&target).unwrap();
        let file = target.join("locked.dat");
        fs::write(&file, b"stubborn").unwrap();
        let mut permissions = fs::metadata(&file).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&file, permissions).unwrap();

        assert!(remove_tree(&target));
        assert!(!target.exists());
    }
}
