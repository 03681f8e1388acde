//
//  backup.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{Result, SwagdocError};

/// Sibling backup path: `handler.go` -> `handler.go.bak`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Copy `path` to its backup path unless a backup already exists.
///
/// An existing backup holds the oldest pre-rewrite state and is never
/// overwritten. Returns whether a new backup was written.
pub fn backup_file(path: &Path, suffix: &str) -> Result<bool> {
    let dest = backup_path(path, suffix);
    if dest.exists() {
        return Ok(false);
    }
    fs::copy(path, &dest)?;
    Ok(true)
}

/// Outcome of a restore pass.
#[derive(Debug, Default, Serialize)]
pub struct RestoreReport {
    pub restored: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Move every `*<suffix>` file under `root` back over its original.
///
/// A failed rename is logged, its backup left in place, and the pass
/// continues with the remaining files. Hidden and ignored files are
/// included since backups are commonly git-ignored.
pub fn restore_backups(root: &Path, suffix: &str) -> Result<RestoreReport> {
    if suffix.is_empty() {
        return Err(SwagdocError::Config("backup suffix must not be empty".into()));
    }
    if !root.is_dir() {
        return Err(SwagdocError::Discovery(
            root.to_path_buf(),
            "not a directory".to_string(),
        ));
    }

    let backups: Vec<PathBuf> = WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| is_backup(path, suffix))
        .collect();

    let mut report = RestoreReport::default();
    for backup in backups {
        match restore_one(&backup, suffix) {
            Ok(original) => {
                info!(file = %original.display(), "restored from backup");
                report.restored.push(original);
            }
            Err(e) => {
                error!(backup = %backup.display(), error = %e, "failed to restore");
                report.failed.push((backup, e.to_string()));
            }
        }
    }

    Ok(report)
}

fn is_backup(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > suffix.len() && n.ends_with(suffix))
}

fn restore_one(backup: &Path, suffix: &str) -> Result<PathBuf> {
    let name = backup
        .to_str()
        .ok_or_else(|| SwagdocError::Restore(backup.to_path_buf(), "non UTF-8 path".into()))?;
    let original = PathBuf::from(&name[..name.len() - suffix.len()]);

    fs::rename(backup, &original)
        .map_err(|e| SwagdocError::Restore(original.clone(), e.to_string()))?;
    Ok(original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::write_atomic;
    use tempfile::tempdir;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("api/users.go"), ".bak"),
            PathBuf::from("api/users.go.bak")
        );
    }

    #[test]
    fn test_existing_backup_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.go");
        fs::write(&path, "v1").unwrap();

        assert!(backup_file(&path, ".bak").unwrap());
        fs::write(&path, "v2").unwrap();
        assert!(!backup_file(&path, ".bak").unwrap());

        assert_eq!(fs::read_to_string(dir.path().join("a.go.bak")).unwrap(), "v1");
    }

    #[test]
    fn test_backup_write_restore_round_trip() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("internal/handlers");
        fs::create_dir_all(&nested).unwrap();
        let path = nested.join("users.go");
        let original = b"package handlers\n\nfunc A() {}\n".to_vec();
        fs::write(&path, &original).unwrap();

        backup_file(&path, ".bak").unwrap();
        write_atomic(&path, b"package handlers\n\n// rewritten\nfunc A() {}\n").unwrap();

        let report = restore_backups(dir.path(), ".bak").unwrap();

        assert_eq!(report.restored, vec![path.clone()]);
        assert!(report.failed.is_empty());
        assert_eq!(fs::read(&path).unwrap(), original);
        assert!(!nested.join("users.go.bak").exists());
    }

    #[test]
    fn test_restore_finds_hidden_and_ignored_backups() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.bak\n").unwrap();
        fs::create_dir_all(dir.path().join(".hidden")).unwrap();
        fs::write(dir.path().join(".hidden/x.go.bak"), "old").unwrap();
        fs::write(dir.path().join("y.go.bak"), "old").unwrap();
        fs::write(dir.path().join("z.go"), "untouched").unwrap();

        let report = restore_backups(dir.path(), ".bak").unwrap();

        assert_eq!(report.restored.len(), 2);
        assert_eq!(fs::read_to_string(dir.path().join(".hidden/x.go")).unwrap(), "old");
        assert_eq!(fs::read_to_string(dir.path().join("z.go")).unwrap(), "untouched");
    }

    #[test]
    fn test_restore_failure_skips_file_and_continues() {
        let dir = tempdir().unwrap();
        // The original path is a non-empty directory, so the rename fails.
        fs::create_dir_all(dir.path().join("blocked.go/inner")).unwrap();
        fs::write(dir.path().join("blocked.go.bak"), "old").unwrap();
        fs::write(dir.path().join("ok.go.bak"), "old").unwrap();

        let report = restore_backups(dir.path(), ".bak").unwrap();

        assert_eq!(report.restored, vec![dir.path().join("ok.go")]);
        assert_eq!(report.failed.len(), 1);
        assert!(dir.path().join("blocked.go.bak").exists());
    }

    #[test]
    fn test_restore_on_missing_dir_is_error() {
        assert!(restore_backups(Path::new("/no/such/dir/anywhere"), ".bak").is_err());
    }
}
