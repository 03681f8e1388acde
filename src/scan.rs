//
//  scan.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Result, SwagdocError};
use crate::parser::is_go_file;

/// Directories that should never be scanned, even without .gitignore.
const BUILTIN_IGNORE: &[&str] = &["vendor", "node_modules", ".git", "testdata", "third_party"];

/// Check if a path contains any built-in ignored directory.
fn is_builtin_ignored(path: &Path, root: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|c| {
        if let std::path::Component::Normal(name) = c {
            BUILTIN_IGNORE.contains(&name.to_str().unwrap_or(""))
        } else {
            false
        }
    })
}

/// Find all Go source files under `root`.
///
/// Respects .gitignore and a `.swagdocignore` file, walks recursively and
/// returns paths in sorted order.
pub fn scan_dir(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SwagdocError::Discovery(
            root.to_path_buf(),
            "not a directory".to_string(),
        ));
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .add_custom_ignore_filename(".swagdocignore")
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| !is_builtin_ignored(entry.path(), root))
        .filter(|entry| is_go_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}
