//! Undo command: put every backed-up file back.

use anyhow::{Context, Result};
use std::path::Path;

use super::config_path;
use crate::backup::restore_backups;
use crate::config::SwagdocConfig;

pub fn run(dir: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let path = config_path(dir, config);
    let config = SwagdocConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;

    let report = restore_backups(dir, &config.pipeline.backup_suffix)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for path in &report.restored {
        println!("restored {}", path.display());
    }
    for (path, reason) in &report.failed {
        println!("FAILED {}: {}", path.display(), reason);
    }
    println!();
    println!(
        "Undo complete: {} restored, {} failed",
        report.restored.len(),
        report.failed.len()
    );
    Ok(())
}
