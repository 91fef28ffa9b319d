use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::ConfigArgs;
use crate::release::{layout, ReleaseConfig};

pub fn run(args: &ConfigArgs) -> Result<()> {
    let config = crate::tasks::release::common::load_config(args)?;
    let removed = clean(&config)?;
    log::info!("[info] Removed {removed} path(s)");
    Ok(())
}

/// Remove every staging directory and archive of the matrix. Returns how
/// many paths were removed.
pub fn clean(config: &ReleaseConfig) -> Result<usize> {
    let mut removed = 0;
    for t in &config.targets {
        let staging = layout::staging_dir(config, t);
        let archive = layout::archive_path(&staging, &config.archive_suffix);

        if staging.is_dir() {
            std::fs::remove_dir_all(&staging)
                .with_context(|| format!("Removing {}", staging.display()))?;
            log::debug!("removed {}", staging.display());
            removed += 1;
        }
        if remove_file_if_present(&archive)? {
            removed += 1;
        }
    }
    Ok(removed)
}

fn remove_file_if_present(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    std::fs::remove_file(path).with_context(|| format!("Removing {}", path.display()))?;
    log::debug!("removed {}", path.display());
    Ok(true)
}
