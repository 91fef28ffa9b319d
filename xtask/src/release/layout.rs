//! On-disk layout of a release: staging directory and archive naming, plus
//! the filesystem steps that prepare a staging directory.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::config::ReleaseConfig;
use super::target::Target;

/// `<dest_root>/<prefix><os>_<arch>`
pub fn staging_dir(config: &ReleaseConfig, target: &Target) -> PathBuf {
    config
        .dest_root
        .join(format!("{}{}_{}", config.prefix, target.os, target.arch))
}

/// `<staging dir><suffix>`, e.g. `build/postman_linux_amd64.tar.gz`.
pub fn archive_path(staging: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(staging.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Create `dir` and any missing parents. An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Creating directory {}", dir.display()))
}

/// Copy the sample config into the staging directory, replacing any copy
/// left behind by an earlier run.
pub fn stage_config(config: &ReleaseConfig, staging: &Path) -> Result<PathBuf> {
    let dest = staging.join(&config.config_dest_name);
    std::fs::copy(&config.config_template, &dest).with_context(|| {
        format!(
            "Copying {} to {}",
            config.config_template.display(),
            dest.display()
        )
    })?;
    Ok(dest)
}
