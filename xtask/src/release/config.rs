//! Release configuration.
//!
//! Everything the pipeline needs to know about paths, tools and the matrix
//! lives here, so tests can point a whole run at a temporary directory.
//! A config file is JSON; every field is optional and falls back to the
//! defaults below.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::target::{default_targets, Target};

/// What to do with the rest of the run once a target fails to compile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Archive the target anyway and keep going. Failure is still reported.
    #[default]
    Continue,
    /// Keep going, but leave the failed target's staging directory unarchived.
    SkipArchive,
    /// Stop the matrix after the first failed target.
    Abort,
}

/// Compiler invocation shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub program: String,
    pub subcommand: Vec<String>,
    pub os_var: String,
    pub arch_var: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            subcommand: vec!["build".to_string()],
            os_var: "GOOS".to_string(),
            arch_var: "GOARCH".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Directory that receives staging directories and archives.
    pub dest_root: PathBuf,
    pub prefix: String,
    pub binary_name: String,
    /// Canonical sample config copied into every staging directory.
    pub config_template: PathBuf,
    pub config_dest_name: String,
    pub archive_suffix: String,
    pub compiler: CompilerConfig,
    pub archiver_program: String,
    pub on_build_failure: FailurePolicy,
    pub targets: Vec<Target>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            dest_root: PathBuf::from("build"),
            prefix: "postman_".to_string(),
            binary_name: "postman".to_string(),
            config_template: PathBuf::from("config.sample.toml"),
            config_dest_name: "config.toml".to_string(),
            archive_suffix: ".tar.gz".to_string(),
            compiler: CompilerConfig::default(),
            archiver_program: "tar".to_string(),
            on_build_failure: FailurePolicy::default(),
            targets: default_targets(),
        }
    }
}

impl ReleaseConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading release config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing release config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config file if given, built-in defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            bail!("Release matrix is empty");
        }
        if self.prefix.is_empty() {
            bail!("Staging prefix must not be empty");
        }
        if self.binary_name.is_empty() {
            bail!("Binary name must not be empty");
        }
        if self.config_dest_name.is_empty() {
            bail!("Config destination name must not be empty");
        }
        if self.archive_suffix.is_empty() {
            bail!("Archive suffix must not be empty");
        }
        if self.compiler.program.is_empty() {
            bail!("Compiler program must not be empty");
        }

        let mut seen = HashSet::new();
        for t in &self.targets {
            if t.os.is_empty() || t.arch.is_empty() {
                bail!("Target has an empty os or arch: {t:?}");
            }
            if t.os.contains(['/', '\\']) || t.arch.contains(['/', '\\']) {
                bail!("Target {t} contains a path separator");
            }
            if !seen.insert(t) {
                bail!("Duplicate target in release matrix: {t}");
            }
        }
        Ok(())
    }
}
