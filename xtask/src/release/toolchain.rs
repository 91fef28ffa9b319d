//! External collaborators: the compiler and the archive utility.
//!
//! The pipeline only talks to [`Toolchain`] and [`Archiver`]; the
//! process-backed implementations live here too.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::config::ReleaseConfig;
use super::target::Target;

/// One compiler run for one target. Built fresh per target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInvocation {
    pub program: String,
    /// Environment overrides, e.g. `GOOS=linux`, `GOARCH=amd64`.
    pub envs: Vec<(String, String)>,
    pub args: Vec<String>,
    /// Path the binary is written to.
    pub output: PathBuf,
}

impl BuildInvocation {
    pub fn for_target(
        config: &ReleaseConfig,
        target: &Target,
        staging: &Path,
        flags: &[String],
    ) -> Self {
        let output = staging.join(&config.binary_name);

        let mut args = config.compiler.subcommand.clone();
        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());
        // Pass-through flags are forwarded as given.
        args.extend(flags.iter().cloned());

        Self {
            program: config.compiler.program.clone(),
            envs: vec![
                (config.compiler.os_var.clone(), target.os.clone()),
                (config.compiler.arch_var.clone(), target.arch.clone()),
            ],
            args,
            output,
        }
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)))
            .args(&self.args);
        cmd
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self.envs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        parts.push(self.program.clone());
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Runs one build. `Err` means the binary should not be trusted.
pub trait Toolchain {
    fn build(&self, invocation: &BuildInvocation) -> Result<()>;
}

/// Packs a staging directory and reclaims it afterwards.
pub trait Archiver {
    fn compress(&self, dir: &Path, archive: &Path) -> Result<()>;

    fn remove(&self, dir: &Path) -> Result<()> {
        std::fs::remove_dir_all(dir).with_context(|| format!("Removing {}", dir.display()))
    }
}

/// Spawns the configured compiler with inherited stdio.
#[derive(Default)]
pub struct ProcessToolchain;

impl Toolchain for ProcessToolchain {
    fn build(&self, invocation: &BuildInvocation) -> Result<()> {
        log::debug!("$ {}", invocation.display());
        run_cmd(&mut invocation.to_command())
            .with_context(|| format!("Running {}", invocation.program))
    }
}

/// `tar -zcf <archive> -C <parent> <name>`. Stdout is discarded; stderr is
/// captured and attached to the error when tar fails.
pub struct TarArchiver {
    pub program: String,
}

impl TarArchiver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for TarArchiver {
    fn default() -> Self {
        Self::new("tar")
    }
}

impl Archiver for TarArchiver {
    fn compress(&self, dir: &Path, archive: &Path) -> Result<()> {
        let name = dir
            .file_name()
            .with_context(|| format!("{} has no directory name", dir.display()))?;
        let parent = match dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut cmd = Command::new(&self.program);
        cmd.arg("-zcf")
            .arg(archive)
            .arg("-C")
            .arg(parent)
            .arg(name)
            .stdout(Stdio::null());
        run_captured(&mut cmd).with_context(|| format!("Compressing {}", dir.display()))
    }
}

fn run_cmd(cmd: &mut Command) -> Result<()> {
    let status = cmd.status().with_context(|| "Spawning command")?;
    if !status.success() {
        bail!("Command failed: {status}");
    }
    Ok(())
}

/// Like [`run_cmd`], but stderr is captured and becomes part of the error.
fn run_captured(cmd: &mut Command) -> Result<()> {
    let out = cmd.output().with_context(|| "Spawning command")?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            bail!("Command failed: {}", out.status);
        }
        bail!("Command failed: {}: {stderr}", out.status);
    }
    Ok(())
}
