//! Matrix builder: one staging directory and one compiler run per target.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::config::{FailurePolicy, ReleaseConfig};
use super::layout;
use super::report::StageOutcome;
use super::target::Target;
use super::toolchain::{BuildInvocation, Toolchain};

/// What the matrix builder produced for one target.
#[derive(Clone, Debug)]
pub struct TargetBuild {
    pub target: Target,
    pub staging_dir: PathBuf,
    pub stage: StageOutcome,
    pub build: StageOutcome,
}

impl TargetBuild {
    pub fn failed(&self) -> bool {
        self.stage.is_failed() || self.build.is_failed()
    }

    /// False for targets the matrix never reached.
    pub fn attempted(&self) -> bool {
        !matches!(self.stage, StageOutcome::Skipped { .. })
    }

    fn aborted(config: &ReleaseConfig, target: &Target) -> Self {
        Self {
            target: target.clone(),
            staging_dir: layout::staging_dir(config, target),
            stage: StageOutcome::skipped("aborted"),
            build: StageOutcome::skipped("aborted"),
        }
    }
}

/// Run every target of the matrix in declared order.
///
/// One entry per target is always returned. Under [`FailurePolicy::Abort`]
/// the targets after the first failure are not attempted and come back
/// with both stages skipped.
pub fn build_matrix(
    config: &ReleaseConfig,
    flags: &[String],
    toolchain: &dyn Toolchain,
) -> Vec<TargetBuild> {
    let mut out = Vec::with_capacity(config.targets.len());
    let mut aborted = false;

    for target in &config.targets {
        if aborted {
            out.push(TargetBuild::aborted(config, target));
            continue;
        }
        let built = build_target(config, target, flags, toolchain);
        if built.failed() && config.on_build_failure == FailurePolicy::Abort {
            log::warn!("[abort] {target} failed; skipping the rest of the matrix");
            aborted = true;
        }
        out.push(built);
    }

    out
}

fn build_target(
    config: &ReleaseConfig,
    target: &Target,
    flags: &[String],
    toolchain: &dyn Toolchain,
) -> TargetBuild {
    let staging_dir = layout::staging_dir(config, target);
    log::info!("[step] Build {target} -> {}", staging_dir.display());

    let staged = prepare(config, &staging_dir);
    let stage = StageOutcome::from_result(&staged);

    let build = if staged.is_ok() {
        let invocation = BuildInvocation::for_target(config, target, &staging_dir, flags);
        let result = toolchain.build(&invocation);
        if let Err(e) = &result {
            log::error!("[bad] {target}: {e:#}");
        }
        StageOutcome::from_result(&result)
    } else {
        log::error!("[bad] {target}: staging failed");
        StageOutcome::skipped("staging directory could not be prepared")
    };

    TargetBuild {
        target: target.clone(),
        staging_dir,
        stage,
        build,
    }
}

fn prepare(config: &ReleaseConfig, staging_dir: &Path) -> Result<()> {
    layout::ensure_dir(staging_dir)?;
    let copied = layout::stage_config(config, staging_dir)?;
    log::debug!("staged {}", copied.display());
    Ok(())
}
