//! Release pipeline.
//!
//! Structure:
//! - `target` - matrix rows and the default matrix
//! - `config` - paths, tools, matrix and failure policy
//! - `layout` - staging/archive naming and directory preparation
//! - `toolchain` - compiler and archive utility seams
//! - `matrix` - per-target staging + compiler run
//! - `archive` - compress + cleanup
//! - `report` - per-stage outcomes and the JSON report
//!
//! The matrix builder runs to completion before the archiver starts.
//! Everything is sequential and blocking.

pub mod archive;
pub mod config;
pub mod layout;
pub mod matrix;
pub mod report;
pub mod target;
pub mod toolchain;

use chrono::Utc;

pub use config::{FailurePolicy, ReleaseConfig};
pub use report::{ReleaseReport, StageOutcome, TargetRecord};
pub use target::Target;
pub use toolchain::{Archiver, BuildInvocation, ProcessToolchain, TarArchiver, Toolchain};

/// Build every target, then pack every staging directory.
pub fn run_release(
    config: &ReleaseConfig,
    flags: &[String],
    toolchain: &dyn Toolchain,
    archiver: &dyn Archiver,
) -> ReleaseReport {
    let started_at = Utc::now();
    log::info!(
        "[info] Release matrix: {} target(s) into {}",
        config.targets.len(),
        config.dest_root.display()
    );

    let builds = matrix::build_matrix(config, flags, toolchain);
    let targets = archive::pack_all(builds, config, archiver);

    ReleaseReport {
        started_at,
        finished_at: Utc::now(),
        flags: flags.to_vec(),
        targets,
    }
}
