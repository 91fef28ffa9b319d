//! Archiver: turn each staging directory into `<dir><suffix>` and drop the
//! uncompressed copy.

use std::path::Path;

use super::config::{FailurePolicy, ReleaseConfig};
use super::layout;
use super::matrix::TargetBuild;
use super::report::{StageOutcome, TargetRecord};
use super::toolchain::Archiver;

/// Outcome of packing one directory.
#[derive(Clone, Debug)]
pub struct PackOutcome {
    pub compress: StageOutcome,
    pub cleanup: StageOutcome,
}

/// Compress `dir` into `archive`, then remove `dir`.
///
/// Removal runs even when compression failed, so a failed compression loses
/// the uncompressed build output. Both outcomes are reported.
pub fn pack_directory(dir: &Path, archive: &Path, archiver: &dyn Archiver) -> PackOutcome {
    let compressed = archiver.compress(dir, archive);
    if let Err(e) = &compressed {
        log::error!("[bad] compress {}: {e:#}", dir.display());
    }

    let removed = archiver.remove(dir);
    if let Err(e) = &removed {
        log::warn!("[warn] cleanup {}: {e:#}", dir.display());
    }

    PackOutcome {
        compress: StageOutcome::from_result(&compressed),
        cleanup: StageOutcome::from_result(&removed),
    }
}

/// Pack the matrix builder's output, strictly in order.
///
/// A failed target is packed only under [`FailurePolicy::Continue`];
/// targets the matrix never reached are never packed.
pub fn pack_all(
    builds: Vec<TargetBuild>,
    config: &ReleaseConfig,
    archiver: &dyn Archiver,
) -> Vec<TargetRecord> {
    builds
        .into_iter()
        .map(|b| {
            let archive = layout::archive_path(&b.staging_dir, &config.archive_suffix);

            let skip_reason = if !b.attempted() {
                Some("aborted")
            } else if b.failed() && config.on_build_failure != FailurePolicy::Continue {
                Some("build failed")
            } else {
                None
            };

            let (archive_step, cleanup) = if let Some(reason) = skip_reason {
                log::warn!("[skip] {} not archived ({reason})", b.target);
                (StageOutcome::skipped(reason), StageOutcome::skipped(reason))
            } else {
                log::info!("[step] Pack {}", archive.display());
                let packed = pack_directory(&b.staging_dir, &archive, archiver);
                (packed.compress, packed.cleanup)
            };

            TargetRecord {
                target: b.target,
                staging_dir: b.staging_dir,
                archive,
                stage: b.stage,
                build: b.build,
                archive_step,
                cleanup,
            }
        })
        .collect()
}
