use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::cli::ConfigArgs;
use crate::release::{self, FailurePolicy, ProcessToolchain, TarArchiver};

pub fn run(
    args: &ConfigArgs,
    on_build_failure: Option<FailurePolicy>,
    report_path: Option<PathBuf>,
    flags: Vec<String>,
) -> Result<()> {
    let mut config = super::common::load_config(args)?;
    if let Some(policy) = on_build_failure {
        config.on_build_failure = policy;
    }

    if !flags.is_empty() {
        log::info!("[info] Pass-through flags: {}", flags.join(" "));
    }

    let archiver = TarArchiver::new(config.archiver_program.clone());
    let report = release::run_release(&config, &flags, &ProcessToolchain, &archiver);

    report.log_summary();
    if let Some(path) = report_path {
        report.write_json(&path)?;
        log::info!("[info] Report: {}", path.display());
    }

    if !report.succeeded() {
        let failed: Vec<String> = report
            .failed_targets()
            .map(|r| r.target.to_string())
            .collect();
        bail!("release failed for: {}", failed.join(", "));
    }

    for r in &report.targets {
        log::info!("[ok] {}", r.archive.display());
    }
    Ok(())
}
