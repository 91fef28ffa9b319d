//! Per-target stage outcomes and the run summary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::target::Target;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Ok,
    Failed { error: String },
    Skipped { reason: String },
}

impl StageOutcome {
    /// Render the full anyhow chain so the cause is not lost.
    pub fn from_result(result: &Result<()>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(e) => Self::Failed {
                error: format!("{e:#}"),
            },
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Failed { .. } => "failed",
            Self::Skipped { .. } => "skipped",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TargetRecord {
    pub target: Target,
    pub staging_dir: PathBuf,
    pub archive: PathBuf,
    /// Directory preparation and config staging.
    pub stage: StageOutcome,
    pub build: StageOutcome,
    pub archive_step: StageOutcome,
    pub cleanup: StageOutcome,
}

impl TargetRecord {
    pub fn failed(&self) -> bool {
        [&self.stage, &self.build, &self.archive_step, &self.cleanup]
            .iter()
            .any(|s| s.is_failed())
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{:<16} stage={} build={} archive={} cleanup={}",
            self.target.to_string(),
            self.stage.label(),
            self.build.label(),
            self.archive_step.label(),
            self.cleanup.label()
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReleaseReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub flags: Vec<String>,
    pub targets: Vec<TargetRecord>,
}

impl ReleaseReport {
    pub fn succeeded(&self) -> bool {
        !self.targets.iter().any(TargetRecord::failed)
    }

    pub fn failed_targets(&self) -> impl Iterator<Item = &TargetRecord> {
        self.targets.iter().filter(|r| r.failed())
    }

    /// Log one line per target and a final tally.
    pub fn log_summary(&self) {
        for record in &self.targets {
            if record.failed() {
                log::error!("{}", record.summary_line());
            } else {
                log::info!("{}", record.summary_line());
            }
        }
        let failed = self.failed_targets().count();
        log::info!(
            "{} target(s), {} failed, {:.1}s",
            self.targets.len(),
            failed,
            (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
        );
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Serializing release report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Writing release report {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(build: StageOutcome) -> TargetRecord {
        TargetRecord {
            target: Target::new("linux", "amd64"),
            staging_dir: PathBuf::from("build/postman_linux_amd64"),
            archive: PathBuf::from("build/postman_linux_amd64.tar.gz"),
            stage: StageOutcome::Ok,
            build,
            archive_step: StageOutcome::Ok,
            cleanup: StageOutcome::Ok,
        }
    }

    fn report(targets: Vec<TargetRecord>) -> ReleaseReport {
        let now = Utc::now();
        ReleaseReport {
            started_at: now,
            finished_at: now,
            flags: Vec::new(),
            targets,
        }
    }

    #[test]
    fn test_failure_chain_is_kept() {
        let err: Result<()> = Err(anyhow::anyhow!("exit status 2")).context("Running go");
        let outcome = StageOutcome::from_result(&err);
        assert_eq!(
            outcome,
            StageOutcome::Failed {
                error: "Running go: exit status 2".to_string()
            }
        );
    }

    #[test]
    fn test_skipped_is_not_a_failure() {
        let r = report(vec![record(StageOutcome::skipped("abort"))]);
        assert!(r.succeeded());
    }

    #[test]
    fn test_any_failed_stage_fails_the_run() {
        let r = report(vec![
            record(StageOutcome::Ok),
            record(StageOutcome::Failed {
                error: "boom".to_string(),
            }),
        ]);
        assert!(!r.succeeded());
        assert_eq!(r.failed_targets().count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let r = report(vec![record(StageOutcome::Failed {
            error: "boom".to_string(),
        })]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["targets"][0]["build"]["status"], "failed");
        assert_eq!(v["targets"][0]["build"]["error"], "boom");
        assert_eq!(v["targets"][0]["stage"]["status"], "ok");
        assert_eq!(v["targets"][0]["target"]["os"], "linux");
    }
}
