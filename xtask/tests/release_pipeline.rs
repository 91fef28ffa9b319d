// End-to-end runs of the release pipeline against a temporary destination
// root, with the compiler and archive utility replaced by recording stubs.

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use xtask::release::{
    self, Archiver, BuildInvocation, FailurePolicy, ReleaseConfig, StageOutcome, TarArchiver,
    Target, Toolchain,
};

/// Records every invocation. Writes nothing unless `write_binary` is set.
#[derive(Default)]
struct RecordingToolchain {
    calls: RefCell<Vec<BuildInvocation>>,
    write_binary: bool,
    fail_arch: Option<&'static str>,
}

impl Toolchain for RecordingToolchain {
    fn build(&self, invocation: &BuildInvocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        if self.fail_arch == Some(invocation.envs[1].1.as_str()) {
            bail!("exit status: 2");
        }
        if self.write_binary {
            std::fs::write(&invocation.output, b"binary")?;
        }
        Ok(())
    }
}

/// Records `(dir, archive)` pairs; directory removal is the real one.
#[derive(Default)]
struct RecordingArchiver {
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl Archiver for RecordingArchiver {
    fn compress(&self, dir: &Path, archive: &Path) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((dir.to_path_buf(), archive.to_path_buf()));
        Ok(())
    }
}

fn config_in(tmp: &TempDir, targets: Vec<Target>) -> ReleaseConfig {
    let template = tmp.path().join("config.sample.toml");
    std::fs::write(&template, "[server]\nport = 8080\n").unwrap();
    ReleaseConfig {
        dest_root: tmp.path().join("build"),
        config_template: template,
        targets,
        ..ReleaseConfig::default()
    }
}

fn two_targets() -> Vec<Target> {
    vec![Target::new("linux", "amd64"), Target::new("darwin", "386")]
}

fn remaining_staging_dirs(root: &Path) -> usize {
    std::fs::read_dir(root)
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().is_dir())
        .count()
}

#[test]
fn test_two_target_run_with_recording_stubs() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp, two_targets());
    let toolchain = RecordingToolchain::default();
    let archiver = RecordingArchiver::default();
    let flags = vec!["-ldflags".to_string(), "-X main.version=1.2.3".to_string()];

    let report = release::run_release(&config, &flags, &toolchain, &archiver);

    let build = tmp.path().join("build");
    let calls = toolchain.calls.borrow();
    assert_eq!(calls.len(), 2);

    assert_eq!(
        calls[0].envs,
        vec![
            ("GOOS".to_string(), "linux".to_string()),
            ("GOARCH".to_string(), "amd64".to_string()),
        ]
    );
    assert_eq!(calls[0].output, build.join("postman_linux_amd64/postman"));
    assert_eq!(
        calls[1].envs,
        vec![
            ("GOOS".to_string(), "darwin".to_string()),
            ("GOARCH".to_string(), "386".to_string()),
        ]
    );
    assert_eq!(calls[1].output, build.join("postman_darwin_386/postman"));
    for call in calls.iter() {
        assert_eq!(call.program, "go");
        assert_eq!(call.args[0], "build");
        assert_eq!(call.args[1], "-o");
        assert_eq!(&call.args[3..], flags.as_slice());
    }

    let packed = archiver.calls.borrow();
    assert_eq!(
        *packed,
        vec![
            (
                build.join("postman_linux_amd64"),
                build.join("postman_linux_amd64.tar.gz")
            ),
            (
                build.join("postman_darwin_386"),
                build.join("postman_darwin_386.tar.gz")
            ),
        ]
    );

    assert_eq!(remaining_staging_dirs(&build), 0);
    assert!(report.succeeded());
    assert_eq!(report.targets.len(), 2);
    assert_eq!(report.flags, flags);
}

#[test]
fn test_compression_failure_still_removes_staging() {
    struct BrokenArchiver;
    impl Archiver for BrokenArchiver {
        fn compress(&self, _dir: &Path, _archive: &Path) -> Result<()> {
            bail!("gzip: broken pipe")
        }
    }

    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp, two_targets());
    let toolchain = RecordingToolchain {
        write_binary: true,
        ..Default::default()
    };

    let report = release::run_release(&config, &[], &toolchain, &BrokenArchiver);

    for record in &report.targets {
        assert!(record.archive_step.is_failed());
        assert_eq!(record.cleanup, StageOutcome::Ok);
        assert!(!record.staging_dir.exists());
        assert!(!record.archive.exists());
    }
    assert!(!report.succeeded());
}

#[test]
fn test_failed_build_is_archived_under_continue() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp, two_targets());
    let toolchain = RecordingToolchain {
        write_binary: true,
        fail_arch: Some("386"),
        ..Default::default()
    };
    let archiver = RecordingArchiver::default();

    let report = release::run_release(&config, &[], &toolchain, &archiver);

    assert_eq!(archiver.calls.borrow().len(), 2);
    assert!(report.targets[0].build.is_ok());
    assert!(report.targets[1].build.is_failed());
    assert!(!report.succeeded());
    let failed: Vec<_> = report.failed_targets().map(|r| r.target.clone()).collect();
    assert_eq!(failed, vec![Target::new("darwin", "386")]);
}

#[test]
fn test_skip_archive_keeps_failed_staging_dir() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_in(&tmp, two_targets());
    config.on_build_failure = FailurePolicy::SkipArchive;
    let toolchain = RecordingToolchain {
        write_binary: true,
        fail_arch: Some("amd64"),
        ..Default::default()
    };
    let archiver = RecordingArchiver::default();

    let report = release::run_release(&config, &[], &toolchain, &archiver);

    let packed = archiver.calls.borrow();
    assert_eq!(packed.len(), 1);
    assert!(packed[0].0.ends_with("postman_darwin_386"));

    let failed = &report.targets[0];
    assert!(matches!(failed.archive_step, StageOutcome::Skipped { .. }));
    assert!(failed.staging_dir.join("config.toml").is_file());
    assert!(!report.targets[1].staging_dir.exists());
}

#[test]
fn test_abort_keeps_failed_target_and_reports_the_rest() {
    let tmp = TempDir::new().unwrap();
    let mut config = config_in(
        &tmp,
        vec![
            Target::new("linux", "386"),
            Target::new("darwin", "amd64"),
            Target::new("linux", "amd64"),
        ],
    );
    config.on_build_failure = FailurePolicy::Abort;
    let toolchain = RecordingToolchain {
        write_binary: true,
        fail_arch: Some("amd64"),
        ..Default::default()
    };
    let archiver = RecordingArchiver::default();

    let report = release::run_release(&config, &[], &toolchain, &archiver);

    assert_eq!(toolchain.calls.borrow().len(), 2);
    let packed = archiver.calls.borrow();
    assert_eq!(packed.len(), 1);
    assert!(packed[0].0.ends_with("postman_linux_386"));

    assert_eq!(report.targets.len(), 3);
    assert!(!report.succeeded());

    let failed = &report.targets[1];
    assert!(failed.build.is_failed());
    assert_eq!(failed.archive_step, StageOutcome::skipped("build failed"));
    assert!(failed.staging_dir.join("config.toml").is_file());

    let never_run = &report.targets[2];
    assert_eq!(never_run.target, Target::new("linux", "amd64"));
    for stage in [
        &never_run.stage,
        &never_run.build,
        &never_run.archive_step,
        &never_run.cleanup,
    ] {
        assert_eq!(*stage, StageOutcome::skipped("aborted"));
    }
    assert!(!never_run.staging_dir.exists());
}

#[test]
fn test_report_json_written() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp, vec![Target::new("linux", "amd64")]);
    let report = release::run_release(
        &config,
        &[],
        &RecordingToolchain::default(),
        &RecordingArchiver::default(),
    );

    let path = tmp.path().join("report.json");
    report.write_json(&path).unwrap();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["targets"][0]["target"]["arch"], "amd64");
    assert_eq!(v["targets"][0]["archive_step"]["status"], "ok");
    assert!(v["started_at"].is_string());
}

#[test]
fn test_real_tar_produces_archive() {
    if which::which("tar").is_err() {
        eprintln!("WARNING: tar not found in PATH, skipping");
        return;
    }

    let tmp = TempDir::new().unwrap();
    let config = config_in(&tmp, vec![Target::new("linux", "amd64")]);
    let toolchain = RecordingToolchain {
        write_binary: true,
        ..Default::default()
    };

    let report = release::run_release(&config, &[], &toolchain, &TarArchiver::default());
    assert!(report.succeeded(), "{:?}", report.targets);

    let record = &report.targets[0];
    assert_eq!(
        record.archive,
        tmp.path().join("build/postman_linux_amd64.tar.gz")
    );
    assert!(record.archive.is_file());
    assert!(!record.staging_dir.exists());

    let listing = Command::new("tar")
        .arg("-tzf")
        .arg(&record.archive)
        .output()
        .unwrap();
    let listing = String::from_utf8_lossy(&listing.stdout);
    assert!(listing.contains("postman_linux_amd64/postman"));
    assert!(listing.contains("postman_linux_amd64/config.toml"));
}
