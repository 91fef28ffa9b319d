//! Release tooling: cross-build a binary for every target of a fixed
//! matrix, stage it with its runtime config, and pack each target into a
//! `.tar.gz`.
//!
//! ```bash
//! cargo xtask matrix                          # show targets and output paths
//! cargo xtask doctor                          # check go, tar, config template
//! cargo xtask release -- -ldflags "-s -w"     # build + package every target
//! cargo xtask clean                           # drop leftover staging/archives
//! ```

pub mod app;
pub mod cli;
pub mod logger;
pub mod release;
pub mod tasks;
