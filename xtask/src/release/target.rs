//! Build matrix rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One (platform family, architecture) pair of the release matrix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub os: String,
    pub arch: String,
}

impl Target {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Release matrix shipped by default.
///
/// Order matters only for log readability and archive creation order.
pub const DEFAULT_MATRIX: &[(&str, &str)] = &[
    ("darwin", "386"),
    ("darwin", "amd64"),
    ("linux", "386"),
    ("linux", "amd64"),
];

pub fn default_targets() -> Vec<Target> {
    DEFAULT_MATRIX
        .iter()
        .map(|(os, arch)| Target::new(*os, *arch))
        .collect()
}
