use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::release::FailurePolicy;

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Release tasks: cross-build the binary matrix and package it")]
pub struct Cli {
    /// More output (-v debug, -vv trace). Goes before the subcommand.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors. Goes before the subcommand.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Cmd,
}

/// Where the release configuration comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON release config. Built-in defaults when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the destination root (staging dirs and archives).
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Build every target of the matrix and package each one.
    ///
    /// Usage:
    ///   cargo xtask release -- -ldflags "-s -w"
    ///
    /// Words after `release` that are not its own options, and everything
    /// after `--`, are forwarded verbatim to every compiler run.
    Release {
        #[command(flatten)]
        config: ConfigArgs,

        /// What to do once a target fails to build.
        #[arg(long, value_enum)]
        on_build_failure: Option<FailurePolicy>,

        /// Write a JSON report of every stage outcome.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Pass-through compiler flags.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "FLAGS")]
        flags: Vec<String>,
    },

    /// Print the resolved matrix with staging and archive paths.
    Matrix {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Check that the compiler, the archive utility and the config template are present.
    Doctor {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Remove staging directories and archives left by earlier runs.
    Clean {
        #[command(flatten)]
        config: ConfigArgs,
    },
}
