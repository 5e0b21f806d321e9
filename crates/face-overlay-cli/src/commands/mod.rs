//! CLI command definitions and handlers.

pub mod detect;
pub mod models;

use clap::{Parser, Subcommand};

/// Face Overlay - detect faces and position overlay rectangles
#[derive(Parser)]
#[command(name = "face-overlay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared detect arguments (paths, output, flags).
    #[command(flatten)]
    pub detect: detect::DetectArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Detect faces and emit overlay reports
    Detect(detect::DetectArgs),
    /// Manage model bundles
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Detection ran for every processed image (faces or none).
    Success,
    /// Models were unavailable or a detection attempt failed.
    DetectionFailed,
    /// Usage or internal error.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::DetectionFailed => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
