//! Driver error types and the fatal-exit path.
//!
//! Configuration-class errors (spec §7) are represented as a structured
//! `thiserror` enum so call sites can match on them; everything else flows
//! through `anyhow::Result` with `.context(...)`, the same split the
//! teacher repo uses between domain error enums and app-level plumbing.

use colored::Colorize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DriverError {
    #[error("No files to compile.")]
    NoSourceFiles,

    #[error("'{0}' is not a .c3 file or wildcard.")]
    NotASourceFile(String),

    #[error("scratch string buffer overflow")]
    ScratchBufferOverflow,

    #[error("failed to spawn codegen worker thread")]
    ThreadSpawnFailure,

    #[error("object format does not support linking for this target")]
    LinkingUnsupported,

    #[error("compilation failed with errors")]
    AnalysisFailed,
}

/// Print a colored fatal diagnostic and exit the process non-zero. This is
/// the single place the driver terminates the process for a
/// configuration-class error (spec §7); it never returns.
pub fn error_exit(msg: &str) -> ! {
    eprintln!("{} {}", "error:".red().bold(), msg);
    std::process::exit(1);
}
