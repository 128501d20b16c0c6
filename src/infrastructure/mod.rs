// Infrastructure adapters for Roxas: the external frontend bridge and
// on-disk parse trees.

use std::path::PathBuf;
use thiserror::Error;

pub mod frontend_runner;
pub mod tree_file;

pub use frontend_runner::{build_command_spec, FrontendCommandSpec, FrontendInvocation, PythonFrontend};
pub use tree_file::{parse_document, read_source_file, JsonFileSource};

/// Failures obtaining a parse tree from outside the process.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// `stderr` keeps the frontend's full output; the message shows only its
    /// last non-empty line, which for a Python traceback is the exception.
    #[error("frontend `{module}` failed (exit code {code:?}): {}", last_line(.stderr))]
    FrontendFailed {
        module: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("frontend `{module}` produced no output")]
    EmptyOutput { module: String },

    #[error("parse tree is not valid UTF-8")]
    InvalidUtf8,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse tree is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn last_line(text: &str) -> &str {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}
