use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while decoding, echoing or locating suite input.
#[derive(Debug, Error)]
pub enum Error {
    /// A JSON document did not decode; `path` points at the offending node.
    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },

    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("glob pattern matched no files: {0}")]
    NoMatch(String),

    #[error("output {} is also an input", .0.display())]
    OutputIsInput(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
