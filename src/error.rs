//
//  error.rs
//  Swagdoc
//
//  Created by hak (tharun)
//

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the swagdoc pipeline.
///
/// Each variant belongs to the smallest unit it can fail: the whole run,
/// one file, one handler, or one backup.
#[derive(Debug, Error)]
pub enum SwagdocError {
    #[error("failed to enumerate files under {0}: {1}")]
    Discovery(PathBuf, String),

    #[error("failed to initialize Go parser for {0}: {1}")]
    ParserInit(PathBuf, String),

    #[error("failed to parse {0}: {1}")]
    Parse(PathBuf, String),

    #[error("route file does not exist: {0}")]
    RouteFileNotFound(PathBuf),

    #[error("failed to render handler {handler}: {reason}")]
    Render { handler: String, reason: String },

    #[error("failed to generate comment for {handler}: {reason}")]
    Generation { handler: String, reason: String },

    #[error("comment generation for {handler} timed out after {secs}s")]
    Timeout { handler: String, secs: u64 },

    #[error("invalid byte span for handler {handler} in {path}: {start}..{end} (file length {len})")]
    InvalidSpan {
        path: PathBuf,
        handler: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("failed to restore {0}: {1}")]
    Restore(PathBuf, String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SwagdocError {
    /// Handler identifier for per-handler failures.
    pub fn handler(&self) -> Option<&str> {
        match self {
            Self::Render { handler, .. }
            | Self::Generation { handler, .. }
            | Self::Timeout { handler, .. }
            | Self::InvalidSpan { handler, .. } => Some(handler),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SwagdocError>;
