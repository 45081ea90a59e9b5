use std::path::PathBuf;

use json_patch::ApplyError;
use json_pointer::JsonPointer;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to access `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid json in `{}`: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error("path not found: `{pointer}`")]
    PathNotFound { pointer: JsonPointer },
    #[error("patched document differs from the target after {operations} operations")]
    Diverged { operations: usize },
}
