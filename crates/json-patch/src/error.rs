use json_pointer::JsonPointer;
use json_value::ValueKind;
use serde_json::Value;

use crate::OpKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyErrorKind {
    #[error("path not found: `{path}`")]
    PathNotFound { path: JsonPointer },
    #[error("index `{index}` is out of range for the array at `{path}` (length {len})")]
    IndexOutOfRange {
        path: JsonPointer,
        index: String,
        len: usize,
    },
    #[error("cannot move `{from}` into its own descendant `{path}`")]
    InvalidMove { from: JsonPointer, path: JsonPointer },
    #[error("test failed at `{path}`")]
    TestFailed {
        path: JsonPointer,
        expected: Value,
        actual: Option<Value>,
    },
    #[error("expected an object or array at `{path}`, found {found}")]
    TypeMismatch { path: JsonPointer, found: ValueKind },
}

/// A rejected patch: which operation failed and why.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("operation {index} (`{op}` at `{path}`) failed: {kind}")]
pub struct ApplyError {
    pub index: usize,
    pub op: OpKind,
    pub path: JsonPointer,
    pub kind: ApplyErrorKind,
}
