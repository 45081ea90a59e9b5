//! RFC 6902 JSON Patch: structural diffing and all-or-nothing application.
//!
//! [`diff`] compares two documents and produces a [`Patch`] that turns the
//! first into the second. [`apply`] replays a patch against a document and
//! either returns the patched copy or an [`ApplyError`] naming the operation
//! that failed, leaving the input untouched.

mod apply;
mod diff;
mod error;
mod lcs;
mod operation;
mod undo;

pub use apply::{apply, apply_mut, apply_mut_at};
pub use diff::{diff, diff_with_options, DiffOptions};
pub use error::{ApplyError, ApplyErrorKind};
pub use operation::{OpKind, Operation, Patch};
