//! RFC 6901 JSON Pointer: parsing, formatting and resolution against
//! [`serde_json::Value`] trees.

mod macros;

mod error;
mod json_pointer;
mod json_pointer_ref;
mod parser;
mod value_ext;

pub use error::ParseJsonPointerError;
pub use json_pointer::JsonPointer;
pub use json_pointer_ref::{JsonPointerRef, ToJsonPointerRef};
pub use parser::{escape_segment, parse_array_index, APPEND_SEGMENT};
pub use value_ext::ValueExt;
