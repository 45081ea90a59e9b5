mod eq;
mod kind;

pub use eq::{json_eq, numbers_equal};
pub use kind::ValueKind;
pub use serde_json::{Map, Number, Value};
