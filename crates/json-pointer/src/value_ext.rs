use serde_json::Value;

use crate::{parse_array_index, ToJsonPointerRef};

/// Pointer resolution on a value tree.
///
/// Array tokens must be canonical indices within bounds; the append token
/// `-` never resolves to an existing element.
pub trait ValueExt {
    fn locate<T: ToJsonPointerRef>(&self, pointer: T) -> Option<&Value>;

    fn locate_mut<T: ToJsonPointerRef>(&mut self, pointer: T) -> Option<&mut Value>;
}

impl ValueExt for Value {
    fn locate<T: ToJsonPointerRef>(&self, pointer: T) -> Option<&Value> {
        pointer
            .to_json_pointer_ref()
            .iter()
            .try_fold(self, |acc, segment| match acc {
                Value::Object(obj) => obj.get(segment),
                Value::Array(array) => array.get(parse_array_index(segment)?),
                _ => None,
            })
    }

    fn locate_mut<T: ToJsonPointerRef>(&mut self, pointer: T) -> Option<&mut Value> {
        pointer
            .to_json_pointer_ref()
            .iter()
            .try_fold(self, |acc, segment| match acc {
                Value::Object(obj) => obj.get_mut(segment),
                Value::Array(array) => array.get_mut(parse_array_index(segment)?),
                _ => None,
            })
    }
}
