use json_pointer::{JsonPointerRef, ValueExt};
use serde_json::Value;

/// Where a detached value came from.
pub(crate) enum UpdateSource<'a> {
    Object {
        path: JsonPointerRef<'a>,
        key: &'a str,
    },
    Array {
        path: JsonPointerRef<'a>,
        index: usize,
    },
}

/// A validated insertion point.
pub(crate) enum UpdateTarget<'a> {
    Root,
    Object {
        path: JsonPointerRef<'a>,
        key: &'a str,
    },
    ArrayInsert {
        path: JsonPointerRef<'a>,
        index: usize,
    },
    ArrayAppend {
        path: JsonPointerRef<'a>,
    },
}

pub(crate) enum UndoCommand<'a> {
    Add {
        target: UpdateTarget<'a>,
        prev_value: Option<Value>,
    },
    Remove {
        source: UpdateSource<'a>,
        prev_value: Value,
    },
    Replace {
        path: JsonPointerRef<'a>,
        prev_value: Value,
    },
    Move {
        source: UpdateSource<'a>,
        target: UpdateTarget<'a>,
        prev_value: Option<Value>,
    },
}

/// Sink for the undo commands produced while a patch executes.
pub(crate) trait UndoLog<'a> {
    fn record(&mut self, command: UndoCommand<'a>);
}

impl<'a> UndoLog<'a> for Vec<UndoCommand<'a>> {
    fn record(&mut self, command: UndoCommand<'a>) {
        self.push(command);
    }
}

/// Drops every command; used when the patched document is a throwaway copy.
pub(crate) struct Discard;

impl<'a> UndoLog<'a> for Discard {
    fn record(&mut self, _command: UndoCommand<'a>) {}
}

impl<'a> UpdateSource<'a> {
    /// Puts `value` back where it was detached from.
    pub(crate) fn restore(&self, root: &mut Value, value: Value) {
        match *self {
            UpdateSource::Object { path, key } => {
                if let Some(Value::Object(obj)) = root.locate_mut(path) {
                    obj.insert(key.to_string(), value);
                }
            }
            UpdateSource::Array { path, index } => {
                if let Some(Value::Array(array)) = root.locate_mut(path) {
                    if index <= array.len() {
                        array.insert(index, value);
                    }
                }
            }
        }
    }
}

impl<'a> UpdateTarget<'a> {
    /// Inserts `value`, returning whatever it displaced.
    pub(crate) fn insert(&self, root: &mut Value, value: Value) -> Option<Value> {
        match *self {
            UpdateTarget::Root => Some(std::mem::replace(root, value)),
            UpdateTarget::Object { path, key } => match root.locate_mut(path) {
                Some(Value::Object(obj)) => obj.insert(key.to_string(), value),
                _ => None,
            },
            UpdateTarget::ArrayInsert { path, index } => {
                if let Some(Value::Array(array)) = root.locate_mut(path) {
                    array.insert(index, value);
                }
                None
            }
            UpdateTarget::ArrayAppend { path } => {
                if let Some(Value::Array(array)) = root.locate_mut(path) {
                    array.push(value);
                }
                None
            }
        }
    }

    /// Reverses [`UpdateTarget::insert`], returning the inserted value.
    pub(crate) fn take(&self, root: &mut Value, prev_value: Option<Value>) -> Option<Value> {
        match *self {
            UpdateTarget::Root => prev_value.map(|prev_value| std::mem::replace(root, prev_value)),
            UpdateTarget::Object { path, key } => match root.locate_mut(path) {
                Some(Value::Object(obj)) => match prev_value {
                    Some(prev_value) => obj.insert(key.to_string(), prev_value),
                    None => obj.shift_remove(key),
                },
                _ => None,
            },
            UpdateTarget::ArrayInsert { path, index } => match root.locate_mut(path) {
                Some(Value::Array(array)) if index < array.len() => Some(array.remove(index)),
                _ => None,
            },
            UpdateTarget::ArrayAppend { path } => match root.locate_mut(path) {
                Some(Value::Array(array)) => array.pop(),
                _ => None,
            },
        }
    }
}

impl<'a> UndoCommand<'a> {
    pub(crate) fn execute(self, root: &mut Value) {
        match self {
            UndoCommand::Add { target, prev_value } => {
                target.take(root, prev_value);
            }
            UndoCommand::Remove { source, prev_value } => source.restore(root, prev_value),
            UndoCommand::Replace { path, prev_value } => {
                if let Some(value) = root.locate_mut(path) {
                    *value = prev_value;
                }
            }
            UndoCommand::Move {
                source,
                target,
                prev_value,
            } => {
                if let Some(value) = target.take(root, prev_value) {
                    source.restore(root, value);
                }
            }
        }
    }
}
