use json_pointer::{parse_array_index, JsonPointer, JsonPointerRef, ValueExt, APPEND_SEGMENT};
use json_value::{json_eq, ValueKind};
use serde_json::Value;

use crate::{
    undo::{Discard, UndoCommand, UndoLog, UpdateSource, UpdateTarget},
    ApplyError, ApplyErrorKind, Operation,
};

/// Applies `patch` to a private copy of `base` and returns the copy.
///
/// `base` is never modified, so a rejected patch can be retried or audited
/// against the same document.
pub fn apply(base: &Value, patch: &[Operation]) -> Result<Value, ApplyError> {
    let mut doc = base.clone();
    patch_all(&mut doc, &mut Discard, None, patch)?;
    Ok(doc)
}

/// Applies `patch` in place. On failure `doc` is rolled back to its input.
pub fn apply_mut(doc: &mut Value, patch: &[Operation]) -> Result<(), ApplyError> {
    apply_mut_at(doc, None, patch)
}

/// Like [`apply_mut`], with every `path` and `from` resolved relative to
/// `prefix`.
pub fn apply_mut_at(
    doc: &mut Value,
    prefix: Option<&JsonPointer>,
    patch: &[Operation],
) -> Result<(), ApplyError> {
    let mut undo_commands: Vec<UndoCommand<'_>> = Vec::new();

    match patch_all(doc, &mut undo_commands, prefix, patch) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::debug!(steps = undo_commands.len(), "rolling back patch");
            for undo_command in undo_commands.into_iter().rev() {
                undo_command.execute(doc);
            }
            Err(err)
        }
    }
}

fn patch_all<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    prefix: Option<&'a JsonPointer>,
    patch: &'a [Operation],
) -> Result<(), ApplyError> {
    tracing::debug!(operations = patch.len(), prefix = ?prefix, "apply patch");

    for (index, operation) in patch.iter().enumerate() {
        patch_command(root, &mut *undo_commands, prefix, operation).map_err(|kind| {
            let err = ApplyError {
                index,
                op: operation.kind(),
                path: operation.path().with_prefix_opt(prefix).to_owned(),
                kind,
            };
            tracing::debug!(error = %err, from = ?operation.from_path(), "patch rejected");
            err
        })?;
    }
    Ok(())
}

fn patch_command<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    prefix: Option<&'a JsonPointer>,
    operation: &'a Operation,
) -> Result<(), ApplyErrorKind> {
    match operation {
        Operation::Add { path, value } => {
            patch_command_add(root, undo_commands, path.with_prefix_opt(prefix), value.clone())
        }
        Operation::Remove { path } => {
            patch_command_remove(root, undo_commands, path.with_prefix_opt(prefix))
        }
        Operation::Replace { path, value } => patch_command_replace(
            root,
            undo_commands,
            path.with_prefix_opt(prefix),
            value.clone(),
        ),
        Operation::Move { from, path } => patch_command_move(
            root,
            undo_commands,
            from.with_prefix_opt(prefix),
            path.with_prefix_opt(prefix),
        ),
        Operation::Copy { from, path } => patch_command_copy(
            root,
            undo_commands,
            from.with_prefix_opt(prefix),
            path.with_prefix_opt(prefix),
        ),
        Operation::Test { path, value } => {
            patch_command_test(root, path.with_prefix_opt(prefix), value)
        }
    }
}

fn patch_command_add<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    path: JsonPointerRef<'a>,
    value: Value,
) -> Result<(), ApplyErrorKind> {
    let target = resolve_target(root, path)?;
    let prev_value = target.insert(root, value);
    undo_commands.record(UndoCommand::Add { target, prev_value });
    Ok(())
}

fn patch_command_remove<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    path: JsonPointerRef<'a>,
) -> Result<(), ApplyErrorKind> {
    let (source, prev_value) = detach(root, path)?;
    undo_commands.record(UndoCommand::Remove { source, prev_value });
    Ok(())
}

fn patch_command_replace<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    path: JsonPointerRef<'a>,
    value: Value,
) -> Result<(), ApplyErrorKind> {
    let slot = root
        .locate_mut(path)
        .ok_or_else(|| ApplyErrorKind::PathNotFound {
            path: path.to_owned(),
        })?;
    undo_commands.record(UndoCommand::Replace {
        path,
        prev_value: std::mem::replace(slot, value),
    });
    Ok(())
}

fn patch_command_move<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    from: JsonPointerRef<'a>,
    path: JsonPointerRef<'a>,
) -> Result<(), ApplyErrorKind> {
    if root.locate(from).is_none() {
        return Err(ApplyErrorKind::PathNotFound {
            path: from.to_owned(),
        });
    }
    if path.is_descendant_of(from) {
        return Err(ApplyErrorKind::InvalidMove {
            from: from.to_owned(),
            path: path.to_owned(),
        });
    }
    if path == from {
        return Ok(());
    }

    let (source, value) = detach(root, from)?;
    let target = match resolve_target(root, path) {
        Ok(target) => target,
        Err(err) => {
            source.restore(root, value);
            return Err(err);
        }
    };
    let prev_value = target.insert(root, value);
    undo_commands.record(UndoCommand::Move {
        source,
        target,
        prev_value,
    });
    Ok(())
}

fn patch_command_copy<'a>(
    root: &mut Value,
    undo_commands: &mut impl UndoLog<'a>,
    from: JsonPointerRef<'a>,
    path: JsonPointerRef<'a>,
) -> Result<(), ApplyErrorKind> {
    let value = root
        .locate(from)
        .cloned()
        .ok_or_else(|| ApplyErrorKind::PathNotFound {
            path: from.to_owned(),
        })?;
    patch_command_add(root, undo_commands, path, value)
}

fn patch_command_test(
    root: &Value,
    path: JsonPointerRef<'_>,
    expected: &Value,
) -> Result<(), ApplyErrorKind> {
    match root.locate(path) {
        Some(actual) if json_eq(actual, expected) => Ok(()),
        actual => Err(ApplyErrorKind::TestFailed {
            path: path.to_owned(),
            expected: expected.clone(),
            actual: actual.cloned(),
        }),
    }
}

/// Checks that `path` names a slot a value can be inserted into.
fn resolve_target<'a>(
    root: &Value,
    path: JsonPointerRef<'a>,
) -> Result<UpdateTarget<'a>, ApplyErrorKind> {
    let (parent_path, key) = match path.split_last() {
        Some(split) => split,
        None => return Ok(UpdateTarget::Root),
    };

    match root.locate(parent_path) {
        Some(Value::Object(_)) => Ok(UpdateTarget::Object {
            path: parent_path,
            key,
        }),
        Some(Value::Array(_)) if key == APPEND_SEGMENT => {
            Ok(UpdateTarget::ArrayAppend { path: parent_path })
        }
        Some(Value::Array(array)) => parse_array_index(key)
            .filter(|index| *index <= array.len())
            .map(|index| UpdateTarget::ArrayInsert {
                path: parent_path,
                index,
            })
            .ok_or_else(|| ApplyErrorKind::IndexOutOfRange {
                path: parent_path.to_owned(),
                index: key.to_string(),
                len: array.len(),
            }),
        Some(other) => Err(ApplyErrorKind::TypeMismatch {
            path: parent_path.to_owned(),
            found: ValueKind::of(other),
        }),
        None => Err(ApplyErrorKind::PathNotFound {
            path: parent_path.to_owned(),
        }),
    }
}

/// Removes the value at `path` from its parent.
fn detach<'a>(
    root: &mut Value,
    path: JsonPointerRef<'a>,
) -> Result<(UpdateSource<'a>, Value), ApplyErrorKind> {
    let not_found = || ApplyErrorKind::PathNotFound {
        path: path.to_owned(),
    };
    let (parent_path, key) = path.split_last().ok_or_else(not_found)?;

    match root.locate_mut(parent_path).ok_or_else(not_found)? {
        Value::Object(obj) => {
            let value = obj.shift_remove(key).ok_or_else(not_found)?;
            Ok((
                UpdateSource::Object {
                    path: parent_path,
                    key,
                },
                value,
            ))
        }
        Value::Array(array) => {
            let index = parse_array_index(key)
                .filter(|index| *index < array.len())
                .ok_or_else(not_found)?;
            Ok((
                UpdateSource::Array {
                    path: parent_path,
                    index,
                },
                array.remove(index),
            ))
        }
        other => Err(ApplyErrorKind::TypeMismatch {
            path: parent_path.to_owned(),
            found: ValueKind::of(other),
        }),
    }
}
