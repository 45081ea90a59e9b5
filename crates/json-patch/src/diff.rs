use std::collections::HashSet;

use json_pointer::{JsonPointer, APPEND_SEGMENT};
use json_value::{json_eq, Map};
use serde_json::Value;

use crate::{lcs, Operation, Patch};

#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Turn a removed and an added object member holding equal values into a
    /// single `move`.
    pub detect_moves: bool,
}

impl DiffOptions {
    #[must_use]
    pub fn detect_moves(self, detect_moves: bool) -> Self {
        Self {
            detect_moves,
            ..self
        }
    }
}

/// Computes the operations that turn `source` into `target`.
///
/// Object members are emitted as removals (in `source` order), then additions
/// (in `target` order), then changes to shared members (in `source` order).
/// Arrays are aligned on a longest common subsequence; unmatched source
/// elements are removed from the highest index down and unmatched target
/// elements are inserted in ascending order.
pub fn diff(source: &Value, target: &Value) -> Patch {
    diff_with_options(source, target, &DiffOptions::default())
}

pub fn diff_with_options(source: &Value, target: &Value, options: &DiffOptions) -> Patch {
    let mut differ = Differ {
        options,
        path: JsonPointer::root(),
        operations: Vec::new(),
    };
    differ.diff_value(source, target);
    tracing::trace!(operations = differ.operations.len(), "diff computed");
    Patch(differ.operations)
}

struct Differ<'a> {
    options: &'a DiffOptions,
    path: JsonPointer,
    operations: Vec<Operation>,
}

impl Differ<'_> {
    fn diff_value(&mut self, source: &Value, target: &Value) {
        match (source, target) {
            (Value::Object(source), Value::Object(target)) => self.diff_object(source, target),
            (Value::Array(source), Value::Array(target)) => self.diff_array(source, target),
            (source, target) if json_eq(source, target) => {}
            (_, target) => self.operations.push(Operation::Replace {
                path: self.path.clone(),
                value: target.clone(),
            }),
        }
    }

    fn diff_object(&mut self, source: &Map<String, Value>, target: &Map<String, Value>) {
        let removed: Vec<(&String, &Value)> = source
            .iter()
            .filter(|(key, _)| !target.contains_key(*key))
            .collect();
        let added: Vec<(&String, &Value)> = target
            .iter()
            .filter(|(key, _)| !source.contains_key(*key))
            .collect();

        let moved_from = if self.options.detect_moves {
            pair_moves(&removed, &added)
        } else {
            vec![None; added.len()]
        };
        let moved: HashSet<usize> = moved_from.iter().flatten().copied().collect();

        for (idx, (key, _)) in removed.iter().enumerate() {
            if moved.contains(&idx) {
                continue;
            }
            self.path.push(key.as_str());
            self.operations.push(Operation::Remove {
                path: self.path.clone(),
            });
            self.path.pop();
        }

        for ((key, value), from) in added.iter().zip(moved_from) {
            let path = self.path.join(key.as_str());
            let operation = match from {
                Some(idx) => Operation::Move {
                    from: self.path.join(removed[idx].0.as_str()),
                    path,
                },
                None => Operation::Add {
                    path,
                    value: Value::clone(value),
                },
            };
            self.operations.push(operation);
        }

        for (key, source) in source {
            if let Some(target) = target.get(key) {
                self.path.push(key.as_str());
                self.diff_value(source, target);
                self.path.pop();
            }
        }
    }

    fn diff_array(&mut self, source: &[Value], target: &[Value]) {
        let pairs = lcs::align(source, target);
        let mut source_matched = vec![false; source.len()];
        let mut target_matched = vec![false; target.len()];
        for &(i, j) in &pairs {
            source_matched[i] = true;
            target_matched[j] = true;
        }

        for idx in (0..source.len()).rev().filter(|idx| !source_matched[*idx]) {
            self.path.push_index(idx);
            self.operations.push(Operation::Remove {
                path: self.path.clone(),
            });
            self.path.pop();
        }

        // After the removals the array holds exactly the matched elements.
        let mut len = pairs.len();
        for (idx, value) in target.iter().enumerate() {
            if target_matched[idx] {
                continue;
            }
            if idx == len {
                self.path.push(APPEND_SEGMENT);
            } else {
                self.path.push_index(idx);
            }
            self.operations.push(Operation::Add {
                path: self.path.clone(),
                value: value.clone(),
            });
            self.path.pop();
            len += 1;
        }
    }
}

/// Pairs each added member with the first unpaired removed member holding an
/// equal value.
fn pair_moves(removed: &[(&String, &Value)], added: &[(&String, &Value)]) -> Vec<Option<usize>> {
    let mut taken = vec![false; removed.len()];
    added
        .iter()
        .map(|(_, value)| {
            let idx = (0..removed.len())
                .find(|idx| !taken[*idx] && json_eq(removed[*idx].1, value))?;
            taken[idx] = true;
            Some(idx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::apply;

    fn patch(ops: Value) -> Patch {
        serde_json::from_value(ops).unwrap()
    }

    fn check_roundtrip(source: &Value, target: &Value, ops: &Patch) {
        let patched = apply(source, ops).unwrap();
        assert!(json_eq(&patched, target), "{} != {}", patched, target);
    }

    #[test]
    fn equal_documents() {
        let doc = json!({"a": [1, {"b": null}], "c": "d"});
        assert!(diff(&doc, &doc).is_empty());
        assert!(diff(&json!(1), &json!(1.0)).is_empty());
        assert!(diff(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})).is_empty());
    }

    #[test]
    fn product_scenario() {
        let source = json!({
            "name": "mouse",
            "price": 10,
            "active": true,
            "details": {"dpi": 800, "buttons": 2},
            "tags": ["usb"]
        });
        let target = json!({
            "name": "mouse",
            "price": 12,
            "active": true,
            "details": {"dpi": 800, "wireless": true},
            "tags": ["usb"]
        });

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "replace", "path": "/price", "value": 12},
                {"op": "remove", "path": "/details/buttons"},
                {"op": "add", "path": "/details/wireless", "value": true}
            ]))
        );
        assert_eq!(apply(&source, &ops).unwrap(), target);
    }

    #[test]
    fn array_remove_and_append() {
        let source = json!(["a", "b", "c"]);
        let target = json!(["a", "c", "d"]);

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "remove", "path": "/1"},
                {"op": "add", "path": "/-", "value": "d"}
            ]))
        );
        assert_eq!(apply(&source, &ops).unwrap(), target);
    }

    #[test]
    fn array_removals_run_from_the_end() {
        let source = json!([0, 1, 2, 3, 4, 5]);
        let target = json!([0, 2, 4]);

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "remove", "path": "/5"},
                {"op": "remove", "path": "/3"},
                {"op": "remove", "path": "/1"}
            ]))
        );
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn array_insertions_run_in_target_order() {
        let source = json!(["b", "d"]);
        let target = json!(["a", "b", "c", "d", "e", "f"]);

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "add", "path": "/0", "value": "a"},
                {"op": "add", "path": "/2", "value": "c"},
                {"op": "add", "path": "/-", "value": "e"},
                {"op": "add", "path": "/-", "value": "f"}
            ]))
        );
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn changed_array_elements_are_replaced_by_remove_and_add() {
        let source = json!({"items": [{"id": 1, "qty": 1}, {"id": 2, "qty": 5}]});
        let target = json!({"items": [{"id": 1, "qty": 2}, {"id": 2, "qty": 5}]});

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "remove", "path": "/items/0"},
                {"op": "add", "path": "/items/0", "value": {"id": 1, "qty": 2}}
            ]))
        );
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn kind_changes_replace() {
        assert_eq!(
            diff(&json!({"a": [1]}), &json!({"a": {"0": 1}})),
            patch(json!([{"op": "replace", "path": "/a", "value": {"0": 1}}]))
        );
        assert_eq!(
            diff(&json!("text"), &json!(["text"])),
            patch(json!([{"op": "replace", "path": "", "value": ["text"]}]))
        );
        assert_eq!(
            diff(&json!(null), &json!(false)),
            patch(json!([{"op": "replace", "path": "", "value": false}]))
        );
    }

    #[test]
    fn large_integer_against_nearby_float() {
        let source = json!({"id": 9007199254740993u64});
        let target = json!({"id": 9007199254740992.0});

        let ops = diff(&source, &target);
        assert_eq!(
            ops,
            patch(json!([{"op": "replace", "path": "/id", "value": 9007199254740992.0}]))
        );
        check_roundtrip(&source, &target, &ops);
        assert!(!json_eq(&source, &apply(&source, &ops).unwrap()));
    }

    #[test]
    fn object_ordering() {
        let source = json!({"keep": 1, "gone1": 1, "change": 1, "gone2": 2});
        let target = json!({"new2": 2, "change": 2, "keep": 1, "new1": 1});

        assert_eq!(
            diff(&source, &target),
            patch(json!([
                {"op": "remove", "path": "/gone1"},
                {"op": "remove", "path": "/gone2"},
                {"op": "add", "path": "/new2", "value": 2},
                {"op": "add", "path": "/new1", "value": 1},
                {"op": "replace", "path": "/change", "value": 2}
            ]))
        );
    }

    #[test]
    fn escaped_keys() {
        let source = json!({"a/b": {"m~n": 1}});
        let target = json!({"a/b": {"m~n": 2}});

        let ops = diff(&source, &target);
        assert_eq!(
            serde_json::to_value(&ops).unwrap(),
            json!([{"op": "replace", "path": "/a~1b/m~0n", "value": 2}])
        );
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn detect_moves() {
        let source = json!({"old": {"x": [1, 2]}, "other": 1, "dropped": 3});
        let target = json!({"renamed": {"x": [1, 2]}, "other": 1, "fresh": 3});
        let options = DiffOptions::default().detect_moves(true);

        let ops = diff_with_options(&source, &target, &options);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "move", "from": "/old", "path": "/renamed"},
                {"op": "move", "from": "/dropped", "path": "/fresh"}
            ]))
        );
        check_roundtrip(&source, &target, &ops);

        let ops = diff(&source, &target);
        assert_eq!(ops.len(), 4);
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn detect_moves_pairs_each_value_once() {
        let source = json!({"a": 1, "b": 1});
        let target = json!({"c": 1, "d": 1, "e": 1});
        let options = DiffOptions::default().detect_moves(true);

        let ops = diff_with_options(&source, &target, &options);
        assert_eq!(
            ops,
            patch(json!([
                {"op": "move", "from": "/a", "path": "/c"},
                {"op": "move", "from": "/b", "path": "/d"},
                {"op": "add", "path": "/e", "value": 1}
            ]))
        );
        check_roundtrip(&source, &target, &ops);
    }

    #[test]
    fn nested_arrays_and_objects() {
        let source = json!({"a": [[1, 2], {"b": [true, false]}], "c": {"d": {"e": "f"}}});
        let target = json!({"a": [{"b": [false]}, [1, 2], 3], "c": {"d": {"e": "g", "h": []}}});

        let ops = diff(&source, &target);
        check_roundtrip(&source, &target, &ops);
        assert_eq!(ops, diff(&source, &target));
    }
}
