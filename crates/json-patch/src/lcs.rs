use json_value::json_eq;
use serde_json::Value;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
struct Cell {
    len: usize,
    displacement: usize,
}

impl Cell {
    #[inline]
    fn better_than(&self, other: &Cell) -> bool {
        self.len > other.len || (self.len == other.len && self.displacement < other.displacement)
    }
}

/// Aligns two arrays along a longest common subsequence of deep-equal
/// elements, returning matched `(source, target)` index pairs in ascending
/// order.
///
/// Among alignments of maximal length the one with the smallest total index
/// displacement `sum |i - j|` wins. Remaining ties prefer a match over
/// skipping, and skipping a source element over skipping a target element.
pub(crate) fn align(source: &[Value], target: &[Value]) -> Vec<(usize, usize)> {
    let prefix = source
        .iter()
        .zip(target)
        .take_while(|(a, b)| json_eq(a, b))
        .count();
    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|idx| (idx, idx)).collect();

    let source = &source[prefix..];
    let target = &target[prefix..];
    let (n, m) = (source.len(), target.len());
    if n == 0 || m == 0 {
        return pairs;
    }

    // cells[i * width + j] is the best alignment of source[i..] with target[j..].
    let width = m + 1;
    let mut cells = vec![Cell::default(); (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let mut best = cells[(i + 1) * width + j];
            let skip_target = cells[i * width + j + 1];
            if skip_target.better_than(&best) {
                best = skip_target;
            }
            if json_eq(&source[i], &target[j]) {
                let next = cells[(i + 1) * width + j + 1];
                let matched = Cell {
                    len: next.len + 1,
                    displacement: next.displacement + i.abs_diff(j),
                };
                if !best.better_than(&matched) {
                    best = matched;
                }
            }
            cells[i * width + j] = best;
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        let here = cells[i * width + j];
        if here.len == 0 {
            break;
        }
        if json_eq(&source[i], &target[j]) {
            let next = cells[(i + 1) * width + j + 1];
            if next.len + 1 == here.len && next.displacement + i.abs_diff(j) == here.displacement {
                pairs.push((prefix + i, prefix + j));
                i += 1;
                j += 1;
                continue;
            }
        }
        if cells[(i + 1) * width + j] == here {
            i += 1;
        } else {
            j += 1;
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn align_json(source: Value, target: Value) -> Vec<(usize, usize)> {
        align(source.as_array().unwrap(), target.as_array().unwrap())
    }

    #[test]
    fn identical() {
        assert_eq!(
            align_json(json!([1, 2, 3]), json!([1, 2, 3])),
            vec![(0, 0), (1, 1), (2, 2)]
        );
    }

    #[test]
    fn disjoint() {
        assert!(align_json(json!([1, 2]), json!([3, 4])).is_empty());
        assert!(align_json(json!([]), json!([3, 4])).is_empty());
        assert!(align_json(json!([1]), json!([])).is_empty());
    }

    #[test]
    fn removal_and_append() {
        assert_eq!(
            align_json(json!(["a", "b", "c"]), json!(["a", "c", "d"])),
            vec![(0, 0), (2, 1)]
        );
    }

    #[test]
    fn prefers_closest_indices() {
        // Matching the `x` at target 0 and target 4 gives the same length; the
        // closer one wins.
        assert_eq!(
            align_json(json!(["x"]), json!(["x", "a", "b", "c", "x"])),
            vec![(0, 0)]
        );
        assert_eq!(
            align_json(json!(["z", "x"]), json!(["x", "a", "b", "x"])),
            vec![(1, 0)]
        );
        assert_eq!(
            align_json(json!(["a", "b", "b", "b"]), json!(["c", "b"])),
            vec![(1, 1)]
        );
    }

    #[test]
    fn deep_equality() {
        assert_eq!(
            align_json(
                json!([{"a": 1, "b": [1.0]}, 2]),
                json!([0, {"b": [1], "a": 1.0}])
            ),
            vec![(0, 1)]
        );
    }
}
