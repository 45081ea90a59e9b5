use serde_json::{Number, Value};

/// Deep structural equality.
///
/// Objects are compared without regard to key order, arrays element by
/// element, strings byte for byte and numbers by value, so `1` and `1.0` are
/// equal.
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, a)| b.get(key).map_or(false, |b| json_eq(a, b)))
        }
        _ => false,
    }
}

/// Compares two numbers by value.
///
/// Integers are compared exactly. An integer equals a float only if the float
/// is integral and holds exactly that integer, so integers beyond 2^53 never
/// collapse onto a neighbouring float.
pub fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (as_integer(a), as_integer(b)) {
        (Some(a), Some(b)) => a == b,
        (Some(int), None) => b.as_f64().map_or(false, |float| integer_eq_float(int, float)),
        (None, Some(int)) => a.as_f64().map_or(false, |float| integer_eq_float(int, float)),
        (None, None) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn integer_eq_float(int: i128, float: f64) -> bool {
    // Every i64 and u64 lies in this range, and it is exactly representable.
    const BOUND: f64 = 18_446_744_073_709_551_616.0;
    float.is_finite()
        && float.fract() == 0.0
        && (-BOUND..BOUND).contains(&float)
        && float as i128 == int
}
