//! kernel.rs
//! Elementwise arithmetic over scenario values, broadcasting scalars.

use super::value::Value;
use crate::error::{GraphError, Result};

/// Length of the result of combining `lhs` and `rhs`, or `None` when both are scalars.
fn broadcast_len(lhs: &Value, rhs: &Value) -> Result<Option<usize>> {
    match (lhs, rhs) {
        (Value::Scalar(_), Value::Scalar(_)) => Ok(None),
        (Value::Series(a), Value::Series(b)) if a.len() != b.len() => {
            Err(GraphError::ShapeMismatch { left: a.len(), right: b.len() })
        }
        (Value::Series(a), _) => Ok(Some(a.len())),
        (_, Value::Series(b)) => Ok(Some(b.len())),
        (l, r) => Ok(Some(l.len().max(r.len()))),
    }
}

/// Applies `f` scenario by scenario. Operands are expected to be numeric.
pub fn zip_with(lhs: &Value, rhs: &Value, f: impl Fn(f64, f64) -> f64) -> Result<Value> {
    match broadcast_len(lhs, rhs)? {
        None => Ok(Value::Scalar(f(lhs.get_at(0), rhs.get_at(0)))),
        Some(len) => {
            let mut out = Vec::with_capacity(len);
            for i in 0..len {
                out.push(f(lhs.get_at(i), rhs.get_at(i)));
            }
            Ok(Value::series(out))
        }
    }
}

pub fn map(value: &Value, f: impl Fn(f64) -> f64) -> Value {
    match value {
        Value::Scalar(s) => Value::Scalar(f(*s)),
        other => Value::series(other.to_vec().into_iter().map(f).collect()),
    }
}

/// Left fold of `f` over `values`. Fails on an empty operand list.
pub fn fold(values: &[&Value], f: impl Fn(f64, f64) -> f64 + Copy) -> Result<Value> {
    let (first, rest) = values
        .split_first()
        .ok_or_else(|| GraphError::binding("fold", "at least one operand is required"))?;
    let mut acc = (*first).clone();
    for v in rest {
        acc = zip_with(&acc, v, f)?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_series_broadcast() {
        let s = Value::Scalar(2.0);
        let v = Value::series(vec![1.0, 2.0, 3.0]);
        let out = zip_with(&v, &s, |a, b| a * b).unwrap();
        assert_eq!(out, Value::series(vec![2.0, 4.0, 6.0]));
    }

    #[test]
    fn test_mismatched_series_rejected() {
        let a = Value::series(vec![1.0, 2.0]);
        let b = Value::series(vec![1.0, 2.0, 3.0]);
        let err = zip_with(&a, &b, |x, y| x + y).unwrap_err();
        assert_eq!(err, GraphError::ShapeMismatch { left: 2, right: 3 });
    }

    #[test]
    fn test_fold_over_mixed_operands() {
        let a = Value::Scalar(1.0);
        let b = Value::series(vec![1.0, 2.0]);
        let c = Value::Scalar(10.0);
        let out = fold(&[&a, &b, &c], |x, y| x + y).unwrap();
        assert_eq!(out, Value::series(vec![12.0, 13.0]));
    }

    #[test]
    fn test_fold_empty_is_binding_error() {
        assert!(matches!(fold(&[], |x, y| x + y), Err(GraphError::ParameterBinding { .. })));
    }
}
