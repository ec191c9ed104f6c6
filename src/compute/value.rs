//! value.rs
//! The atomic unit of data flowing along graph edges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A node's value. Series are shared, so handing the same sample to several
/// consumers never copies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    /// One entry per simulated scenario.
    Series(Arc<Vec<f64>>),
    /// Structured constant, e.g. the parameters of a distribution kept as an input.
    Record(Arc<BTreeMap<String, f64>>),
}

impl Value {
    pub fn series(values: Vec<f64>) -> Self {
        Value::Series(Arc::new(values))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, f64)>) -> Self {
        Value::Record(Arc::new(fields.into_iter().map(|(k, v)| (k.into(), v)).collect()))
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Value::Record(_))
    }

    /// Number of scenarios held. Records hold none.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Series(v) => v.len(),
            Value::Record(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scenario `i`, broadcasting scalars. Records read as NaN.
    #[inline(always)]
    pub fn get_at(&self, i: usize) -> f64 {
        match self {
            Value::Scalar(s) => *s,
            Value::Series(v) => v.get(i).copied().unwrap_or(f64::NAN),
            Value::Record(_) => f64::NAN,
        }
    }

    /// A scalar, or a single-element series.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(s) => Some(*s),
            Value::Series(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[f64]> {
        match self {
            Value::Scalar(s) => Some(std::slice::from_ref(s)),
            Value::Series(v) => Some(v.as_slice()),
            Value::Record(_) => None,
        }
    }

    pub fn field(&self, key: &str) -> Option<f64> {
        match self {
            Value::Record(fields) => fields.get(key).copied(),
            _ => None,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match self {
            Value::Scalar(s) => vec![*s],
            Value::Series(v) => v.to_vec(),
            Value::Record(fields) => fields.values().copied().collect(),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Scalar(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Scalar(v as f64) }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Scalar(if v { 1.0 } else { 0.0 }) }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self { Value::series(v) }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self { Value::series(v.to_vec()) }
}

impl From<BTreeMap<String, f64>> for Value {
    fn from(v: BTreeMap<String, f64>) -> Self { Value::Record(Arc::new(v)) }
}
