//! params.rs
//! Named numeric parameters of a distribution.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, f64>);

impl Parameters {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> { self.0.get(key).copied() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Fetches `key` for `distribution`, failing with a binding error when absent.
    pub fn require(&self, distribution: &str, key: &str) -> Result<f64> {
        self.get(key).ok_or_else(|| {
            GraphError::binding(distribution, format!("missing parameter '{}'", key))
        })
    }

    /// Rejects any key outside `accepted`.
    pub fn expect_only(&self, distribution: &str, accepted: &[&str]) -> Result<()> {
        match self.0.keys().find(|k| !accepted.contains(&k.as_str())) {
            Some(extra) => Err(GraphError::binding(
                distribution,
                format!("unexpected parameter '{}' (accepted: {})", extra, accepted.join(", ")),
            )),
            None => Ok(()),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for Parameters {
    fn from(pairs: [(K, f64); N]) -> Self {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
