//! args.rs
//! Keyword arguments assembled from a node's incoming edges.

use crate::compute::Value;
use crate::error::{GraphError, Result};
use smallvec::SmallVec;

/// Bound arguments in edge order. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    operation: String,
    entries: SmallVec<[(String, Value); 4]>,
}

impl Arguments {
    pub fn new(operation: impl Into<String>) -> Self {
        Self { operation: operation.into(), entries: SmallVec::new() }
    }

    /// Name of the operation these arguments are bound for.
    pub fn operation(&self) -> &str { &self.operation }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        if self.contains(&key) {
            return Err(self.error(format!("argument '{}' is bound more than once", key)));
        }
        self.entries.push((key, value));
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| self.error(format!("missing argument '{}'", key)))
    }

    /// A numeric argument (scalar or series).
    pub fn numeric(&self, key: &str) -> Result<&Value> {
        let value = self.get(key)?;
        if !value.is_numeric() {
            return Err(GraphError::NonNumeric { name: key.to_string() });
        }
        Ok(value)
    }

    pub fn scalar(&self, key: &str) -> Result<f64> {
        self.get(key)?
            .as_scalar()
            .ok_or_else(|| self.error(format!("argument '{}' must be a scalar", key)))
    }

    pub fn field(&self, key: &str, field: &str) -> Result<f64> {
        self.get(key)?
            .field(field)
            .ok_or_else(|| self.error(format!("argument '{}' has no field '{}'", key, field)))
    }

    /// All arguments in edge order, each required to be numeric.
    pub fn numeric_values(&self) -> Result<Vec<&Value>> {
        self.entries.iter().map(|(k, _)| self.numeric(k)).collect()
    }

    /// Requires exactly `n` arguments.
    pub fn expect_arity(&self, n: usize) -> Result<()> {
        if self.len() != n {
            return Err(self.error(format!("expected {} argument(s), got {}", n, self.len())));
        }
        Ok(())
    }

    /// Requires the bound keys to be exactly `accepted`, in any order.
    pub fn expect_keys(&self, accepted: &[String]) -> Result<()> {
        if let Some(extra) = self.keys().find(|k| !accepted.iter().any(|a| a == k)) {
            return Err(self.error(format!("unexpected argument '{}'", extra)));
        }
        if let Some(missing) = accepted.iter().find(|a| !self.contains(a)) {
            return Err(self.error(format!("missing argument '{}'", missing)));
        }
        Ok(())
    }

    fn error(&self, message: String) -> GraphError {
        GraphError::binding(self.operation.as_str(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Arguments {
        let mut a = Arguments::new("profit");
        a.insert("my_bid", Value::Scalar(12_000.0)).unwrap();
        a.insert("costs", Value::record([("fixed", 10.0)])).unwrap();
        a
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let mut a = args();
        let err = a.insert("my_bid", Value::Scalar(1.0)).unwrap_err();
        assert!(err.to_string().contains("bound more than once"));
    }

    #[test]
    fn test_typed_getters() {
        let a = args();
        assert_eq!(a.scalar("my_bid").unwrap(), 12_000.0);
        assert_eq!(a.field("costs", "fixed").unwrap(), 10.0);
        assert!(matches!(a.numeric("costs"), Err(GraphError::NonNumeric { .. })));
        assert!(a.get("nope").unwrap_err().to_string().contains("missing argument 'nope'"));
    }

    #[test]
    fn test_expect_keys() {
        let a = args();
        assert!(a.expect_keys(&["costs".into(), "my_bid".into()]).is_ok());
        assert!(a.expect_keys(&["my_bid".into()]).is_err());
        assert!(a.expect_keys(&["my_bid".into(), "costs".into(), "extra".into()]).is_err());
    }
}
