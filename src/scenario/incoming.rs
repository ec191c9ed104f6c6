//! incoming.rs
//! How an operation's predecessors bind to its arguments.

use serde::{Deserialize, Serialize};

/// Predecessors of an operation, goal or decision node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Incoming {
    /// Each predecessor binds to the argument of the same name.
    Positional(Vec<String>),
    /// `(predecessor, argument)` pairs.
    Named(Vec<(String, String)>),
    /// Predecessor to argument map, as written in model files. Keeps file order.
    Mapped(#[serde(with = "ordered_map")] Vec<(String, String)>),
}

impl Incoming {
    pub fn positional<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Incoming::Positional(names.into_iter().map(Into::into).collect())
    }

    pub fn named<N: Into<String>, P: Into<String>>(pairs: impl IntoIterator<Item = (N, P)>) -> Self {
        Incoming::Named(pairs.into_iter().map(|(n, p)| (n.into(), p.into())).collect())
    }

    pub fn none() -> Self {
        Incoming::Positional(Vec::new())
    }

    /// `(predecessor, explicit argument)` in binding order.
    pub fn edges(&self) -> Vec<(&str, Option<&str>)> {
        match self {
            Incoming::Positional(names) => names.iter().map(|n| (n.as_str(), None)).collect(),
            Incoming::Named(pairs) | Incoming::Mapped(pairs) => {
                pairs.iter().map(|(n, p)| (n.as_str(), Some(p.as_str()))).collect()
            }
        }
    }
}

/// A JSON object read as pairs in the order its keys appear.
mod ordered_map {
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(pairs.len()))?;
        for (name, argument) in pairs {
            map.serialize_entry(name, argument)?;
        }
        map.end()
    }

    struct PairVisitor;

    impl<'de> Visitor<'de> for PairVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of predecessor to argument names")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(pair) = access.next_entry::<String, String>()? {
                pairs.push(pair);
            }
            Ok(pairs)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, String)>, D::Error> {
        deserializer.deserialize_map(PairVisitor)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Incoming {
    fn from(names: [S; N]) -> Self { Incoming::positional(names) }
}

impl From<Vec<String>> for Incoming {
    fn from(names: Vec<String>) -> Self { Incoming::Positional(names) }
}

impl From<Vec<&str>> for Incoming {
    fn from(names: Vec<&str>) -> Self { Incoming::positional(names) }
}

impl From<&[&str]> for Incoming {
    fn from(names: &[&str]) -> Self { Incoming::positional(names.iter().copied()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_keep_binding_order() {
        let inc = Incoming::named([("project_cost", "cost"), ("my_bid", "bid")]);
        assert_eq!(inc.edges(), vec![("project_cost", Some("cost")), ("my_bid", Some("bid"))]);

        let inc: Incoming = ["b", "a"].into();
        assert_eq!(inc.edges(), vec![("b", None), ("a", None)]);
    }

    #[test]
    fn test_json_forms() {
        let list: Incoming = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(list, Incoming::positional(["a", "b"]));

        let map: Incoming = serde_json::from_str(r#"{"a": "lhs"}"#).unwrap();
        assert_eq!(map.edges(), vec![("a", Some("lhs"))]);
    }

    #[test]
    fn test_json_object_keeps_file_order() {
        let map: Incoming = serde_json::from_str(r#"{"revenue": "lhs", "cost": "rhs"}"#).unwrap();
        assert_eq!(map.edges(), vec![("revenue", Some("lhs")), ("cost", Some("rhs"))]);

        let map: Incoming = serde_json::from_str(r#"{"zeta": "x", "alpha": "y"}"#).unwrap();
        assert_eq!(map.edges(), vec![("zeta", Some("x")), ("alpha", Some("y"))]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"zeta":"x","alpha":"y"}"#);
    }
}
