//! Node configuration values
//!
//! Configuration is a flat mapping of names to a closed set of scalar
//! variants. Nodes receive the whole mapping on every `configure` call.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Named configuration entries handed to `Node::configure`
pub type ConfigParams = HashMap<String, ConfigValue>;

/// A single configuration entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl ConfigValue {
    /// Name of the populated variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec<u8>> for ConfigValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_only_their_variant() {
        let v = ConfigValue::from(42i64);
        assert_eq!(v.as_int(), Some(42));
        assert_eq!(v.as_float(), None);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.type_name(), "int");

        let v = ConfigValue::from(vec![0xAAu8]);
        assert_eq!(v.as_bytes(), Some(&[0xAAu8][..]));
        assert_eq!(v.as_bool(), None);
    }

    #[test]
    fn test_serialization_is_tagged() {
        let json = serde_json::to_value(ConfigValue::Bool(true)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bool", "value": true}));
    }
}
