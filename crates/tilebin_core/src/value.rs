//! Typed property value and its compiled 32-bit word

use crate::{symbol_hash, CoreError, Result};
use serde::{Deserialize, Serialize};

/// Generic property value as authored in the editor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Name of the value's type, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Encode a map property value.
    ///
    /// Strings are hashed, booleans become 0/1 and integers are truncated to
    /// 16 bits, which is all the runtime reads from a property word.
    pub fn property_word(&self, name: &str) -> Result<u32> {
        match self {
            Value::Int(i) => Ok(u32::from(*i as u16)),
            _ => self.word(name),
        }
    }

    /// Encode an entity state value; integers keep all 32 bits.
    pub fn state_word(&self, name: &str) -> Result<u32> {
        match self {
            Value::Int(i) => Ok(*i as u32),
            _ => self.word(name),
        }
    }

    fn word(&self, name: &str) -> Result<u32> {
        match self {
            Value::Bool(b) => Ok(u32::from(*b)),
            Value::String(s) => Ok(symbol_hash(s)),
            other => Err(CoreError::UnsupportedValue {
                name: name.to_string(),
                kind: other.kind(),
            }),
        }
    }
}

// Convenience conversions
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
