//! Node Attributes
//!
//! Typed attribute values carried by accessibility nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl AttrValue {
    /// Truthiness used by conditional templates
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Str(s) => !s.is_empty(),
        }
    }

    /// Get as string slice if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as integer, truncating floats
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() => Some(*f as i64),
            Self::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            // Whole floats print without a fractional part ("3", not "3.0")
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{}", *v as i64),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<usize> for AttrValue {
    fn from(n: usize) -> Self {
        Self::Int(n as i64)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(AttrValue::Bool(true).is_truthy());
        assert!(!AttrValue::Int(0).is_truthy());
        assert!(AttrValue::Int(2).is_truthy());
        assert!(!AttrValue::Str(String::new()).is_truthy());
        assert!(!AttrValue::Float(f64::NAN).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(AttrValue::Float(3.0).to_string(), "3");
        assert_eq!(AttrValue::Float(0.5).to_string(), "0.5");
        assert_eq!(AttrValue::from("Enable").to_string(), "Enable");
        assert_eq!(AttrValue::from(2).to_string(), "2");
    }

    #[test]
    fn test_untagged_deserialize() {
        let v: AttrValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, AttrValue::Bool(true));
        let v: AttrValue = serde_json::from_str("4").unwrap();
        assert_eq!(v, AttrValue::Int(4));
        let v: AttrValue = serde_json::from_str("\"x\"").unwrap();
        assert_eq!(v, AttrValue::Str("x".into()));
    }
}
