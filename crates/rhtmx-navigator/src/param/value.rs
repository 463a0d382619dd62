// File: src/param/value.rs
// Purpose: Typed parameter values

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::{ParamType, TypeKey};

/// A converted parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i32),
    Long(i64),
    Custom(CustomValue),
}

impl ParamValue {
    /// Whether this value can stand for a parameter declared as `ty`
    pub fn matches_type(&self, ty: &ParamType) -> bool {
        match (self, ty) {
            (ParamValue::Text(_), ParamType::Text) => true,
            (ParamValue::Int(_), ParamType::Int) => true,
            (ParamValue::Long(_), ParamType::Long) => true,
            (ParamValue::Custom(value), ParamType::Custom(key)) => value.type_key() == *key,
            _ => false,
        }
    }

    /// Fragment text for primitive values; `None` for custom values,
    /// which need a converter to be serialized.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Int(n) => Some(n.to_string()),
            ParamValue::Long(n) => Some(n.to_string()),
            ParamValue::Custom(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Long value; `Int` values widen
    pub fn as_long(&self) -> Option<i64> {
        match self {
            ParamValue::Long(n) => Some(*n),
            ParamValue::Int(n) => Some(i64::from(*n)),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ParamValue::Custom(value) => value.downcast_ref(),
            _ => None,
        }
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        ParamValue::Int(n)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Long(n)
    }
}

impl From<CustomValue> for ParamValue {
    fn from(value: CustomValue) -> Self {
        ParamValue::Custom(value)
    }
}

/// A domain value produced (or consumed) by the converter chain
///
/// Values decoded from a fragment remember their raw text; two such values
/// are equal when type and raw text are equal. Values built in code compare
/// by identity.
#[derive(Clone)]
pub struct CustomValue {
    key: TypeKey,
    value: Arc<dyn Any + Send + Sync>,
    raw: Option<String>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            value: Arc::new(value),
            raw: None,
        }
    }

    /// Value decoded from `raw` fragment text
    pub fn decoded<T: Any + Send + Sync>(value: T, raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::new(value)
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        if self.key != other.key {
            return false;
        }
        match (&self.raw, &other.raw) {
            (Some(a), Some(b)) => a == b,
            _ => Arc::ptr_eq(&self.value, &other.value),
        }
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type", &self.key.name())
            .field("raw", &self.raw)
            .finish()
    }
}
