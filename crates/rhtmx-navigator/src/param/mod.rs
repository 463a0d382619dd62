//! Parameter declarations
//!
//! A page declares each bindable parameter as a [`ParamSpec`]: where it sits
//! in the fragment (a name, a position, or both), whether it is required,
//! and which [`ParamType`] its raw text converts to.

pub mod value;

pub use value::{CustomValue, ParamValue};

use std::any::TypeId;
use std::fmt;

/// Identifies a custom (non-primitive) parameter type
///
/// Compared by `TypeId`; the name is kept for messages.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name
    pub fn simple_name(&self) -> &'static str {
        let name = self.name;
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Raw text, passed through unchanged
    Text,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// Domain type converted by the converter chain
    Custom(TypeKey),
}

impl ParamType {
    pub fn custom<T: 'static>() -> Self {
        ParamType::Custom(TypeKey::of::<T>())
    }

    /// Name used in conversion error messages
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::Text => "String",
            ParamType::Int => "Integer",
            ParamType::Long => "Long",
            ParamType::Custom(key) => key.simple_name(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, ParamType::Custom(_))
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Addresses one parameter of a fragment, by name or by position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Position(usize),
    Name(String),
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Position(pos) => write!(f, "position {}", pos),
            ParamKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for ParamKey {
    fn from(pos: usize) -> Self {
        ParamKey::Position(pos)
    }
}

impl From<&str> for ParamKey {
    fn from(name: &str) -> Self {
        ParamKey::Name(name.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(name: String) -> Self {
        ParamKey::Name(name)
    }
}

/// One bindable parameter of a page
///
/// Constructors always set a name or a position, so every spec is
/// addressable. Specs default to optional [`ParamType::Text`].
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{ParamSpec, ParamType};
///
/// let first = ParamSpec::positional(0).required();
/// let ssn = ParamSpec::named("ssn").required();
/// let user_id = ParamSpec::named("userId").of_type(ParamType::Long);
///
/// assert_eq!(first.label(), "position 0");
/// assert_eq!(user_id.label(), "userId");
/// assert!(!user_id.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamSpec {
    name: Option<String>,
    position: Option<usize>,
    required: bool,
    ty: ParamType,
}

impl ParamSpec {
    /// Parameter addressed by its 0-based slot among positional tokens
    pub fn positional(position: usize) -> Self {
        Self {
            name: None,
            position: Some(position),
            required: false,
            ty: ParamType::Text,
        }
    }

    /// Parameter addressed by a `name=value` token
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            position: None,
            required: false,
            ty: ParamType::Text,
        }
    }

    /// Also accept the value at `position` when no named token matches
    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Also accept a named token for a positional parameter
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn of_type(mut self, ty: ParamType) -> Self {
        self.ty = ty;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    /// Whether `key` addresses this spec
    pub fn answers_to(&self, key: &ParamKey) -> bool {
        match key {
            ParamKey::Name(name) => self.name.as_deref() == Some(name.as_str()),
            ParamKey::Position(pos) => self.position == Some(*pos),
        }
    }

    /// Human-readable reference used in messages: the name, else `position N`
    pub fn label(&self) -> String {
        match (&self.name, self.position) {
            (Some(name), _) => name.clone(),
            (None, Some(pos)) => format!("position {}", pos),
            (None, None) => "unaddressed parameter".to_string(),
        }
    }
}
