//! Conversion strategies for custom parameter types
//!
//! Primitive types (text, integers) are converted by the analyzer itself.
//! Everything else goes through an ordered [`ConverterChain`]: each
//! [`ParamConverter`] either converts the raw text, rejects it with a
//! message, or declines with [`Conversion::NotHandled`] so the next
//! converter gets a chance.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use crate::param::{CustomValue, TypeKey};

/// Outcome of one conversion attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// The converter produced a value
    Converted(CustomValue),
    /// The converter handles this type but the raw text is not acceptable
    Rejected(String),
    /// The converter does not handle this type
    NotHandled,
}

/// A conversion strategy for one or more custom types
pub trait ParamConverter: Send + Sync {
    /// Turns `raw` into a value of type `target`
    ///
    /// `fragment` is the whole payload, for converters whose answer depends
    /// on other parameters.
    fn try_convert(&self, target: &TypeKey, raw: &str, fragment: &str) -> Conversion;

    /// Inverse of `try_convert`: fragment text for a value this converter
    /// handles, `None` otherwise.
    fn to_fragment(&self, value: &CustomValue) -> Option<String>;
}

/// Ordered list of converters, tried in insertion order
#[derive(Clone, Default)]
pub struct ConverterChain {
    converters: Vec<Arc<dyn ParamConverter>>,
}

impl ConverterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a converter (functional builder)
    pub fn with_converter(mut self, converter: impl ParamConverter + 'static) -> Self {
        self.push(converter);
        self
    }

    pub fn push(&mut self, converter: impl ParamConverter + 'static) {
        self.converters.push(Arc::new(converter));
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// First answer other than `NotHandled`, or `NotHandled` if every
    /// converter declines.
    pub fn convert(&self, target: &TypeKey, raw: &str, fragment: &str) -> Conversion {
        self.converters
            .iter()
            .map(|converter| converter.try_convert(target, raw, fragment))
            .find(|outcome| !matches!(outcome, Conversion::NotHandled))
            .unwrap_or(Conversion::NotHandled)
    }

    /// Fragment text of a custom value, from the first converter that knows it
    pub fn to_fragment(&self, value: &CustomValue) -> Option<String> {
        self.converters
            .iter()
            .find_map(|converter| converter.to_fragment(value))
    }
}

impl fmt::Debug for ConverterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterChain")
            .field("converters", &self.converters.len())
            .finish()
    }
}

/// Converter for any `FromStr + Display` type, typically an enum
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::uri::{Conversion, FromStrConverter, ParamConverter};
/// use rhtmx_navigator::TypeKey;
///
/// let converter = FromStrConverter::<u8>::new();
/// assert!(matches!(
///     converter.try_convert(&TypeKey::of::<u8>(), "7", ""),
///     Conversion::Converted(_)
/// ));
/// assert!(matches!(
///     converter.try_convert(&TypeKey::of::<u8>(), "700", ""),
///     Conversion::Rejected(_)
/// ));
/// assert_eq!(
///     converter.try_convert(&TypeKey::of::<String>(), "x", ""),
///     Conversion::NotHandled
/// );
/// ```
pub struct FromStrConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ParamConverter for FromStrConverter<T>
where
    T: FromStr + fmt::Display + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    fn try_convert(&self, target: &TypeKey, raw: &str, _fragment: &str) -> Conversion {
        if !target.is::<T>() {
            return Conversion::NotHandled;
        }
        match raw.parse::<T>() {
            Ok(value) => Conversion::Converted(CustomValue::decoded(value, raw)),
            Err(err) => Conversion::Rejected(err.to_string()),
        }
    }

    fn to_fragment(&self, value: &CustomValue) -> Option<String> {
        value.downcast_ref::<T>().map(|v| v.to_string())
    }
}
