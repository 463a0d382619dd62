//! Binding results and the page-side hooks that consume them

use std::any::Any;

use crate::error::ParamError;
use crate::param::{ParamKey, ParamSpec, ParamValue};

/// One declared parameter after binding
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub spec: ParamSpec,
    /// Raw token text, if a token matched the spec
    pub raw: Option<String>,
    /// Converted value; absent when the token is missing or did not convert
    pub value: Option<ParamValue>,
}

/// Converted parameters of one navigation, plus what went wrong
///
/// Created per navigation and dropped once the page has consumed it.
/// Failures are kept in declaration order; the first one is the message
/// surfaced to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingResult {
    params: Vec<BoundParam>,
    failures: Vec<ParamError>,
}

impl BindingResult {
    pub(crate) fn new(params: Vec<BoundParam>, failures: Vec<ParamError>) -> Self {
        Self { params, failures }
    }

    pub(crate) fn push_failure(&mut self, failure: ParamError) {
        self.failures.push(failure);
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[ParamError] {
        &self.failures
    }

    pub fn first_failure(&self) -> Option<&ParamError> {
        self.failures.first()
    }

    /// `Ok(self)` when nothing failed, else the first failure
    pub fn into_result(mut self) -> Result<Self, ParamError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(self.failures.swap_remove(0))
        }
    }

    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    fn find(&self, key: &ParamKey) -> Option<&BoundParam> {
        self.params.iter().find(|p| p.spec.answers_to(key))
    }

    /// Converted value of the parameter addressed by `key`
    pub fn get(&self, key: impl Into<ParamKey>) -> Option<&ParamValue> {
        self.find(&key.into()).and_then(|p| p.value.as_ref())
    }

    /// Raw token text of the parameter addressed by `key`
    pub fn raw(&self, key: impl Into<ParamKey>) -> Option<&str> {
        self.find(&key.into()).and_then(|p| p.raw.as_deref())
    }

    pub fn text(&self, key: impl Into<ParamKey>) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn int(&self, key: impl Into<ParamKey>) -> Option<i32> {
        self.get(key).and_then(ParamValue::as_int)
    }

    pub fn long(&self, key: impl Into<ParamKey>) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_long)
    }

    pub fn custom<T: Any>(&self, key: impl Into<ParamKey>) -> Option<&T> {
        self.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Hands every declared parameter to `target`, in declaration order
    pub fn bind_into<T: ParamTarget + ?Sized>(&self, target: &mut T) {
        for param in &self.params {
            target.assign(&param.spec, param.value.as_ref());
        }
    }
}

/// Setter contract for pages that receive bound parameters
///
/// The page matches on the spec (usually its name or position) and stores
/// the value in its own field. Optional parameters that were absent arrive
/// as `None`.
///
/// ```
/// use rhtmx_navigator::{ParamSpec, ParamTarget, ParamValue};
///
/// #[derive(Default)]
/// struct TicketPage {
///     code: Option<String>,
/// }
///
/// impl ParamTarget for TicketPage {
///     fn assign(&mut self, spec: &ParamSpec, value: Option<&ParamValue>) {
///         if spec.position() == Some(0) {
///             self.code = value.and_then(|v| v.as_str()).map(str::to_string);
///         }
///     }
/// }
/// ```
pub trait ParamTarget {
    fn assign(&mut self, spec: &ParamSpec, value: Option<&ParamValue>);
}

/// Page-supplied validation run after every parameter converted cleanly
///
/// Returns the message to show to the user, or `None` when the parameters
/// are acceptable. Closures with the same signature implement it.
pub trait ExtraValidator: Send + Sync {
    fn extra_validate(&self, params: &BindingResult, fragment: &str) -> Option<String>;
}

impl<F> ExtraValidator for F
where
    F: Fn(&BindingResult, &str) -> Option<String> + Send + Sync,
{
    fn extra_validate(&self, params: &BindingResult, fragment: &str) -> Option<String> {
        self(params, fragment)
    }
}
