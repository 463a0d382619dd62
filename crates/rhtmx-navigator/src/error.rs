//! Error taxonomy
//!
//! Two families:
//! - configuration mistakes ([`RegistryError`], and the configuration half of
//!   [`ParamError`]) abort the operation immediately;
//! - user-input problems (the other half of [`ParamError`]) carry one message
//!   meant to be shown to the end user.

use thiserror::Error;

use crate::page::PageId;

/// Page registry failures. All of them are configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a page with URI key [{uri_key}] is already registered")]
    DuplicateUriKey { uri_key: String },

    #[error("page [{page}] is already registered")]
    DuplicateIdentity { page: PageId },

    #[error("cannot unregister page [{page}]: it has not been registered")]
    UnknownIdentity { page: PageId },

    #[error("page [{page}] is not registered; register it before linking or navigating to it")]
    IdentityNotRegistered { page: PageId },

    #[error("no page is registered under URI key [{uri_key}]")]
    UnknownUriKey { uri_key: String },

    #[error("the page list is empty; it should contain at least one page")]
    EmptyPageList,

    #[error("page [{page}] has an unusable URI name [{uri_name}]")]
    InvalidUriName { page: PageId, uri_name: String },

    #[error("invalid parameter declaration on page [{page}]: {reason}")]
    InvalidParamSpec { page: PageId, reason: String },
}

/// Parameter binding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("URL problem: the parameter {param} is missing")]
    MissingRequiredParameter { param: String },

    #[error("URL problem: the value [{raw}] of parameter {param} is not a valid {target}{}", detail_suffix(.detail))]
    TypeConversionError {
        param: String,
        raw: String,
        target: String,
        detail: Option<String>,
    },

    #[error("{message}")]
    BusinessValidationError { message: String },

    #[error("parameter {param} is declared with type {type_name}, which no converter handles")]
    UnsupportedParamType { param: String, type_name: String },

    #[error("parameter {name} is not declared by page [{page}]")]
    UndeclaredParameter { page: PageId, name: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({})", d),
        None => String::new(),
    }
}

impl ParamError {
    /// True for problems caused by the URL the user followed, false for
    /// programming or configuration mistakes.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ParamError::MissingRequiredParameter { .. }
                | ParamError::TypeConversionError { .. }
                | ParamError::BusinessValidationError { .. }
        )
    }

    /// Message to display to the end user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub(crate) fn conversion(
        param: impl Into<String>,
        raw: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        ParamError::TypeConversionError {
            param: param.into(),
            raw: raw.into(),
            target: target.into(),
            detail: None,
        }
    }
}

/// Any failure surfaced by the navigator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigatorError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Param(#[from] ParamError),
}

impl NavigatorError {
    pub fn is_user_facing(&self) -> bool {
        match self {
            NavigatorError::Registry(_) => false,
            NavigatorError::Param(err) => err.is_user_facing(),
        }
    }
}

pub type Result<T, E = NavigatorError> = std::result::Result<T, E>;
