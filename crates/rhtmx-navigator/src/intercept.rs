use std::fmt;
use std::sync::Arc;

use crate::page::PageId;
use crate::registry::PageDescriptor;
use crate::uri::BindingResult;

/// What an interceptor sees of a navigation
///
/// Interceptors run after the page was resolved and its parameters bound,
/// right before the page is activated.
#[derive(Debug, Clone, Copy)]
pub struct NavigationEvent<'a> {
    pub page: &'a PageId,
    pub descriptor: &'a PageDescriptor,
    /// Fragment as requested
    pub fragment: &'a str,
    /// Parameter part of the fragment
    pub payload: &'a str,
    pub params: &'a BindingResult,
}

/// Decision of one interceptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptOutcome {
    /// Let the next interceptor (or the activation) run
    Continue,
    /// The interceptor took over; nothing after it runs
    Handled,
}

/// Hook invoked around navigation
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{InterceptOutcome, Interceptor, NavigationEvent};
///
/// struct RequireLogin;
///
/// impl Interceptor for RequireLogin {
///     fn intercept(&self, event: &NavigationEvent<'_>) -> InterceptOutcome {
///         if event.descriptor.uri_key() == "admin" {
///             InterceptOutcome::Handled
///         } else {
///             InterceptOutcome::Continue
///         }
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Name reported when this interceptor handles a navigation
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn intercept(&self, event: &NavigationEvent<'_>) -> InterceptOutcome;
}

/// Interceptors in insertion order
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an interceptor (functional builder)
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.push(interceptor);
        self
    }

    /// Appends an interceptor at the end of the chain
    pub fn push(&mut self, interceptor: impl Interceptor + 'static) {
        self.interceptors.push(Arc::new(interceptor));
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Runs interceptors in order and returns the one that handled the
    /// event, if any. Later interceptors are not invoked.
    pub fn run(&self, event: &NavigationEvent<'_>) -> Option<&dyn Interceptor> {
        self.interceptors
            .iter()
            .find(|interceptor| interceptor.intercept(event) == InterceptOutcome::Handled)
            .map(|interceptor| interceptor.as_ref())
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.interceptors.iter().map(|i| i.name()))
            .finish()
    }
}
