//! Fragment navigation
//!
//! [`Navigator`] ties the registry, the analyzer and the interceptor chain
//! together: it turns an incoming fragment into the page to activate with
//! its bound parameters, and renders resources back into fragments.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{NavigatorConfig, NotFoundPolicy};
use crate::error::{NavigatorError, RegistryError};
use crate::fragment::split_fragment;
use crate::intercept::{Interceptor, InterceptorChain, NavigationEvent};
use crate::page::{PageDeclaration, PageId};
use crate::registry::{PageDescriptor, PageRegistry};
use crate::resource::{Link, Linkable, ResourceBuilder};
use crate::uri::{BindingResult, ParamTarget, UriAnalyzer};

/// A resolved navigation, ready for activation
#[derive(Debug, Clone)]
pub struct Navigation {
    pub page: PageId,
    pub descriptor: Arc<PageDescriptor>,
    /// Fragment as requested
    pub fragment: String,
    pub payload: String,
    pub params: BindingResult,
}

impl Navigation {
    /// Hands every bound parameter to the page
    pub fn bind_into<T: ParamTarget + ?Sized>(&self, target: &mut T) {
        self.params.bind_into(target);
    }
}

/// What came out of [`Navigator::navigate`]
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// Parameters bound and no interceptor objected
    Activated(Navigation),
    /// No page matches the fragment's page key
    NotFound {
        requested: String,
        /// Page to show instead, per [`NotFoundPolicy`]
        fallback: Option<PageId>,
    },
    /// An interceptor handled the navigation
    Intercepted { page: PageId, interceptor: String },
}

impl NavigationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, NavigationOutcome::Activated(_))
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        match self {
            NavigationOutcome::Activated(nav) => Some(nav),
            _ => None,
        }
    }
}

/// Resolves fragments to pages and pages to fragments
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{Navigator, PageDeclaration, ParamPageResource, ParamSpec};
///
/// let navigator = Navigator::new();
/// navigator
///     .register_pages(vec![
///         PageDeclaration::new("app::DashboardPage"),
///         PageDeclaration::new("app::TicketPage").with_param(ParamSpec::positional(0).required()),
///     ])
///     .unwrap();
///
/// let url = navigator
///     .url_for(&ParamPageResource::with_positional("app::TicketPage", "ABC-12"))
///     .unwrap();
/// assert_eq!(url, "#ticket/ABC-12");
///
/// let outcome = navigator.navigate(&url).unwrap();
/// let nav = outcome.navigation().unwrap();
/// assert_eq!(nav.params.text(0), Some("ABC-12"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    registry: Arc<PageRegistry>,
    analyzer: UriAnalyzer,
    interceptors: InterceptorChain,
    config: NavigatorConfig,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a navigator and registers `decls` with it
    ///
    /// The configured home page, if any, is applied after registration.
    pub fn from_config<I>(config: NavigatorConfig, decls: I) -> Result<Self, NavigatorError>
    where
        I: IntoIterator<Item = PageDeclaration>,
    {
        let navigator = Self::new().with_config(config);
        navigator.register_pages(decls)?;
        navigator.apply_home_page()?;
        Ok(navigator)
    }

    /// Shares an existing registry (functional builder)
    pub fn with_registry(mut self, registry: Arc<PageRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_analyzer(mut self, analyzer: UriAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Appends an interceptor to the chain (functional builder)
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn registry(&self) -> &Arc<PageRegistry> {
        &self.registry
    }

    pub fn analyzer(&self) -> &UriAnalyzer {
        &self.analyzer
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn interceptors(&self) -> &InterceptorChain {
        &self.interceptors
    }

    /// Registers a page list using the configured batch policy
    ///
    /// A page whose name starts with the configured crawlable marker could
    /// never be navigated to; such a list is rejected before anything is
    /// registered.
    pub fn register_pages<I>(&self, decls: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = PageDeclaration>,
    {
        let decls: Vec<PageDeclaration> = decls.into_iter().collect();
        self.check_marker_clash(&decls)?;

        if self.config.atomic_batch_registration {
            self.registry.register_pages_atomic(decls)
        } else {
            self.registry.register_pages(decls)
        }
    }

    fn check_marker_clash(&self, decls: &[PageDeclaration]) -> Result<(), RegistryError> {
        let marker = self.config.crawlable_marker.as_str();
        if marker.is_empty() {
            return Ok(());
        }
        match decls.iter().find(|d| d.display_name().starts_with(marker)) {
            Some(decl) => Err(RegistryError::InvalidUriName {
                page: decl.id().clone(),
                uri_name: decl.display_name(),
            }),
            None => Ok(()),
        }
    }

    /// Makes the configured `home_page` key the registry's home page
    pub fn apply_home_page(&self) -> Result<(), RegistryError> {
        let Some(key) = self.config.home_page.as_deref() else {
            return Ok(());
        };
        let id = self
            .registry
            .page_id(key)
            .ok_or_else(|| RegistryError::UnknownUriKey {
                uri_key: key.to_string(),
            })?;
        self.registry.set_home_page(&id)
    }

    /// Link builder using the configured link options
    pub fn resources(&self) -> ResourceBuilder<'_> {
        ResourceBuilder::new(&self.registry, &self.analyzer).with_options(self.config.link_options())
    }

    pub fn url_for(&self, resource: &impl Linkable) -> Result<String, NavigatorError> {
        self.resources().url(resource)
    }

    pub fn link_for(&self, resource: &impl Linkable) -> Result<Link, NavigatorError> {
        self.resources().link(resource)
    }

    /// Resolves a fragment to the page to activate
    ///
    /// An empty page key means the home page. Parameter problems come back
    /// as a [`NavigatorError::Param`]; the first failure is the one reported.
    pub fn navigate(&self, fragment: &str) -> Result<NavigationOutcome, NavigatorError> {
        let parts = split_fragment(fragment, &self.config.crawlable_marker);

        let descriptor = if parts.page_key.is_empty() {
            self.registry
                .home_page_id()
                .and_then(|id| self.registry.descriptor(&id))
        } else {
            self.registry.descriptor_by_key(parts.page_key)
        };

        let Some(descriptor) = descriptor else {
            let fallback = match self.config.not_found {
                NotFoundPolicy::Home => self.registry.home_page_id(),
                NotFoundPolicy::Reject => None,
            };
            warn!(fragment, page_key = parts.page_key, "no page for fragment");
            return Ok(NavigationOutcome::NotFound {
                requested: parts.page_key.to_string(),
                fallback,
            });
        };

        let params = self
            .analyzer
            .bind(descriptor.params(), parts.payload, descriptor.validator())
            .map_err(|err| {
                warn!(page = %descriptor.id(), fragment, error = %err, "navigation rejected");
                err
            })?;

        let event = NavigationEvent {
            page: descriptor.id(),
            descriptor: &descriptor,
            fragment,
            payload: parts.payload,
            params: &params,
        };
        if let Some(interceptor) = self.interceptors.run(&event) {
            debug!(page = %descriptor.id(), interceptor = interceptor.name(), "navigation intercepted");
            return Ok(NavigationOutcome::Intercepted {
                page: descriptor.id().clone(),
                interceptor: interceptor.name().to_string(),
            });
        }

        debug!(page = %descriptor.id(), payload = parts.payload, "navigation activated");
        Ok(NavigationOutcome::Activated(Navigation {
            page: descriptor.id().clone(),
            fragment: fragment.to_string(),
            payload: parts.payload.to_string(),
            params,
            descriptor,
        }))
    }
}
