//! Link construction
//!
//! Two ways to point at a page:
//! - [`PageResource`] (weak): the caller hands over an already formatted
//!   payload, which is trusted as is. Mistakes show up when the link is
//!   followed.
//! - [`ParamPageResource`] (strong): typed values, formatted and validated
//!   against the page's declared parameters when the link is built.
//!
//! Both go through a [`ResourceBuilder`], which resolves the page's URI key
//! from the registry.

use crate::error::{NavigatorError, ParamError};
use crate::fragment::{join_fragment, CRAWLABLE_MARKER, FRAGMENT_PREFIX};
use crate::page::{Page, PageId};
use crate::param::ParamValue;
use crate::registry::{PageDescriptor, PageRegistry};
use crate::uri::UriAnalyzer;

/// Anything a link can be built from
pub trait Linkable {
    fn page(&self) -> &PageId;

    /// Payload to append after the page key
    fn payload(&self, descriptor: &PageDescriptor, analyzer: &UriAnalyzer) -> Result<String, ParamError>;
}

/// Weak link: page plus a raw payload string
///
/// ```
/// use rhtmx_navigator::PageResource;
///
/// let resource = PageResource::with_payload("app::ParamTestPage", "John/ssn=1/userId=123");
/// assert_eq!(resource.raw_payload(), "John/ssn=1/userId=123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResource {
    page: PageId,
    payload: String,
}

impl PageResource {
    pub fn new(page: impl Into<PageId>) -> Self {
        Self::with_payload(page, "")
    }

    pub fn with_payload(page: impl Into<PageId>, payload: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            payload: payload.into(),
        }
    }

    pub fn of<P: Page>() -> Self {
        Self::new(P::page_id())
    }

    pub fn raw_payload(&self) -> &str {
        &self.payload
    }
}

impl Linkable for PageResource {
    fn page(&self) -> &PageId {
        &self.page
    }

    fn payload(&self, _descriptor: &PageDescriptor, _analyzer: &UriAnalyzer) -> Result<String, ParamError> {
        Ok(self.payload.clone())
    }
}

/// Strong link: typed values checked against the page's parameters
///
/// Holds at most one positional value (position 0) and any number of named
/// values, kept in the order they were first added.
///
/// ```
/// use rhtmx_navigator::ParamPageResource;
///
/// let resource = ParamPageResource::with_positional("app::ParamTestPage", "John-Rizzo-Belgium")
///     .add_param("ssn", "xxxxxx")
///     .add_param("userId", 123i64);
///
/// assert_eq!(resource.named().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamPageResource {
    page: PageId,
    positional: Option<ParamValue>,
    named: Vec<(String, ParamValue)>,
}

impl ParamPageResource {
    pub fn new(page: impl Into<PageId>) -> Self {
        Self {
            page: page.into(),
            positional: None,
            named: Vec::new(),
        }
    }

    pub fn with_positional(page: impl Into<PageId>, value: impl Into<ParamValue>) -> Self {
        Self {
            positional: Some(value.into()),
            ..Self::new(page)
        }
    }

    pub fn of<P: Page>() -> Self {
        Self::new(P::page_id())
    }

    /// Adds a named value; adding the same name again replaces the value
    /// in place.
    pub fn add_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.named.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name, value)),
        }
        self
    }

    pub fn positional(&self) -> Option<&ParamValue> {
        self.positional.as_ref()
    }

    pub fn named(&self) -> &[(String, ParamValue)] {
        &self.named
    }
}

impl Linkable for ParamPageResource {
    fn page(&self) -> &PageId {
        &self.page
    }

    /// Formats the values, then runs the full analysis on the result,
    /// extra validation included.
    fn payload(&self, descriptor: &PageDescriptor, analyzer: &UriAnalyzer) -> Result<String, ParamError> {
        let payload = analyzer.format(
            descriptor.id(),
            descriptor.params(),
            self.positional.as_ref(),
            &self.named,
        )?;
        analyzer.bind(descriptor.params(), &payload, descriptor.validator())?;
        Ok(payload)
    }
}

/// How links are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Prefixed to the fragment of crawlable pages
    pub crawlable_marker: String,
    /// Use the CamelCase display name instead of the lowercase URI key
    pub display_name_links: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            crawlable_marker: CRAWLABLE_MARKER.to_string(),
            display_name_links: false,
        }
    }
}

/// A built link, ready to be rendered as an anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub page: PageId,
    /// Fragment body, without `#` or marker: `key[/payload]`
    pub fragment: String,
    /// Full href: `#[marker]key[/payload]`
    pub href: String,
}

/// Builds links to registered pages
pub struct ResourceBuilder<'a> {
    registry: &'a PageRegistry,
    analyzer: &'a UriAnalyzer,
    options: LinkOptions,
}

impl<'a> ResourceBuilder<'a> {
    pub fn new(registry: &'a PageRegistry, analyzer: &'a UriAnalyzer) -> Self {
        Self {
            registry,
            analyzer,
            options: LinkOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LinkOptions) -> Self {
        self.options = options;
        self
    }

    /// `key[/payload]` for the resource
    pub fn fragment(&self, resource: &impl Linkable) -> Result<String, NavigatorError> {
        Ok(self.link(resource)?.fragment)
    }

    /// `#[marker]key[/payload]` for the resource
    pub fn url(&self, resource: &impl Linkable) -> Result<String, NavigatorError> {
        Ok(self.link(resource)?.href)
    }

    pub fn link(&self, resource: &impl Linkable) -> Result<Link, NavigatorError> {
        let descriptor = self.registry.require(resource.page())?;
        let payload = resource.payload(&descriptor, self.analyzer)?;

        let key = if self.options.display_name_links {
            descriptor.display_name()
        } else {
            descriptor.uri_key()
        };
        let fragment = join_fragment(key, &payload);

        let marker = if descriptor.is_crawlable() {
            self.options.crawlable_marker.as_str()
        } else {
            ""
        };
        let href = format!("{}{}{}", FRAGMENT_PREFIX, marker, fragment);

        Ok(Link {
            page: descriptor.id().clone(),
            fragment,
            href,
        })
    }
}
