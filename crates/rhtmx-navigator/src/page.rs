//! Page identity and declared page metadata
//!
//! A page is identified by an opaque [`PageId`]. Everything the registry and
//! the URI analyzer need to know about a page (its URI name override, whether
//! it is crawlable, which parameters it binds, how it validates them) is
//! declared up front in a [`PageDeclaration`] instead of being discovered at
//! runtime.

use std::fmt;
use std::sync::Arc;

use crate::param::ParamSpec;
use crate::uri::ExtraValidator;

/// Suffix dropped from a type's simple name when deriving the page name.
pub const PAGE_SUFFIX: &str = "Page";

/// Opaque identity of a page
///
/// Two ids are equal when their type paths are equal. Cloning is cheap
/// (`Arc<str>`), so ids are passed around by value.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::PageId;
///
/// let id = PageId::new("app::pages::DashboardPage");
/// assert_eq!(id.simple_name(), "DashboardPage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(Arc<str>);

impl PageId {
    /// Creates an id from an explicit type path such as `app::DashboardPage`.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(Arc::from(path.as_ref()))
    }

    /// Creates the id of a Rust type, using its type path.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(std::any::type_name::<T>())
    }

    /// Full type path of this page
    pub fn path(&self) -> &str {
        &self.0
    }

    /// Last path segment, generic arguments removed
    ///
    /// `app::ui::ListPage<u32>` → `ListPage`
    pub fn simple_name(&self) -> &str {
        let without_generics = match self.0.find('<') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        };
        without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Derives a page name from a type's simple name (pure function)
///
/// Drops one trailing `Page` suffix if present.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::page_name_from_type_name;
///
/// assert_eq!(page_name_from_type_name("DashboardPage"), "Dashboard");
/// assert_eq!(page_name_from_type_name("Dashboard"), "Dashboard");
/// assert_eq!(page_name_from_type_name("PagePage"), "Page");
/// ```
pub fn page_name_from_type_name(simple_name: &str) -> &str {
    simple_name.strip_suffix(PAGE_SUFFIX).unwrap_or(simple_name)
}

/// Everything a page declares about itself at registration time
///
/// Built with a small builder API:
///
/// ```
/// use rhtmx_navigator::{PageDeclaration, ParamSpec, ParamType};
///
/// let decl = PageDeclaration::new("app::TicketPage")
///     .with_uri_name("ticket")
///     .crawlable()
///     .with_param(ParamSpec::positional(0).required());
///
/// assert_eq!(decl.display_name(), "ticket");
/// assert!(decl.is_crawlable());
/// ```
#[derive(Clone)]
pub struct PageDeclaration {
    id: PageId,
    uri_name: Option<String>,
    crawlable: bool,
    params: Vec<ParamSpec>,
    validator: Option<Arc<dyn ExtraValidator>>,
}

impl PageDeclaration {
    pub fn new(id: impl Into<PageId>) -> Self {
        Self {
            id: id.into(),
            uri_name: None,
            crawlable: false,
            params: Vec::new(),
            validator: None,
        }
    }

    /// Declaration for a Rust type with no override and no parameters
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(PageId::of::<T>())
    }

    /// Overrides the name derived from the type. Blank names are ignored.
    pub fn with_uri_name(mut self, name: impl Into<String>) -> Self {
        self.uri_name = Some(name.into());
        self
    }

    /// Marks the page as safe for indexing bots
    pub fn crawlable(mut self) -> Self {
        self.crawlable = true;
        self
    }

    pub fn with_param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn with_params<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = ParamSpec>,
    {
        self.params.extend(specs);
        self
    }

    /// Attaches the page's extra-validation hook
    pub fn with_validator(mut self, validator: impl ExtraValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn uri_name(&self) -> Option<&str> {
        self.uri_name.as_deref()
    }

    pub fn is_crawlable(&self) -> bool {
        self.crawlable
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn validator(&self) -> Option<&Arc<dyn ExtraValidator>> {
        self.validator.as_ref()
    }

    /// Display name: the non-blank override verbatim, else the simple type
    /// name without its `Page` suffix.
    pub fn display_name(&self) -> String {
        match self.uri_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => page_name_from_type_name(self.id.simple_name()).to_string(),
        }
    }
}

impl fmt::Debug for PageDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDeclaration")
            .field("id", &self.id)
            .field("uri_name", &self.uri_name)
            .field("crawlable", &self.crawlable)
            .field("params", &self.params)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// Capability implemented by page types that declare their own metadata
///
/// ```
/// use rhtmx_navigator::{Page, PageDeclaration, ParamSpec};
///
/// struct DashboardPage;
///
/// impl Page for DashboardPage {
///     fn declaration() -> PageDeclaration {
///         PageDeclaration::of::<Self>().with_uri_name("dash")
///     }
/// }
///
/// assert_eq!(DashboardPage::declaration().display_name(), "dash");
/// ```
pub trait Page: 'static {
    fn declaration() -> PageDeclaration
    where
        Self: Sized,
    {
        PageDeclaration::of::<Self>()
    }

    fn page_id() -> PageId
    where
        Self: Sized,
    {
        PageId::of::<Self>()
    }
}
