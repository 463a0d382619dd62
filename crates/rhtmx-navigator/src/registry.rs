//! Page registry
//!
//! Bidirectional page-name ↔ page-identity map shared by every session of
//! the application. Two indexes are kept:
//! - `uri key → descriptor`, keys lowercase, for case-insensitive lookup of
//!   incoming fragments
//! - `page id → descriptor`, for link building
//!
//! Both live behind one `RwLock`, so a reader never sees one index updated
//! and the other not. Lookups share the read lock; register, unregister and
//! the lazy home-page pick take the write lock.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::fragment::is_valid_uri_key;
use crate::page::{PageDeclaration, PageId};
use crate::param::ParamSpec;
use crate::uri::ExtraValidator;

/// A registered page
#[derive(Clone)]
pub struct PageDescriptor {
    id: PageId,
    display_name: String,
    uri_key: String,
    crawlable: bool,
    params: Vec<ParamSpec>,
    validator: Option<Arc<dyn ExtraValidator>>,
}

impl PageDescriptor {
    /// Validates a declaration and derives its names
    pub fn from_declaration(decl: PageDeclaration) -> Result<Self, RegistryError> {
        let display_name = decl.display_name();
        if !is_valid_uri_key(&display_name) {
            return Err(RegistryError::InvalidUriName {
                page: decl.id().clone(),
                uri_name: display_name,
            });
        }
        validate_param_specs(decl.id(), decl.params())?;

        Ok(Self {
            uri_key: display_name.to_lowercase(),
            display_name,
            id: decl.id().clone(),
            crawlable: decl.is_crawlable(),
            params: decl.params().to_vec(),
            validator: decl.validator().cloned(),
        })
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// CamelCase name, as declared or derived
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Lowercase key used to look the page up
    pub fn uri_key(&self) -> &str {
        &self.uri_key
    }

    pub fn is_crawlable(&self) -> bool {
        self.crawlable
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn validator(&self) -> Option<&dyn ExtraValidator> {
        self.validator.as_deref()
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            page: self.id.to_string(),
            display_name: self.display_name.clone(),
            uri_key: self.uri_key.clone(),
            crawlable: self.crawlable,
        }
    }
}

impl fmt::Debug for PageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDescriptor")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("uri_key", &self.uri_key)
            .field("crawlable", &self.crawlable)
            .field("params", &self.params)
            .finish()
    }
}

/// Serializable view of a page, for sitemap/robots collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: String,
    pub display_name: String,
    pub uri_key: String,
    pub crawlable: bool,
}

fn validate_param_specs(page: &PageId, specs: &[ParamSpec]) -> Result<(), RegistryError> {
    let invalid = |reason: String| RegistryError::InvalidParamSpec {
        page: page.clone(),
        reason,
    };

    let mut names = HashSet::new();
    let mut positions = HashSet::new();

    for spec in specs {
        if let Some(name) = spec.name() {
            if name.trim().is_empty() || name.contains('=') || name.contains(crate::fragment::SEPARATOR) {
                return Err(invalid(format!("unusable parameter name [{}]", name)));
            }
            if !names.insert(name) {
                return Err(invalid(format!("parameter name [{}] declared twice", name)));
            }
        }
        if let Some(pos) = spec.position() {
            if !positions.insert(pos) {
                return Err(invalid(format!("position {} declared twice", pos)));
            }
        }
    }
    Ok(())
}

#[derive(Default)]
struct RegistryState {
    by_uri_key: HashMap<String, Arc<PageDescriptor>>,
    by_id: HashMap<PageId, Arc<PageDescriptor>>,
    /// Registration order, for listings and the default home page
    order: Vec<PageId>,
    crawlable: HashSet<PageId>,
    home: Option<PageId>,
}

impl RegistryState {
    fn check_free(&self, descriptor: &PageDescriptor) -> Result<(), RegistryError> {
        if self.by_id.contains_key(&descriptor.id) {
            return Err(RegistryError::DuplicateIdentity {
                page: descriptor.id.clone(),
            });
        }
        if self.by_uri_key.contains_key(&descriptor.uri_key) {
            return Err(RegistryError::DuplicateUriKey {
                uri_key: descriptor.uri_key.clone(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, descriptor: PageDescriptor) -> Arc<PageDescriptor> {
        let descriptor = Arc::new(descriptor);
        if descriptor.crawlable {
            self.crawlable.insert(descriptor.id.clone());
        }
        self.order.push(descriptor.id.clone());
        self.by_uri_key
            .insert(descriptor.uri_key.clone(), Arc::clone(&descriptor));
        self.by_id
            .insert(descriptor.id.clone(), Arc::clone(&descriptor));
        descriptor
    }
}

/// Registry of every page the application can navigate to
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{PageDeclaration, PageId, PageRegistry};
///
/// let registry = PageRegistry::new();
/// registry.register_page(PageDeclaration::new("app::DashboardPage")).unwrap();
///
/// let id = registry.page_id("DASHBOARD").unwrap();
/// assert_eq!(id, PageId::new("app::DashboardPage"));
/// assert_eq!(registry.uri_key(&id).unwrap(), "dashboard");
/// ```
#[derive(Default)]
pub struct PageRegistry {
    state: RwLock<RegistryState>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one page
    ///
    /// Fails without touching the registry if the identity or the URI key
    /// is already taken.
    pub fn register_page(&self, decl: PageDeclaration) -> Result<Arc<PageDescriptor>, RegistryError> {
        let descriptor = PageDescriptor::from_declaration(decl)?;

        let mut state = self.state.write();
        state.check_free(&descriptor)?;
        let descriptor = state.insert(descriptor);

        info!(
            page = %descriptor.id,
            uri_key = %descriptor.uri_key,
            crawlable = descriptor.crawlable,
            "registered page"
        );
        Ok(descriptor)
    }

    /// Registers pages one by one, stopping at the first failure
    ///
    /// Pages registered before the failure stay registered. See
    /// [`register_pages_atomic`](Self::register_pages_atomic) for the
    /// all-or-nothing variant.
    pub fn register_pages<I>(&self, decls: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = PageDeclaration>,
    {
        let mut count = 0;
        for decl in decls {
            self.register_page(decl)?;
            count += 1;
        }
        if count == 0 {
            return Err(RegistryError::EmptyPageList);
        }
        Ok(count)
    }

    /// Registers all pages or none
    pub fn register_pages_atomic<I>(&self, decls: I) -> Result<usize, RegistryError>
    where
        I: IntoIterator<Item = PageDeclaration>,
    {
        let descriptors = decls
            .into_iter()
            .map(PageDescriptor::from_declaration)
            .collect::<Result<Vec<_>, _>>()?;
        if descriptors.is_empty() {
            return Err(RegistryError::EmptyPageList);
        }

        let mut batch_ids = HashSet::new();
        let mut batch_keys = HashSet::new();

        let mut state = self.state.write();
        for descriptor in &descriptors {
            state.check_free(descriptor)?;
            if !batch_ids.insert(descriptor.id.clone()) {
                return Err(RegistryError::DuplicateIdentity {
                    page: descriptor.id.clone(),
                });
            }
            if !batch_keys.insert(descriptor.uri_key.clone()) {
                return Err(RegistryError::DuplicateUriKey {
                    uri_key: descriptor.uri_key.clone(),
                });
            }
        }

        let count = descriptors.len();
        for descriptor in descriptors {
            state.insert(descriptor);
        }
        info!(count, "registered page batch");
        Ok(count)
    }

    /// Removes a page from both indexes and from the crawlable set
    ///
    /// If it was the home page, the home page reverts to the lazy default.
    pub fn unregister_page(&self, id: &PageId) -> Result<Arc<PageDescriptor>, RegistryError> {
        let mut state = self.state.write();

        let descriptor = state
            .by_id
            .remove(id)
            .ok_or_else(|| RegistryError::UnknownIdentity { page: id.clone() })?;
        state.by_uri_key.remove(&descriptor.uri_key);
        state.crawlable.remove(id);
        state.order.retain(|p| p != id);
        if state.home.as_ref() == Some(id) {
            state.home = None;
        }

        info!(page = %id, uri_key = %descriptor.uri_key, "unregistered page");
        Ok(descriptor)
    }

    /// Page registered under `uri_key`, compared case-insensitively
    ///
    /// `None` is not an error: the caller decides what an unknown page means.
    pub fn page_id(&self, uri_key: &str) -> Option<PageId> {
        self.descriptor_by_key(uri_key).map(|d| d.id.clone())
    }

    pub fn descriptor_by_key(&self, uri_key: &str) -> Option<Arc<PageDescriptor>> {
        self.state
            .read()
            .by_uri_key
            .get(&uri_key.to_lowercase())
            .cloned()
    }

    pub fn descriptor(&self, id: &PageId) -> Option<Arc<PageDescriptor>> {
        self.state.read().by_id.get(id).cloned()
    }

    /// Descriptor of a page that must be registered
    pub fn require(&self, id: &PageId) -> Result<Arc<PageDescriptor>, RegistryError> {
        self.descriptor(id)
            .ok_or_else(|| RegistryError::IdentityNotRegistered { page: id.clone() })
    }

    /// Lowercase URI key of a registered page
    pub fn uri_key(&self, id: &PageId) -> Result<String, RegistryError> {
        self.require(id).map(|d| d.uri_key.clone())
    }

    /// CamelCase display name of a registered page
    pub fn display_name(&self, id: &PageId) -> Result<String, RegistryError> {
        self.require(id).map(|d| d.display_name.clone())
    }

    /// Sets the page served for an empty fragment
    pub fn set_home_page(&self, id: &PageId) -> Result<(), RegistryError> {
        let mut state = self.state.write();
        if !state.by_id.contains_key(id) {
            return Err(RegistryError::IdentityNotRegistered { page: id.clone() });
        }
        state.home = Some(id.clone());
        debug!(page = %id, "home page set");
        Ok(())
    }

    /// Configured home page, or the first registered page
    ///
    /// The default is picked once and kept until that page is unregistered.
    /// `None` only when no page is registered.
    pub fn home_page_id(&self) -> Option<PageId> {
        if let Some(home) = &self.state.read().home {
            return Some(home.clone());
        }

        let state = self.state.upgradable_read();
        if let Some(home) = &state.home {
            return Some(home.clone());
        }

        let first = state.order.first().cloned()?;
        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.home = Some(first.clone());
        debug!(page = %first, "no home page configured, defaulting to first registered page");
        Some(first)
    }

    pub fn is_crawlable(&self, id: &PageId) -> bool {
        self.state.read().crawlable.contains(id)
    }

    /// Crawlable pages, in registration order
    pub fn crawlable_pages(&self) -> Vec<PageId> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter(|id| state.crawlable.contains(*id))
            .cloned()
            .collect()
    }

    /// All pages, in registration order
    pub fn pages(&self) -> Vec<PageId> {
        self.state.read().order.clone()
    }

    /// Summaries of the crawlable pages, for sitemap generation
    pub fn sitemap(&self) -> Vec<PageSummary> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter(|id| state.crawlable.contains(*id))
            .filter_map(|id| state.by_id.get(id))
            .map(|d| d.summary())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.state.read().by_id.contains_key(id)
    }
}

impl fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("PageRegistry")
            .field("pages", &state.order)
            .field("home", &state.home)
            .finish()
    }
}
