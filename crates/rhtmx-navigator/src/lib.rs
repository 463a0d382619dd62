//! # RHTMX Navigator
//!
//! Page navigation for single-page RHTMX applications. The location
//! fragment picks the page and carries its parameters:
//!
//! ```text
//! #!paramtest/John-Rizzo-Belgium/ssn=xxxxxx/userId=123
//!  ^ ^         ^                  ^
//!  | page key  positional 0       named parameters, any order
//!  crawlable marker
//! ```
//!
//! - **Registry**: bidirectional page key ↔ page identity map, case-insensitive
//!   lookups, crawlable set, lazy home page
//! - **Analyzer**: tokenizes a payload, converts tokens to the declared types
//!   and collects every failure
//! - **Resources**: weak links (raw payload) and strong links (typed values,
//!   validated at build time)
//! - **Navigator**: fragment in, page plus bound parameters out, with an
//!   interceptor chain in between
//!
//! ## Example
//!
//! ```
//! use rhtmx_navigator::{Navigator, PageDeclaration, ParamPageResource, ParamSpec, ParamType};
//!
//! let navigator = Navigator::new();
//! navigator
//!     .register_pages(vec![
//!         PageDeclaration::new("app::DashboardPage"),
//!         PageDeclaration::new("app::ParamTestPage")
//!             .crawlable()
//!             .with_param(ParamSpec::positional(0).required())
//!             .with_param(ParamSpec::named("ssn").required())
//!             .with_param(ParamSpec::named("userId").of_type(ParamType::Long)),
//!     ])
//!     .unwrap();
//!
//! let resource = ParamPageResource::with_positional("app::ParamTestPage", "John")
//!     .add_param("ssn", "xxxxxx")
//!     .add_param("userId", 123i64);
//! let url = navigator.url_for(&resource).unwrap();
//! assert_eq!(url, "#!paramtest/John/ssn=xxxxxx/userId=123");
//!
//! let outcome = navigator.navigate(&url).unwrap();
//! let nav = outcome.navigation().unwrap();
//! assert_eq!(nav.params.long("userId"), Some(123));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod fragment;
pub mod intercept;
pub mod navigator;
pub mod page;
pub mod param;
pub mod registry;
pub mod resource;
pub mod uri;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{NavigatorConfig, NotFoundPolicy};
pub use error::{NavigatorError, ParamError, RegistryError, Result};
pub use fragment::{is_token_safe, is_valid_uri_key, split_fragment, FragmentParts};
pub use intercept::{InterceptOutcome, Interceptor, InterceptorChain, NavigationEvent};
pub use navigator::{Navigation, NavigationOutcome, Navigator};
pub use page::{page_name_from_type_name, Page, PageDeclaration, PageId};
pub use param::{CustomValue, ParamKey, ParamSpec, ParamType, ParamValue, TypeKey};
pub use registry::{PageDescriptor, PageRegistry, PageSummary};
pub use resource::{Link, LinkOptions, Linkable, PageResource, ParamPageResource, ResourceBuilder};
pub use uri::{
    entity_param_name, BindingResult, BoundParam, Conversion, ConverterChain, EntityConverter,
    EntityResolver, ExtraValidator, FromStrConverter, ParamConverter, ParamTarget, ParsedUri,
    UriAnalyzer, UriToken, ENTITY_MAIN_ID,
};
