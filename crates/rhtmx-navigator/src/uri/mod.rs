//! URI parameter analysis
//!
//! - [`parsed`]: tokenizing a payload into positional and named tokens
//! - [`analyzer`]: matching tokens to specs, converting and validating them
//! - [`binding`]: the per-navigation result and the page-side hooks
//! - [`convert`]: conversion strategies for custom types
//! - [`entity`]: the entity lookup hook

pub mod analyzer;
pub mod binding;
pub mod convert;
pub mod entity;
pub mod parsed;

pub use analyzer::UriAnalyzer;
pub use binding::{BindingResult, BoundParam, ExtraValidator, ParamTarget};
pub use convert::{Conversion, ConverterChain, FromStrConverter, ParamConverter};
pub use entity::{entity_param_name, EntityConverter, EntityResolver, ENTITY_MAIN_ID};
pub use parsed::{classify_token, ParsedUri, UriToken};
