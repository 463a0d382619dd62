//! Entity lookup hook
//!
//! Pages can take domain objects as parameters: the fragment carries the
//! entity's key and an [`EntityResolver`] turns it back into the entity.
//! Persistence is the resolver's business; the navigator only calls it.

use std::sync::Arc;

use crate::param::{CustomValue, TypeKey};

use super::convert::{Conversion, ParamConverter};

/// Conventional name of the parameter holding a page's main entity key
pub const ENTITY_MAIN_ID: &str = "id";

/// Resolves entity keys found in fragments, and back
pub trait EntityResolver: Send + Sync {
    type Entity: Send + Sync + 'static;

    /// Entity stored under `key`, or `None` if there is none
    fn resolve(&self, key: &str) -> Option<Self::Entity>;

    /// Key to put in a fragment for `entity`
    fn key_of(&self, entity: &Self::Entity) -> String;
}

impl<R: EntityResolver + ?Sized> EntityResolver for Arc<R> {
    type Entity = R::Entity;

    fn resolve(&self, key: &str) -> Option<Self::Entity> {
        (**self).resolve(key)
    }

    fn key_of(&self, entity: &Self::Entity) -> String {
        (**self).key_of(entity)
    }
}

/// Default parameter name for an entity type: its simple type name
///
/// ```
/// use rhtmx_navigator::uri::entity_param_name;
///
/// struct Auction;
/// assert_eq!(entity_param_name::<Auction>(), "Auction");
/// ```
pub fn entity_param_name<E: 'static>() -> &'static str {
    TypeKey::of::<E>().simple_name()
}

/// Adapts an [`EntityResolver`] into a converter for `R::Entity`
///
/// An unknown key is rejected, which surfaces as a conversion error on the
/// parameter.
pub struct EntityConverter<R> {
    resolver: R,
}

impl<R: EntityResolver> EntityConverter<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

impl<R: EntityResolver> ParamConverter for EntityConverter<R> {
    fn try_convert(&self, target: &TypeKey, raw: &str, _fragment: &str) -> Conversion {
        if !target.is::<R::Entity>() {
            return Conversion::NotHandled;
        }
        match self.resolver.resolve(raw) {
            Some(entity) => Conversion::Converted(CustomValue::decoded(entity, raw)),
            None => Conversion::Rejected(format!("no {} found", target.simple_name())),
        }
    }

    fn to_fragment(&self, value: &CustomValue) -> Option<String> {
        value
            .downcast_ref::<R::Entity>()
            .map(|entity| self.resolver.key_of(entity))
    }
}
