//! Mapping from type discriminators to resource decoders.
//!
//! A registry is built once at start-up and handed to every decode call. New
//! kinds are added with [`Registry::register`] or [`Registry::register_kind`]
//! without touching the decoder itself.

use std::collections::HashMap;
use std::fmt;

use crate::catalog;
use crate::error::Result;
use crate::properties::PropertyReader;
use crate::resource::{Resource, ResourceKind};

/// Builds a typed resource from its `Properties` reader.
pub type ResourceFactory = fn(&mut PropertyReader) -> Result<Box<dyn Resource>>;

#[derive(Clone)]
pub struct Registry {
    factories: HashMap<String, ResourceFactory>,
}

impl Registry {
    /// A registry with no kinds; every resource decodes as generic.
    pub fn empty() -> Self {
        Registry {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` for `type_name`, replacing any earlier entry.
    pub fn register(&mut self, type_name: impl Into<String>, factory: ResourceFactory) {
        let type_name = type_name.into();
        if self.factories.insert(type_name.clone(), factory).is_some() {
            tracing::debug!("Replaced resource factory for {}", type_name);
        }
    }

    pub fn register_kind<T: ResourceKind>(&mut self) {
        self.register(T::TYPE, read_kind::<T>);
    }

    pub fn lookup(&self, type_name: &str) -> Option<ResourceFactory> {
        self.factories.get(type_name).copied()
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered discriminators, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

/// The built-in catalog.
impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        catalog::register_all(&mut registry);
        registry
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.types())
            .finish()
    }
}

fn read_kind<T: ResourceKind>(reader: &mut PropertyReader) -> Result<Box<dyn Resource>> {
    let resource = T::read_properties(reader)?;
    Ok(Box::new(resource))
}
