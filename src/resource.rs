//! Polymorphic resources.
//!
//! Every resource kind implements [`Resource`]: a type discriminator, the five
//! envelope attributes shared by all kinds, and its own encoded properties.
//! Typed kinds additionally implement [`ResourceKind`], which is what the
//! [`crate::Registry`] uses to decode them. Kinds that nobody registered decode
//! to [`GenericResource`].

use serde_json::{Map, Value as Json};
use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::policies::{DeletionPolicy, UpdateReplacePolicy};
use crate::properties::{PropertyReader, PropertyWriter};

/// Envelope attributes that sit next to `Type` and `Properties`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceAttributes {
    pub deletion_policy: Option<DeletionPolicy>,
    pub update_replace_policy: Option<UpdateReplacePolicy>,
    /// Logical names created before this resource, in template order.
    pub depends_on: Vec<String>,
    /// Opaque metadata, preserved verbatim. Empty means absent.
    pub metadata: Map<String, Json>,
    /// Logical name of the condition gating creation. Empty means unconditional.
    pub condition: String,
}

impl ResourceAttributes {
    pub fn is_empty(&self) -> bool {
        *self == ResourceAttributes::default()
    }
}

/// Capabilities shared by every resource variant.
pub trait Resource: fmt::Debug + Send + Sync + 'static {
    /// Type discriminator, e.g. `AWS::ECS::Service`.
    fn resource_type(&self) -> &str;

    fn attributes(&self) -> &ResourceAttributes;

    fn attributes_mut(&mut self) -> &mut ResourceAttributes;

    /// The resource's own fields in their wire form (the `Properties` object).
    fn properties(&self) -> Map<String, Json>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn clone_resource(&self) -> Box<dyn Resource>;

    /// Structural equality across trait objects of the same concrete kind.
    fn eq_resource(&self, other: &dyn Resource) -> bool;
}

impl dyn Resource {
    pub fn is<T: Resource>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Resource>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Resource>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Resource> {
    fn clone(&self) -> Self {
        self.clone_resource()
    }
}

impl PartialEq for dyn Resource {
    fn eq(&self, other: &Self) -> bool {
        self.eq_resource(other)
    }
}

/// A statically known resource schema.
pub trait ResourceKind: Resource + Clone + PartialEq + Sized {
    /// Type discriminator used for registration.
    const TYPE: &'static str;

    /// Lifts the fields out of a `Properties` object. Fields left unread are
    /// reported as unknown by the caller.
    fn read_properties(reader: &mut PropertyReader) -> Result<Self>;

    fn write_properties(&self, writer: &mut PropertyWriter);
}

/// Fallback for resource kinds with no registered schema. Properties are kept
/// as an opaque JSON object and written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericResource {
    pub resource_type: String,
    pub properties: Map<String, Json>,
    pub attributes: ResourceAttributes,
}

impl GenericResource {
    pub fn new(resource_type: impl Into<String>) -> Self {
        GenericResource {
            resource_type: resource_type.into(),
            properties: Map::new(),
            attributes: ResourceAttributes::default(),
        }
    }

    pub fn with_properties(resource_type: impl Into<String>, properties: Map<String, Json>) -> Self {
        GenericResource {
            resource_type: resource_type.into(),
            properties,
            attributes: ResourceAttributes::default(),
        }
    }
}

impl Resource for GenericResource {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn attributes(&self) -> &ResourceAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ResourceAttributes {
        &mut self.attributes
    }

    fn properties(&self) -> Map<String, Json> {
        self.properties.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_resource(&self) -> Box<dyn Resource> {
        Box::new(self.clone())
    }

    fn eq_resource(&self, other: &dyn Resource) -> bool {
        other
            .as_any()
            .downcast_ref::<GenericResource>()
            .is_some_and(|other| self == other)
    }
}
