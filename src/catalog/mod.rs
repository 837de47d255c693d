//! Built-in resource schemas.
//!
//! Each row is declarative data written with [`resource_type!`](crate::resource_type)
//! and [`property_type!`](crate::property_type); [`register_all`] wires them
//! into a [`Registry`].

pub mod codedeploy;
pub mod cognito;
pub mod ecs;
pub mod glue;
pub mod iam;
mod tag;

pub use tag::Tag;

use crate::registry::Registry;

/// Registers every built-in kind.
pub fn register_all(registry: &mut Registry) {
    registry.register_kind::<codedeploy::Application>();
    registry.register_kind::<codedeploy::DeploymentGroup>();
    registry.register_kind::<cognito::UserPoolRiskConfigurationAttachment>();
    registry.register_kind::<ecs::Cluster>();
    registry.register_kind::<ecs::Service>();
    registry.register_kind::<glue::MLTransform>();
    registry.register_kind::<iam::Policy>();
    registry.register_kind::<iam::Role>();
}

/// Decodes `raw` as a resource envelope, checks that it encodes back to the
/// same JSON and that decoding that encoding gives an equal resource.
#[cfg(test)]
pub(crate) fn assert_round_trip<T: crate::ResourceKind>(raw: serde_json::Value) -> T {
    use crate::envelope::{decode_resource, encode_resource};

    let registry = Registry::default();
    let path = crate::FieldPath::new("Resources").child("Fixture");
    let resource = decode_resource(raw.clone(), &path, &registry).unwrap();
    let encoded = encode_resource(resource.as_ref());
    assert_eq!(encoded, raw);
    let again = decode_resource(encoded, &path, &registry).unwrap();
    assert!(*again == *resource);
    resource.downcast_ref::<T>().unwrap().clone()
}
