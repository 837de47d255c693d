//! The resource envelope: `Type`, `Properties` and the side-channel
//! attributes that wrap every resource's own fields.
//!
//! ```json
//! {"Type": "AWS::ECS::Service", "Properties": {...}, "DependsOn": [...],
//!  "Metadata": {...}, "Condition": "...", "DeletionPolicy": "...",
//!  "UpdateReplacePolicy": "..."}
//! ```
//!
//! Decoding is strict: any other top-level key is an `UnknownField`.
//! Encoding always writes `Type` and `Properties` and omits empty attributes.

use serde_json::{Map, Value as Json};

use crate::error::{json_kind, Error, Result};
use crate::path::FieldPath;
use crate::policies::{DeletionPolicy, UpdateReplacePolicy};
use crate::properties::PropertyReader;
use crate::registry::Registry;
use crate::resource::{GenericResource, Resource, ResourceAttributes};

pub const TYPE: &str = "Type";
pub const PROPERTIES: &str = "Properties";
pub const DEPENDS_ON: &str = "DependsOn";
pub const METADATA: &str = "Metadata";
pub const CONDITION: &str = "Condition";
pub const DELETION_POLICY: &str = "DeletionPolicy";
pub const UPDATE_REPLACE_POLICY: &str = "UpdateReplacePolicy";

pub const ENVELOPE_FIELDS: [&str; 7] = [
    TYPE,
    PROPERTIES,
    DEPENDS_ON,
    METADATA,
    CONDITION,
    DELETION_POLICY,
    UPDATE_REPLACE_POLICY,
];

/// Decodes one resource object found at `path` (normally
/// `Resources.<LogicalName>`). Kinds missing from `registry` decode as
/// [`GenericResource`].
pub fn decode_resource(json: Json, path: &FieldPath, registry: &Registry) -> Result<Box<dyn Resource>> {
    let mut envelope = match json {
        Json::Object(envelope) => envelope,
        other => {
            return Err(Error::TypeMismatch {
                path: path.clone(),
                expected: "a resource object",
                found: json_kind(&other),
            })
        }
    };

    if let Some(field) = envelope
        .keys()
        .find(|key| !ENVELOPE_FIELDS.contains(&key.as_str()))
    {
        return Err(Error::UnknownField {
            path: path.clone(),
            field: field.clone(),
        });
    }

    let resource_type = match envelope.remove(TYPE) {
        Some(Json::String(resource_type)) => resource_type,
        Some(other) => {
            return Err(Error::TypeMismatch {
                path: path.child(TYPE),
                expected: "a string",
                found: json_kind(&other),
            })
        }
        None => {
            return Err(Error::MissingRequiredProperty {
                path: path.clone(),
                property: TYPE.to_string(),
            })
        }
    };

    let properties_path = path.child(PROPERTIES);
    let properties = match envelope.remove(PROPERTIES) {
        Some(Json::Object(properties)) => properties,
        Some(Json::Null) | None => Map::new(),
        Some(other) => {
            return Err(Error::TypeMismatch {
                path: properties_path,
                expected: "an object",
                found: json_kind(&other),
            })
        }
    };

    let attributes = decode_attributes(envelope, path)?;

    let mut resource: Box<dyn Resource> = match registry.lookup(&resource_type) {
        Some(factory) => {
            tracing::trace!("Decoding {} as {}", path, resource_type);
            let mut reader = PropertyReader::new(properties_path, properties);
            let resource = factory(&mut reader)?;
            reader.finish()?;
            resource
        }
        None => {
            tracing::debug!(
                "No schema registered for {}, keeping {} as a generic resource",
                resource_type,
                path
            );
            Box::new(GenericResource::with_properties(resource_type, properties))
        }
    };
    *resource.attributes_mut() = attributes;
    Ok(resource)
}

/// Encodes a resource into its envelope object.
pub fn encode_resource(resource: &dyn Resource) -> Json {
    let attributes = resource.attributes();
    let mut envelope = Map::new();
    envelope.insert(TYPE.to_string(), Json::String(resource.resource_type().to_string()));
    envelope.insert(PROPERTIES.to_string(), Json::Object(resource.properties()));
    if !attributes.depends_on.is_empty() {
        envelope.insert(
            DEPENDS_ON.to_string(),
            Json::Array(
                attributes
                    .depends_on
                    .iter()
                    .cloned()
                    .map(Json::String)
                    .collect(),
            ),
        );
    }
    if !attributes.metadata.is_empty() {
        envelope.insert(METADATA.to_string(), Json::Object(attributes.metadata.clone()));
    }
    if !attributes.condition.is_empty() {
        envelope.insert(CONDITION.to_string(), Json::String(attributes.condition.clone()));
    }
    if let Some(policy) = attributes.deletion_policy {
        envelope.insert(DELETION_POLICY.to_string(), Json::String(policy.to_string()));
    }
    if let Some(policy) = attributes.update_replace_policy {
        envelope.insert(
            UPDATE_REPLACE_POLICY.to_string(),
            Json::String(policy.to_string()),
        );
    }
    Json::Object(envelope)
}

fn decode_attributes(mut envelope: Map<String, Json>, path: &FieldPath) -> Result<ResourceAttributes> {
    let mut attributes = ResourceAttributes::default();

    if let Some(depends_on) = envelope.remove(DEPENDS_ON) {
        attributes.depends_on = decode_depends_on(depends_on, &path.child(DEPENDS_ON))?;
    }

    match envelope.remove(METADATA) {
        Some(Json::Object(metadata)) => attributes.metadata = metadata,
        Some(Json::Null) | None => {}
        Some(other) => {
            return Err(Error::TypeMismatch {
                path: path.child(METADATA),
                expected: "an object",
                found: json_kind(&other),
            })
        }
    }

    if let Some(condition) = take_string(&mut envelope, CONDITION, path)? {
        attributes.condition = condition;
    }

    if let Some(policy) = take_string(&mut envelope, DELETION_POLICY, path)? {
        attributes.deletion_policy =
            DeletionPolicy::parse_at(&policy, &path.child(DELETION_POLICY))?;
    }

    if let Some(policy) = take_string(&mut envelope, UPDATE_REPLACE_POLICY, path)? {
        attributes.update_replace_policy =
            UpdateReplacePolicy::parse_at(&policy, &path.child(UPDATE_REPLACE_POLICY))?;
    }

    Ok(attributes)
}

/// `DependsOn` may be a single logical name or a list of them.
fn decode_depends_on(json: Json, path: &FieldPath) -> Result<Vec<String>> {
    match json {
        Json::String(name) => Ok(vec![name]),
        Json::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::String(name) => Ok(name),
                other => Err(Error::TypeMismatch {
                    path: path.index(i),
                    expected: "a logical name",
                    found: json_kind(&other),
                }),
            })
            .collect(),
        Json::Null => Ok(Vec::new()),
        other => Err(Error::TypeMismatch {
            path: path.clone(),
            expected: "a logical name or a list of logical names",
            found: json_kind(&other),
        }),
    }
}

fn take_string(envelope: &mut Map<String, Json>, key: &str, path: &FieldPath) -> Result<Option<String>> {
    match envelope.remove(key) {
        Some(Json::String(s)) => Ok(Some(s)),
        Some(Json::Null) | None => Ok(None),
        Some(other) => Err(Error::TypeMismatch {
            path: path.child(key),
            expected: "a string",
            found: json_kind(&other),
        }),
    }
}
