//! Codec for a resource's own properties.
//!
//! Schemas are declared with [`resource_type!`](crate::resource_type) and
//! [`property_type!`](crate::property_type). Each field is marked `required`
//! or `optional`; the marker picks both the field type (`T` or `Option<T>`)
//! and the [`PropertyReader`]/[`PropertyWriter`] method used for it.
//!
//! ```
//! use cfn_template::{property_type, resource_type, Value};
//!
//! property_type! {
//!     #[derive(Default)]
//!     pub struct WidgetSize("Custom::Widget.Size") {
//!         optional width: Value = "Width",
//!     }
//! }
//!
//! resource_type! {
//!     pub struct Widget("Custom::Widget") {
//!         required name: Value = "Name",
//!         optional size: WidgetSize = "Size",
//!     }
//! }
//! ```

pub use serde_json::Value as Json;

use crate::error::{json_kind, Error, Result};
use crate::path::FieldPath;
use crate::value::Value;

pub type JsonMap = serde_json::Map<String, Json>;

/// A type that can sit in a property slot.
pub trait PropertyValue: Sized {
    fn decode(json: Json, path: &FieldPath) -> Result<Self>;

    fn encode(&self) -> Json;
}

impl PropertyValue for Value {
    fn decode(json: Json, path: &FieldPath) -> Result<Self> {
        Value::from_json(json, path)
    }

    fn encode(&self) -> Json {
        self.to_json()
    }
}

/// Schema-less JSON, e.g. IAM policy documents. Kept verbatim.
impl PropertyValue for Json {
    fn decode(json: Json, _path: &FieldPath) -> Result<Self> {
        Ok(json)
    }

    fn encode(&self) -> Json {
        self.clone()
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn decode(json: Json, path: &FieldPath) -> Result<Self> {
        match json {
            Json::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::decode(item, &path.index(i)))
                .collect(),
            other => Err(Error::TypeMismatch {
                path: path.clone(),
                expected: "a list",
                found: json_kind(&other),
            }),
        }
    }

    fn encode(&self) -> Json {
        Json::Array(self.iter().map(PropertyValue::encode).collect())
    }
}

/// Consumes the fields of one JSON object. Anything not taken by the time
/// [`PropertyReader::finish`] runs is an unknown field.
#[derive(Debug)]
pub struct PropertyReader {
    path: FieldPath,
    fields: JsonMap,
}

impl PropertyReader {
    pub fn new(path: FieldPath, fields: JsonMap) -> Self {
        PropertyReader { path, fields }
    }

    /// Reader over a JSON value that must be an object. Intrinsic functions
    /// are only understood in place of values, so a call standing in for a
    /// whole structure is rejected.
    pub fn from_json(json: Json, path: &FieldPath) -> Result<Self> {
        match json {
            Json::Object(fields) => {
                if let Some(function) = sole_function_key(&fields) {
                    return Err(Error::MalformedExpression {
                        path: path.clone(),
                        reason: format!("{} cannot stand in for a property structure", function),
                    });
                }
                Ok(PropertyReader::new(path.clone(), fields))
            }
            other => Err(Error::TypeMismatch {
                path: path.clone(),
                expected: "an object",
                found: json_kind(&other),
            }),
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn required<T: PropertyValue>(&mut self, key: &str) -> Result<T> {
        match self.take(key) {
            Some(json) => T::decode(json, &self.path.child(key)),
            None => Err(Error::MissingRequiredProperty {
                path: self.path.clone(),
                property: key.to_string(),
            }),
        }
    }

    pub fn optional<T: PropertyValue>(&mut self, key: &str) -> Result<Option<T>> {
        self.take(key)
            .map(|json| T::decode(json, &self.path.child(key)))
            .transpose()
    }

    /// Fails with `UnknownField` if any field was left unread.
    pub fn finish(self) -> Result<()> {
        match self.fields.keys().next() {
            Some(field) => Err(Error::UnknownField {
                path: self.path,
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Explicit nulls count as absent.
    fn take(&mut self, key: &str) -> Option<Json> {
        match self.fields.remove(key) {
            Some(Json::Null) | None => None,
            some => some,
        }
    }
}

/// Builds a `Properties` object; optional fields at `None` are omitted.
#[derive(Debug, Default)]
pub struct PropertyWriter {
    fields: JsonMap,
}

impl PropertyWriter {
    pub fn new() -> Self {
        PropertyWriter::default()
    }

    pub fn required<T: PropertyValue>(&mut self, key: &str, value: &T) {
        self.fields.insert(key.to_string(), value.encode());
    }

    pub fn optional<T: PropertyValue>(&mut self, key: &str, value: &Option<T>) {
        if let Some(value) = value {
            self.required(key, value);
        }
    }

    pub fn into_map(self) -> JsonMap {
        self.fields
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __property_field {
    (required $ty:ty) => { $ty };
    (optional $ty:ty) => { ::std::option::Option<$ty> };
}

/// Declares a typed resource kind with its `Properties` schema.
#[macro_export]
macro_rules! resource_type {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($type_name:literal) {
            $( $(#[$fmeta:meta])* $req:ident $field:ident : $ty:ty = $wire:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $crate::__property_field!($req $ty), )*
            pub attributes: $crate::ResourceAttributes,
        }

        impl $crate::ResourceKind for $name {
            const TYPE: &'static str = $type_name;

            #[allow(unused_variables)]
            fn read_properties(
                reader: &mut $crate::properties::PropertyReader,
            ) -> $crate::Result<Self> {
                Ok($name {
                    $( $field: reader.$req($wire)?, )*
                    attributes: ::std::default::Default::default(),
                })
            }

            #[allow(unused_variables)]
            fn write_properties(&self, writer: &mut $crate::properties::PropertyWriter) {
                $( writer.$req($wire, &self.$field); )*
            }
        }

        impl $crate::Resource for $name {
            fn resource_type(&self) -> &str {
                <Self as $crate::ResourceKind>::TYPE
            }

            fn attributes(&self) -> &$crate::ResourceAttributes {
                &self.attributes
            }

            fn attributes_mut(&mut self) -> &mut $crate::ResourceAttributes {
                &mut self.attributes
            }

            fn properties(&self) -> $crate::properties::JsonMap {
                let mut writer = $crate::properties::PropertyWriter::new();
                $crate::ResourceKind::write_properties(self, &mut writer);
                writer.into_map()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn clone_resource(&self) -> ::std::boxed::Box<dyn $crate::Resource> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn eq_resource(&self, other: &dyn $crate::Resource) -> bool {
                other
                    .as_any()
                    .downcast_ref::<$name>()
                    .map_or(false, |other| self == other)
            }
        }
    };
}

fn sole_function_key(fields: &JsonMap) -> Option<&str> {
    if fields.len() != 1 {
        return None;
    }
    fields
        .keys()
        .next()
        .map(String::as_str)
        .filter(|key| key.starts_with("Fn::") || *key == "Ref")
}

/// Declares a nested property type (`AWS::Service::Resource.Name`).
#[macro_export]
macro_rules! property_type {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($type_name:literal) {
            $( $(#[$fmeta:meta])* $req:ident $field:ident : $ty:ty = $wire:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $crate::__property_field!($req $ty), )*
        }

        impl $name {
            pub const TYPE: &'static str = $type_name;
        }

        impl $crate::properties::PropertyValue for $name {
            fn decode(
                json: $crate::properties::Json,
                path: &$crate::FieldPath,
            ) -> $crate::Result<Self> {
                let mut reader = $crate::properties::PropertyReader::from_json(json, path)?;
                let value = $name {
                    $( $field: reader.$req($wire)?, )*
                };
                reader.finish()?;
                Ok(value)
            }

            #[allow(unused_mut)]
            fn encode(&self) -> $crate::properties::Json {
                let mut writer = $crate::properties::PropertyWriter::new();
                $( writer.$req($wire, &self.$field); )*
                $crate::properties::Json::Object(writer.into_map())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Resource, ResourceKind};
    use serde_json::json;

    crate::property_type! {
        pub struct GizmoPart("Test::Gizmo.Part") {
            required part_name: Value = "PartName",
            optional count: Value = "Count",
        }
    }

    crate::resource_type! {
        /// A made-up kind for exercising the macros.
        pub struct Gizmo("Test::Gizmo") {
            required name: Value = "Name",
            optional parts: Vec<GizmoPart> = "Parts",
            optional main_part: GizmoPart = "MainPart",
            optional document: Json = "Document",
        }
    }

    fn read(json: Json) -> Result<Gizmo> {
        let mut reader = PropertyReader::from_json(json, &FieldPath::new("Properties"))?;
        let gizmo = Gizmo::read_properties(&mut reader)?;
        reader.finish()?;
        Ok(gizmo)
    }

    #[test]
    fn test_read_all_fields() {
        let gizmo = read(json!({
            "Name": { "Ref": "GizmoName" },
            "Parts": [{ "PartName": "cog", "Count": 3 }],
            "MainPart": { "PartName": "spring" },
            "Document": { "Version": "2012-10-17", "Statement": [] }
        }))
        .unwrap();

        assert_eq!(gizmo.name, Value::reference("GizmoName"));
        assert_eq!(gizmo.parts.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            gizmo.main_part,
            Some(GizmoPart {
                part_name: "spring".into(),
                count: None,
            })
        );
        assert_eq!(Gizmo::TYPE, "Test::Gizmo");
        assert_eq!(GizmoPart::TYPE, "Test::Gizmo.Part");
        assert_eq!(gizmo.resource_type(), "Test::Gizmo");
    }

    #[test]
    fn test_missing_required() {
        let err = read(json!({ "Parts": [] })).unwrap_err();
        assert_eq!(
            err,
            Error::MissingRequiredProperty {
                path: FieldPath::new("Properties"),
                property: "Name".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_required_in_nested_list() {
        let err = read(json!({ "Name": "g", "Parts": [{ "Count": 1 }] })).unwrap_err();
        match err {
            Error::MissingRequiredProperty { path, property } => {
                assert_eq!(path.as_str(), "Properties.Parts[0]");
                assert_eq!(property, "PartName");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_null_counts_as_absent() {
        let gizmo = read(json!({ "Name": "g", "MainPart": null })).unwrap();
        assert!(gizmo.main_part.is_none());
        assert!(read(json!({ "Name": null })).is_err());
    }

    #[test]
    fn test_unknown_field() {
        let err = read(json!({ "Name": "g", "Colour": "red" })).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownField {
                path: FieldPath::new("Properties"),
                field: "Colour".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_field_in_nested_type() {
        let err = read(json!({ "Name": "g", "MainPart": { "PartName": "x", "Size": 2 } }))
            .unwrap_err();
        match err {
            Error::UnknownField { path, field } => {
                assert_eq!(path.as_str(), "Properties.MainPart");
                assert_eq!(field, "Size");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_function_in_place_of_structure() {
        let err = read(json!({
            "Name": "g",
            "MainPart": { "Fn::If": ["IsProd", { "PartName": "a" }, { "Ref": "AWS::NoValue" }] }
        }))
        .unwrap_err();
        match err {
            Error::MalformedExpression { path, reason } => {
                assert_eq!(path.as_str(), "Properties.MainPart");
                assert!(reason.contains("Fn::If"), "{}", reason);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let err = read(json!({ "Name": "g", "Parts": [{ "Ref": "AWS::NoValue" }] })).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedExpression { ref path, .. } if path.as_str() == "Properties.Parts[0]"
        ));
    }

    #[test]
    fn test_list_type_mismatch() {
        let err = read(json!({ "Name": "g", "Parts": { "PartName": "x" } })).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { expected: "a list", found: "object", .. }
        ));
    }

    #[test]
    fn test_write_omits_unset_optionals() {
        let gizmo = Gizmo {
            name: "g".into(),
            parts: Some(vec![GizmoPart {
                part_name: "cog".into(),
                count: Some(2.into()),
            }]),
            main_part: None,
            document: None,
            attributes: Default::default(),
        };
        assert_eq!(
            Json::Object(gizmo.properties()),
            json!({ "Name": "g", "Parts": [{ "PartName": "cog", "Count": 2 }] })
        );
    }

    #[test]
    fn test_round_trip_through_properties() {
        let raw = json!({
            "Name": { "Fn::Sub": "${AWS::StackName}-gizmo" },
            "MainPart": { "PartName": "spring", "Count": { "Ref": "SpringCount" } },
            "Document": { "Anything": [1, null, { "Goes": true }] }
        });
        let gizmo = read(raw.clone()).unwrap();
        assert_eq!(Json::Object(gizmo.properties()), raw);
        assert_eq!(read(raw).unwrap(), gizmo);
    }
}
