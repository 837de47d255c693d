//! The template container.
//!
//! `Resources` is decoded through the [`Registry`] and the envelope codec.
//! `Conditions` goes through the value decoder, and `Parameters`,
//! `Mappings` and `Outputs` are read with serde. `Transform`, `Metadata`,
//! `Rules` and `Hooks` are kept as opaque JSON. Encoding writes sections in the
//! conventional order and sorts resources by logical name, so identical
//! templates always produce identical bytes.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::{HashMap, HashSet};

use crate::envelope::{decode_resource, encode_resource};
use crate::error::{json_kind, Error, Result};
use crate::path::FieldPath;
use crate::references;
use crate::registry::Registry;
use crate::resource::{Resource, ResourceKind};
use crate::value::Value;
use crate::yaml;

pub const DEFAULT_FORMAT_VERSION: &str = "2010-09-09";

const FORMAT_VERSION: &str = "AWSTemplateFormatVersion";
const DESCRIPTION: &str = "Description";
const TRANSFORM: &str = "Transform";
const METADATA: &str = "Metadata";
const PARAMETERS: &str = "Parameters";
const RULES: &str = "Rules";
const MAPPINGS: &str = "Mappings";
const CONDITIONS: &str = "Conditions";
const RESOURCES: &str = "Resources";
const OUTPUTS: &str = "Outputs";
const HOOKS: &str = "Hooks";

/// An input parameter. Keys outside the documented set are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<Json>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_echo: Option<Json>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Json>,
}

impl Parameter {
    pub fn new(r#type: impl Into<String>) -> Self {
        Parameter {
            r#type: r#type.into(),
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        map.insert("Type".to_string(), Json::String(self.r#type.clone()));
        insert_some(&mut map, "Description", self.description.clone().map(Json::String));
        insert_some(&mut map, "Default", self.default.clone());
        insert_some(&mut map, "AllowedPattern", self.allowed_pattern.clone().map(Json::String));
        insert_some(&mut map, "AllowedValues", self.allowed_values.clone().map(Json::Array));
        insert_some(
            &mut map,
            "ConstraintDescription",
            self.constraint_description.clone().map(Json::String),
        );
        insert_some(&mut map, "MaxLength", self.max_length.clone());
        insert_some(&mut map, "MaxValue", self.max_value.clone());
        insert_some(&mut map, "MinLength", self.min_length.clone());
        insert_some(&mut map, "MinValue", self.min_value.clone());
        insert_some(&mut map, "NoEcho", self.no_echo.clone());
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        Json::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Output {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Output {
    pub fn new(value: impl Into<Value>) -> Self {
        Output {
            value: value.into(),
            description: None,
            export: None,
            condition: None,
        }
    }

    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        map.insert("Value".to_string(), self.value.to_json());
        insert_some(&mut map, "Description", self.description.clone().map(Json::String));
        if let Some(export) = &self.export {
            let mut name = Map::new();
            name.insert("Name".to_string(), export.name.to_json());
            map.insert("Export".to_string(), Json::Object(name));
        }
        insert_some(&mut map, "Condition", self.condition.clone().map(Json::String));
        Json::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Export {
    pub name: Value,
}

/// One entry of `Mappings`: top-level key → second-level key → value.
pub type Mapping = IndexMap<String, IndexMap<String, Value>>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub format_version: Option<String>,
    pub description: Option<String>,
    /// Macros to run (`AWS::Serverless-2016-10-31`, ...), kept opaque.
    pub transform: Option<Json>,
    /// Template-level metadata, kept opaque. Empty means absent.
    pub metadata: Map<String, Json>,
    pub parameters: IndexMap<String, Parameter>,
    /// Parameter validation rules, kept opaque. Empty means absent.
    pub rules: Map<String, Json>,
    pub mappings: IndexMap<String, Mapping>,
    pub conditions: IndexMap<String, Value>,
    pub outputs: IndexMap<String, Output>,
    /// Stack-level hooks (`AWS::CodeDeploy::BlueGreen`, ...), kept opaque. Empty means absent.
    pub hooks: Map<String, Json>,
    resources: IndexMap<String, Box<dyn Resource>>,
}

impl Template {
    pub fn new() -> Self {
        Template {
            format_version: Some(DEFAULT_FORMAT_VERSION.to_string()),
            ..Default::default()
        }
    }

    /// Decodes JSON bytes.
    pub fn decode(bytes: &[u8], registry: &Registry) -> Result<Template> {
        let json: Json = serde_json::from_slice(bytes)?;
        Template::from_json(json, registry)
    }

    /// Decodes CloudFormation YAML, short-form tags included.
    pub fn from_yaml(source: &str, registry: &Registry) -> Result<Template> {
        Template::from_json(yaml::to_json(source)?, registry)
    }

    pub fn from_json(json: Json, registry: &Registry) -> Result<Template> {
        let root = FieldPath::root();
        let sections = match json {
            Json::Object(sections) => sections,
            other => {
                return Err(Error::TypeMismatch {
                    path: root,
                    expected: "a template object",
                    found: json_kind(&other),
                })
            }
        };

        let mut template = Template::default();
        for (key, section) in sections {
            match key.as_str() {
                FORMAT_VERSION => template.format_version = decode_string(section, &key)?,
                DESCRIPTION => template.description = decode_string(section, &key)?,
                TRANSFORM => template.transform = Some(section).filter(|t| !t.is_null()),
                METADATA => template.metadata = decode_object(section, &FieldPath::new(&key))?,
                PARAMETERS => template.parameters = decode_section(section, &key)?,
                RULES => template.rules = decode_object(section, &FieldPath::new(&key))?,
                HOOKS => template.hooks = decode_object(section, &FieldPath::new(&key))?,
                MAPPINGS => template.mappings = decode_section(section, &key)?,
                OUTPUTS => template.outputs = decode_section(section, &key)?,
                CONDITIONS => {
                    let path = FieldPath::new(&key);
                    for (name, condition) in decode_object(section, &path)? {
                        let condition = Value::from_json(condition, &path.child(&name))?;
                        template.conditions.insert(name, condition);
                    }
                }
                RESOURCES => {
                    let path = FieldPath::new(&key);
                    for (name, resource) in decode_object(section, &path)? {
                        let resource = decode_resource(resource, &path.child(&name), registry)?;
                        template.resources.insert(name, resource);
                    }
                }
                _ => {
                    return Err(Error::UnknownField {
                        path: root,
                        field: key,
                    })
                }
            }
        }

        tracing::debug!(
            "Decoded template with {} resources, {} parameters, {} outputs",
            template.resources.len(),
            template.parameters.len(),
            template.outputs.len()
        );
        Ok(template)
    }

    /// Compact JSON bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_json().to_string().into_bytes()
    }

    pub fn to_string_pretty(&self) -> String {
        format!("{:#}", self.to_json())
    }

    /// Long-form YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yml::to_string(&yaml::from_json(&self.to_json()))?)
    }

    pub fn to_json(&self) -> Json {
        let mut root = Map::new();
        if let Some(version) = &self.format_version {
            root.insert(FORMAT_VERSION.to_string(), Json::String(version.clone()));
        }
        if let Some(description) = &self.description {
            root.insert(DESCRIPTION.to_string(), Json::String(description.clone()));
        }
        if let Some(transform) = &self.transform {
            root.insert(TRANSFORM.to_string(), transform.clone());
        }
        if !self.metadata.is_empty() {
            root.insert(METADATA.to_string(), Json::Object(self.metadata.clone()));
        }
        if !self.parameters.is_empty() {
            let parameters = self
                .parameters
                .iter()
                .map(|(name, parameter)| (name.clone(), parameter.to_json()))
                .collect();
            root.insert(PARAMETERS.to_string(), Json::Object(parameters));
        }
        if !self.rules.is_empty() {
            root.insert(RULES.to_string(), Json::Object(self.rules.clone()));
        }
        if !self.mappings.is_empty() {
            let mappings = self
                .mappings
                .iter()
                .map(|(name, mapping)| (name.clone(), mapping_to_json(mapping)))
                .collect();
            root.insert(MAPPINGS.to_string(), Json::Object(mappings));
        }
        if !self.conditions.is_empty() {
            let conditions = self
                .conditions
                .iter()
                .map(|(name, condition)| (name.clone(), condition.to_json()))
                .collect();
            root.insert(CONDITIONS.to_string(), Json::Object(conditions));
        }

        let mut resources = Map::new();
        for name in self.resource_names() {
            if let Some(resource) = self.resources.get(name) {
                resources.insert(name.to_string(), encode_resource(resource.as_ref()));
            }
        }
        root.insert(RESOURCES.to_string(), Json::Object(resources));

        if !self.hooks.is_empty() {
            root.insert(HOOKS.to_string(), Json::Object(self.hooks.clone()));
        }
        if !self.outputs.is_empty() {
            let outputs = self
                .outputs
                .iter()
                .map(|(name, output)| (name.clone(), output.to_json()))
                .collect();
            root.insert(OUTPUTS.to_string(), Json::Object(outputs));
        }
        Json::Object(root)
    }

    pub fn get_resource(&self, logical_name: &str) -> Option<&dyn Resource> {
        self.resources.get(logical_name).map(|resource| resource.as_ref())
    }

    pub fn get_resource_mut(&mut self, logical_name: &str) -> Option<&mut dyn Resource> {
        self.resources
            .get_mut(logical_name)
            .map(|resource| resource.as_mut())
    }

    /// The resource under `logical_name` if it is of kind `T`.
    pub fn resource_as<T: ResourceKind>(&self, logical_name: &str) -> Option<&T> {
        self.get_resource(logical_name)?.downcast_ref::<T>()
    }

    pub fn resource_as_mut<T: ResourceKind>(&mut self, logical_name: &str) -> Option<&mut T> {
        self.get_resource_mut(logical_name)?.downcast_mut::<T>()
    }

    /// All resources of kind `T`, sorted by logical name.
    pub fn resources_of<T: ResourceKind>(&self) -> Vec<(&str, &T)> {
        self.resource_names()
            .into_iter()
            .filter_map(|name| Some((name, self.resource_as::<T>(name)?)))
            .collect()
    }

    /// Logical names of all resources, sorted.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &dyn Resource)> {
        self.resources
            .iter()
            .map(|(name, resource)| (name.as_str(), resource.as_ref()))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn contains_resource(&self, logical_name: &str) -> bool {
        self.resources.contains_key(logical_name)
    }

    /// Adds a resource; fails with `DuplicateLogicalName` if the name is taken.
    pub fn add_resource<R: Resource>(&mut self, logical_name: impl Into<String>, resource: R) -> Result<()> {
        self.insert_resource(logical_name, Box::new(resource), false)
            .map(|_| ())
    }

    /// Adds or overwrites a resource, returning the previous one.
    pub fn replace_resource<R: Resource>(
        &mut self,
        logical_name: impl Into<String>,
        resource: R,
    ) -> Option<Box<dyn Resource>> {
        self.resources.insert(logical_name.into(), Box::new(resource))
    }

    /// Inserts an already boxed resource. Without `overwrite`, an existing
    /// name fails with `DuplicateLogicalName` and the template is unchanged.
    pub fn insert_resource(
        &mut self,
        logical_name: impl Into<String>,
        resource: Box<dyn Resource>,
        overwrite: bool,
    ) -> Result<Option<Box<dyn Resource>>> {
        let logical_name = logical_name.into();
        if !overwrite && self.resources.contains_key(&logical_name) {
            return Err(Error::DuplicateLogicalName(logical_name));
        }
        Ok(self.resources.insert(logical_name, resource))
    }

    /// Removes a resource. Removing an absent name is a no-op.
    pub fn remove_resource(&mut self, logical_name: &str) -> Option<Box<dyn Resource>> {
        self.resources.shift_remove(logical_name)
    }

    /// Logical names referenced by each resource and by `Outputs`.
    pub fn references(&self) -> HashMap<String, HashSet<String>> {
        references::find_all_references(&self.to_json())
    }

    /// `(referrer, name)` pairs where `name` is neither a resource nor a
    /// parameter. Sorted.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut dangling: Vec<(String, String)> = self
            .references()
            .into_iter()
            .flat_map(|(referrer, names)| {
                names
                    .into_iter()
                    .filter(|name| {
                        !self.resources.contains_key(name) && !self.parameters.contains_key(name)
                    })
                    .map(move |name| (referrer.clone(), name))
            })
            .collect();
        dangling.sort();
        dangling
    }

    /// Returns a copy with resources renamed according to `id_mapping`, every
    /// reference to them rewritten.
    pub fn rename_resources(
        &self,
        registry: &Registry,
        id_mapping: &HashMap<String, String>,
    ) -> Result<Template> {
        let mut new_ids = HashSet::new();
        for (old_id, new_id) in id_mapping {
            if !self.resources.contains_key(old_id) {
                return Err(Error::MissingLogicalName(old_id.clone()));
            }
            let taken = self.resources.contains_key(new_id) && !id_mapping.contains_key(new_id);
            if taken || !new_ids.insert(new_id) {
                return Err(Error::DuplicateLogicalName(new_id.clone()));
            }
        }

        let mut json = references::update_template_references(self.to_json(), id_mapping);
        if let Some(Json::Object(resources)) = json.get_mut(RESOURCES) {
            let renamed = std::mem::take(resources)
                .into_iter()
                .map(|(name, resource)| match id_mapping.get(&name) {
                    Some(new_name) => (new_name.clone(), resource),
                    None => (name, resource),
                })
                .collect();
            *resources = renamed;
        }
        Template::from_json(json, registry)
    }
}

fn decode_string(json: Json, key: &str) -> Result<Option<String>> {
    match json {
        Json::String(s) => Ok(Some(s)),
        Json::Null => Ok(None),
        other => Err(Error::TypeMismatch {
            path: FieldPath::new(key),
            expected: "a string",
            found: json_kind(&other),
        }),
    }
}

fn decode_object(json: Json, path: &FieldPath) -> Result<Map<String, Json>> {
    match json {
        Json::Object(map) => Ok(map),
        Json::Null => Ok(Map::new()),
        other => Err(Error::TypeMismatch {
            path: path.clone(),
            expected: "an object",
            found: json_kind(&other),
        }),
    }
}

/// Decodes a serde-typed section, reporting the JSON path of any failure.
fn decode_section<T: DeserializeOwned + Default>(json: Json, section: &str) -> Result<T> {
    if json.is_null() {
        return Ok(T::default());
    }
    serde_path_to_error::deserialize(json).map_err(|err| {
        let inner = err.path().to_string();
        let path = if inner == "." {
            FieldPath::new(section)
        } else {
            FieldPath::new(section).child(&inner)
        };
        Error::InvalidSection {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

fn mapping_to_json(mapping: &Mapping) -> Json {
    let entries = mapping
        .iter()
        .map(|(top, second)| {
            let values = second
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();
            (top.clone(), Json::Object(values))
        })
        .collect();
    Json::Object(entries)
}

fn insert_some(map: &mut Map<String, Json>, key: &str, value: Option<Json>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ecs::{Cluster, Service};
    use crate::catalog::iam::Role;
    use crate::policies::DeletionPolicy;
    use crate::resource::GenericResource;
    use serde_json::json;

    fn registry() -> Registry {
        Registry::default()
    }

    fn sample() -> Json {
        json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": "web service",
            "Parameters": {
                "Env": { "Type": "String", "AllowedValues": ["dev", "prod"], "Default": "dev" }
            },
            "Mappings": {
                "RegionMap": { "eu-west-1": { "Ami": "ami-123" } }
            },
            "Conditions": {
                "IsProd": { "Fn::Equals": [{ "Ref": "Env" }, "prod"] }
            },
            "Resources": {
                "Cluster": { "Type": "AWS::ECS::Cluster", "Properties": { "ClusterName": "main" } },
                "Service": {
                    "Type": "AWS::ECS::Service",
                    "Properties": { "Cluster": { "Ref": "Cluster" }, "DesiredCount": 2 },
                    "DependsOn": "Cluster"
                },
                "Logs": {
                    "Type": "AWS::Logs::LogGroup",
                    "Properties": { "RetentionInDays": 7 },
                    "DeletionPolicy": "Retain"
                }
            },
            "Outputs": {
                "ServiceName": {
                    "Value": { "Fn::GetAtt": ["Service", "Name"] },
                    "Export": { "Name": { "Fn::Sub": "${AWS::StackName}-service" } }
                }
            }
        })
    }

    fn decode(json: Json) -> Result<Template> {
        Template::decode(json.to_string().as_bytes(), &registry())
    }

    #[test]
    fn test_decode_all_sections() {
        let template = decode(sample()).unwrap();
        assert_eq!(template.format_version.as_deref(), Some("2010-09-09"));
        assert_eq!(template.description.as_deref(), Some("web service"));
        assert_eq!(template.parameters["Env"].r#type, "String");
        assert_eq!(
            template.mappings["RegionMap"]["eu-west-1"]["Ami"],
            Value::from("ami-123")
        );
        assert!(template.conditions["IsProd"].is_function());
        assert_eq!(template.resource_count(), 3);
        assert!(template.resource_as::<Service>("Service").is_some());
        assert!(template.resource_as::<Cluster>("Service").is_none());
        assert_eq!(
            template.outputs["ServiceName"].value,
            Value::get_att("Service", "Name")
        );
    }

    #[test]
    fn test_round_trip_semantics() {
        let template = decode(sample()).unwrap();
        let mut expected = sample();
        expected["Resources"]["Service"]["DependsOn"] = json!(["Cluster"]);
        assert_eq!(template.to_json(), expected);

        let again = Template::decode(&template.encode(), &registry()).unwrap();
        assert_eq!(again, template);
    }

    #[test]
    fn test_encode_sorts_resources() {
        let template = decode(sample()).unwrap();
        let encoded = String::from_utf8(template.encode()).unwrap();
        let cluster = encoded.find("\"Cluster\":{\"Type\"").unwrap();
        let logs = encoded.find("\"Logs\":").unwrap();
        let service = encoded.find("\"Service\":{\"Type\"").unwrap();
        assert!(cluster < logs && logs < service);
    }

    #[test]
    fn test_malformed_json() {
        let err = Template::decode(b"{\"Resources\": {", &registry()).unwrap_err();
        assert!(matches!(err, Error::MalformedJson { .. }));
    }

    #[test]
    fn test_bad_resource_fails_whole_template() {
        let mut json = sample();
        json["Resources"]["Service"]["Properties"]["Bogus"] = json!(1);
        let err = decode(json).unwrap_err();
        assert_eq!(err.logical_name(), Some("Service"));
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "Bogus"));
    }

    #[test]
    fn test_unknown_kind_does_not_fail() {
        let template = decode(sample()).unwrap();
        let logs = template.get_resource("Logs").unwrap();
        assert!(logs.is::<GenericResource>());
        assert_eq!(logs.attributes().deletion_policy, Some(DeletionPolicy::Retain));
    }

    #[test]
    fn test_unknown_top_level_section() {
        let err = decode(json!({ "Resources": {}, "Resource": {} })).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownField {
                path: FieldPath::root(),
                field: "Resource".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_condition() {
        let err = decode(json!({
            "Resources": {},
            "Conditions": { "IsProd": { "Fn::Equals": ["a"] } }
        }))
        .unwrap_err();
        match err {
            Error::MalformedExpression { path, .. } => {
                assert_eq!(path.as_str(), "Conditions.IsProd.Fn::Equals")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_output_reports_path() {
        let err = decode(json!({
            "Resources": {},
            "Outputs": { "Arn": { "Value": "x", "Exprot": { "Name": "y" } } }
        }))
        .unwrap_err();
        match err {
            Error::InvalidSection { path, message } => {
                assert!(path.as_str().starts_with("Outputs.Arn"), "{}", path);
                assert!(message.contains("Exprot"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parameter_extra_keys_kept() {
        let template = decode(json!({
            "Resources": {},
            "Parameters": { "Vpc": { "Type": "AWS::EC2::VPC::Id", "x-note": "kept" } }
        }))
        .unwrap();
        assert_eq!(template.parameters["Vpc"].extra["x-note"], json!("kept"));
        assert_eq!(
            template.to_json()["Parameters"]["Vpc"],
            json!({ "Type": "AWS::EC2::VPC::Id", "x-note": "kept" })
        );
    }

    #[test]
    fn test_rules_and_hooks_kept_opaque() {
        let json = json!({
            "Parameters": { "Env": { "Type": "String" } },
            "Rules": {
                "ProdInstanceType": {
                    "RuleCondition": { "Fn::Equals": [{ "Ref": "Env" }, "prod"] },
                    "Assertions": [{ "Assert": { "Fn::Contains": [["m5.large"], { "Ref": "Size" }] } }]
                }
            },
            "Resources": {},
            "Hooks": {
                "CodeDeployBlueGreenHook": {
                    "Type": "AWS::CodeDeploy::BlueGreen",
                    "Properties": { "ServiceRole": "CodeDeployRole" }
                }
            }
        });
        let template = decode(json.clone()).unwrap();
        assert!(template.rules.contains_key("ProdInstanceType"));
        assert!(template.hooks.contains_key("CodeDeployBlueGreenHook"));
        assert_eq!(template.to_json(), json);
    }

    #[test]
    fn test_section_encoding() {
        let json = json!({
            "Parameters": {
                "Env": {
                    "Type": "String",
                    "Default": "dev",
                    "AllowedValues": ["dev", "prod"],
                    "MinLength": 3,
                    "NoEcho": true
                }
            },
            "Mappings": {
                "Regions": {
                    "us-east-1": { "Ami": "ami-1", "Zones": 3 },
                    "eu-west-1": { "Ami": "ami-2", "Zones": 2 }
                }
            },
            "Resources": {},
            "Outputs": {
                "EnvName": {
                    "Value": { "Ref": "Env" },
                    "Description": "deployment environment",
                    "Export": { "Name": { "Fn::Sub": "${AWS::StackName}-env" } },
                    "Condition": "IsProd"
                }
            }
        });
        let template = decode(json.clone()).unwrap();
        assert_eq!(template.to_json(), json);
        assert_eq!(
            template.encode(),
            Template::decode(&template.encode(), &registry()).unwrap().encode()
        );
    }

    #[test]
    fn test_add_duplicate_leaves_template_unchanged() {
        let mut template = decode(sample()).unwrap();
        let before = template.clone();
        let err = template
            .add_resource("Cluster", GenericResource::new("Custom::Other"))
            .unwrap_err();
        assert_eq!(err, Error::DuplicateLogicalName("Cluster".to_string()));
        assert_eq!(template, before);
    }

    #[test]
    fn test_add_replace_remove() {
        let mut template = Template::new();
        template.add_resource("Cluster", Cluster::default()).unwrap();
        assert!(template.contains_resource("Cluster"));

        let mut replacement = Cluster::default();
        replacement.cluster_name = Some("renamed".into());
        let previous = template.replace_resource("Cluster", replacement).unwrap();
        assert!(previous.is::<Cluster>());
        assert_eq!(
            template.resource_as::<Cluster>("Cluster").unwrap().cluster_name,
            Some("renamed".into())
        );

        assert!(template.remove_resource("Cluster").is_some());
        assert!(template.remove_resource("Cluster").is_none());
        assert_eq!(template.resource_count(), 0);
    }

    #[test]
    fn test_insert_with_overwrite() {
        let mut template = Template::new();
        template
            .insert_resource("A", Box::new(GenericResource::new("Custom::A")), false)
            .unwrap();
        let previous = template
            .insert_resource("A", Box::new(GenericResource::new("Custom::B")), true)
            .unwrap();
        assert_eq!(previous.map(|r| r.resource_type().to_string()).as_deref(), Some("Custom::A"));
        assert_eq!(template.get_resource("A").unwrap().resource_type(), "Custom::B");
    }

    #[test]
    fn test_mutate_in_place() {
        let mut template = decode(sample()).unwrap();
        template
            .resource_as_mut::<Service>("Service")
            .unwrap()
            .desired_count = Some(5.into());
        template
            .get_resource_mut("Service")
            .unwrap()
            .attributes_mut()
            .deletion_policy = Some(DeletionPolicy::Delete);

        let json = template.to_json();
        assert_eq!(json["Resources"]["Service"]["Properties"]["DesiredCount"], json!(5));
        assert_eq!(json["Resources"]["Service"]["DeletionPolicy"], json!("Delete"));
    }

    #[test]
    fn test_resources_of_kind() {
        let template = decode(sample()).unwrap();
        let services = template.resources_of::<Service>();
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].0, "Service");
        assert!(template.resources_of::<Role>().is_empty());
    }

    #[test]
    fn test_new_template_encoding() {
        let template = Template::new();
        assert_eq!(
            template.to_json(),
            json!({ "AWSTemplateFormatVersion": "2010-09-09", "Resources": {} })
        );
    }

    #[test]
    fn test_dangling_references() {
        let template = decode(json!({
            "Parameters": { "Env": { "Type": "String" } },
            "Resources": {
                "Service": {
                    "Type": "AWS::ECS::Service",
                    "Properties": {
                        "Cluster": { "Ref": "MissingCluster" },
                        "ServiceName": { "Fn::Sub": "${Env}-${AWS::Region}" }
                    },
                    "DependsOn": ["Gone"]
                }
            }
        }))
        .unwrap();
        assert_eq!(
            template.dangling_references(),
            vec![
                ("Service".to_string(), "Gone".to_string()),
                ("Service".to_string(), "MissingCluster".to_string()),
            ]
        );
    }

    #[test]
    fn test_rename_resources() {
        let template = decode(sample()).unwrap();
        let mut mapping = HashMap::new();
        mapping.insert("Service".to_string(), "WebService".to_string());
        mapping.insert("Cluster".to_string(), "MainCluster".to_string());

        let renamed = template.rename_resources(&registry(), &mapping).unwrap();
        assert_eq!(renamed.resource_names(), vec!["Logs", "MainCluster", "WebService"]);
        let service = renamed.resource_as::<Service>("WebService").unwrap();
        assert_eq!(service.cluster, Some(Value::reference("MainCluster")));
        assert_eq!(service.attributes.depends_on, vec!["MainCluster"]);
        assert_eq!(
            renamed.outputs["ServiceName"].value,
            Value::get_att("WebService", "Name")
        );
    }

    #[test]
    fn test_rename_rejects_missing_and_taken_names() {
        let template = decode(sample()).unwrap();

        let mut mapping = HashMap::new();
        mapping.insert("Nope".to_string(), "Other".to_string());
        assert_eq!(
            template.rename_resources(&registry(), &mapping).unwrap_err(),
            Error::MissingLogicalName("Nope".to_string())
        );

        let mut mapping = HashMap::new();
        mapping.insert("Service".to_string(), "Logs".to_string());
        assert_eq!(
            template.rename_resources(&registry(), &mapping).unwrap_err(),
            Error::DuplicateLogicalName("Logs".to_string())
        );
    }
}
