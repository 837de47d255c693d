//! YAML front end.
//!
//! CloudFormation YAML is parsed with `serde_yml` and lowered to the same JSON
//! tree the JSON decoder consumes. Short-form tags become single-key objects:
//! `!Ref Bucket` is `{"Ref": "Bucket"}` and `!GetAtt Bucket.Arn` is
//! `{"Fn::GetAtt": "Bucket.Arn"}`.
//!
//! Emitting goes the other way through [`from_json`] and always writes the
//! long form.

mod tags;

use serde_json::{Map, Number as JsonNumber, Value as Json};
use serde_yml::{Mapping, Value as Yaml};

use crate::error::{Error, Result};

/// Parses a YAML document into JSON, expanding short-form tags.
pub fn to_json(source: &str) -> Result<Json> {
    let yaml: Yaml = serde_yml::from_str(source)?;
    lower(yaml)
}

fn lower(yaml: Yaml) -> Result<Json> {
    match yaml {
        Yaml::Null => Ok(Json::Null),
        Yaml::Bool(b) => Ok(Json::Bool(b)),
        Yaml::Number(n) => lower_number(&n),
        Yaml::String(s) => Ok(Json::String(s)),
        Yaml::Sequence(items) => items
            .into_iter()
            .map(lower)
            .collect::<Result<Vec<_>>>()
            .map(Json::Array),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(mapping_key(key)?, lower(value)?);
            }
            Ok(Json::Object(object))
        }
        Yaml::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            let name = tag.trim_start_matches('!');
            let long = tags::short_form_to_long(name)
                .ok_or_else(|| Error::Yaml(format!("unknown tag !{}", name)))?;
            let mut object = Map::new();
            object.insert(long.to_string(), lower(tagged.value)?);
            Ok(Json::Object(object))
        }
    }
}

fn lower_number(n: &serde_yml::Number) -> Result<Json> {
    if let Some(i) = n.as_i64() {
        return Ok(Json::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Json::from(u));
    }
    n.as_f64()
        .and_then(JsonNumber::from_f64)
        .map(Json::Number)
        .ok_or_else(|| Error::Yaml(format!("number {} has no JSON representation", n)))
}

/// Converts a JSON tree to a YAML node tree for emitting.
pub fn from_json(json: &Json) -> Yaml {
    match json {
        Json::Null => Yaml::Null,
        Json::Bool(b) => Yaml::Bool(*b),
        Json::Number(n) => raise_number(n),
        Json::String(s) => Yaml::String(s.clone()),
        Json::Array(items) => Yaml::Sequence(items.iter().map(from_json).collect()),
        Json::Object(object) => {
            let mut mapping = Mapping::new();
            for (key, value) in object {
                mapping.insert(Yaml::String(key.clone()), from_json(value));
            }
            Yaml::Mapping(mapping)
        }
    }
}

/// JSON numbers keep their literal text; YAML numbers are 64-bit.
fn raise_number(n: &JsonNumber) -> Yaml {
    if let Some(i) = n.as_i64() {
        return Yaml::Number(i.into());
    }
    if let Some(u) = n.as_u64() {
        return Yaml::Number(u.into());
    }
    match n.as_f64() {
        Some(f) => Yaml::Number(f.into()),
        None => Yaml::String(n.to_string()),
    }
}

/// YAML allows any node as a key; templates only use scalars.
fn mapping_key(key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        other => Err(Error::Yaml(format!(
            "unsupported mapping key {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_yaml() {
        let json = to_json("Resources:\n  Cluster:\n    Type: AWS::ECS::Cluster\n").unwrap();
        assert_eq!(
            json,
            json!({ "Resources": { "Cluster": { "Type": "AWS::ECS::Cluster" } } })
        );
    }

    #[test]
    fn test_short_form_tags() {
        let source = r#"
Cluster: !Ref Cluster
Arn: !GetAtt Role.Arn
Name: !Sub "${AWS::StackName}-web"
Zone: !Select [0, !GetAZs ""]
Count: !If [IsProd, 3, 1]
"#;
        assert_eq!(
            to_json(source).unwrap(),
            json!({
                "Cluster": { "Ref": "Cluster" },
                "Arn": { "Fn::GetAtt": "Role.Arn" },
                "Name": { "Fn::Sub": "${AWS::StackName}-web" },
                "Zone": { "Fn::Select": [0, { "Fn::GetAZs": "" }] },
                "Count": { "Fn::If": ["IsProd", 3, 1] }
            })
        );
    }

    #[test]
    fn test_scalar_keys_are_stringified() {
        let json = to_json("Ports:\n  80: http\n  true: yes-string\n").unwrap();
        assert_eq!(json["Ports"]["80"], json!("http"));
        assert_eq!(json["Ports"]["true"], json!("yes-string"));
    }

    #[test]
    fn test_unknown_tag() {
        let err = to_json("Value: !Bogus x\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(ref message) if message.contains("!Bogus")));
    }

    #[test]
    fn test_emit_numbers_as_yaml_numbers() {
        let json: Json = serde_json::from_str(r#"{"Port": 80, "Ratio": 0.25, "Offset": -3}"#).unwrap();
        let emitted = serde_yml::to_string(&from_json(&json)).unwrap();
        assert!(!emitted.contains("serde_json"), "{}", emitted);
        assert_eq!(to_json(&emitted).unwrap(), json);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(to_json("a: [1, 2"), Err(Error::Yaml(_))));
    }
}
