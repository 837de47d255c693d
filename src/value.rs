//! Scalar-or-expression values.
//!
//! A [`Value`] is whatever may appear where CloudFormation expects a property
//! value: a literal, a list or map of values, or an intrinsic function call.
//! The wire format carries no type tag, so decoding sniffs the JSON shape in a
//! fixed priority order:
//!
//! 1. an object with exactly one key naming a supported function is a call
//!    (a bad argument shape is a `MalformedExpression`);
//! 2. an object with exactly one `Fn::`-prefixed key that is not supported is
//!    a `MalformedExpression`;
//! 3. any other object is a map, an array is a list;
//! 4. strings, numbers and booleans are literals.
//!
//! Rule 1 means a literal map whose only key is a function name (for example
//! `{"Ref": "x"}` meant as data) always decodes as a call. That ambiguity is
//! inherent to the format and is kept as-is.
//!
//! Typed nested structures do not accept a call in their place: a
//! `{"Fn::If": ...}` or `{"Ref": "AWS::NoValue"}` where a schema expects a
//! property structure or a list element of one is a `MalformedExpression`.
//! Opaque JSON properties and generic resources accept anything.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;

use crate::error::{json_kind, Error, Result};
use crate::intrinsic::{is_function_name, Intrinsic, PseudoParameter};
use crate::path::FieldPath;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Function(Box<Intrinsic>),
}

impl Value {
    pub fn from_json(json: Json, path: &FieldPath) -> Result<Value> {
        match json {
            Json::String(s) => Ok(Value::String(s)),
            Json::Number(n) => Ok(Value::Number(n)),
            Json::Bool(b) => Ok(Value::Bool(b)),
            Json::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Value::from_json(item, &path.index(i)))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Json::Object(map) => {
                if map.len() == 1 {
                    if let Some((key, arg)) = map.iter().next() {
                        if is_function_name(key) {
                            let function = Intrinsic::from_json(key, arg.clone(), path)?;
                            return Ok(Value::Function(Box::new(function)));
                        }
                        if key.starts_with("Fn::") {
                            return Err(Error::MalformedExpression {
                                path: path.clone(),
                                reason: format!("`{}` is not a supported intrinsic function", key),
                            });
                        }
                    }
                }
                let mut decoded = IndexMap::with_capacity(map.len());
                for (key, item) in map {
                    let item = Value::from_json(item, &path.child(&key))?;
                    decoded.insert(key, item);
                }
                Ok(Value::Map(decoded))
            }
            Json::Null => Err(Error::TypeMismatch {
                path: path.clone(),
                expected: "a value or intrinsic function",
                found: json_kind(&Json::Null),
            }),
        }
    }

    pub fn to_json(&self) -> Json {
        match self {
            Value::String(s) => Json::String(s.clone()),
            Value::Number(n) => Json::Number(n.clone()),
            Value::Bool(b) => Json::Bool(*b),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Function(function) => function.to_json(),
        }
    }

    /// Float literal; `None` for NaN and infinities, which JSON cannot carry.
    pub fn float(f: f64) -> Option<Value> {
        serde_json::Number::from_f64(f).map(Value::Number)
    }

    pub fn reference(logical_name: impl Into<String>) -> Value {
        Intrinsic::Ref(logical_name.into()).into()
    }

    pub fn pseudo(parameter: PseudoParameter) -> Value {
        Intrinsic::Ref(parameter.as_str().to_string()).into()
    }

    pub fn get_att(logical_name: impl Into<String>, attribute: impl Into<String>) -> Value {
        Intrinsic::GetAtt {
            resource: logical_name.into(),
            attribute: Value::String(attribute.into()),
        }
        .into()
    }

    pub fn sub(template: impl Into<String>) -> Value {
        Intrinsic::Sub {
            template: template.into(),
            variables: None,
        }
        .into()
    }

    pub fn sub_with(template: impl Into<String>, variables: IndexMap<String, Value>) -> Value {
        Intrinsic::Sub {
            template: template.into(),
            variables: Some(variables),
        }
        .into()
    }

    pub fn join(delimiter: impl Into<String>, values: Vec<Value>) -> Value {
        Intrinsic::Join {
            delimiter: delimiter.into(),
            values: Value::List(values),
        }
        .into()
    }

    pub fn import_value(export_name: impl Into<Value>) -> Value {
        Intrinsic::ImportValue(export_name.into()).into()
    }

    pub fn select(index: impl Into<Value>, list: impl Into<Value>) -> Value {
        Intrinsic::Select {
            index: index.into(),
            list: list.into(),
        }
        .into()
    }

    pub fn condition(name: impl Into<String>) -> Value {
        Intrinsic::Condition(name.into()).into()
    }

    pub fn if_else(
        condition: impl Into<String>,
        if_true: impl Into<Value>,
        if_false: impl Into<Value>,
    ) -> Value {
        Intrinsic::If {
            condition: condition.into(),
            if_true: if_true.into(),
            if_false: if_false.into(),
        }
        .into()
    }

    pub fn equals(left: impl Into<Value>, right: impl Into<Value>) -> Value {
        Intrinsic::Equals(left.into(), right.into()).into()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Intrinsic> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Function(_))
    }
}

impl From<Intrinsic> for Value {
    fn from(function: Intrinsic) -> Self {
        Value::Function(Box::new(function))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Value::from_json(json, &FieldPath::root()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Json) -> Result<Value> {
        Value::from_json(value, &FieldPath::root())
    }

    #[test]
    fn test_ref_shape() {
        let value = decode(json!({ "Ref": "MyBucket" })).unwrap();
        assert_eq!(
            value.as_function(),
            Some(&Intrinsic::Ref("MyBucket".to_string()))
        );
        assert_eq!(value.to_json(), json!({ "Ref": "MyBucket" }));
    }

    #[test]
    fn test_getatt_shape() {
        let value = decode(json!({ "Fn::GetAtt": ["MyBucket", "Arn"] })).unwrap();
        match value.as_function() {
            Some(Intrinsic::GetAtt {
                resource,
                attribute,
            }) => {
                assert_eq!(resource, "MyBucket");
                assert_eq!(attribute.as_str(), Some("Arn"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(value.to_json(), json!({ "Fn::GetAtt": ["MyBucket", "Arn"] }));
    }

    #[test]
    fn test_bare_string_is_literal() {
        let value = decode(json!("hello")).unwrap();
        assert_eq!(value, Value::String("hello".to_string()));
        assert!(!value.is_function());

        let value = decode(json!("Ref")).unwrap();
        assert!(!value.is_function());
    }

    #[test]
    fn test_literals_keep_json_kind() {
        assert_eq!(decode(json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(decode(json!(42)).unwrap().as_i64(), Some(42));
        assert_eq!(decode(json!(1.5)).unwrap().to_json(), json!(1.5));
        assert_ne!(decode(json!(1)).unwrap(), decode(json!(1.0)).unwrap());
    }

    #[test]
    fn test_nested_containers() {
        let raw = json!({
            "Variables": {
                "BUCKET": { "Ref": "Bucket" },
                "STAGE": "prod",
                "PORTS": [80, 443]
            }
        });
        let value = decode(raw.clone()).unwrap();
        match &value {
            Value::Map(map) => match &map["Variables"] {
                Value::Map(vars) => {
                    assert!(vars["BUCKET"].is_function());
                    assert_eq!(vars["PORTS"], Value::List(vec![80.into(), 443.into()]));
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(value.to_json(), raw);
    }

    #[test]
    fn test_single_key_map_is_literal_when_not_a_function() {
        let value = decode(json!({ "Key": "Name" })).unwrap();
        assert!(matches!(value, Value::Map(ref m) if m.len() == 1));
    }

    #[test]
    fn test_unknown_fn_key_is_malformed() {
        let err = decode(json!({ "Props": { "Fn::Bogus": ["a"] } })).unwrap_err();
        match err {
            Error::MalformedExpression { path, reason } => {
                assert_eq!(path.as_str(), "Props");
                assert!(reason.contains("Fn::Bogus"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_function_key_alongside_others_is_a_map() {
        let value = decode(json!({ "Ref": "A", "Other": 1 })).unwrap();
        assert!(matches!(value, Value::Map(ref m) if m.len() == 2));
    }

    #[test]
    fn test_null_rejected() {
        let err = decode(json!([null])).unwrap_err();
        match err {
            Error::TypeMismatch { path, found, .. } => {
                assert_eq!(path.as_str(), "[0]");
                assert_eq!(found, "null");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_path_through_containers() {
        let err = decode(json!({ "Tags": [{ "Value": { "Fn::GetAtt": [1, 2] } }] })).unwrap_err();
        match err {
            Error::MalformedExpression { path, .. } => {
                assert_eq!(path.as_str(), "Tags[0].Value.Fn::GetAtt[0]")
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_builders() {
        let mut vars = IndexMap::new();
        vars.insert("Bucket".to_string(), Value::reference("Bucket"));
        for value in [
            Value::from("literal"),
            Value::from(7),
            Value::float(2.5).unwrap(),
            Value::from(false),
            Value::reference("Bucket"),
            Value::get_att("Bucket", "Arn"),
            Value::sub("${AWS::StackName}-x"),
            Value::sub_with("${Bucket}", vars),
            Value::join(",", vec!["a".into(), Value::reference("B")]),
            Value::import_value("shared-vpc"),
            Value::select(0, Value::reference("Subnets")),
            Value::if_else("IsProd", 3, Value::pseudo(PseudoParameter::NoValue)),
            Value::equals(Value::reference("Env"), "prod"),
            Value::condition("IsProd"),
        ] {
            assert_eq!(decode(value.to_json()).unwrap(), value);
        }
    }

    #[test]
    fn test_serde_integration() {
        let value: Value = serde_json::from_str(r#"{"Fn::ImportValue": "Shared"}"#).unwrap();
        assert_eq!(value, Value::import_value("Shared"));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"Fn::ImportValue":"Shared"}"#
        );

        let err = serde_json::from_str::<Value>(r#"{"Fn::Nope": 1}"#).unwrap_err();
        assert!(err.to_string().contains("Fn::Nope"));
    }
}
