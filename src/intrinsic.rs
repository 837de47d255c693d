//! CloudFormation intrinsic functions and pseudo parameters.
//!
//! Every function has a fixed wire name (`Ref`, `Fn::GetAtt`, ...) and an
//! argument shape that is checked on decode. Arguments that may themselves be
//! expressions are held as [`Value`].

use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde_json::{json, Value as Json};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{json_kind, Error, Result};
use crate::path::FieldPath;
use crate::value::Value;

pub const REF: &str = "Ref";
pub const GET_ATT: &str = "Fn::GetAtt";
pub const JOIN: &str = "Fn::Join";
pub const SUB: &str = "Fn::Sub";
pub const IMPORT_VALUE: &str = "Fn::ImportValue";
pub const SELECT: &str = "Fn::Select";
pub const SPLIT: &str = "Fn::Split";
pub const BASE64: &str = "Fn::Base64";
pub const GET_AZS: &str = "Fn::GetAZs";
pub const FIND_IN_MAP: &str = "Fn::FindInMap";
pub const CIDR: &str = "Fn::Cidr";
pub const IF: &str = "Fn::If";
pub const EQUALS: &str = "Fn::Equals";
pub const AND: &str = "Fn::And";
pub const OR: &str = "Fn::Or";
pub const NOT: &str = "Fn::Not";
pub const CONDITION: &str = "Condition";

/// Fn::And and Fn::Or accept between 2 and 10 conditions.
const MIN_CONDITIONS: usize = 2;
const MAX_CONDITIONS: usize = 10;

lazy_static! {
    pub(crate) static ref FUNCTION_NAMES: HashSet<&'static str> = {
        let mut set = HashSet::new();
        set.insert(REF);
        set.insert(GET_ATT);
        set.insert(JOIN);
        set.insert(SUB);
        set.insert(IMPORT_VALUE);
        set.insert(SELECT);
        set.insert(SPLIT);
        set.insert(BASE64);
        set.insert(GET_AZS);
        set.insert(FIND_IN_MAP);
        set.insert(CIDR);
        set.insert(IF);
        set.insert(EQUALS);
        set.insert(AND);
        set.insert(OR);
        set.insert(NOT);
        set.insert(CONDITION);
        set
    };
}

/// Returns true if `key` is the wire name of a supported intrinsic function.
pub fn is_function_name(key: &str) -> bool {
    FUNCTION_NAMES.contains(key)
}

/// A structured function call standing in for a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Intrinsic {
    Ref(String),
    GetAtt {
        resource: String,
        attribute: Value,
    },
    Join {
        delimiter: String,
        values: Value,
    },
    Sub {
        template: String,
        variables: Option<IndexMap<String, Value>>,
    },
    ImportValue(Value),
    Select {
        index: Value,
        list: Value,
    },
    Split {
        delimiter: String,
        source: Value,
    },
    Base64(Value),
    GetAZs(Value),
    FindInMap {
        map_name: Value,
        top_level_key: Value,
        second_level_key: Value,
    },
    Cidr {
        ip_block: Value,
        count: Value,
        cidr_bits: Value,
    },
    If {
        condition: String,
        if_true: Value,
        if_false: Value,
    },
    Equals(Value, Value),
    And(Vec<Value>),
    Or(Vec<Value>),
    Not(Value),
    Condition(String),
}

impl Intrinsic {
    /// Wire name used as the single key of the encoded object.
    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Ref(_) => REF,
            Intrinsic::GetAtt { .. } => GET_ATT,
            Intrinsic::Join { .. } => JOIN,
            Intrinsic::Sub { .. } => SUB,
            Intrinsic::ImportValue(_) => IMPORT_VALUE,
            Intrinsic::Select { .. } => SELECT,
            Intrinsic::Split { .. } => SPLIT,
            Intrinsic::Base64(_) => BASE64,
            Intrinsic::GetAZs(_) => GET_AZS,
            Intrinsic::FindInMap { .. } => FIND_IN_MAP,
            Intrinsic::Cidr { .. } => CIDR,
            Intrinsic::If { .. } => IF,
            Intrinsic::Equals(..) => EQUALS,
            Intrinsic::And(_) => AND,
            Intrinsic::Or(_) => OR,
            Intrinsic::Not(_) => NOT,
            Intrinsic::Condition(_) => CONDITION,
        }
    }

    /// Decodes the argument of function `name`. `path` points at the object
    /// holding the function key.
    pub fn from_json(name: &str, arg: Json, path: &FieldPath) -> Result<Intrinsic> {
        let path = path.child(name);
        let intrinsic = match name {
            REF => Intrinsic::Ref(expect_string(arg, &path, "a logical name")?),
            GET_ATT => match arg {
                Json::String(dotted) => match dotted.split_once('.') {
                    Some((resource, attribute)) if !resource.is_empty() && !attribute.is_empty() => {
                        Intrinsic::GetAtt {
                            resource: resource.to_string(),
                            attribute: Value::String(attribute.to_string()),
                        }
                    }
                    _ => {
                        return Err(malformed(
                            &path,
                            format!("expected `LogicalName.Attribute`, found `{}`", dotted),
                        ))
                    }
                },
                other => {
                    let [resource, attribute] = expect_args::<2>(other, &path)?;
                    Intrinsic::GetAtt {
                        resource: expect_string(resource, &path.index(0), "a logical name")?,
                        attribute: Value::from_json(attribute, &path.index(1))?,
                    }
                }
            },
            JOIN => {
                let [delimiter, values] = expect_args::<2>(arg, &path)?;
                Intrinsic::Join {
                    delimiter: expect_string(delimiter, &path.index(0), "a delimiter")?,
                    values: Value::from_json(values, &path.index(1))?,
                }
            }
            SUB => match arg {
                Json::String(template) => Intrinsic::Sub {
                    template,
                    variables: None,
                },
                other => {
                    let [template, variables] = expect_args::<2>(other, &path)?;
                    let template = expect_string(template, &path.index(0), "a template string")?;
                    let var_path = path.index(1);
                    let variables = match variables {
                        Json::Object(map) => {
                            let mut decoded = IndexMap::with_capacity(map.len());
                            for (key, value) in map {
                                let value = Value::from_json(value, &var_path.child(&key))?;
                                decoded.insert(key, value);
                            }
                            decoded
                        }
                        other => {
                            return Err(malformed(
                                &var_path,
                                format!("expected a variable map, found {}", json_kind(&other)),
                            ))
                        }
                    };
                    Intrinsic::Sub {
                        template,
                        variables: Some(variables),
                    }
                }
            },
            IMPORT_VALUE => Intrinsic::ImportValue(Value::from_json(arg, &path)?),
            SELECT => {
                let [index, list] = expect_args::<2>(arg, &path)?;
                Intrinsic::Select {
                    index: Value::from_json(index, &path.index(0))?,
                    list: Value::from_json(list, &path.index(1))?,
                }
            }
            SPLIT => {
                let [delimiter, source] = expect_args::<2>(arg, &path)?;
                Intrinsic::Split {
                    delimiter: expect_string(delimiter, &path.index(0), "a delimiter")?,
                    source: Value::from_json(source, &path.index(1))?,
                }
            }
            BASE64 => Intrinsic::Base64(Value::from_json(arg, &path)?),
            GET_AZS => Intrinsic::GetAZs(Value::from_json(arg, &path)?),
            FIND_IN_MAP => {
                let [map_name, top, second] = expect_args::<3>(arg, &path)?;
                Intrinsic::FindInMap {
                    map_name: Value::from_json(map_name, &path.index(0))?,
                    top_level_key: Value::from_json(top, &path.index(1))?,
                    second_level_key: Value::from_json(second, &path.index(2))?,
                }
            }
            CIDR => {
                let [ip_block, count, cidr_bits] = expect_args::<3>(arg, &path)?;
                Intrinsic::Cidr {
                    ip_block: Value::from_json(ip_block, &path.index(0))?,
                    count: Value::from_json(count, &path.index(1))?,
                    cidr_bits: Value::from_json(cidr_bits, &path.index(2))?,
                }
            }
            IF => {
                let [condition, if_true, if_false] = expect_args::<3>(arg, &path)?;
                Intrinsic::If {
                    condition: expect_string(condition, &path.index(0), "a condition name")?,
                    if_true: Value::from_json(if_true, &path.index(1))?,
                    if_false: Value::from_json(if_false, &path.index(2))?,
                }
            }
            EQUALS => {
                let [left, right] = expect_args::<2>(arg, &path)?;
                Intrinsic::Equals(
                    Value::from_json(left, &path.index(0))?,
                    Value::from_json(right, &path.index(1))?,
                )
            }
            AND | OR => {
                let conditions = expect_condition_list(arg, &path)?;
                if name == AND {
                    Intrinsic::And(conditions)
                } else {
                    Intrinsic::Or(conditions)
                }
            }
            NOT => {
                let [condition] = expect_args::<1>(arg, &path)?;
                Intrinsic::Not(Value::from_json(condition, &path.index(0))?)
            }
            CONDITION => Intrinsic::Condition(expect_string(arg, &path, "a condition name")?),
            other => {
                return Err(malformed(
                    &path,
                    format!("`{}` is not a supported intrinsic function", other),
                ))
            }
        };
        Ok(intrinsic)
    }

    /// Encodes the call as a single-key object.
    pub fn to_json(&self) -> Json {
        let arg = match self {
            Intrinsic::Ref(name) | Intrinsic::Condition(name) => Json::String(name.clone()),
            Intrinsic::GetAtt {
                resource,
                attribute,
            } => json!([resource, attribute.to_json()]),
            Intrinsic::Join { delimiter, values } => json!([delimiter, values.to_json()]),
            Intrinsic::Sub {
                template,
                variables,
            } => match variables {
                None => Json::String(template.clone()),
                Some(variables) => {
                    let vars: serde_json::Map<String, Json> = variables
                        .iter()
                        .map(|(key, value)| (key.clone(), value.to_json()))
                        .collect();
                    json!([template, vars])
                }
            },
            Intrinsic::ImportValue(value)
            | Intrinsic::Base64(value)
            | Intrinsic::GetAZs(value) => value.to_json(),
            Intrinsic::Select { index, list } => json!([index.to_json(), list.to_json()]),
            Intrinsic::Split { delimiter, source } => json!([delimiter, source.to_json()]),
            Intrinsic::FindInMap {
                map_name,
                top_level_key,
                second_level_key,
            } => json!([
                map_name.to_json(),
                top_level_key.to_json(),
                second_level_key.to_json()
            ]),
            Intrinsic::Cidr {
                ip_block,
                count,
                cidr_bits,
            } => json!([ip_block.to_json(), count.to_json(), cidr_bits.to_json()]),
            Intrinsic::If {
                condition,
                if_true,
                if_false,
            } => json!([condition, if_true.to_json(), if_false.to_json()]),
            Intrinsic::Equals(left, right) => json!([left.to_json(), right.to_json()]),
            Intrinsic::And(conditions) | Intrinsic::Or(conditions) => {
                Json::Array(conditions.iter().map(Value::to_json).collect())
            }
            Intrinsic::Not(condition) => json!([condition.to_json()]),
        };
        let mut object = serde_json::Map::with_capacity(1);
        object.insert(self.name().to_string(), arg);
        Json::Object(object)
    }
}

fn malformed(path: &FieldPath, reason: String) -> Error {
    Error::MalformedExpression {
        path: path.clone(),
        reason,
    }
}

fn expect_string(arg: Json, path: &FieldPath, what: &str) -> Result<String> {
    match arg {
        Json::String(s) => Ok(s),
        other => Err(malformed(
            path,
            format!("expected {} string, found {}", what, json_kind(&other)),
        )),
    }
}

fn expect_args<const N: usize>(arg: Json, path: &FieldPath) -> Result<[Json; N]> {
    match arg {
        Json::Array(items) => {
            let found = items.len();
            <[Json; N]>::try_from(items).map_err(|_| {
                malformed(
                    path,
                    format!("expected {} arguments, found {}", N, found),
                )
            })
        }
        other => Err(malformed(
            path,
            format!("expected an argument list, found {}", json_kind(&other)),
        )),
    }
}

fn expect_condition_list(arg: Json, path: &FieldPath) -> Result<Vec<Value>> {
    let items = match arg {
        Json::Array(items) => items,
        other => {
            return Err(malformed(
                path,
                format!("expected a list of conditions, found {}", json_kind(&other)),
            ))
        }
    };
    if !(MIN_CONDITIONS..=MAX_CONDITIONS).contains(&items.len()) {
        return Err(malformed(
            path,
            format!(
                "expected between {} and {} conditions, found {}",
                MIN_CONDITIONS,
                MAX_CONDITIONS,
                items.len()
            ),
        ));
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Value::from_json(item, &path.index(i)))
        .collect()
}

/// Parameters predefined by CloudFormation, referenced with `Ref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoParameter {
    AccountId,
    NotificationArns,
    NoValue,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl PseudoParameter {
    pub const ALL: [PseudoParameter; 8] = [
        PseudoParameter::AccountId,
        PseudoParameter::NotificationArns,
        PseudoParameter::NoValue,
        PseudoParameter::Partition,
        PseudoParameter::Region,
        PseudoParameter::StackId,
        PseudoParameter::StackName,
        PseudoParameter::UrlSuffix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoParameter::AccountId => "AWS::AccountId",
            PseudoParameter::NotificationArns => "AWS::NotificationARNs",
            PseudoParameter::NoValue => "AWS::NoValue",
            PseudoParameter::Partition => "AWS::Partition",
            PseudoParameter::Region => "AWS::Region",
            PseudoParameter::StackId => "AWS::StackId",
            PseudoParameter::StackName => "AWS::StackName",
            PseudoParameter::UrlSuffix => "AWS::URLSuffix",
        }
    }
}

impl fmt::Display for PseudoParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PseudoParameter {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PseudoParameter::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

/// Checks if a name is a CloudFormation pseudo parameter
pub fn is_pseudo_parameter(name: &str) -> bool {
    name.starts_with("AWS::")
}
