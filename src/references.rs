//! Finding and rewriting logical-name references inside an encoded template.
//!
//! A reference is a `Ref`, the resource half of an `Fn::GetAtt`, a `${Name}`
//! or `${Name.Attr}` placeholder in an `Fn::Sub` string, or an entry of a
//! resource's `DependsOn`. Pseudo parameters (`AWS::Region`, ...) are never
//! references, and neither are `${!Literal}` escapes or placeholders bound by
//! the `Fn::Sub` variable map.

use serde_json::{Map, Value as Json};
use std::collections::{HashMap, HashSet};

use crate::envelope::{DEPENDS_ON, TYPE};
use crate::intrinsic::{is_pseudo_parameter, GET_ATT, REF, SUB};

/// Key under which references found in `Outputs` are reported.
pub const OUTPUTS: &str = "Outputs";

/// Rewrites every reference to a key of `id_mapping` into the mapped name.
///
/// All renames are applied in one pass, so swapping two names works. The
/// `Resources` keys themselves are left alone.
pub fn update_template_references(template: Json, id_mapping: &HashMap<String, String>) -> Json {
    if id_mapping.is_empty() {
        return template;
    }
    traverse_and_update(template, id_mapping)
}

/// Returns, per referencing resource (and [`OUTPUTS`]), the set of logical
/// names it references.
pub fn find_all_references(template: &Json) -> HashMap<String, HashSet<String>> {
    let mut references: HashMap<String, HashSet<String>> = HashMap::new();

    if let Some(resources) = template.get("Resources").and_then(Json::as_object) {
        for (logical_name, resource) in resources {
            let mut found = HashSet::new();
            collect_references(resource, &mut found);
            if !found.is_empty() {
                references.insert(logical_name.clone(), found);
            }
        }
    }

    if let Some(outputs) = template.get(OUTPUTS).and_then(Json::as_object) {
        let mut found = HashSet::new();
        for output in outputs.values() {
            collect_references(output, &mut found);
        }
        if !found.is_empty() {
            references.insert(OUTPUTS.to_string(), found);
        }
    }

    references
}

fn collect_references(value: &Json, references: &mut HashSet<String>) {
    match value {
        Json::Object(map) => {
            if let Some(name) = map.get(REF).and_then(Json::as_str) {
                if !is_pseudo_parameter(name) {
                    references.insert(name.to_string());
                }
            }

            match map.get(GET_ATT) {
                Some(Json::Array(args)) => {
                    if let Some(name) = args.first().and_then(Json::as_str) {
                        references.insert(name.to_string());
                    }
                }
                Some(Json::String(dotted)) => {
                    if let Some((name, _)) = dotted.split_once('.') {
                        references.insert(name.to_string());
                    }
                }
                _ => {}
            }

            if let Some(sub) = map.get(SUB) {
                let (template, variables) = split_sub(sub);
                if let Some(template) = template {
                    for name in placeholders(template) {
                        let bound = variables.is_some_and(|vars| vars.contains_key(name));
                        if !bound && !is_pseudo_parameter(name) {
                            references.insert(name.to_string());
                        }
                    }
                }
            }

            if map.contains_key(TYPE) {
                match map.get(DEPENDS_ON) {
                    Some(Json::String(name)) => {
                        references.insert(name.clone());
                    }
                    Some(Json::Array(names)) => {
                        references.extend(names.iter().filter_map(Json::as_str).map(String::from));
                    }
                    _ => {}
                }
            }

            for value in map.values() {
                collect_references(value, references);
            }
        }
        Json::Array(items) => {
            for item in items {
                collect_references(item, references);
            }
        }
        _ => {}
    }
}

/// The template string and optional variable map of an `Fn::Sub` argument.
fn split_sub(sub: &Json) -> (Option<&str>, Option<&Map<String, Json>>) {
    match sub {
        Json::String(template) => (Some(template.as_str()), None),
        Json::Array(args) => (
            args.first().and_then(Json::as_str),
            args.get(1).and_then(Json::as_object),
        ),
        _ => (None, None),
    }
}

/// Names used by `${Name}` and `${Name.Attr}` placeholders. `${!...}` is a
/// literal and yields nothing.
fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let body = &after[..end];
        if !body.starts_with('!') {
            let name = body.split('.').next().unwrap_or(body);
            if !name.is_empty() {
                names.push(name);
            }
        }
        rest = &after[end + 1..];
    }
    names
}

/// Rewrites the placeholders of `template` whose name is in `id_mapping`
/// and not bound in `bound`.
fn rewrite_placeholders(
    template: &str,
    id_mapping: &HashMap<String, String>,
    bound: Option<&Map<String, Json>>,
) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        output.push_str(&rest[..start + 2]);
        let body = &after[..end];
        let (name, attribute) = match body.split_once('.') {
            Some((name, attribute)) => (name, Some(attribute)),
            None => (body, None),
        };
        let renamed = id_mapping
            .get(name)
            .filter(|_| !body.starts_with('!'))
            .filter(|_| !bound.is_some_and(|vars| vars.contains_key(name)));
        match (renamed, attribute) {
            (Some(new_name), Some(attribute)) => {
                output.push_str(new_name);
                output.push('.');
                output.push_str(attribute);
            }
            (Some(new_name), None) => output.push_str(new_name),
            (None, _) => output.push_str(body),
        }
        output.push('}');
        rest = &after[end + 1..];
    }
    output.push_str(rest);
    output
}

fn rename(name: &str, id_mapping: &HashMap<String, String>) -> Option<String> {
    if is_pseudo_parameter(name) {
        return None;
    }
    id_mapping.get(name).cloned()
}

fn traverse_and_update(value: Json, id_mapping: &HashMap<String, String>) -> Json {
    match value {
        Json::Object(map) => {
            let is_resource = map.contains_key(TYPE);
            let updated = map
                .into_iter()
                .map(|(key, value)| {
                    let value = match key.as_str() {
                        REF => update_ref(value, id_mapping),
                        GET_ATT => update_get_att(value, id_mapping),
                        SUB => update_sub(value, id_mapping),
                        DEPENDS_ON if is_resource => update_depends_on(value, id_mapping),
                        _ => traverse_and_update(value, id_mapping),
                    };
                    (key, value)
                })
                .collect();
            Json::Object(updated)
        }
        Json::Array(items) => Json::Array(
            items
                .into_iter()
                .map(|item| traverse_and_update(item, id_mapping))
                .collect(),
        ),
        other => other,
    }
}

fn update_ref(value: Json, id_mapping: &HashMap<String, String>) -> Json {
    match value {
        Json::String(name) => Json::String(rename(&name, id_mapping).unwrap_or(name)),
        other => traverse_and_update(other, id_mapping),
    }
}

fn update_get_att(value: Json, id_mapping: &HashMap<String, String>) -> Json {
    match value {
        Json::Array(mut args) => {
            if let Some(new_name) = args
                .first()
                .and_then(Json::as_str)
                .and_then(|name| id_mapping.get(name))
            {
                args[0] = Json::String(new_name.clone());
            }
            let args = args
                .into_iter()
                .enumerate()
                .map(|(i, arg)| if i == 0 { arg } else { traverse_and_update(arg, id_mapping) })
                .collect();
            Json::Array(args)
        }
        Json::String(dotted) => match dotted.split_once('.') {
            Some((name, attribute)) => match id_mapping.get(name) {
                Some(new_name) => Json::String(format!("{}.{}", new_name, attribute)),
                None => Json::String(dotted),
            },
            None => Json::String(dotted),
        },
        other => other,
    }
}

fn update_sub(value: Json, id_mapping: &HashMap<String, String>) -> Json {
    match value {
        Json::String(template) => Json::String(rewrite_placeholders(&template, id_mapping, None)),
        Json::Array(mut args) => {
            let variables = match args.get(1) {
                Some(Json::Object(variables)) => Some(variables.clone()),
                _ => None,
            };
            if let Some(Json::String(template)) = args.first() {
                args[0] = Json::String(rewrite_placeholders(
                    template,
                    id_mapping,
                    variables.as_ref(),
                ));
            }
            if let Some(variables) = variables {
                let variables = variables
                    .into_iter()
                    .map(|(key, value)| (key, traverse_and_update(value, id_mapping)))
                    .collect();
                args[1] = Json::Object(variables);
            }
            Json::Array(args)
        }
        other => other,
    }
}

fn update_depends_on(value: Json, id_mapping: &HashMap<String, String>) -> Json {
    match value {
        Json::String(name) => Json::String(id_mapping.get(&name).cloned().unwrap_or(name)),
        Json::Array(names) => Json::Array(
            names
                .into_iter()
                .map(|item| match item {
                    Json::String(name) => {
                        Json::String(id_mapping.get(&name).cloned().unwrap_or(name))
                    }
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}
