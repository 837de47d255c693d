//! `AWS::IAM::*` schemas. Policy documents are schema-less and kept as raw
//! JSON.

use crate::catalog::Tag;
use crate::properties::Json;
use crate::value::Value;
use crate::{property_type, resource_type};

resource_type! {
    pub struct Role("AWS::IAM::Role") {
        required assume_role_policy_document: Json = "AssumeRolePolicyDocument",
        optional description: Value = "Description",
        optional managed_policy_arns: Value = "ManagedPolicyArns",
        optional max_session_duration: Value = "MaxSessionDuration",
        optional path: Value = "Path",
        optional permissions_boundary: Value = "PermissionsBoundary",
        optional policies: Vec<RolePolicy> = "Policies",
        optional role_name: Value = "RoleName",
        optional tags: Vec<Tag> = "Tags",
    }
}

impl Role {
    pub fn new(assume_role_policy_document: Json) -> Self {
        Role {
            assume_role_policy_document,
            description: None,
            managed_policy_arns: None,
            max_session_duration: None,
            path: None,
            permissions_boundary: None,
            policies: None,
            role_name: None,
            tags: None,
            attributes: Default::default(),
        }
    }
}

property_type! {
    /// An inline policy embedded in a role.
    pub struct RolePolicy("AWS::IAM::Role.Policy") {
        required policy_document: Json = "PolicyDocument",
        required policy_name: Value = "PolicyName",
    }
}

resource_type! {
    pub struct Policy("AWS::IAM::Policy") {
        optional groups: Value = "Groups",
        required policy_document: Json = "PolicyDocument",
        required policy_name: Value = "PolicyName",
        optional roles: Value = "Roles",
        optional users: Value = "Users",
    }
}
