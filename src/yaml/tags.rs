// Copyright 2020-2022 Amazon Web Services, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0
//
// CloudFormation short-form intrinsic function tags

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::intrinsic;

lazy_static! {
    static ref SHORT_FORM_TO_LONG_MAPPING: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Ref", intrinsic::REF);
        m.insert("GetAtt", intrinsic::GET_ATT);
        m.insert("Base64", intrinsic::BASE64);
        m.insert("Sub", intrinsic::SUB);
        m.insert("GetAZs", intrinsic::GET_AZS);
        m.insert("ImportValue", intrinsic::IMPORT_VALUE);
        m.insert("Condition", intrinsic::CONDITION);
        m.insert("Select", intrinsic::SELECT);
        m.insert("Split", intrinsic::SPLIT);
        m.insert("Join", intrinsic::JOIN);
        m.insert("FindInMap", intrinsic::FIND_IN_MAP);
        m.insert("Cidr", intrinsic::CIDR);
        m.insert("And", intrinsic::AND);
        m.insert("Equals", intrinsic::EQUALS);
        m.insert("If", intrinsic::IF);
        m.insert("Not", intrinsic::NOT);
        m.insert("Or", intrinsic::OR);
        m
    };
}

/// Long-form key for a short-form tag name given without its `!`.
pub(crate) fn short_form_to_long(tag: &str) -> Option<&'static str> {
    SHORT_FORM_TO_LONG_MAPPING.get(tag).copied()
}
