use crate::property_type;
use crate::value::Value;

property_type! {
    /// A key/value resource tag.
    pub struct Tag("Tag") {
        required key: Value = "Key",
        required value: Value = "Value",
    }
}

impl Tag {
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}
