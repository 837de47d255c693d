//! Resource lifecycle policies.
//!
//! Unset policies are modelled as `None` on [`crate::ResourceAttributes`] and
//! never serialize as an empty string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::path::FieldPath;

macro_rules! lifecycle_policy {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            Delete,
            Retain,
            Snapshot,
        }

        impl $name {
            pub const ALL: [$name; 3] = [$name::Delete, $name::Retain, $name::Snapshot];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::Delete => "Delete",
                    $name::Retain => "Retain",
                    $name::Snapshot => "Snapshot",
                }
            }

            /// Parses a wire value. The empty string means "unset".
            pub(crate) fn parse_at(
                value: &str,
                path: &FieldPath,
            ) -> Result<Option<$name>, Error> {
                if value.is_empty() {
                    return Ok(None);
                }
                value.parse().map(Some).map_err(|_: Error| Error::InvalidPolicy {
                    path: path.clone(),
                    value: value.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|policy| policy.as_str() == s)
                    .ok_or_else(|| Error::InvalidPolicy {
                        path: FieldPath::new(stringify!($name)),
                        value: s.to_string(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

lifecycle_policy!(
    /// What CloudFormation does with a resource when it is removed from the stack.
    DeletionPolicy
);

lifecycle_policy!(
    /// What CloudFormation does with the old physical resource on replacement.
    UpdateReplacePolicy
);
