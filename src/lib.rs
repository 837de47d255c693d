//! Typed CloudFormation templates with a strict JSON/YAML codec.
//!
//! ```
//! use cfn_template::catalog::ecs::Service;
//! use cfn_template::{Registry, Template, Value};
//!
//! let registry = Registry::default();
//! let json = br#"{
//!     "Resources": {
//!         "Web": {
//!             "Type": "AWS::ECS::Service",
//!             "Properties": { "Cluster": { "Ref": "Cluster" } },
//!             "DependsOn": "Cluster"
//!         },
//!         "Cluster": { "Type": "AWS::ECS::Cluster" }
//!     }
//! }"#;
//!
//! let mut template = Template::decode(json, &registry)?;
//! let web = template.resource_as_mut::<Service>("Web").unwrap();
//! web.desired_count = Some(Value::from(2));
//! assert!(template.dangling_references().is_empty());
//!
//! let encoded = template.encode();
//! assert_eq!(Template::decode(&encoded, &registry)?, template);
//! # Ok::<(), cfn_template::Error>(())
//! ```

pub mod catalog;
pub mod envelope;
mod error;
pub mod intrinsic;
mod path;
mod policies;
pub mod properties;
pub mod references;
mod registry;
mod resource;
mod template;
mod value;
pub mod yaml;

pub use error::{Error, Result};
pub use intrinsic::{Intrinsic, PseudoParameter};
pub use path::FieldPath;
pub use policies::{DeletionPolicy, UpdateReplacePolicy};
pub use registry::{Registry, ResourceFactory};
pub use resource::{GenericResource, Resource, ResourceAttributes, ResourceKind};
pub use template::{Export, Mapping, Output, Parameter, Template, DEFAULT_FORMAT_VERSION};
pub use value::Value;
