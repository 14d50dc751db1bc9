//! Schema definitions, resource types, and the schema registry.
//!
//! Schemas describe the attributes of a resource type (name, type,
//! uniqueness and case-sensitivity flags); resource types tie a base schema
//! and optional extensions to an endpoint. The registry composes a
//! validation model per resource type at registration time.

pub mod registry;
pub mod types;
mod validation;

pub use registry::{CompositeModel, SchemaRegistry};
pub use types::{
    AttributeDefinition, AttributeType, ResourceType, Schema, SchemaExtension, Uniqueness,
};
