//! Schema registry: schema and resource-type registration with composed
//! validation models.
//!
//! The registry is populated once at startup, before any request handling.
//! `register_schema` is idempotent on the schema id (last write wins);
//! `register_resource_type` requires every referenced schema to be present
//! already and fails with a configuration error otherwise. On success it
//! composes the validation model (base schema plus extensions) that records
//! of that type are checked against.

use std::collections::HashMap;

use serde_json::Value;

use super::types::{ResourceType, Schema, SchemaExtension};
use super::validation;
use crate::error::{StoreError, StoreResult, ValidationResult};

/// Validation model for a resource type: its base schema composed with the
/// schemas of its extensions. Built once at registration, immutable after.
#[derive(Debug, Clone)]
pub struct CompositeModel {
    base: Schema,
    extensions: Vec<(SchemaExtension, Schema)>,
}

impl CompositeModel {
    /// The base schema of the resource type.
    pub fn base(&self) -> &Schema {
        &self.base
    }

    /// Extension references paired with their schemas.
    pub fn extensions(&self) -> &[(SchemaExtension, Schema)] {
        &self.extensions
    }

    /// Validate a resource document against this model.
    pub fn validate(&self, data: &Value) -> ValidationResult<()> {
        validation::validate_document(self, data)
    }
}

/// Registry of schemas and resource types.
///
/// Lookups by resource-type endpoint are case-insensitive, matching how the
/// transport layer routes request paths.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    resource_types: HashMap<String, ResourceType>,
    resource_types_by_endpoint: HashMap<String, String>,
    models: HashMap<String, CompositeModel>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its id. Re-registering the same id replaces
    /// the previous definition.
    pub fn register_schema(&mut self, schema: Schema) {
        self.schemas.insert(schema.id.clone(), schema);
    }

    /// Register a resource type.
    ///
    /// The base schema and all extension schemas must already be registered.
    /// Composes the validation model for the type on success.
    pub fn register_resource_type(&mut self, resource_type: ResourceType) -> StoreResult<()> {
        let base = self
            .schemas
            .get(&resource_type.schema)
            .ok_or_else(|| StoreError::unknown_schema(&resource_type.schema))?
            .clone();

        let mut extensions = Vec::with_capacity(resource_type.schema_extensions.len());
        for extension in &resource_type.schema_extensions {
            let schema = self
                .schemas
                .get(&extension.schema)
                .ok_or_else(|| StoreError::unknown_schema(&extension.schema))?;
            extensions.push((extension.clone(), schema.clone()));
        }

        self.models
            .insert(resource_type.id.clone(), CompositeModel { base, extensions });
        self.resource_types_by_endpoint
            .insert(resource_type.endpoint.to_lowercase(), resource_type.id.clone());
        self.resource_types
            .insert(resource_type.id.clone(), resource_type);
        Ok(())
    }

    /// Get a schema by its id.
    pub fn schema(&self, schema_id: &str) -> Option<&Schema> {
        self.schemas.get(schema_id)
    }

    /// Iterate over all registered schemas.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Get a resource type by its id.
    pub fn resource_type(&self, resource_type_id: &str) -> Option<&ResourceType> {
        self.resource_types.get(resource_type_id)
    }

    /// Get a resource type by its endpoint path (case-insensitive).
    pub fn resource_type_by_endpoint(&self, endpoint: &str) -> Option<&ResourceType> {
        self.resource_types_by_endpoint
            .get(&endpoint.to_lowercase())
            .and_then(|id| self.resource_types.get(id))
    }

    /// Iterate over all registered resource types.
    pub fn resource_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.resource_types.values()
    }

    /// Get the composed validation model for a resource type.
    pub fn model(&self, resource_type_id: &str) -> Option<&CompositeModel> {
        self.models.get(resource_type_id)
    }
}
