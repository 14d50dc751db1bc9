//! Multi-tenant storage engine for SCIM identity resources.
//!
//! This crate provides the resource layer of a SCIM 2.0 (RFC 7643 / 7644)
//! provisioning service: schema and resource-type registration, validated
//! tenant-partitioned CRUD with system-attribute stamping, and a query
//! pipeline with filtering, sorting and pagination. Records are schema-less
//! JSON documents validated against registered schemas, so new resource
//! types need configuration rather than code.
//!
//! # Architecture
//!
//! - [`schema`] — schema and resource-type definitions, the registry, and
//!   document validation against composed base-plus-extension models
//! - [`resource`] — the record representation and its system attributes
//!   (`id`, `meta`, version tags)
//! - [`filter`] — the RFC 7644 filter subset: parser and per-record
//!   evaluator
//! - [`store`] — the [`ResourceStore`] contract and the in-memory backend
//! - [`tenant`] — mapping request credentials to tenant ids
//!
//! # Example
//!
//! ```
//! use scim_store::{
//!     AttributeDefinition, InMemoryStore, Resource, ResourceStore, ResourceType, Schema,
//!     SearchRequest, Uniqueness,
//! };
//! use serde_json::json;
//!
//! let store = InMemoryStore::new();
//! store.register_schema(Schema {
//!     id: "urn:example:schemas:User".into(),
//!     name: "User".into(),
//!     description: String::new(),
//!     attributes: vec![AttributeDefinition {
//!         name: "userName".into(),
//!         required: true,
//!         uniqueness: Uniqueness::Server,
//!         ..AttributeDefinition::default()
//!     }],
//! })?;
//! store.register_resource_type(ResourceType {
//!     id: "User".into(),
//!     name: "User".into(),
//!     description: String::new(),
//!     endpoint: "/Users".into(),
//!     schema: "urn:example:schemas:User".into(),
//!     schema_extensions: vec![],
//! })?;
//!
//! let record = Resource::new("User", json!({"userName": "bjensen"}))?;
//! let created = store.create("", "User", record)?;
//! assert!(created.id().is_some());
//!
//! let request = SearchRequest::new().with_filter(r#"userName sw "b""#);
//! let page = store.query("", &request, Some("User"))?;
//! assert_eq!(page.total_results, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Concurrency
//!
//! [`InMemoryStore`] serializes all operations behind one process-wide
//! mutex, so it is safe to share across threads; each operation is atomic
//! with respect to every other. Backends with finer-grained locking
//! implement the same [`ResourceStore`] trait.

pub mod error;
pub mod filter;
pub mod resource;
pub mod schema;
pub mod store;
pub mod tenant;

pub use error::{StoreError, StoreResult, ValidationError};
pub use resource::{Meta, Resource, Version};
pub use schema::{
    AttributeDefinition, AttributeType, CompositeModel, ResourceType, Schema, SchemaExtension,
    SchemaRegistry, Uniqueness,
};
pub use store::{
    InMemoryStore, QueryPage, ResourceStore, SearchRequest, SortOrder, UniquenessDescriptor,
};
pub use tenant::{BearerTenantResolver, DEFAULT_TENANT, TenantResolver};
