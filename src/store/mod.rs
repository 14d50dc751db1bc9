//! The resource store contract and its implementations.
//!
//! [`ResourceStore`] defines the operations every storage backend supports:
//! schema and resource-type registration, tenant-scoped CRUD, and the query
//! pipeline (filter, sort, paginate). [`InMemoryStore`] is the reference
//! backend; durable backends implement the same trait without touching
//! callers.
//!
//! Absence is never an error: `get` and `update` return `Option`, `delete`
//! returns whether anything was removed. Structured failures (uniqueness
//! conflicts, validation errors, malformed filters) surface through the
//! backend's error type.

pub mod in_memory;
pub mod unique;

pub use in_memory::InMemoryStore;
pub use unique::UniquenessDescriptor;

use serde::{Deserialize, Serialize};

use crate::resource::Resource;
use crate::schema::{ResourceType, Schema};

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    /// Ascending order (the default)
    #[default]
    Ascending,
    /// Descending order
    Descending,
}

/// Parameters of a query: optional filter, sort and pagination.
///
/// Mirrors the SCIM SearchRequest wire form (camelCase, 1-based
/// `startIndex`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    /// Filter expression text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Attribute path to sort by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Sort direction; ascending when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    /// 1-based index of the first returned record; 1 when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    /// Maximum number of returned records; unlimited when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl SearchRequest {
    /// Create an empty request (no filter, no sort, no pagination).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the sort attribute path.
    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    /// Set the sort direction.
    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Set the 1-based start index.
    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = Some(start_index);
        self
    }

    /// Set the result-count cap.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct QueryPage {
    /// Number of records matching the filter and scope, before pagination.
    /// Callers derive pagination metadata from this, so it is never the
    /// length of `resources`.
    pub total_results: usize,
    /// The paginated records, as independent copies
    pub resources: Vec<Resource>,
}

/// Storage contract for identity resources.
///
/// Registration calls populate the backend once at startup; CRUD and query
/// calls run per request, each scoped to a tenant. Every operation is atomic
/// with respect to every other operation.
pub trait ResourceStore: Send + Sync {
    /// The error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Register a schema under its id. Idempotent; re-registering an id
    /// replaces the previous definition.
    fn register_schema(&self, schema: Schema) -> Result<(), Self::Error>;

    /// Register a resource type. Every referenced schema must already be
    /// registered; an unknown reference is a configuration error.
    fn register_resource_type(&self, resource_type: ResourceType) -> Result<(), Self::Error>;

    /// Create a record. The store assigns the identifier and stamps the meta
    /// block; any caller-provided id is ignored. Fails on a uniqueness
    /// conflict with an existing record of the same type in the tenant.
    fn create(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        resource: Resource,
    ) -> Result<Resource, Self::Error>;

    /// Fetch a copy of a record by id, or `None` if it does not exist.
    fn get(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        id: &str,
    ) -> Result<Option<Resource>, Self::Error>;

    /// Replace a record, identified by the id it carries. The incoming
    /// record is re-validated, `meta.lastModified` and the version tag are
    /// re-stamped, and uniqueness is re-checked against all other records of
    /// the type. Returns `None` when no record with that id exists.
    fn update(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        resource: Resource,
    ) -> Result<Option<Resource>, Self::Error>;

    /// Delete a record by id. Returns whether a record was removed.
    fn delete(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        id: &str,
    ) -> Result<bool, Self::Error>;

    /// Run the query pipeline: filter, sort, paginate.
    ///
    /// With `resource_type_id` set, only records of that type are
    /// considered. A backend that cannot serve queries across all resource
    /// types reports an unsupported-query-scope error when the scope is
    /// omitted.
    fn query(
        &self,
        tenant_id: &str,
        request: &SearchRequest,
        resource_type_id: Option<&str>,
    ) -> Result<QueryPage, Self::Error>;
}
