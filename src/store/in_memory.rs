//! In-memory resource store.
//!
//! The reference backend: tenant-partitioned record collections guarded by a
//! single process-wide mutex. Every operation (registration, CRUD, query)
//! holds the lock for its full duration, so operations are atomic with
//! respect to each other across all tenants. Scans are linear in tenant
//! record count; the implementation trades throughput for correctness
//! simplicity and is not meant for large record sets.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use super::unique::{self, UniquenessDescriptor};
use super::{QueryPage, ResourceStore, SearchRequest, SortOrder};
use crate::error::{StoreError, StoreResult};
use crate::filter::{self, AttrPath};
use crate::resource::{Meta, Resource};
use crate::schema::{ResourceType, Schema, SchemaRegistry};

#[derive(Debug, Default)]
struct StoreState {
    registry: SchemaRegistry,
    unique_attributes: HashMap<String, Vec<UniquenessDescriptor>>,
    // tenant id -> records, in insertion order
    partitions: HashMap<String, Vec<Resource>>,
}

/// Thread-safe in-memory implementation of [`ResourceStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another caller panicked mid-operation;
    // state mutations happen after all checks pass, so the data is intact.
    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreState {
    fn resource_type(&self, resource_type_id: &str) -> StoreResult<ResourceType> {
        self.registry
            .resource_type(resource_type_id)
            .cloned()
            .ok_or_else(|| StoreError::unknown_resource_type(resource_type_id))
    }

    fn validate(&self, resource_type_id: &str, resource: &Resource) -> StoreResult<()> {
        let model = self
            .registry
            .model(resource_type_id)
            .ok_or_else(|| StoreError::unknown_resource_type(resource_type_id))?;
        model.validate(resource.data())?;
        Ok(())
    }

    fn partition(&self, tenant_id: &str) -> &[Resource] {
        self.partitions
            .get(tenant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn descriptors(&self, resource_type_id: &str) -> &[UniquenessDescriptor] {
        self.unique_attributes
            .get(resource_type_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check the candidate against every other stored record of the same
    /// type in the tenant. `exclude_id` skips the record being updated.
    fn enforce_uniqueness(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        candidate: &Resource,
        exclude_id: Option<&str>,
    ) -> StoreResult<()> {
        for descriptor in self.descriptors(resource_type_id) {
            let Some(candidate_value) = descriptor.value_of(candidate) else {
                continue;
            };
            for existing in self
                .partition(tenant_id)
                .iter()
                .filter(|record| record.resource_type() == resource_type_id)
            {
                if exclude_id.is_some_and(|id| existing.id() == Some(id)) {
                    continue;
                }
                if descriptor.value_of(existing).as_deref() == Some(candidate_value.as_str()) {
                    warn!(
                        "uniqueness conflict on '{}' for resource type '{}' in tenant '{}'",
                        descriptor.attribute(),
                        resource_type_id,
                        tenant_id
                    );
                    return Err(StoreError::uniqueness_conflict(
                        descriptor.attribute(),
                        candidate_value,
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ResourceStore for InMemoryStore {
    type Error = StoreError;

    fn register_schema(&self, schema: Schema) -> StoreResult<()> {
        let mut state = self.state();
        debug!("registering schema '{}'", schema.id);
        state.registry.register_schema(schema);
        Ok(())
    }

    fn register_resource_type(&self, resource_type: ResourceType) -> StoreResult<()> {
        let mut state = self.state();
        let resource_type_id = resource_type.id.clone();
        debug!("registering resource type '{resource_type_id}'");
        state.registry.register_resource_type(resource_type)?;
        let descriptors = state
            .registry
            .model(&resource_type_id)
            .map(unique::for_resource_type)
            .unwrap_or_default();
        state.unique_attributes.insert(resource_type_id, descriptors);
        Ok(())
    }

    fn create(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        resource: Resource,
    ) -> StoreResult<Resource> {
        let mut state = self.state();
        let resource_type = state.resource_type(resource_type_id)?;

        let mut record = Resource::new(resource_type_id, resource.into_data())?;
        state.validate(resource_type_id, &record)?;

        let id = Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let location = format!("/v2{}/{}", resource_type.endpoint, id);
        record.set_id(&id);
        record.set_meta(&Meta::for_created(&resource_type.name, now, location));

        state.enforce_uniqueness(tenant_id, resource_type_id, &record, None)?;

        state
            .partitions
            .entry(tenant_id.to_string())
            .or_default()
            .push(record.clone());
        debug!("created {resource_type_id}/{id} in tenant '{tenant_id}'");
        Ok(record)
    }

    fn get(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        id: &str,
    ) -> StoreResult<Option<Resource>> {
        let state = self.state();
        Ok(state
            .partition(tenant_id)
            .iter()
            .find(|record| {
                record.resource_type() == resource_type_id && record.id() == Some(id)
            })
            .cloned())
    }

    fn update(
        &self,
        tenant_id: &str,
        resource_type_id: &str,
        resource: Resource,
    ) -> StoreResult<Option<Resource>> {
        let mut state = self.state();
        let resource_type = state.resource_type(resource_type_id)?;

        let Some(id) = resource.id().map(str::to_string) else {
            return Ok(None);
        };
        let Some(index) = state.partition(tenant_id).iter().position(|record| {
            record.resource_type() == resource_type_id && record.id() == Some(id.as_str())
        }) else {
            return Ok(None);
        };

        // Full-replace semantics: the incoming document wins, re-validated
        // from scratch; only the system-managed meta fields carry over.
        let mut record = Resource::new(resource_type_id, resource.into_data())?;
        state.validate(resource_type_id, &record)?;

        let now = Utc::now();
        let mut meta = match state.partition(tenant_id)[index].meta() {
            Some(meta) => meta,
            None => Meta::for_created(
                &resource_type.name,
                now,
                format!("/v2{}/{}", resource_type.endpoint, id),
            ),
        };
        meta.touch(now);
        record.set_id(&id);
        record.set_meta(&meta);

        state.enforce_uniqueness(tenant_id, resource_type_id, &record, Some(&id))?;

        if let Some(partition) = state.partitions.get_mut(tenant_id) {
            partition[index] = record.clone();
        }
        debug!("updated {resource_type_id}/{id} in tenant '{tenant_id}'");
        Ok(Some(record))
    }

    fn delete(&self, tenant_id: &str, resource_type_id: &str, id: &str) -> StoreResult<bool> {
        let mut state = self.state();
        let Some(partition) = state.partitions.get_mut(tenant_id) else {
            return Ok(false);
        };
        let Some(index) = partition.iter().position(|record| {
            record.resource_type() == resource_type_id && record.id() == Some(id)
        }) else {
            return Ok(false);
        };
        partition.remove(index);
        debug!("deleted {resource_type_id}/{id} from tenant '{tenant_id}'");
        Ok(true)
    }

    fn query(
        &self,
        tenant_id: &str,
        request: &SearchRequest,
        resource_type_id: Option<&str>,
    ) -> StoreResult<QueryPage> {
        let state = self.state();
        if let Some(resource_type_id) = resource_type_id {
            // Surface a configuration mistake instead of an empty result.
            state.resource_type(resource_type_id)?;
        }

        let tree = request
            .filter
            .as_deref()
            .map(filter::parse)
            .transpose()
            .map_err(|err| StoreError::invalid_filter(err.to_string()))?;

        let mut matched: Vec<&Resource> = state
            .partition(tenant_id)
            .iter()
            .filter(|record| {
                resource_type_id.is_none_or(|scope| record.resource_type() == scope)
            })
            .filter(|record| tree.as_ref().is_none_or(|tree| filter::evaluate(tree, record)))
            .collect();

        if let Some(sort_by) = &request.sort_by {
            matched = sorted(matched, sort_by, request.sort_order.unwrap_or_default());
        }

        let total_results = matched.len();
        let skip = request.start_index.unwrap_or(1).saturating_sub(1);
        let resources: Vec<Resource> = matched
            .into_iter()
            .skip(skip)
            .take(request.count.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        debug!(
            "query in tenant '{tenant_id}' matched {total_results} records, returning {}",
            resources.len()
        );
        Ok(QueryPage {
            total_results,
            resources,
        })
    }
}

/// Sort records by an attribute path with absent keys last.
///
/// Records are split into key-present and key-absent subsets, each keeping
/// its relative order. Ascending order is the present subset stable-sorted
/// by key, then the absent subset. Descending order mirrors that: absent
/// records first, then the present subset sorted with the comparator
/// flipped. Flipping the comparator rather than reversing the sorted
/// vector keeps ties in insertion order.
fn sorted<'a>(records: Vec<&'a Resource>, sort_by: &str, order: SortOrder) -> Vec<&'a Resource> {
    let path = AttrPath::parse(sort_by);
    let mut keyed: Vec<(&Resource, &serde_json::Value)> = Vec::new();
    let mut unkeyed: Vec<&Resource> = Vec::new();

    for record in records {
        match filter::resolve_path(record.data(), &path).first() {
            Some(key) => keyed.push((record, key)),
            None => unkeyed.push(record),
        }
    }

    match order {
        SortOrder::Ascending => {
            keyed.sort_by(|a, b| filter::total_order(a.1, b.1));
            keyed.iter().map(|(r, _)| *r).chain(unkeyed).collect()
        }
        SortOrder::Descending => {
            keyed.sort_by(|a, b| filter::total_order(b.1, a.1));
            unkeyed
                .into_iter()
                .chain(keyed.iter().map(|(r, _)| *r))
                .collect()
        }
    }
}
