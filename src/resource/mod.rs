//! Record representation: a resource-type tag over a JSON document.
//!
//! Identity records keep their attributes in a `serde_json` document so that
//! arbitrary schemas and extensions need no dedicated Rust types. The `id`
//! and `meta` system attributes live inside the document; typed accessors
//! read and stamp them. Records handed out by the store are owned values, so
//! mutating a returned record never touches stored state.

pub mod meta;
pub mod version;

pub use meta::Meta;
pub use version::Version;

use serde_json::{Map, Value};

use crate::error::{ValidationError, ValidationResult};

/// A structured identity record scoped to a resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    resource_type: String,
    data: Value,
}

impl Resource {
    /// Wrap a JSON document as a record of the given resource type.
    ///
    /// The document must be a JSON object.
    pub fn new(resource_type: impl Into<String>, data: Value) -> ValidationResult<Self> {
        if !data.is_object() {
            return Err(ValidationError::NotAnObject);
        }
        Ok(Self {
            resource_type: resource_type.into(),
            data,
        })
    }

    /// The resource-type id this record belongs to.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The underlying JSON document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Consume the record, returning its JSON document.
    pub fn into_data(self) -> Value {
        self.data
    }

    /// The record identifier, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.data.get("id").and_then(Value::as_str)
    }

    /// The meta block, if stamped.
    pub fn meta(&self) -> Option<Meta> {
        self.data
            .get("meta")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Top-level attribute lookup by name, case-insensitive per RFC 7643.
    /// Absent attributes and explicit nulls both resolve to `None`.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        attribute_of(&self.data, name)
    }

    pub(crate) fn set_id(&mut self, id: &str) {
        if let Some(obj) = self.data.as_object_mut() {
            obj.insert("id".into(), Value::String(id.to_string()));
        }
    }

    pub(crate) fn set_meta(&mut self, meta: &Meta) {
        if let Some(obj) = self.data.as_object_mut() {
            obj.insert("meta".into(), meta.to_value());
        }
    }
}

/// Case-insensitive attribute lookup on a JSON object value.
pub(crate) fn attribute_of<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let obj: &Map<String, Value> = value.as_object()?;
    obj.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
        .filter(|v| !v.is_null())
}
