//! Uniqueness descriptors: precomputed recipes for duplicate detection.
//!
//! A descriptor names one uniqueness-constrained attribute of a resource
//! type and knows how to extract and normalize its value from a record. The
//! descriptor set is derived once when the resource type is registered, by
//! scanning the base schema and every extension schema; extension-owned
//! attributes carry the extension URN so the right sub-object is read at
//! comparison time.

use serde_json::Value;

use crate::resource::{Resource, attribute_of};
use crate::schema::registry::CompositeModel;
use crate::schema::types::{AttributeDefinition, Uniqueness};

/// Recipe for extracting one comparable value from a record.
#[derive(Debug, Clone)]
pub struct UniquenessDescriptor {
    /// Owning extension schema URN, if the attribute lives in an extension
    schema: Option<String>,
    /// Attribute name
    attribute: String,
    /// Whether comparison is case-sensitive
    case_exact: bool,
}

impl UniquenessDescriptor {
    /// The constrained attribute's name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Extract the normalized comparison value from a record.
    ///
    /// Returns `None` when the attribute (or its extension block) is absent;
    /// an absent value cannot collide with anything.
    pub fn value_of(&self, record: &Resource) -> Option<String> {
        let scope = match &self.schema {
            Some(urn) => attribute_of(record.data(), urn)?,
            None => record.data(),
        };
        let rendered = match attribute_of(scope, &self.attribute)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if self.case_exact {
            Some(rendered)
        } else {
            Some(rendered.to_lowercase())
        }
    }
}

/// Derive the descriptor set for a resource type from its composed model.
pub(crate) fn for_resource_type(model: &CompositeModel) -> Vec<UniquenessDescriptor> {
    let mut descriptors = collect(&model.base().attributes, None);
    for (extension, schema) in model.extensions() {
        descriptors.extend(collect(&schema.attributes, Some(extension.schema.clone())));
    }
    descriptors
}

fn collect(
    attributes: &[AttributeDefinition],
    schema: Option<String>,
) -> Vec<UniquenessDescriptor> {
    attributes
        .iter()
        .filter(|attr| attr.uniqueness != Uniqueness::None)
        .map(|attr| UniquenessDescriptor {
            schema: schema.clone(),
            attribute: attr.name.clone(),
            case_exact: attr.case_exact,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        AttributeDefinition, ResourceType, Schema, SchemaExtension, SchemaRegistry,
    };
    use serde_json::json;

    fn model() -> (SchemaRegistry, &'static str) {
        let mut registry = SchemaRegistry::new();
        registry.register_schema(Schema {
            id: "urn:example:schemas:User".into(),
            name: "User".into(),
            description: String::new(),
            attributes: vec![
                AttributeDefinition {
                    name: "userName".into(),
                    uniqueness: Uniqueness::Server,
                    case_exact: false,
                    ..AttributeDefinition::default()
                },
                AttributeDefinition::string("displayName"),
            ],
        });
        registry.register_schema(Schema {
            id: "urn:example:schemas:Enterprise".into(),
            name: "EnterpriseUser".into(),
            description: String::new(),
            attributes: vec![AttributeDefinition {
                name: "employeeNumber".into(),
                uniqueness: Uniqueness::Server,
                case_exact: true,
                ..AttributeDefinition::default()
            }],
        });
        registry
            .register_resource_type(ResourceType {
                id: "User".into(),
                name: "User".into(),
                description: String::new(),
                endpoint: "/Users".into(),
                schema: "urn:example:schemas:User".into(),
                schema_extensions: vec![SchemaExtension {
                    schema: "urn:example:schemas:Enterprise".into(),
                    required: false,
                }],
            })
            .unwrap();
        (registry, "User")
    }

    #[test]
    fn test_descriptor_derivation_spans_extensions() {
        let (registry, type_id) = model();
        let descriptors = for_resource_type(registry.model(type_id).unwrap());
        let names: Vec<_> = descriptors.iter().map(|d| d.attribute()).collect();
        assert_eq!(names, vec!["userName", "employeeNumber"]);
    }

    #[test]
    fn test_case_insensitive_normalization() {
        let (registry, type_id) = model();
        let descriptors = for_resource_type(registry.model(type_id).unwrap());
        let record = Resource::new("User", json!({"userName": "Alice"})).unwrap();
        assert_eq!(descriptors[0].value_of(&record), Some("alice".into()));
    }

    #[test]
    fn test_case_exact_extension_value() {
        let (registry, type_id) = model();
        let descriptors = for_resource_type(registry.model(type_id).unwrap());
        let record = Resource::new(
            "User",
            json!({
                "userName": "alice",
                "urn:example:schemas:Enterprise": {"employeeNumber": "E42x"}
            }),
        )
        .unwrap();
        assert_eq!(descriptors[1].value_of(&record), Some("E42x".into()));
    }

    #[test]
    fn test_absent_value_extracts_nothing() {
        let (registry, type_id) = model();
        let descriptors = for_resource_type(registry.model(type_id).unwrap());
        let record = Resource::new("User", json!({"displayName": "Alice"})).unwrap();
        assert_eq!(descriptors[0].value_of(&record), None);
        assert_eq!(descriptors[1].value_of(&record), None);
    }
}
