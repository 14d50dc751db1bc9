//! Record validation against composed resource-type models.
//!
//! Checks the shape of a resource document: required attributes, single vs
//! multi-valued structure, leaf value types, canonical values, complex
//! sub-attributes, and extension sub-objects. System attributes (`schemas`,
//! `id`, `externalId`, `meta`) are stamped or managed by the store and are
//! not validated here.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

use super::registry::CompositeModel;
use super::types::{AttributeDefinition, AttributeType};
use crate::error::{ValidationError, ValidationResult};

const SYSTEM_ATTRIBUTES: &[&str] = &["schemas", "id", "externalId", "meta"];

/// Validate a resource document against a composed model.
pub(super) fn validate_document(model: &CompositeModel, data: &Value) -> ValidationResult<()> {
    let obj = data.as_object().ok_or(ValidationError::NotAnObject)?;

    validate_attributes(&model.base().attributes, obj)?;

    for (extension, schema) in model.extensions() {
        match lookup(obj, &extension.schema) {
            Some(Value::Object(ext_obj)) => validate_attributes(&schema.attributes, ext_obj)?,
            Some(Value::Null) | None => {
                if extension.required {
                    return Err(ValidationError::MissingRequiredExtension {
                        schema_id: extension.schema.clone(),
                    });
                }
            }
            Some(_) => {
                return Err(ValidationError::InvalidExtensionStructure {
                    schema_id: extension.schema.clone(),
                });
            }
        }
    }

    Ok(())
}

fn validate_attributes(
    attributes: &[AttributeDefinition],
    obj: &Map<String, Value>,
) -> ValidationResult<()> {
    for attr in attributes {
        let value = lookup(obj, &attr.name);
        match value {
            None | Some(Value::Null) => {
                if attr.required {
                    return Err(ValidationError::missing_required(&attr.name));
                }
            }
            Some(value) if attr.multi_valued => {
                let items = value
                    .as_array()
                    .ok_or_else(|| ValidationError::ExpectedMultiValue {
                        attribute: attr.name.clone(),
                    })?;
                for item in items {
                    validate_single(attr, item)?;
                }
            }
            Some(value) => {
                if value.is_array() {
                    return Err(ValidationError::ExpectedSingleValue {
                        attribute: attr.name.clone(),
                    });
                }
                validate_single(attr, value)?;
            }
        }
    }
    Ok(())
}

fn validate_single(attr: &AttributeDefinition, value: &Value) -> ValidationResult<()> {
    match attr.data_type {
        AttributeType::String | AttributeType::Reference | AttributeType::Binary => {
            let s = value
                .as_str()
                .ok_or_else(|| type_error(attr, "string", value))?;
            if !attr.canonical_values.is_empty()
                && !attr
                    .canonical_values
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(s))
            {
                return Err(ValidationError::InvalidCanonicalValue {
                    attribute: attr.name.clone(),
                    value: s.to_string(),
                    allowed: attr.canonical_values.clone(),
                });
            }
        }
        AttributeType::DateTime => {
            let s = value
                .as_str()
                .ok_or_else(|| type_error(attr, "dateTime", value))?;
            // chrono's RFC3339 parser does the semantic checks (leap days,
            // timezone offsets) so none of that is reimplemented here.
            if DateTime::<FixedOffset>::parse_from_rfc3339(s).is_err() {
                return Err(type_error(attr, "dateTime", value));
            }
        }
        AttributeType::Boolean => {
            if !value.is_boolean() {
                return Err(type_error(attr, "boolean", value));
            }
        }
        AttributeType::Integer => {
            if !value.as_number().is_some_and(|n| n.is_i64() || n.is_u64()) {
                return Err(type_error(attr, "integer", value));
            }
        }
        AttributeType::Decimal => {
            if !value.is_number() {
                return Err(type_error(attr, "decimal", value));
            }
        }
        AttributeType::Complex => {
            let obj = value
                .as_object()
                .ok_or_else(|| type_error(attr, "complex", value))?;
            validate_attributes(&attr.sub_attributes, obj)?;
        }
    }
    Ok(())
}

/// Case-insensitive attribute lookup, skipping system attributes so schemas
/// cannot shadow them.
fn lookup<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if SYSTEM_ATTRIBUTES.iter().any(|sys| sys.eq_ignore_ascii_case(name)) {
        return None;
    }
    obj.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

fn type_error(attr: &AttributeDefinition, expected: &str, value: &Value) -> ValidationError {
    ValidationError::invalid_type(&attr.name, expected, value_type_name(value))
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "decimal",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::schema::{
        AttributeDefinition, AttributeType, ResourceType, Schema, SchemaExtension, SchemaRegistry,
    };
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.register_schema(Schema {
            id: "urn:example:schemas:User".into(),
            name: "User".into(),
            description: String::new(),
            attributes: vec![
                AttributeDefinition {
                    name: "userName".into(),
                    required: true,
                    ..AttributeDefinition::default()
                },
                AttributeDefinition {
                    name: "active".into(),
                    data_type: AttributeType::Boolean,
                    ..AttributeDefinition::default()
                },
                AttributeDefinition {
                    name: "emails".into(),
                    multi_valued: true,
                    data_type: AttributeType::Complex,
                    sub_attributes: vec![
                        AttributeDefinition::string("value"),
                        AttributeDefinition {
                            name: "type".into(),
                            canonical_values: vec!["work".into(), "home".into()],
                            ..AttributeDefinition::default()
                        },
                    ],
                    ..AttributeDefinition::default()
                },
            ],
        });
        registry.register_schema(Schema {
            id: "urn:example:schemas:Enterprise".into(),
            name: "EnterpriseUser".into(),
            description: String::new(),
            attributes: vec![AttributeDefinition::string("employeeNumber")],
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
        registry
    }

    #[test]
    fn test_valid_document_passes() {
        let registry = registry();
        let model = registry.model("User").unwrap();
        let doc = json!({
            "userName": "alice",
            "active": true,
            "emails": [{"value": "alice@example.com", "type": "work"}],
            "urn:example:schemas:Enterprise": {"employeeNumber": "42"}
        });
        model.validate(&doc).unwrap();
    }

    #[test]
    fn test_missing_required_attribute() {
        let registry = registry();
        let model = registry.model("User").unwrap();
        let err = model.validate(&json!({"active": true})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingRequiredAttribute { .. }
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let model = registry.model("User").unwrap();
        let err = model
            .validate(&json!({"userName": "alice", "active": "yes"}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAttributeType { .. }));
    }

    #[test]
    fn test_multi_valued_shape() {
        let registry = registry();
        let model = registry.model("User").unwrap();
        let err = model
            .validate(&json!({"userName": "alice", "emails": {"value": "x"}}))
            .unwrap_err();
        assert!(matches!(err, ValidationError::ExpectedMultiValue { .. }));
    }

    #[test]
    fn test_canonical_value_enforced() {
        let registry = registry();
        let model = registry.model("User").unwrap();
        let err = model
            .validate(&json!({
                "userName": "alice",
                "emails": [{"value": "x", "type": "carrier-pigeon"}]
            }))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCanonicalValue { .. }));
    }

    #[test]
    fn test_required_extension() {
        let mut registry = SchemaRegistry::new();
        registry.register_schema(Schema {
            id: "urn:example:schemas:User".into(),
            name: "User".into(),
            description: String::new(),
            attributes: vec![AttributeDefinition::string("userName")],
        });
        registry.register_schema(Schema {
            id: "urn:example:schemas:Enterprise".into(),
            name: "EnterpriseUser".into(),
            description: String::new(),
            attributes: vec![AttributeDefinition::string("employeeNumber")],
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
                    required: true,
                }],
            })
            .unwrap();

        let model = registry.model("User").unwrap();
        let err = model.validate(&json!({"userName": "alice"})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingRequiredExtension { .. }
        ));
    }
}
