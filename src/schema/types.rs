//! Core schema type definitions for SCIM resources.
//!
//! These structures describe the shape and constraints of a resource type:
//! which attributes exist, their types, whether they are required, and
//! whether their values must be unique. They follow the RFC 7643 attribute
//! vocabulary and deserialize from standard SCIM schema documents.

use serde::{Deserialize, Serialize};

/// A SCIM schema definition.
///
/// Immutable once registered. Each schema defines the attributes of a
/// resource type (or of a schema extension) and their characteristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier (URI)
    pub id: String,
    /// Human-readable schema name
    pub name: String,
    /// Schema description
    #[serde(default)]
    pub description: String,
    /// Attribute definitions, in declaration order
    pub attributes: Vec<AttributeDefinition>,
}

impl Schema {
    /// Look up an attribute definition by name, case-insensitively.
    ///
    /// SCIM attribute names are case-insensitive per RFC 7643 §2.1.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }
}

/// Definition of a single SCIM attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name
    pub name: String,
    /// Data type of the attribute
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values
    #[serde(default)]
    pub multi_valued: bool,
    /// Whether this attribute is required
    #[serde(default)]
    pub required: bool,
    /// Whether string comparison is case-sensitive
    #[serde(default)]
    pub case_exact: bool,
    /// Uniqueness constraint scope
    #[serde(default)]
    pub uniqueness: Uniqueness,
    /// Allowed values for string attributes (empty means unrestricted)
    #[serde(default)]
    pub canonical_values: Vec<String>,
    /// Sub-attributes for complex types
    #[serde(default)]
    pub sub_attributes: Vec<AttributeDefinition>,
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: AttributeType::String,
            multi_valued: false,
            required: false,
            case_exact: false,
            uniqueness: Uniqueness::None,
            canonical_values: Vec::new(),
            sub_attributes: Vec::new(),
        }
    }
}

impl AttributeDefinition {
    /// Shorthand for a plain optional string attribute.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// SCIM attribute data types as defined in RFC 7643.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    /// String value
    #[default]
    String,
    /// Boolean value
    Boolean,
    /// Decimal number
    Decimal,
    /// Integer number
    Integer,
    /// DateTime in RFC3339 format
    DateTime,
    /// Binary data (base64 encoded)
    Binary,
    /// URI reference
    Reference,
    /// Complex attribute with sub-attributes
    Complex,
}

/// Scope of an attribute's uniqueness constraint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    /// No uniqueness constraint
    #[default]
    None,
    /// Unique within the server
    Server,
    /// Globally unique
    Global,
}

/// A resource type: a named category of record with a base schema, optional
/// schema extensions and an endpoint path.
///
/// Immutable once registered. Registration fails if the base schema or any
/// extension schema is unknown to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// Resource type identifier (e.g. "User")
    pub id: String,
    /// Display name, stamped into `meta.resourceType` of its records
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Endpoint path relative to the service root (e.g. "/Users")
    pub endpoint: String,
    /// Base schema URI
    pub schema: String,
    /// Schema extensions
    #[serde(default)]
    pub schema_extensions: Vec<SchemaExtension>,
}

/// Reference to a schema extension of a resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaExtension {
    /// Extension schema URI
    pub schema: String,
    /// Whether the extension block must be present on every record
    #[serde(default)]
    pub required: bool,
}
