//! Error types for resource store operations.
//!
//! The taxonomy distinguishes fatal configuration errors (raised during
//! registration, before any request handling) from request-level failures
//! (uniqueness conflicts, validation failures, malformed filters). Absence
//! of a record is never an error: `get`, `update` and `delete` report it
//! through their return values.

/// Main error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A resource type referenced a schema that was never registered.
    /// Raised at registration time; fatal configuration error.
    #[error("Unknown schema: {schema_id}")]
    UnknownSchema { schema_id: String },

    /// An operation named a resource type that was never registered.
    #[error("Unknown resource type: {resource_type_id}")]
    UnknownResourceType { resource_type_id: String },

    /// Resource data does not conform to the composed model of its type.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A constrained attribute collides with another record of the same
    /// resource type in the same tenant.
    #[error("Attribute '{attribute}' violates a uniqueness constraint with value '{value}'")]
    UniquenessConflict { attribute: String, value: String },

    /// The filter expression of a search request could not be parsed.
    #[error("Invalid filter: {message}")]
    InvalidFilter { message: String },

    /// The backend only supports querying a single resource type at a time
    /// and the caller omitted the resource-type scope.
    #[error("Backend does not support queries spanning multiple resource types")]
    UnsupportedQueryScope,
}

impl StoreError {
    /// Create an unknown-schema configuration error.
    pub fn unknown_schema(schema_id: impl Into<String>) -> Self {
        Self::UnknownSchema {
            schema_id: schema_id.into(),
        }
    }

    /// Create an unknown-resource-type error.
    pub fn unknown_resource_type(resource_type_id: impl Into<String>) -> Self {
        Self::UnknownResourceType {
            resource_type_id: resource_type_id.into(),
        }
    }

    /// Create a uniqueness-conflict error for a constrained attribute.
    pub fn uniqueness_conflict(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UniquenessConflict {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an invalid-filter error.
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }
}

/// Validation errors for schema compliance checking.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Resource document is not a JSON object
    #[error("Resource must be a JSON object")]
    NotAnObject,

    /// Required attribute is missing
    #[error("Required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Attribute value doesn't match the declared type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Multi-valued attribute provided as a single value
    #[error("Attribute '{attribute}' must be multi-valued (array)")]
    ExpectedMultiValue { attribute: String },

    /// Single-valued attribute provided as an array
    #[error("Attribute '{attribute}' must be single-valued (not array)")]
    ExpectedSingleValue { attribute: String },

    /// Value outside the canonical set declared for the attribute
    #[error("Attribute '{attribute}' has invalid value '{value}', allowed values: {allowed:?}")]
    InvalidCanonicalValue {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A required schema extension block is missing from the document
    #[error("Required schema extension '{schema_id}' is missing")]
    MissingRequiredExtension { schema_id: String },

    /// A schema extension block is present but is not a JSON object
    #[error("Schema extension '{schema_id}' must be a JSON object")]
    InvalidExtensionStructure { schema_id: String },
}

impl ValidationError {
    /// Create a missing required attribute error.
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid type error.
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

// Result type aliases for convenience
pub type StoreResult<T> = Result<T, StoreError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
