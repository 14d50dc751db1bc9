//! The `meta` block stamped onto every stored record.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::version::Version;

/// System metadata for a stored record: resource-type tag, creation and
/// last-modified timestamps, version tag and location path.
///
/// Serializes to the SCIM camelCase wire form. The store owns every field;
/// caller-supplied meta is discarded on create and overwritten on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Name of the resource type this record belongs to
    pub resource_type: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last-modified timestamp
    pub last_modified: DateTime<Utc>,
    /// Location path of the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Weak-validator version tag derived from `last_modified`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Meta {
    /// Build the meta block for a newly created record.
    pub fn for_created(resource_type: impl Into<String>, now: DateTime<Utc>, location: String) -> Self {
        Self {
            resource_type: resource_type.into(),
            created: now,
            last_modified: now,
            location: Some(location),
            version: Some(Version::from_timestamp(now).to_string()),
        }
    }

    /// Re-stamp `last_modified` and the derived version tag.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
        self.version = Some(Version::from_timestamp(now).to_string());
    }

    /// Render as a JSON value for embedding in a record document.
    pub fn to_value(&self) -> Value {
        let mut obj = json!({
            "resourceType": self.resource_type,
            "created": self.created.to_rfc3339_opts(SecondsFormat::Millis, true),
            "lastModified": self.last_modified.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        if let (Some(map), Some(location)) = (obj.as_object_mut(), &self.location) {
            map.insert("location".into(), Value::String(location.clone()));
        }
        if let (Some(map), Some(version)) = (obj.as_object_mut(), &self.version) {
            map.insert("version".into(), Value::String(version.clone()));
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_meta_roundtrip() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let meta = Meta::for_created("User", now, "/v2/Users/abc".into());
        let value = meta.to_value();
        let parsed: Meta = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, meta);
        assert_eq!(parsed.created, parsed.last_modified);
    }

    #[test]
    fn test_touch_restamps_version() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut meta = Meta::for_created("User", created, "/v2/Users/abc".into());
        let original_version = meta.version.clone();

        let later = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        meta.touch(later);
        assert_eq!(meta.created, created);
        assert_eq!(meta.last_modified, later);
        assert_ne!(meta.version, original_version);
    }
}
