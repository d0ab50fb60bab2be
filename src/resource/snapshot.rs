//! Snapshot decoding: raw JSON resource lists into normalized `ResourceState`s.
//!
//! JSON shape (either form is accepted):
//! [
//!   { "id": "...", "kind": "Pod", "name": "...", "healthStatus": "HEALTHY",
//!     "healthDescription": "", "parentIds": ["..."],
//!     "metadata": [["Namespace", "default"]] },
//!   ...
//! ]
//! or
//! { "version": { "timestamp": 1700000000, "index": 3 },
//!   "platform": "kubernetes",
//!   "resources": [ ... ] }
//!
//! The generated client field names (`resourceType`, `parentIdsList`,
//! `ownerIdsList`, `resourceMetadataMap`) are accepted as aliases.

use crate::resource::{HealthStatus, Platform, ResourceState};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Identity of one resource collection (deployment, version tab...).
///
/// Filter state survives snapshots with the same key and is reset when it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionKey(pub String);

impl CollectionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotVersion {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub index: i64,
}

impl SnapshotVersion {
    pub fn collection_key(&self) -> CollectionKey {
        CollectionKey(format!("{}-{}", self.timestamp, self.index))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SnapshotFile {
    // A struct also accepts a sequence, so the bare list must be tried first.
    List(Vec<RawResource>),
    Envelope(SnapshotEnvelope),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotEnvelope {
    #[serde(default)]
    pub version: Option<SnapshotVersion>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default, alias = "resourcesList")]
    pub resources: Vec<RawResource>,
}

/// Raw resource shape as it appears in snapshot JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResource {
    pub id: String,

    #[serde(default, alias = "resourceType")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub health_status: Option<RawHealth>,

    #[serde(default)]
    pub health_description: String,

    #[serde(default, alias = "parentIdsList")]
    pub parent_ids: Vec<String>,

    #[serde(default, alias = "ownerIdsList")]
    pub owner_ids: Vec<String>,

    #[serde(default, alias = "resourceMetadataMap")]
    pub metadata: Vec<(String, String)>,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub updated_at: i64,
}

/// Health as reported: either the status name or the platform's numeric code.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawHealth {
    Code(i64),
    Name(String),
}

impl RawHealth {
    fn resolve(&self, platform: Platform) -> HealthStatus {
        match self {
            RawHealth::Code(code) => platform.health_from_code(*code),
            RawHealth::Name(name) => HealthStatus::from_name(name),
        }
    }
}

impl RawResource {
    pub fn into_resource(self, platform: Platform) -> ResourceState {
        let health_status = self
            .health_status
            .as_ref()
            .map(|h| h.resolve(platform))
            .unwrap_or_default();

        let metadata: BTreeMap<String, String> = self.metadata.into_iter().collect();

        ResourceState {
            id: self.id,
            kind: self.kind,
            name: self.name,
            health_status,
            health_description: self.health_description,
            parent_ids: self.parent_ids,
            owner_ids: self.owner_ids,
            metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A decoded snapshot, resources kept in reported order.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub platform: Platform,
    pub version: Option<SnapshotVersion>,
    pub resources: Vec<ResourceState>,
}

impl Snapshot {
    /// Decode snapshot JSON. `platform` is used when the file does not name one.
    pub fn from_json(text: &str, platform: Platform) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(text).map_err(Error::Snapshot)?;
        Ok(Self::from_file(file, platform))
    }

    pub fn from_path(path: impl AsRef<Path>, platform: Platform) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, platform)
    }

    fn from_file(file: SnapshotFile, platform: Platform) -> Self {
        let (platform, version, raw) = match file {
            SnapshotFile::List(raw) => (platform, None, raw),
            SnapshotFile::Envelope(env) => {
                (env.platform.unwrap_or(platform), env.version, env.resources)
            }
        };

        let resources = raw
            .into_iter()
            .map(|r| r.into_resource(platform))
            .collect();

        Self {
            platform,
            version,
            resources,
        }
    }

    /// Collection identity: the snapshot version when present, else the platform name.
    pub fn collection_key(&self) -> CollectionKey {
        match &self.version {
            Some(v) => v.collection_key(),
            None => CollectionKey::new(self.platform.as_str()),
        }
    }

    /// Kinds with their resource counts, sorted by kind.
    pub fn kind_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.resources {
            *counts.entry(r.kind.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_bare_list_with_names() {
        let text = r#"[
            {"id": "svc", "kind": "Service", "name": "web", "healthStatus": "HEALTHY",
             "parentIds": [], "metadata": [["Namespace", "default"]]},
            {"id": "pod1", "kind": "Pod", "name": "web-1", "healthStatus": "UNHEALTHY",
             "healthDescription": "readiness check failed", "parentIds": ["svc"]}
        ]"#;
        let snap = Snapshot::from_json(text, Platform::Kubernetes).unwrap();

        assert_eq!(snap.platform, Platform::Kubernetes);
        assert_eq!(snap.resources.len(), 2);
        assert_eq!(snap.resources[0].health_status, HealthStatus::Healthy);
        assert_eq!(
            snap.resources[0].metadata.get("Namespace").map(String::as_str),
            Some("default")
        );
        assert_eq!(snap.resources[1].health_status, HealthStatus::Unhealthy);
        assert_eq!(snap.resources[1].parent_ids, vec!["svc".to_string()]);
    }

    #[test]
    fn envelope_platform_drives_numeric_codes() {
        let text = r#"{
            "version": {"timestamp": 1700000000, "index": 4},
            "platform": "application",
            "resourcesList": [
                {"id": "a", "resourceType": "KUBERNETES", "healthStatus": 2,
                 "parentIdsList": [], "resourceMetadataMap": [["Kind", "Deployment"]]}
            ]
        }"#;
        let snap = Snapshot::from_json(text, Platform::Kubernetes).unwrap();

        assert_eq!(snap.platform, Platform::Application);
        assert_eq!(snap.resources[0].kind, "KUBERNETES");
        assert_eq!(snap.resources[0].health_status, HealthStatus::Unhealthy);
        assert_eq!(snap.collection_key(), CollectionKey::new("1700000000-4"));
    }

    #[test]
    fn missing_optional_fields_default() {
        let snap = Snapshot::from_json(r#"[{"id": "x"}]"#, Platform::Lambda).unwrap();
        let r = &snap.resources[0];

        assert_eq!(r.kind, "");
        assert_eq!(r.health_status, HealthStatus::Unknown);
        assert!(r.parent_ids.is_empty());
        assert_eq!(snap.collection_key(), CollectionKey::new("lambda"));
    }

    #[test]
    fn malformed_json_is_a_snapshot_error() {
        let err = Snapshot::from_json("{not json", Platform::Ecs).unwrap_err();
        assert!(matches!(err, Error::Snapshot(_)));
    }

    #[test]
    fn counts_kinds() {
        let text = r#"[{"id": "a", "kind": "Pod"}, {"id": "b", "kind": "Pod"}, {"id": "c", "kind": "Service"}]"#;
        let snap = Snapshot::from_json(text, Platform::Kubernetes).unwrap();
        let counts: Vec<(&str, usize)> = snap.kind_counts().into_iter().collect();

        assert_eq!(counts, vec![("Pod", 2), ("Service", 1)]);
    }
}
