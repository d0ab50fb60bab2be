//! Normalized resource snapshot, shared by every platform kind.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Health of a single resource, collapsed onto one enumeration for all platforms.
///
/// A platform that never reports a given value simply never produces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    #[default]
    Unknown,
    Healthy,
    Other,
    Unhealthy,
}

impl HealthStatus {
    /// Parse a status name as it appears in JSON snapshots. Unknown names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "HEALTHY" => HealthStatus::Healthy,
            "OTHER" => HealthStatus::Other,
            "UNHEALTHY" => HealthStatus::Unhealthy,
            _ => HealthStatus::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Unknown => "UNKNOWN",
            HealthStatus::Healthy => "HEALTHY",
            HealthStatus::Other => "OTHER",
            HealthStatus::Unhealthy => "UNHEALTHY",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported resource.
///
/// `parent_ids` may reference resources absent from the snapshot; the graph
/// builder treats those as non-existent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub health_status: HealthStatus,
    pub health_description: String,
    pub parent_ids: Vec<String>,

    /// Owner references, informational only.
    pub owner_ids: Vec<String>,

    pub metadata: BTreeMap<String, String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            health_status: HealthStatus::Unknown,
            health_description: String::new(),
            parent_ids: Vec::new(),
            owner_ids: Vec::new(),
            metadata: BTreeMap::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_health(mut self, status: HealthStatus, description: impl Into<String>) -> Self {
        self.health_status = status;
        self.health_description = description.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }
}
