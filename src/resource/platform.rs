use crate::graph::RootRule;
use crate::resource::HealthStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment platform that reported a snapshot.
///
/// Only the health wire codes and the default root rule differ between
/// platforms; the graph, layout and geometry stages never look at this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Application,
    Kubernetes,
    Ecs,
    #[serde(alias = "cloud_run")]
    CloudRun,
    Lambda,
}

impl Platform {
    /// Decode a numeric health code as reported on the wire.
    ///
    /// Code 2 is UNHEALTHY for the generic application state and OTHER for
    /// every platform-specific state.
    pub fn health_from_code(self, code: i64) -> HealthStatus {
        match (self, code) {
            (_, 1) => HealthStatus::Healthy,
            (Platform::Application, 2) => HealthStatus::Unhealthy,
            (_, 2) => HealthStatus::Other,
            _ => HealthStatus::Unknown,
        }
    }

    pub fn default_root_rule(self) -> RootRule {
        match self {
            Platform::Ecs => RootRule::SingleRootFanOut,
            _ => RootRule::Default,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Application => "application",
            Platform::Kubernetes => "kubernetes",
            Platform::Ecs => "ecs",
            Platform::CloudRun => "cloudrun",
            Platform::Lambda => "lambda",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "application" | "app" => Ok(Platform::Application),
            "kubernetes" | "k8s" => Ok(Platform::Kubernetes),
            "ecs" => Ok(Platform::Ecs),
            "cloudrun" | "cloud_run" => Ok(Platform::CloudRun),
            "lambda" => Ok(Platform::Lambda),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}
