use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value {field} = {value}: {expected}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("invalid snapshot: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("encode view: {0}")]
    Render(#[source] serde_json::Error),

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a layout engine. Fatal for the recompute cycle that hit it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("edge references unknown node index {0}")]
    UnknownNode(usize),

    #[error("self-loop on node {0}")]
    SelfLoop(String),

    #[error("non-finite coordinate for {0}")]
    NonFinite(String),

    #[error("engine returned {got} {what}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
