//! View configuration (config.json).
//!
//! JSON shape, every key optional:
//! {
//!   "nodeWidth": 300, "nodeHeight": 72, "strokeWidth": 2,
//!   "nodeSep": 50, "rankSep": 50, "rankDir": "LR",
//!   "rootRule": "single-root-fan-out"
//! }

use crate::graph::{NodeSize, RootRule};
use crate::layout::{GeometryOptions, LayoutOptions, RankDir};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub stroke_width: f64,
    pub node_sep: f64,
    pub rank_sep: f64,
    pub rank_dir: RankDir,
    /// Overrides the platform's default root rule when set.
    pub root_rule: Option<RootRule>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            node_width: NodeSize::DEFAULT.width,
            node_height: NodeSize::DEFAULT.height,
            stroke_width: 2.0,
            node_sep: layout.node_sep,
            rank_sep: layout.rank_sep,
            rank_dir: layout.rank_dir,
            root_rule: None,
        }
    }
}

impl ViewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Node sizes must be positive; stroke and separations non-negative. All finite.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("nodeWidth", self.node_width),
            ("nodeHeight", self.node_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig {
                    field,
                    value,
                    expected: "a positive number",
                });
            }
        }

        let non_negative = [
            ("strokeWidth", self.stroke_width),
            ("nodeSep", self.node_sep),
            ("rankSep", self.rank_sep),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig {
                    field,
                    value,
                    expected: "a non-negative number",
                });
            }
        }

        Ok(())
    }

    pub fn node_size(&self) -> NodeSize {
        NodeSize {
            width: self.node_width,
            height: self.node_height,
        }
    }

    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            rank_dir: self.rank_dir,
            node_sep: self.node_sep,
            rank_sep: self.rank_sep,
        }
    }

    pub fn geometry_options(&self) -> GeometryOptions {
        GeometryOptions {
            node: self.node_size(),
            stroke_width: self.stroke_width,
        }
    }
}
