//! Live resource-state graph engine.
//!
//! Pipeline, one atomic step per input change:
//! resources -> `graph::build` -> `graph::derive_effective_graph`
//! -> `layout::LayoutAdapter` -> `layout::edge_geometry` -> `view::Frame`.
//!
//! `view::GraphView` owns the caller-side state (snapshot, kind filter,
//! selection) and is the same for every deployment platform.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod render;
pub mod resource;
pub mod selection;
pub mod view;

pub use config::ViewConfig;
pub use error::{Error, LayoutError};
pub use graph::{FilterState, Graph, GraphBuilder, RootRule};
pub use layout::{LayoutAdapter, LayoutEngine, LayoutResult};
pub use resource::{CollectionKey, HealthStatus, Platform, ResourceState, Snapshot};
pub use selection::SelectionState;
pub use view::{Frame, GraphView, Rendered};

pub type Result<T, E = Error> = std::result::Result<T, E>;
