//! Render layer: serializable report of a view plus its HTML and JSON writers.

pub mod html;

pub use html::render_html_report;

use crate::config::ViewConfig;
use crate::layout::LayoutEngine;
use crate::resource::{Platform, ResourceState};
use crate::view::{Frame, GraphView, Rendered};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindView {
    pub kind: String,
    pub visible: bool,
    /// Resources of this kind in the current snapshot, before filtering.
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub platform: Platform,
    pub collection: Option<String>,
    pub kinds: Vec<KindView>,
    pub selected: Option<&'a ResourceState>,
    pub frame: Option<&'a Frame>,
    pub unavailable: Option<&'a str>,
    pub node_width: f64,
    pub node_height: f64,
    pub stroke_width: f64,
}

impl<'a> Report<'a> {
    pub fn from_view<E: LayoutEngine>(
        view: &'a GraphView<E>,
        platform: Platform,
        config: &ViewConfig,
    ) -> Self {
        let (frame, unavailable) = match view.rendered() {
            Rendered::Ready(frame) => (Some(frame), None),
            Rendered::Unavailable { reason } => (None, Some(reason.as_str())),
        };

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for resource in view.resources() {
            *counts.entry(resource.kind.as_str()).or_insert(0) += 1;
        }

        let kinds = view
            .filter()
            .kinds()
            .map(|(kind, visible)| KindView {
                kind: kind.to_string(),
                visible,
                count: counts.get(kind).copied().unwrap_or(0),
            })
            .collect();

        Self {
            platform,
            collection: view.collection().map(|k| k.to_string()),
            kinds,
            selected: view.selected(),
            frame,
            unavailable,
            node_width: config.node_width,
            node_height: config.node_height,
            stroke_width: config.stroke_width,
        }
    }
}

pub fn render_json_report(report: &Report<'_>) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Error::Render)
}
