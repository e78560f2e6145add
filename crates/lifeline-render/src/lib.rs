#![forbid(unsafe_code)]

//! Headless layout and SVG output for lifeline sequence diagrams.
//!
//! [`layout_graph`] resolves a [`lifeline_core::Graph`] into a [`model::SequenceLayout`];
//! [`svg::render_svg`] turns that into a standalone SVG document; [`paper::Paper`] batches both
//! and hands finished frames to a [`paper::Surface`].

pub mod layout;
pub mod model;
pub mod paper;
pub mod svg;
pub mod text;

mod timing;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

pub use layout::layout_graph;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] lifeline_core::Error),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("surface rejected frame: {message}")]
    Surface { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions").finish_non_exhaustive()
    }
}

/// Lays out `graph` on a `width` x `height` paper and serializes the result.
pub fn layout_graph_json(
    graph: &lifeline_core::Graph,
    width: f64,
    height: f64,
    options: &LayoutOptions,
    pretty: bool,
) -> Result<String> {
    let layout = layout_graph(graph, width, height, options.text_measurer.as_ref())?;
    Ok(if pretty {
        serde_json::to_string_pretty(&layout)?
    } else {
        serde_json::to_string(&layout)?
    })
}
