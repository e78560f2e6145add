#![forbid(unsafe_code)]

//! `lifeline` draws interactive sequence diagrams headlessly.
//!
//! The model ([`Graph`] and the `sd.*` shapes) comes from `lifeline-core`; layout, SVG output
//! and the batched [`render::Paper`] come from `lifeline-render`. This crate adds the canonical
//! diagram assembler ([`assemble`]) and the host-facing [`view::NetworkGraphView`].
//!
//! # Features
//!
//! - `raster`: PNG output via pure-Rust SVG rasterization (`lifeline::render::raster`)

pub use lifeline_core::*;

pub mod assemble;
pub mod view;

pub mod render {
    pub use lifeline_render::model::SequenceLayout;
    pub use lifeline_render::paper::{Frame, Paper, Surface, SvgSurface};
    pub use lifeline_render::svg::SvgRenderOptions;
    pub use lifeline_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use lifeline_render::{LayoutOptions, layout_graph};

    use lifeline_core::Graph;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Model(#[from] lifeline_core::Error),
        #[error(transparent)]
        Render(#[from] lifeline_render::Error),
        #[error("no diagram has been processed yet")]
        NoDiagram,
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so several diagrams can
    /// be inlined into one document.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let mapped: String = raw
            .trim()
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':' | '.') {
                    ch
                } else {
                    '-'
                }
            })
            .collect();
        let mut out = String::with_capacity(mapped.len() + 3);
        for ch in mapped.chars() {
            if !(ch == '-' && out.ends_with('-')) {
                out.push(ch);
            }
        }
        let out = out.trim_matches('-');
        if out.is_empty() {
            return "sd-untitled".to_string();
        }
        if out.starts_with(|c: char| c.is_ascii_alphabetic()) {
            out.to_string()
        } else {
            format!("sd-{out}")
        }
    }

    /// Synchronous layout helper (executor-free).
    pub fn layout_sync(
        graph: &Graph,
        width: f64,
        height: f64,
        layout_options: &LayoutOptions,
    ) -> Result<SequenceLayout> {
        Ok(layout_graph(
            graph,
            width,
            height,
            layout_options.text_measurer.as_ref(),
        )?)
    }

    pub async fn layout(
        graph: &Graph,
        width: f64,
        height: f64,
        layout_options: &LayoutOptions,
    ) -> Result<SequenceLayout> {
        layout_sync(graph, width, height, layout_options)
    }

    /// Synchronous SVG render helper (executor-free).
    pub fn render_svg_sync(
        graph: &Graph,
        width: f64,
        height: f64,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let layout = layout_sync(graph, width, height, layout_options)?;
        Ok(lifeline_render::svg::render_svg(&layout, svg_options))
    }

    /// Runtime-agnostic: all work is CPU-bound and does no I/O.
    pub async fn render_svg(
        graph: &Graph,
        width: f64,
        height: f64,
        layout_options: &LayoutOptions,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        render_svg_sync(graph, width, height, layout_options, svg_options)
    }
}
