//! Batched painting of a [`Graph`] onto a caller-supplied [`Surface`].
//!
//! While frozen, [`Paper::update`] only counts pending updates. [`Paper::unfreeze`] then runs a
//! single layout + SVG + paint pass, however many updates were recorded.

use crate::layout::layout_graph;
use crate::model::SequenceLayout;
use crate::svg::{SvgRenderOptions, render_svg};
use crate::timing::{RenderTimings, TimingGuard, render_timing_enabled};
use crate::{LayoutOptions, Result};
use lifeline_core::{Graph, PaperConfig};

/// One painted frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub svg: &'a str,
    pub layout: &'a SequenceLayout,
    pub width: f64,
    pub height: f64,
}

/// Drawing target for a [`Paper`] (a DOM element, a file, a test buffer).
pub trait Surface {
    fn paint(&mut self, frame: &Frame<'_>) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn paint(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).paint(frame)
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn paint(&mut self, frame: &Frame<'_>) -> Result<()> {
        (**self).paint(frame)
    }
}

/// Keeps the latest SVG document in memory.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    svg: Option<String>,
    paints: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    pub fn paint_count(&self) -> usize {
        self.paints
    }
}

impl Surface for SvgSurface {
    fn paint(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.svg = Some(frame.svg.to_string());
        self.paints += 1;
        Ok(())
    }
}

pub struct Paper<S> {
    surface: S,
    width: f64,
    height: f64,
    svg_options: SvgRenderOptions,
    layout_options: LayoutOptions,
    frozen: bool,
    pending: usize,
    last_layout: Option<SequenceLayout>,
}

impl<S: Surface> Paper<S> {
    pub fn new(surface: S, config: &PaperConfig) -> Self {
        Self {
            surface,
            width: config.width,
            height: config.height,
            svg_options: SvgRenderOptions::from(config),
            layout_options: LayoutOptions::default(),
            frozen: false,
            pending: 0,
            last_layout: None,
        }
    }

    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    pub fn with_svg_options(mut self, options: SvgRenderOptions) -> Self {
        self.svg_options = options;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Updates recorded since the last paint while frozen.
    pub fn pending_updates(&self) -> usize {
        self.pending
    }

    /// Paints now, or records the update while frozen.
    pub fn update(&mut self, graph: &Graph) -> Result<()> {
        if self.frozen {
            self.pending += 1;
            return Ok(());
        }
        self.repaint(graph)
    }

    /// Leaves the frozen state with exactly one paint pass.
    ///
    /// A failed paint keeps the paper frozen with its pending count, so the caller can retry.
    pub fn unfreeze(&mut self, graph: &Graph) -> Result<()> {
        tracing::debug!(pending = self.pending, "unfreezing paper");
        self.repaint(graph)?;
        self.frozen = false;
        Ok(())
    }

    fn repaint(&mut self, graph: &Graph) -> Result<()> {
        let mut timings = RenderTimings::default();
        let started = std::time::Instant::now();

        let layout = {
            let _g = TimingGuard::new(&mut timings.layout);
            layout_graph(
                graph,
                self.width,
                self.height,
                self.layout_options.text_measurer.as_ref(),
            )?
        };
        let svg = {
            let _g = TimingGuard::new(&mut timings.svg);
            render_svg(&layout, &self.svg_options)
        };
        {
            let _g = TimingGuard::new(&mut timings.paint);
            self.surface.paint(&Frame {
                svg: &svg,
                layout: &layout,
                width: self.width,
                height: self.height,
            })?;
        }
        self.pending = 0;
        self.last_layout = Some(layout);

        timings.total = started.elapsed();
        tracing::debug!(bytes = svg.len(), "painted paper");
        if render_timing_enabled() {
            eprintln!(
                "[render-timing] total={:?} layout={:?} svg={:?} paint={:?}",
                timings.total, timings.layout, timings.svg, timings.paint,
            );
        }
        Ok(())
    }

    pub fn last_layout(&self) -> Option<&SequenceLayout> {
        self.last_layout.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use lifeline_core::shape::{Lifeline, Role};

    fn graph() -> Graph {
        let mut g = Graph::new();
        let role = g.add(Role::at(100.0, 20.0));
        let line = g.add(Lifeline::new());
        g.attach_to_role(line, role, 600.0).unwrap();
        g
    }

    #[test]
    fn frozen_updates_paint_once_on_unfreeze() {
        let g = graph();
        let mut paper = Paper::new(SvgSurface::new(), &PaperConfig::default());
        paper.freeze();
        for _ in 0..4 {
            paper.update(&g).unwrap();
        }
        assert_eq!(paper.pending_updates(), 4);
        assert_eq!(paper.surface().paint_count(), 0);

        paper.unfreeze(&g).unwrap();
        assert!(!paper.is_frozen());
        assert_eq!(paper.pending_updates(), 0);
        assert_eq!(paper.surface().paint_count(), 1);
        assert!(paper.surface().svg().unwrap().contains(r#"data-type="sd.Role""#));
    }

    #[test]
    fn unfrozen_updates_paint_immediately() {
        let g = graph();
        let mut surface = SvgSurface::new();
        {
            let mut paper = Paper::new(&mut surface, &PaperConfig::default());
            paper.update(&g).unwrap();
            paper.update(&g).unwrap();
            assert_eq!(paper.last_layout().unwrap().shapes.len(), 2);
        }
        assert_eq!(surface.paint_count(), 2);
    }

    struct Broken;

    impl Surface for Broken {
        fn paint(&mut self, _frame: &Frame<'_>) -> Result<()> {
            Err(Error::Surface {
                message: "detached".to_string(),
            })
        }
    }

    /// Fails the first `failures` paints.
    struct Flaky {
        failures: usize,
        paints: usize,
    }

    impl Surface for Flaky {
        fn paint(&mut self, _frame: &Frame<'_>) -> Result<()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(Error::Surface {
                    message: "busy".to_string(),
                });
            }
            self.paints += 1;
            Ok(())
        }
    }

    #[test]
    fn failed_unfreeze_stays_frozen_until_retried() {
        let g = graph();
        let mut paper = Paper::new(
            Flaky {
                failures: 1,
                paints: 0,
            },
            &PaperConfig::default(),
        );
        paper.freeze();
        paper.update(&g).unwrap();
        paper.update(&g).unwrap();

        assert!(paper.unfreeze(&g).is_err());
        assert!(paper.is_frozen());
        assert_eq!(paper.pending_updates(), 2);
        assert_eq!(paper.surface().paints, 0);

        paper.unfreeze(&g).unwrap();
        assert!(!paper.is_frozen());
        assert_eq!(paper.pending_updates(), 0);
        assert_eq!(paper.surface().paints, 1);
    }

    /// Counts every measured string.
    struct CountingMeasurer(std::sync::atomic::AtomicUsize);

    impl crate::text::TextMeasurer for CountingMeasurer {
        fn measure(&self, text: &str, style: &crate::text::TextStyle) -> crate::text::TextMetrics {
            self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            crate::text::DeterministicTextMeasurer::default().measure(text, style)
        }
    }

    #[test]
    fn builder_options_reach_the_paint() {
        let measurer = std::sync::Arc::new(CountingMeasurer(Default::default()));
        let config = PaperConfig {
            width: 640.0,
            height: 480.0,
            ..PaperConfig::default()
        };
        let mut paper = Paper::new(SvgSurface::new(), &config)
            .with_layout_options(LayoutOptions {
                text_measurer: measurer.clone(),
            })
            .with_svg_options(SvgRenderOptions {
                diagram_id: Some("sd-net".to_string()),
                ..SvgRenderOptions::from(&config)
            });
        assert_eq!((paper.width(), paper.height()), (640.0, 480.0));

        paper.update(&graph()).unwrap();
        let svg = paper.surface().svg().unwrap();
        assert!(svg.contains(r#"id="sd-net""#));
        assert!(svg.contains(r#"viewBox="0 0 640 480""#));
        assert!(measurer.0.load(std::sync::atomic::Ordering::Relaxed) > 0);
    }

    #[test]
    fn surface_errors_propagate() {
        let mut paper = Paper::new(Broken, &PaperConfig::default());
        let err = paper.update(&graph()).unwrap_err();
        assert!(matches!(err, Error::Surface { .. }));
        assert!(paper.last_layout().is_none());
    }
}
