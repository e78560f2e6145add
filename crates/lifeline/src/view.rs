//! Host-facing component: paints the canonical diagram once data arrives and keeps it
//! interactive afterwards.

use crate::assemble::{CanonicalDiagram, assemble};
use crate::render::{HeadlessError, Paper, Result, Surface};
use lifeline_core::geom::Point;
use lifeline_core::{DiagramConfig, Interaction, PointerOutcome, ShapeId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Payload handed over by the host when a detector finishes.
///
/// The diagram is static today, so the payload is only kept for the host's benefit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticData {
    #[serde(default)]
    pub table: Value,
    #[serde(default)]
    pub rendering_properties: Value,
}

pub struct NetworkGraphView<S> {
    paper: Paper<S>,
    config: DiagramConfig,
    interaction: Interaction,
    diagram: Option<CanonicalDiagram>,
    data: Option<DiagnosticData>,
}

impl<S: Surface> NetworkGraphView<S> {
    /// A view painting onto `surface` at `width` x `height` pixels.
    pub fn new(surface: S, width: f64, height: f64) -> Self {
        let config = DiagramConfig::with_overrides(&json!({
            "paper": { "width": width, "height": height }
        }));
        Self::with_config(surface, config)
    }

    pub fn with_config(surface: S, config: DiagramConfig) -> Self {
        let paper_cfg = config.paper();
        Self {
            paper: Paper::new(surface, &paper_cfg),
            interaction: Interaction::new(config.interaction(), paper_cfg.width),
            config,
            diagram: None,
            data: None,
        }
    }

    /// Assembles and paints the diagram, replacing any earlier one.
    pub fn process_data(&mut self, data: &DiagnosticData) -> Result<()> {
        self.interaction.pointer_up();
        let diagram = assemble(&mut self.paper, &self.config)?;
        self.diagram = Some(diagram);
        self.data = Some(data.clone());
        Ok(())
    }

    pub fn pointer_down(&mut self, target: ShapeId, at: Point) -> Result<()> {
        let diagram = self.diagram.as_ref().ok_or(HeadlessError::NoDiagram)?;
        self.interaction.pointer_down(&diagram.graph, target, at)?;
        Ok(())
    }

    /// Forwards a pointer move; repaints when something actually moved.
    pub fn pointer_move(&mut self, at: Point) -> Result<PointerOutcome> {
        let diagram = self.diagram.as_mut().ok_or(HeadlessError::NoDiagram)?;
        let outcome = self.interaction.pointer_move(&mut diagram.graph, at)?;
        if matches!(
            outcome,
            PointerOutcome::ElementMoved { .. } | PointerOutcome::MessageMoved { .. }
        ) {
            self.paper.update(&diagram.graph)?;
        }
        Ok(outcome)
    }

    pub fn pointer_up(&mut self) -> Option<ShapeId> {
        self.interaction.pointer_up()
    }

    pub fn diagram(&self) -> Option<&CanonicalDiagram> {
        self.diagram.as_ref()
    }

    pub fn data(&self) -> Option<&DiagnosticData> {
        self.data.as_ref()
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn paper(&self) -> &Paper<S> {
        &self.paper
    }

    pub fn surface(&self) -> &S {
        self.paper.surface()
    }
}
