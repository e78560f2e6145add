use crate::Result;
use crate::model::{
    LayoutBox, LayoutGeometry, LayoutMessageLabel, LayoutShape, LayoutText, SequenceLayout,
};
use crate::text::{TextMeasurer, TextStyle, wrap_text_lines_px};
use lifeline_core::shape::{Message, Role};
use lifeline_core::{Graph, LinkGeometry, Resolver, ShapeKind};

const LABEL_PAD_X: f64 = 10.0;
const LABEL_PAD_Y: f64 = 5.0;

/// Resolves every shape of `graph` into paint-ready geometry.
///
/// Shapes are ordered by z, ties keeping insertion order.
pub fn layout_graph(
    graph: &Graph,
    width: f64,
    height: f64,
    measurer: &dyn TextMeasurer,
) -> Result<SequenceLayout> {
    graph.validate()?;
    let mut resolver = Resolver::new(graph);
    let mut shapes = Vec::with_capacity(graph.len());

    for shape in graph.shapes() {
        let geometry = match &shape.kind {
            ShapeKind::RoleGroup(g) => LayoutGeometry::RoleGroup {
                bbox: g.bbox().into(),
                style: g.style.clone(),
            },
            ShapeKind::Role(r) => LayoutGeometry::Role {
                bbox: r.bbox().into(),
                style: r.style.clone(),
                label: role_label(r, measurer),
            },
            ShapeKind::Lifeline(l) => {
                let line = resolver.link(shape.id)?;
                LayoutGeometry::Lifeline {
                    source: line.source.into(),
                    target: line.target.into(),
                    style: l.style.clone(),
                }
            }
            ShapeKind::LifeSpan(s) => {
                let line = resolver.link(shape.id)?;
                LayoutGeometry::LifeSpan {
                    source: line.source.into(),
                    target: line.target.into(),
                    style: s.style.clone(),
                    icon: line.point_at_ratio(s.icon_ratio).into(),
                    icon_radius: s.icon_radius,
                }
            }
            ShapeKind::Message(m) => {
                let line = resolver.link(shape.id)?;
                LayoutGeometry::Message {
                    source: line.source.into(),
                    target: line.target.into(),
                    style: m.style.clone(),
                    labels: message_labels(m, &line, measurer),
                }
            }
        };
        shapes.push(LayoutShape {
            id: shape.id,
            shape_type: shape.shape_type(),
            z: shape.z,
            geometry,
        });
    }
    shapes.sort_by_key(|s| s.z);

    tracing::debug!(shapes = shapes.len(), width, height, "laid out sequence diagram");
    Ok(SequenceLayout {
        width,
        height,
        bounds: SequenceLayout::compute_bounds(&shapes),
        shapes,
    })
}

fn role_label(role: &Role, measurer: &dyn TextMeasurer) -> LayoutText {
    let style = TextStyle::new(&role.label.font_family, role.label.font_size);
    let bbox = LayoutBox::from(role.bbox());
    let max_w = bbox.width - role.wrap_inset;
    LayoutText {
        lines: wrap_text_lines_px(role.name(), &style, Some(max_w), measurer, true),
        center: bbox.center(),
        font_size: style.font_size,
        font_family: role.label.font_family.clone(),
        fill: role.label.fill.clone(),
        line_height: measurer.line_height(&style),
    }
}

fn message_labels(
    message: &Message,
    line: &LinkGeometry,
    measurer: &dyn TextMeasurer,
) -> Vec<LayoutMessageLabel> {
    let style = TextStyle::new(&message.label_text.font_family, message.label_text.font_size);
    let center = line.point_at_ratio(0.5);
    message
        .labels()
        .iter()
        .map(|label| {
            let metrics = measurer.measure(&label.text, &style);
            LayoutMessageLabel {
                body: LayoutBox {
                    x: center.x - metrics.width / 2.0 - LABEL_PAD_X,
                    y: center.y - metrics.height / 2.0 - LABEL_PAD_Y,
                    width: metrics.width + 2.0 * LABEL_PAD_X,
                    height: metrics.height + 2.0 * LABEL_PAD_Y,
                },
                body_fill: label.fill.clone(),
                text: LayoutText {
                    lines: crate::text::DeterministicTextMeasurer::normalized_text_lines(
                        &label.text,
                    ),
                    center: center.into(),
                    font_size: style.font_size,
                    font_family: message.label_text.font_family.clone(),
                    fill: message.label_text.fill.clone(),
                    line_height: measurer.line_height(&style),
                },
            }
        })
        .collect()
}
