//! Pointer-driven editing: sliding roles sideways and dragging messages along lifelines.

use crate::config::InteractionConfig;
use crate::error::{Error, Result};
use crate::geom::{Point, Rect, Vector, is_finite_point, rect};
use crate::graph::Graph;
use crate::resolve::{Resolver, deep_bbox};
use crate::shape::{Shape, ShapeId, ShapeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interactivity {
    pub element_move: bool,
    pub link_move: bool,
    pub label_move: bool,
}

/// Links never move or relabel by drag; elements do.
pub fn interactivity(shape: &Shape) -> Interactivity {
    if shape.is_link() {
        Interactivity {
            element_move: false,
            link_move: false,
            label_move: false,
        }
    } else {
        Interactivity {
            element_move: true,
            link_move: true,
            label_move: true,
        }
    }
}

/// Horizontal band an element may be dragged within; its height is zero, which pins `y`.
pub fn restrict_translate(
    graph: &Graph,
    id: ShapeId,
    paper_width: f64,
    config: &InteractionConfig,
) -> Result<Rect> {
    let shape = graph.get(id)?;
    let bbox = graph.bbox(id)?;
    let padding = if shape.is_embedded() {
        config.embedded_padding
    } else {
        config.free_padding
    };
    Ok(rect(padding, bbox.origin.y, paper_width - 2.0 * padding, 0.0))
}

/// Clamps a proposed element origin so that its deep box stays inside `area`.
///
/// When the area is smaller than the box the lower bound wins, so a zero-height area keeps
/// the element at its current `y`.
pub fn clamp_to_area(graph: &Graph, id: ShapeId, proposed: Point, area: &Rect) -> Result<Point> {
    let origin = graph.bbox(id)?.origin;
    let deep = deep_bbox(graph, id)?;
    let ox = origin.x - deep.origin.x;
    let oy = origin.y - deep.origin.y;
    let x = (area.min_x() + ox).max((area.max_x() + ox - deep.width()).min(proposed.x));
    let y = (area.min_y() + oy).max((area.max_y() + oy - deep.height()).min(proposed.y));
    Ok(crate::geom::point(x, y))
}

/// Moves an element toward `proposed`, restricted to its band. Returns the applied origin.
pub fn drag_element(
    graph: &mut Graph,
    id: ShapeId,
    proposed: Point,
    paper_width: f64,
    config: &InteractionConfig,
) -> Result<Point> {
    if !is_finite_point(proposed) {
        return Err(Error::NonFiniteCoordinate {
            x: proposed.x,
            y: proposed.y,
        });
    }
    let shape = graph.get(id)?;
    if !interactivity(shape).element_move {
        return Err(Error::KindMismatch {
            id,
            expected: "element",
            actual: shape.shape_type(),
        });
    }
    let area = restrict_translate(graph, id, paper_width, config)?;
    let position = clamp_to_area(graph, id, proposed, &area)?;
    tracing::debug!(%id, x = position.x, y = position.y, "drag element");
    graph.set_position(id, position)?;
    Ok(position)
}

/// Where a message may sit on its source lifeline, as offsets from the lifeline start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageDragRange {
    /// Absolute `y` of the source lifeline start.
    pub origin_y: f64,
    pub min: f64,
    pub max: f64,
}

impl MessageDragRange {
    /// Clamps an absolute pointer `y`. When the range is empty, `max` wins.
    pub fn clamp(&self, pointer_y: f64) -> f64 {
        (pointer_y - self.origin_y).max(self.min).min(self.max)
    }
}

pub fn message_drag_range(graph: &Graph, id: ShapeId, padding: f64) -> Result<MessageDragRange> {
    let message = graph.message(id)?;
    let (Some(from), Some(to)) = (message.from_id(), message.to_id()) else {
        return Err(Error::EmptyLink { id });
    };
    let mut resolver = Resolver::new(graph);
    let s = resolver.link(from)?;
    let t = resolver.link(to)?;
    Ok(MessageDragRange {
        origin_y: s.source.y,
        min: (t.source.y - s.source.y).max(0.0) + padding,
        max: s.target.y - s.source.y - padding,
    })
}

/// Re-anchors a message at the pointer's `y`, kept inside the padded span of its lifelines.
/// Returns the stored offset.
pub fn drag_message(graph: &mut Graph, id: ShapeId, pointer_y: f64, padding: f64) -> Result<f64> {
    if !pointer_y.is_finite() {
        return Err(Error::NonFiniteCoordinate {
            x: 0.0,
            y: pointer_y,
        });
    }
    let range = message_drag_range(graph, id, padding)?;
    let start = range.clamp(pointer_y);
    tracing::debug!(%id, pointer_y, start, min = range.min, max = range.max, "drag message");
    graph.message_mut(id)?.set_start(start);
    Ok(start)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// No pointer session is active.
    Idle,
    /// The move was swallowed by the move threshold.
    BelowThreshold,
    /// The session target cannot be dragged.
    Ignored,
    ElementMoved { id: ShapeId, position: Point },
    MessageMoved { id: ShapeId, start: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragKind {
    Element,
    Message,
    Inert,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    target: ShapeId,
    kind: DragKind,
    /// Pointer position relative to the element origin at pointer-down.
    grab: Vector,
    moves: u32,
}

/// One pointer session at a time over one graph.
#[derive(Debug, Clone)]
pub struct Interaction {
    config: InteractionConfig,
    paper_width: f64,
    session: Option<DragSession>,
}

impl Interaction {
    pub fn new(config: InteractionConfig, paper_width: f64) -> Self {
        Self {
            config,
            paper_width,
            session: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn pointer_down(&mut self, graph: &Graph, target: ShapeId, at: Point) -> Result<()> {
        if !is_finite_point(at) {
            return Err(Error::NonFiniteCoordinate { x: at.x, y: at.y });
        }
        let shape = graph.get(target)?;
        let (kind, grab) = match shape.shape_type() {
            ShapeType::Message => (DragKind::Message, Vector::zero()),
            ShapeType::Role | ShapeType::RoleGroup => {
                (DragKind::Element, at - graph.bbox(target)?.origin)
            }
            ShapeType::Lifeline | ShapeType::LifeSpan => (DragKind::Inert, Vector::zero()),
        };
        self.session = Some(DragSession {
            target,
            kind,
            grab,
            moves: 0,
        });
        Ok(())
    }

    pub fn pointer_move(&mut self, graph: &mut Graph, at: Point) -> Result<PointerOutcome> {
        let Some(session) = self.session.as_mut() else {
            return Ok(PointerOutcome::Idle);
        };
        if !is_finite_point(at) {
            return Err(Error::NonFiniteCoordinate { x: at.x, y: at.y });
        }
        session.moves = session.moves.saturating_add(1);
        if session.moves <= self.config.move_threshold {
            return Ok(PointerOutcome::BelowThreshold);
        }
        let session = *session;
        match session.kind {
            DragKind::Inert => Ok(PointerOutcome::Ignored),
            DragKind::Message => {
                let start = drag_message(graph, session.target, at.y, self.config.message_padding)?;
                Ok(PointerOutcome::MessageMoved {
                    id: session.target,
                    start,
                })
            }
            DragKind::Element => {
                let position = drag_element(
                    graph,
                    session.target,
                    at - session.grab,
                    self.paper_width,
                    &self.config,
                )?;
                Ok(PointerOutcome::ElementMoved {
                    id: session.target,
                    position,
                })
            }
        }
    }

    /// Ends the session; returns its target if it got past the move threshold.
    pub fn pointer_up(&mut self) -> Option<ShapeId> {
        let session = self.session.take()?;
        (session.moves > self.config.move_threshold).then_some(session.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point, rect_contains_rect};
    use crate::layout::fit_roles_on_member_move;
    use crate::shape::{Lifeline, Message, Role, RoleGroup};

    struct Scene {
        graph: Graph,
        roles: [ShapeId; 3],
        lifelines: [ShapeId; 3],
        group: ShapeId,
    }

    fn scene() -> Scene {
        let mut graph = Graph::new();
        let roles = [100.0, 400.0, 600.0].map(|x| graph.add(Role::at(x, 20.0)));
        let group = graph.add(RoleGroup::new());
        graph.embed(group, roles[1]).unwrap();
        graph.embed(group, roles[2]).unwrap();
        graph.fit_roles(group).unwrap();
        fit_roles_on_member_move(&mut graph, group).unwrap();
        let lifelines = roles.map(|r| {
            let l = graph.add(Lifeline::new());
            graph.attach_to_role(l, r, 600.0).unwrap();
            l
        });
        Scene {
            graph,
            roles,
            lifelines,
            group,
        }
    }

    fn message(s: &mut Scene, from: usize, to: usize, start: f64) -> ShapeId {
        let mut m = Message::new();
        m.set_from_to(s.lifelines[from], s.lifelines[to]);
        m.set_start(start);
        s.graph.add(m)
    }

    #[test]
    fn links_are_not_draggable() {
        let mut s = scene();
        let m = message(&mut s, 0, 1, 50.0);
        let shape = s.graph.get(m).unwrap();
        assert!(!interactivity(shape).link_move);
        assert!(!interactivity(shape).label_move);
        assert!(interactivity(s.graph.get(s.roles[0]).unwrap()).element_move);
        assert!(matches!(
            drag_element(&mut s.graph, m, point(0.0, 0.0), 800.0, &InteractionConfig::default()),
            Err(Error::KindMismatch { .. })
        ));
    }

    #[test]
    fn band_padding_depends_on_embedding() {
        let s = scene();
        let cfg = InteractionConfig::default();
        let free = restrict_translate(&s.graph, s.roles[0], 800.0, &cfg).unwrap();
        assert_eq!(free, rect(10.0, 20.0, 780.0, 0.0));
        let embedded = restrict_translate(&s.graph, s.roles[1], 800.0, &cfg).unwrap();
        assert_eq!(embedded, rect(20.0, 20.0, 760.0, 0.0));
    }

    #[test]
    fn roles_only_slide_sideways_inside_the_band() {
        let mut s = scene();
        let cfg = InteractionConfig::default();
        let p = drag_element(&mut s.graph, s.roles[0], point(250.0, 300.0), 800.0, &cfg).unwrap();
        assert_eq!(p, point(250.0, 20.0));

        let p = drag_element(&mut s.graph, s.roles[0], point(-40.0, 0.0), 800.0, &cfg).unwrap();
        assert_eq!(p, point(10.0, 20.0));

        let p = drag_element(&mut s.graph, s.roles[2], point(900.0, 20.0), 800.0, &cfg).unwrap();
        assert_eq!(p, point(680.0, 20.0));
    }

    #[test]
    fn group_keeps_enclosing_members_through_drags() {
        let mut s = scene();
        let cfg = InteractionConfig::default();
        for x in [20.0, 150.0, 333.0, 680.0, 500.0] {
            for role in [s.roles[1], s.roles[2]] {
                drag_element(&mut s.graph, role, point(x, 0.0), 800.0, &cfg).unwrap();
                let group = s.graph.bbox(s.group).unwrap();
                for member in [s.roles[1], s.roles[2]] {
                    let inflated = s.graph.bbox(member).unwrap().inflate(10.0, 10.0);
                    assert!(rect_contains_rect(&group, &inflated, 1e-9));
                }
            }
        }
    }

    #[test]
    fn dragging_the_group_moves_members_and_lifelines() {
        let mut s = scene();
        let cfg = InteractionConfig::default();
        // Free group: band starts at 10 and the group is 320 wide.
        let p = drag_element(&mut s.graph, s.group, point(0.0, 0.0), 800.0, &cfg).unwrap();
        assert_eq!(p, point(10.0, 10.0));
        assert_eq!(s.graph.bbox(s.roles[1]).unwrap().origin, point(20.0, 20.0));
        let l = s.graph.lifeline(s.lifelines[1]).unwrap();
        assert_eq!(l.target, crate::anchor::Endpoint::fixed(point(70.0, 600.0)));
    }

    #[test]
    fn message_offset_is_clamped_to_padded_lifeline_span() {
        let mut s = scene();
        let m = message(&mut s, 0, 1, 50.0);
        let range = message_drag_range(&s.graph, m, 20.0).unwrap();
        assert_eq!(range.origin_y, 100.0);
        assert_eq!((range.min, range.max), (20.0, 480.0));

        for (pointer, expected) in [
            (-1000.0, 20.0),
            (100.0, 20.0),
            (300.0, 200.0),
            (580.0, 480.0),
            (10_000.0, 480.0),
        ] {
            let start = drag_message(&mut s.graph, m, pointer, 20.0).unwrap();
            assert_eq!(start, expected);
            assert_eq!(s.graph.message(m).unwrap().start(), expected);
        }
    }

    #[test]
    fn message_range_accounts_for_a_lower_target_lifeline() {
        let mut s = scene();
        // Push the target role down so its lifeline starts lower than the source one.
        s.graph.translate(s.roles[1], 0.0, 40.0).unwrap();
        let m = message(&mut s, 0, 1, 50.0);
        let range = message_drag_range(&s.graph, m, 20.0).unwrap();
        assert_eq!((range.min, range.max), (60.0, 480.0));
        for pointer in [0.0, 150.0, 333.3, 700.0] {
            let start = drag_message(&mut s.graph, m, pointer, 20.0).unwrap();
            assert!(start >= range.min && start <= range.max);
        }
    }

    #[test]
    fn nan_pointer_is_rejected() {
        let mut s = scene();
        let m = message(&mut s, 0, 1, 50.0);
        assert!(matches!(
            drag_message(&mut s.graph, m, f64::NAN, 20.0),
            Err(Error::NonFiniteCoordinate { .. })
        ));
        assert_eq!(s.graph.message(m).unwrap().start(), 50.0);
    }

    #[test]
    fn pointer_session_honors_move_threshold() {
        let mut s = scene();
        let m = message(&mut s, 0, 1, 50.0);
        let mut ix = Interaction::new(InteractionConfig::default(), 800.0);
        assert_eq!(
            ix.pointer_move(&mut s.graph, point(0.0, 0.0)).unwrap(),
            PointerOutcome::Idle
        );

        ix.pointer_down(&s.graph, m, point(300.0, 150.0)).unwrap();
        for _ in 0..5 {
            assert_eq!(
                ix.pointer_move(&mut s.graph, point(300.0, 400.0)).unwrap(),
                PointerOutcome::BelowThreshold
            );
        }
        assert_eq!(s.graph.message(m).unwrap().start(), 50.0);
        assert_eq!(
            ix.pointer_move(&mut s.graph, point(300.0, 400.0)).unwrap(),
            PointerOutcome::MessageMoved { id: m, start: 300.0 }
        );
        assert_eq!(ix.pointer_up(), Some(m));
        assert!(!ix.is_dragging());
    }

    #[test]
    fn pointer_session_drags_roles_by_their_grab_point() {
        let mut s = scene();
        let cfg = InteractionConfig {
            move_threshold: 0,
            ..InteractionConfig::default()
        };
        let mut ix = Interaction::new(cfg, 800.0);
        ix.pointer_down(&s.graph, s.roles[0], point(110.0, 30.0)).unwrap();
        assert_eq!(
            ix.pointer_move(&mut s.graph, point(160.0, 90.0)).unwrap(),
            PointerOutcome::ElementMoved {
                id: s.roles[0],
                position: point(150.0, 20.0),
            }
        );

        ix.pointer_down(&s.graph, s.lifelines[0], point(200.0, 300.0))
            .unwrap();
        assert_eq!(
            ix.pointer_move(&mut s.graph, point(260.0, 300.0)).unwrap(),
            PointerOutcome::Ignored
        );
    }
}
