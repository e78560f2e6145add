//! Turns symbolic link endpoints into absolute coordinates.
//!
//! Element endpoints use the element center as anchor and are then clipped to the element box
//! toward the opposite end. Link endpoints (`Length`, `Ratio`, `Center`, `Perpendicular`) are
//! measured on the referenced link's own resolved geometry, which is resolved first.

use crate::anchor::{Anchor, Endpoint, Terminal};
use crate::error::{Error, Result};
use crate::geom::{self, Point, Rect};
use crate::graph::Graph;
use crate::shape::ShapeId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Resolved straight-line geometry of a link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkGeometry {
    pub source: Point,
    pub target: Point,
}

impl LinkGeometry {
    pub fn points(&self) -> [Point; 2] {
        [self.source, self.target]
    }

    pub fn length(&self) -> f64 {
        (self.target - self.source).length()
    }

    pub fn point_at_ratio(&self, ratio: f64) -> Point {
        geom::point_at_ratio(&self.points(), ratio).unwrap_or(self.source)
    }

    pub fn point_at_length(&self, length: f64) -> Point {
        geom::point_at_length(&self.points(), length).unwrap_or(self.source)
    }
}

enum EndRef {
    Fixed(Point),
    Element(Rect),
    OnLink(Point),
    Perpendicular([Point; 2]),
}

impl EndRef {
    /// Anchor point when it does not depend on the opposite end.
    fn anchor(&self) -> Option<Point> {
        match self {
            Self::Fixed(p) | Self::OnLink(p) => Some(*p),
            Self::Element(r) => Some(r.center()),
            Self::Perpendicular(_) => None,
        }
    }
}

/// Memoizing resolver over one graph snapshot.
pub struct Resolver<'g> {
    graph: &'g Graph,
    cache: FxHashMap<ShapeId, LinkGeometry>,
    visiting: FxHashSet<ShapeId>,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            cache: FxHashMap::default(),
            visiting: FxHashSet::default(),
        }
    }

    pub fn link(&mut self, id: ShapeId) -> Result<LinkGeometry> {
        if let Some(g) = self.cache.get(&id) {
            return Ok(*g);
        }
        if !self.visiting.insert(id) {
            return Err(Error::AnchorCycle { id });
        }
        let result = self.compute(id);
        self.visiting.remove(&id);
        let geometry = result?;
        tracing::trace!(
            %id,
            sx = geometry.source.x,
            sy = geometry.source.y,
            tx = geometry.target.x,
            ty = geometry.target.y,
            "resolved link"
        );
        self.cache.insert(id, geometry);
        Ok(geometry)
    }

    fn compute(&mut self, id: ShapeId) -> Result<LinkGeometry> {
        let shape = self.graph.get(id)?;
        let Some((source, target)) = shape.kind.endpoints() else {
            return Err(Error::KindMismatch {
                id,
                expected: "link",
                actual: shape.shape_type(),
            });
        };
        let (source, target) = (*source, *target);
        let s = self.end_ref(id, &source)?;
        let t = self.end_ref(id, &target)?;

        let s_anchor = match (&s, t.anchor()) {
            (EndRef::Perpendicular(line), Some(other)) => geom::axis_projection(line, other),
            (EndRef::Perpendicular(line), None) => geom::point_at_ratio(line, 0.5),
            (other, _) => other.anchor(),
        }
        .ok_or(Error::EmptyLink { id })?;
        let t_anchor = match &t {
            EndRef::Perpendicular(line) => geom::axis_projection(line, s_anchor),
            other => other.anchor(),
        }
        .ok_or(Error::EmptyLink { id })?;

        let source = match &s {
            EndRef::Element(r) => geom::rect_boundary_toward(r, t_anchor),
            _ => s_anchor,
        };
        let target = match &t {
            EndRef::Element(r) => geom::rect_boundary_toward(r, s_anchor),
            _ => t_anchor,
        };
        if !(geom::is_finite_point(source) && geom::is_finite_point(target)) {
            return Err(Error::EmptyLink { id });
        }
        Ok(LinkGeometry { source, target })
    }

    fn end_ref(&mut self, link: ShapeId, endpoint: &Endpoint) -> Result<EndRef> {
        let id = match endpoint.terminal {
            Terminal::Point(p) => return Ok(EndRef::Fixed(p)),
            Terminal::Shape(id) => id,
        };
        let Ok(referenced) = self.graph.get(id) else {
            return Err(Error::DanglingEndpoint { link, missing: id });
        };
        if let Some(bbox) = referenced.kind.bbox() {
            return Ok(EndRef::Element(bbox));
        }
        let line = self.link(id)?;
        Ok(match endpoint.anchor {
            Anchor::Length(l) => EndRef::OnLink(line.point_at_length(l)),
            Anchor::Ratio(r) => EndRef::OnLink(line.point_at_ratio(r)),
            Anchor::Center => EndRef::OnLink(line.point_at_ratio(0.5)),
            Anchor::Perpendicular => EndRef::Perpendicular(line.points()),
        })
    }
}

/// Element box united with the boxes of every element embedded below it.
pub fn deep_bbox(graph: &Graph, id: ShapeId) -> Result<Rect> {
    let mut bbox = graph.bbox(id)?;
    let mut stack = graph.get(id)?.embeds().to_vec();
    while let Some(cur) = stack.pop() {
        let shape = graph.get(cur)?;
        if let Some(b) = shape.kind.bbox() {
            bbox = bbox.union(&b);
        }
        stack.extend_from_slice(shape.embeds());
    }
    Ok(bbox)
}
