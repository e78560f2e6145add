//! Link endpoints and the anchors that position them relative to other shapes.
//!
//! Anchors are stored symbolically and only turned into coordinates by
//! [`crate::resolve::Resolver`], so a message keeps "floating" on its lifeline when the owning
//! role moves, and a lifespan keeps spanning two messages when either of them is dragged.

use crate::geom::{Point, point};
use crate::shape::ShapeId;
use serde::{Deserialize, Serialize};

/// How an endpoint is placed on the shape it references.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Anchor {
    /// Element: center, clipped to the element box. Link: the midpoint.
    Center,
    /// Arc length along the referenced link, measured from its source (negative: from its end).
    Length(f64),
    /// Fraction of the referenced link's length; 0 is its source, 1 its target.
    Ratio(f64),
    /// Axis-aligned projection of the opposite endpoint onto the referenced link.
    Perpendicular,
}

/// What an endpoint is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Terminal {
    Point(Point),
    Shape(ShapeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub terminal: Terminal,
    pub anchor: Anchor,
}

impl Endpoint {
    /// An unattached endpoint at the origin. The anchor is kept for when it gets attached.
    pub fn detached(anchor: Anchor) -> Self {
        Self {
            terminal: Terminal::Point(point(0.0, 0.0)),
            anchor,
        }
    }

    pub fn fixed(p: Point) -> Self {
        Self {
            terminal: Terminal::Point(p),
            anchor: Anchor::Center,
        }
    }

    pub fn shape(id: ShapeId, anchor: Anchor) -> Self {
        Self {
            terminal: Terminal::Shape(id),
            anchor,
        }
    }

    pub fn shape_id(&self) -> Option<ShapeId> {
        match self.terminal {
            Terminal::Shape(id) => Some(id),
            Terminal::Point(_) => None,
        }
    }

    pub(crate) fn translate_fixed(&mut self, dx: f64, dy: f64) {
        if let Terminal::Point(p) = &mut self.terminal {
            p.x += dx;
            p.y += dy;
        }
    }
}
