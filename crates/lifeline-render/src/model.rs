use lifeline_core::geom::{Point, Rect};
use lifeline_core::shape::{BoxStyle, LineStyle};
use lifeline_core::{ShapeId, ShapeType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        points.into_iter().fold(None, |acc, (x, y)| {
            Some(match acc {
                None => Self {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl From<Point> for LayoutPoint {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<Rect> for LayoutBox {
    fn from(r: Rect) -> Self {
        Self {
            x: r.origin.x,
            y: r.origin.y,
            width: r.size.width,
            height: r.size.height,
        }
    }
}

impl LayoutBox {
    pub fn center(&self) -> LayoutPoint {
        LayoutPoint {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    fn corners(&self) -> [(f64, f64); 2] {
        [
            (self.x, self.y),
            (self.x + self.width, self.y + self.height),
        ]
    }
}

/// Already-wrapped text, centered on `center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutText {
    pub lines: Vec<String>,
    pub center: LayoutPoint,
    pub font_size: f64,
    pub font_family: String,
    pub fill: String,
    pub line_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMessageLabel {
    /// Rounded body behind the text.
    pub body: LayoutBox,
    pub body_fill: String,
    pub text: LayoutText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutGeometry {
    RoleGroup {
        bbox: LayoutBox,
        style: BoxStyle,
    },
    Role {
        bbox: LayoutBox,
        style: BoxStyle,
        label: LayoutText,
    },
    Lifeline {
        source: LayoutPoint,
        target: LayoutPoint,
        style: LineStyle,
    },
    LifeSpan {
        source: LayoutPoint,
        target: LayoutPoint,
        style: LineStyle,
        icon: LayoutPoint,
        icon_radius: f64,
    },
    Message {
        source: LayoutPoint,
        target: LayoutPoint,
        style: LineStyle,
        labels: Vec<LayoutMessageLabel>,
    },
}

impl LayoutGeometry {
    fn extent_points(&self) -> Vec<(f64, f64)> {
        match self {
            Self::RoleGroup { bbox, .. } | Self::Role { bbox, .. } => bbox.corners().to_vec(),
            Self::Lifeline { source, target, .. } => {
                vec![(source.x, source.y), (target.x, target.y)]
            }
            Self::LifeSpan {
                source,
                target,
                icon,
                icon_radius,
                ..
            } => vec![
                (source.x, source.y),
                (target.x, target.y),
                (icon.x - icon_radius, icon.y - icon_radius),
                (icon.x + icon_radius, icon.y + icon_radius),
            ],
            Self::Message {
                source,
                target,
                labels,
                ..
            } => {
                let mut pts = vec![(source.x, source.y), (target.x, target.y)];
                for l in labels {
                    pts.extend(l.body.corners());
                }
                pts
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShape {
    pub id: ShapeId,
    pub shape_type: ShapeType,
    pub z: i32,
    pub geometry: LayoutGeometry,
}

/// Resolved, paint-ready sequence diagram, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceLayout {
    pub width: f64,
    pub height: f64,
    pub bounds: Option<Bounds>,
    pub shapes: Vec<LayoutShape>,
}

impl SequenceLayout {
    pub(crate) fn compute_bounds(shapes: &[LayoutShape]) -> Option<Bounds> {
        Bounds::from_points(shapes.iter().flat_map(|s| s.geometry.extent_points()))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&LayoutShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn of_type(&self, shape_type: ShapeType) -> impl Iterator<Item = &LayoutShape> {
        self.shapes
            .iter()
            .filter(move |s| s.shape_type == shape_type)
    }
}
