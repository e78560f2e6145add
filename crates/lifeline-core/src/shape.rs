//! Typed sequence diagram shapes.
//!
//! The shape set is closed: group and role boxes are *elements* (they own a rectangle), while
//! lifelines, messages and lifespans are *links* (two [`Endpoint`]s resolved at render time).

use crate::anchor::{Anchor, Endpoint};
use crate::geom::{Point, Rect, Size, point, rect};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShapeId(u32);

impl ShapeId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    RoleGroup,
    Role,
    Lifeline,
    LifeSpan,
    Message,
}

impl ShapeType {
    /// Type name as emitted into rendered output.
    pub fn name(self) -> &'static str {
        match self {
            Self::RoleGroup => "sd.RoleGroup",
            Self::Role => "sd.Role",
            Self::Lifeline => "sd.Lifeline",
            Self::LifeSpan => "sd.LifeSpan",
            Self::Message => "sd.Message",
        }
    }

    /// Stacking order: containers at the back, interactive links on top.
    pub fn default_z(self) -> i32 {
        match self {
            Self::RoleGroup => 1,
            Self::Role => 2,
            Self::Lifeline => 3,
            Self::LifeSpan => 4,
            Self::Message => 5,
        }
    }

    pub fn is_link(self) -> bool {
        matches!(self, Self::Lifeline | Self::LifeSpan | Self::Message)
    }
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub const DEFAULT_MESSAGE_COLOR: &str = "#4666E5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub path: String,
    pub stroke_width: f64,
}

impl Marker {
    pub fn arrow() -> Self {
        Self {
            path: "M 10 -5 0 0 10 5 z".to_string(),
            stroke_width: 1.0,
        }
    }

    pub fn square() -> Self {
        Self {
            path: "M -3 -3 -3 3 3 3 3 -3 z".to_string(),
            stroke_width: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub dasharray: Option<String>,
    pub source_marker: Option<Marker>,
    pub target_marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub(crate) bbox: Rect,
    pub padding: f64,
    pub style: BoxStyle,
}

impl Default for RoleGroup {
    fn default() -> Self {
        Self {
            bbox: rect(0.0, 0.0, 1.0, 1.0),
            padding: 10.0,
            style: BoxStyle {
                fill: "#F9FBFA".to_string(),
                stroke: "#DDDDDD".to_string(),
                stroke_width: 1.0,
                radius: 0.0,
            },
        }
    }
}

impl RoleGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub(crate) bbox: Rect,
    name: String,
    pub style: BoxStyle,
    pub label: TextStyle,
    /// Labels wrap at the box width minus this inset.
    pub wrap_inset: f64,
}

impl Default for Role {
    fn default() -> Self {
        Self {
            bbox: rect(0.0, 0.0, 100.0, 80.0),
            name: String::new(),
            style: BoxStyle {
                fill: "#FFFFFF".to_string(),
                stroke: "#A0A0A0".to_string(),
                stroke_width: 1.0,
                radius: 2.0,
            },
            label: TextStyle {
                font_size: 18.0,
                font_family: "sans-serif".to_string(),
                fill: "#333333".to_string(),
            },
            wrap_inset: 10.0,
        }
    }
}

impl Role {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(x: f64, y: f64) -> Self {
        let mut role = Self::default();
        role.bbox.origin = point(x, y);
        role
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.bbox.size = size;
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.bbox.origin
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifeline {
    pub source: Endpoint,
    pub target: Endpoint,
    pub style: LineStyle,
}

impl Default for Lifeline {
    fn default() -> Self {
        Self {
            source: Endpoint::detached(Anchor::Center),
            target: Endpoint::detached(Anchor::Center),
            style: LineStyle {
                stroke: "#A0A0A0".to_string(),
                stroke_width: 1.0,
                dasharray: Some("5,2".to_string()),
                source_marker: None,
                target_marker: None,
            },
        }
    }
}

impl Lifeline {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageLabel {
    pub text: String,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub source: Endpoint,
    pub target: Endpoint,
    color: String,
    labels: Vec<MessageLabel>,
    pub style: LineStyle,
    pub label_text: TextStyle,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            source: Endpoint::detached(Anchor::Length(20.0)),
            target: Endpoint::detached(Anchor::Perpendicular),
            color: DEFAULT_MESSAGE_COLOR.to_string(),
            labels: Vec::new(),
            style: LineStyle {
                stroke: DEFAULT_MESSAGE_COLOR.to_string(),
                stroke_width: 2.0,
                dasharray: None,
                source_marker: Some(Marker::square()),
                target_marker: Some(Marker::arrow()),
            },
            label_text: TextStyle {
                font_size: 12.0,
                font_family: "sans-serif".to_string(),
                fill: "#FFFFFF".to_string(),
            },
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds both endpoints to lifelines by id; the anchors already set are kept.
    pub fn set_from_to(&mut self, from: ShapeId, to: ShapeId) {
        self.source = Endpoint::shape(from, self.source.anchor);
        self.target = Endpoint::shape(to, self.target.anchor);
    }

    pub fn from_id(&self) -> Option<ShapeId> {
        self.source.shape_id()
    }

    pub fn to_id(&self) -> Option<ShapeId> {
        self.target.shape_id()
    }

    /// Vertical offset of the message along its source lifeline.
    pub fn set_start(&mut self, y: f64) {
        self.source.anchor = Anchor::Length(y);
    }

    pub fn start(&self) -> f64 {
        match self.source.anchor {
            Anchor::Length(l) => l,
            _ => 0.0,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.labels = vec![MessageLabel {
            text: description.into(),
            fill: self.color.clone(),
        }];
    }

    pub fn description(&self) -> Option<&str> {
        self.labels.first().map(|l| l.text.as_str())
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        self.style.stroke = color.clone();
        for label in &mut self.labels {
            label.fill = color.clone();
        }
        self.color = color;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn labels(&self) -> &[MessageLabel] {
        &self.labels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeSpan {
    pub source: Endpoint,
    pub target: Endpoint,
    pub style: LineStyle,
    /// Where the activity icon sits along the span.
    pub icon_ratio: f64,
    pub icon_radius: f64,
}

impl Default for LifeSpan {
    fn default() -> Self {
        Self {
            source: Endpoint::detached(Anchor::Center),
            target: Endpoint::detached(Anchor::Center),
            style: LineStyle {
                stroke: "#222222".to_string(),
                stroke_width: 2.0,
                dasharray: None,
                source_marker: None,
                target_marker: None,
            },
            icon_ratio: 0.5,
            icon_radius: 12.0,
        }
    }
}

impl LifeSpan {
    pub const ICON_PATH: &'static str = "M -3 -5 3 -5 3 -2 -3 2 -3 5 3 5 3 2 -3 -2 Z";

    pub fn new() -> Self {
        Self::default()
    }

    /// Spans from the end of `from` to the start of `to`.
    pub fn attach_to_messages(&mut self, from: ShapeId, to: ShapeId) {
        self.source = Endpoint::shape(from, Anchor::Ratio(1.0));
        self.target = Endpoint::shape(to, Anchor::Ratio(0.0));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeKind {
    RoleGroup(RoleGroup),
    Role(Role),
    Lifeline(Lifeline),
    LifeSpan(LifeSpan),
    Message(Message),
}

impl ShapeKind {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::RoleGroup(_) => ShapeType::RoleGroup,
            Self::Role(_) => ShapeType::Role,
            Self::Lifeline(_) => ShapeType::Lifeline,
            Self::LifeSpan(_) => ShapeType::LifeSpan,
            Self::Message(_) => ShapeType::Message,
        }
    }

    /// Element box, for groups and roles.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Self::RoleGroup(g) => Some(g.bbox),
            Self::Role(r) => Some(r.bbox),
            _ => None,
        }
    }

    pub(crate) fn bbox_mut(&mut self) -> Option<&mut Rect> {
        match self {
            Self::RoleGroup(g) => Some(&mut g.bbox),
            Self::Role(r) => Some(&mut r.bbox),
            _ => None,
        }
    }

    /// `(source, target)` endpoints, for links.
    pub fn endpoints(&self) -> Option<(&Endpoint, &Endpoint)> {
        match self {
            Self::Lifeline(l) => Some((&l.source, &l.target)),
            Self::LifeSpan(s) => Some((&s.source, &s.target)),
            Self::Message(m) => Some((&m.source, &m.target)),
            _ => None,
        }
    }

    pub(crate) fn endpoints_mut(&mut self) -> Option<(&mut Endpoint, &mut Endpoint)> {
        match self {
            Self::Lifeline(l) => Some((&mut l.source, &mut l.target)),
            Self::LifeSpan(s) => Some((&mut s.source, &mut s.target)),
            Self::Message(m) => Some((&mut m.source, &mut m.target)),
            _ => None,
        }
    }
}

impl From<RoleGroup> for ShapeKind {
    fn from(value: RoleGroup) -> Self {
        Self::RoleGroup(value)
    }
}

impl From<Role> for ShapeKind {
    fn from(value: Role) -> Self {
        Self::Role(value)
    }
}

impl From<Lifeline> for ShapeKind {
    fn from(value: Lifeline) -> Self {
        Self::Lifeline(value)
    }
}

impl From<LifeSpan> for ShapeKind {
    fn from(value: LifeSpan) -> Self {
        Self::LifeSpan(value)
    }
}

impl From<Message> for ShapeKind {
    fn from(value: Message) -> Self {
        Self::Message(value)
    }
}

/// A shape stored in a [`crate::graph::Graph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub z: i32,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) embeds: Vec<ShapeId>,
    pub kind: ShapeKind,
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn is_link(&self) -> bool {
        self.shape_type().is_link()
    }

    pub fn is_element(&self) -> bool {
        !self.is_link()
    }

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn is_embedded(&self) -> bool {
        self.parent.is_some()
    }

    pub fn embeds(&self) -> &[ShapeId] {
        &self.embeds
    }
}
