//! The shared in-memory shape graph plus its position-change subscriptions.

use crate::error::{Error, Result};
use crate::geom::{Point, Rect, vector};
use crate::shape::{
    LifeSpan, Lifeline, Message, Role, RoleGroup, Shape, ShapeId, ShapeKind, ShapeType,
};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;

/// Emitted for every element whose origin moved, including embedded elements dragged along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionChange {
    pub id: ShapeId,
    pub previous: Point,
    pub current: Point,
}

pub type PositionCallback = Box<dyn FnMut(&mut Graph, &PositionChange) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct Graph {
    shapes: IndexMap<ShapeId, Shape, FxBuildHasher>,
    next_id: u32,
    subscriptions: Vec<(SubscriptionId, PositionCallback)>,
    /// Ids of the callbacks taken out of `subscriptions` for the current dispatch.
    detached: Vec<SubscriptionId>,
    cancelled: Vec<SubscriptionId>,
    next_subscription: u64,
    pending: VecDeque<PositionChange>,
    dispatching: bool,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("shapes", &self.shapes)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

macro_rules! typed_accessors {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, id: ShapeId) -> Result<&$ty> {
            match &self.get(id)?.kind {
                ShapeKind::$variant(v) => Ok(v),
                other => Err(Error::KindMismatch {
                    id,
                    expected: ShapeType::$variant.name(),
                    actual: other.shape_type(),
                }),
            }
        }

        pub fn $get_mut(&mut self, id: ShapeId) -> Result<&mut $ty> {
            match &mut self.get_mut(id)?.kind {
                ShapeKind::$variant(v) => Ok(v),
                other => Err(Error::KindMismatch {
                    id,
                    expected: ShapeType::$variant.name(),
                    actual: other.shape_type(),
                }),
            }
        }
    };
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape with its type's default z and returns the allocated id.
    pub fn add(&mut self, kind: impl Into<ShapeKind>) -> ShapeId {
        let kind = kind.into();
        let id = ShapeId::new(self.next_id);
        self.next_id += 1;
        let z = kind.shape_type().default_z();
        tracing::debug!(%id, shape = %kind.shape_type(), "add shape");
        self.shapes.insert(
            id,
            Shape {
                id,
                z,
                parent: None,
                embeds: Vec::new(),
                kind,
            },
        );
        id
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Result<&Shape> {
        self.shapes.get(&id).ok_or(Error::UnknownShape { id })
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Result<&mut Shape> {
        self.shapes.get_mut(&id).ok_or(Error::UnknownShape { id })
    }

    /// Shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn ids_of(&self, shape_type: ShapeType) -> Vec<ShapeId> {
        self.shapes
            .values()
            .filter(|s| s.shape_type() == shape_type)
            .map(|s| s.id)
            .collect()
    }

    typed_accessors!(group, group_mut, RoleGroup, RoleGroup);
    typed_accessors!(role, role_mut, Role, Role);
    typed_accessors!(lifeline, lifeline_mut, Lifeline, Lifeline);
    typed_accessors!(message, message_mut, Message, Message);
    typed_accessors!(lifespan, lifespan_mut, LifeSpan, LifeSpan);

    pub fn set_z(&mut self, id: ShapeId, z: i32) -> Result<()> {
        self.get_mut(id)?.z = z;
        Ok(())
    }

    /// Element box of a group or role.
    pub fn bbox(&self, id: ShapeId) -> Result<Rect> {
        let shape = self.get(id)?;
        shape.kind.bbox().ok_or(Error::KindMismatch {
            id,
            expected: "element",
            actual: shape.shape_type(),
        })
    }

    /// Makes `child` move with `parent`. Re-embedding detaches the child from its old parent.
    pub fn embed(&mut self, parent: ShapeId, child: ShapeId) -> Result<()> {
        let parent_shape = self.get(parent)?;
        if parent_shape.is_link() {
            return Err(Error::KindMismatch {
                id: parent,
                expected: "element",
                actual: parent_shape.shape_type(),
            });
        }
        self.get(child)?;
        if parent == child || self.is_embedded_in(parent, child) {
            return Err(Error::EmbedCycle { parent, child });
        }

        if let Some(old) = self.get(child)?.parent {
            if old == parent {
                return Ok(());
            }
            self.get_mut(old)?.embeds.retain(|id| *id != child);
        }
        self.get_mut(child)?.parent = Some(parent);
        self.get_mut(parent)?.embeds.push(child);
        tracing::debug!(%parent, %child, "embed");
        Ok(())
    }

    /// True when `ancestor` is found anywhere on `id`'s parent chain.
    pub fn is_embedded_in(&self, id: ShapeId, ancestor: ShapeId) -> bool {
        let mut cur = self.shapes.get(&id).and_then(|s| s.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.shapes.get(&p).and_then(|s| s.parent);
        }
        false
    }

    /// Moves a shape and everything embedded in it, then notifies subscribers.
    pub fn translate(&mut self, id: ShapeId, dx: f64, dy: f64) -> Result<()> {
        if !(dx.is_finite() && dy.is_finite()) {
            return Err(Error::NonFiniteCoordinate { x: dx, y: dy });
        }
        self.get(id)?;
        if dx == 0.0 && dy == 0.0 {
            return Ok(());
        }
        self.translate_tree(id, dx, dy);
        self.flush()
    }

    pub fn set_position(&mut self, id: ShapeId, position: Point) -> Result<()> {
        if !crate::geom::is_finite_point(position) {
            return Err(Error::NonFiniteCoordinate {
                x: position.x,
                y: position.y,
            });
        }
        let origin = self.bbox(id)?.origin;
        self.translate(id, position.x - origin.x, position.y - origin.y)
    }

    fn translate_tree(&mut self, id: ShapeId, dx: f64, dy: f64) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(shape) = self.shapes.get_mut(&cur) else {
                continue;
            };
            if let Some(bbox) = shape.kind.bbox_mut() {
                let previous = bbox.origin;
                bbox.origin += vector(dx, dy);
                self.pending.push_back(PositionChange {
                    id: cur,
                    previous,
                    current: bbox.origin,
                });
            } else if let Some((source, target)) = shape.kind.endpoints_mut() {
                source.translate_fixed(dx, dy);
                target.translate_fixed(dx, dy);
            }
            stack.extend(shape.embeds.iter().rev().copied());
        }
    }

    /// Replaces an element box without moving its embeds (used when a group re-fits).
    pub(crate) fn resize_element(&mut self, id: ShapeId, bbox: Rect) -> Result<()> {
        let shape = self.get_mut(id)?;
        let actual = shape.shape_type();
        let Some(slot) = shape.kind.bbox_mut() else {
            return Err(Error::KindMismatch {
                id,
                expected: "element",
                actual,
            });
        };
        let previous = slot.origin;
        *slot = bbox;
        if previous != bbox.origin {
            self.pending.push_back(PositionChange {
                id,
                previous,
                current: bbox.origin,
            });
        }
        self.flush()
    }

    /// Registers a callback that runs after every position change.
    ///
    /// Callbacks run once the mutation that caused the change has completed, so they may freely
    /// mutate the graph; changes they cause are delivered in the same flush.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&mut Graph, &PositionChange) -> Result<()> + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|(sid, _)| *sid != id);
        if self.subscriptions.len() != before {
            return true;
        }
        if self.detached.contains(&id) && !self.cancelled.contains(&id) {
            // Dropped once the detached list is restored.
            self.cancelled.push(id);
            return true;
        }
        false
    }

    /// Live subscriptions, including ones whose callbacks are running.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len() + self.detached.len() - self.cancelled.len()
    }

    fn flush(&mut self) -> Result<()> {
        if self.dispatching {
            return Ok(());
        }
        self.dispatching = true;
        let result = self.dispatch_pending();
        self.dispatching = false;
        if result.is_err() {
            self.pending.clear();
        }
        result
    }

    fn dispatch_pending(&mut self) -> Result<()> {
        while let Some(change) = self.pending.pop_front() {
            let mut subscriptions = std::mem::take(&mut self.subscriptions);
            self.detached = subscriptions.iter().map(|(sid, _)| *sid).collect();
            let mut outcome = Ok(());
            for (_, callback) in subscriptions.iter_mut() {
                outcome = callback(self, &change);
                if outcome.is_err() {
                    break;
                }
            }
            subscriptions.append(&mut self.subscriptions);
            self.detached.clear();
            if !self.cancelled.is_empty() {
                let cancelled = std::mem::take(&mut self.cancelled);
                subscriptions.retain(|(sid, _)| !cancelled.contains(sid));
            }
            self.subscriptions = subscriptions;
            outcome?;
        }
        Ok(())
    }

    /// Checks that every link endpoint references an existing shape of the expected kind.
    pub fn validate(&self) -> Result<()> {
        for shape in self.shapes.values() {
            let Some((source, target)) = shape.kind.endpoints() else {
                continue;
            };
            for endpoint in [source, target] {
                let Some(ref_id) = endpoint.shape_id() else {
                    continue;
                };
                let Some(referenced) = self.shapes.get(&ref_id) else {
                    return Err(Error::DanglingEndpoint {
                        link: shape.id,
                        missing: ref_id,
                    });
                };
                let ok = match shape.shape_type() {
                    ShapeType::Lifeline => referenced.is_element(),
                    ShapeType::Message => referenced.shape_type() == ShapeType::Lifeline,
                    ShapeType::LifeSpan => referenced.shape_type() == ShapeType::Message,
                    ShapeType::RoleGroup | ShapeType::Role => true,
                };
                if !ok {
                    let expected = match shape.shape_type() {
                        ShapeType::Lifeline => "element",
                        ShapeType::Message => ShapeType::Lifeline.name(),
                        _ => ShapeType::Message.name(),
                    };
                    return Err(Error::KindMismatch {
                        id: ref_id,
                        expected,
                        actual: referenced.shape_type(),
                    });
                }
            }
        }
        Ok(())
    }
}
