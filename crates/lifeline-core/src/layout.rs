//! Layout engine operations: attaching lifelines to roles and fitting groups around roles.

use crate::anchor::{Anchor, Endpoint};
use crate::error::Result;
use crate::geom::{point, union_all};
use crate::graph::{Graph, SubscriptionId};
use crate::shape::{ShapeId, ShapeType};

impl Graph {
    /// Shrinks or grows a group so that it encloses its embedded roles plus its padding.
    ///
    /// A group without roles keeps its current box.
    pub fn fit_roles(&mut self, group: ShapeId) -> Result<()> {
        let padding = self.group(group)?.padding;
        let embeds = self.get(group)?.embeds().to_vec();
        let mut boxes = Vec::with_capacity(embeds.len());
        for id in embeds {
            let shape = self.get(id)?;
            if shape.shape_type() == ShapeType::Role {
                if let Some(b) = shape.kind.bbox() {
                    boxes.push(b);
                }
            }
        }
        let Some(members) = union_all(boxes) else {
            return Ok(());
        };
        let fitted = members.inflate(padding, padding);
        if self.group(group)?.bbox() == fitted {
            return Ok(());
        }
        tracing::debug!(
            %group,
            x = fitted.origin.x,
            y = fitted.origin.y,
            width = fitted.size.width,
            height = fitted.size.height,
            "fit roles"
        );
        self.resize_element(group, fitted)
    }

    /// Hangs a lifeline under the horizontal center of `role`, down to `max_y`.
    ///
    /// The lifeline is embedded in the role so it follows the role when dragged.
    pub fn attach_to_role(&mut self, lifeline: ShapeId, role: ShapeId, max_y: f64) -> Result<()> {
        let center = self.role(role)?.bbox().center();
        let line = self.lifeline_mut(lifeline)?;
        line.source = Endpoint::shape(role, Anchor::Center);
        line.target = Endpoint::fixed(point(center.x, max_y));
        tracing::debug!(%lifeline, %role, center_x = center.x, max_y, "attach lifeline");
        self.embed(role, lifeline)
    }
}

/// Keeps `group` fitted around its roles: re-fits whenever an embedded shape moves.
pub fn fit_roles_on_member_move(graph: &mut Graph, group: ShapeId) -> Result<SubscriptionId> {
    graph.group(group)?;
    Ok(graph.subscribe(move |g, change| {
        if g.is_embedded_in(change.id, group) {
            g.fit_roles(group)?;
        }
        Ok(())
    }))
}
