//! The canonical browser / web server / database diagram.

use crate::render::{Paper, Surface};
use lifeline_core::geom::size;
use lifeline_core::layout::fit_roles_on_member_move;
use lifeline_core::shape::{LifeSpan, Lifeline, Message, Role, RoleGroup};
use lifeline_core::{DiagramConfig, Graph, ShapeDefaults, ShapeId, SubscriptionId};

const ROLES: [(&str, f64, f64); 3] = [
    ("Browser", 100.0, 20.0),
    ("Web Server", 400.0, 20.0),
    ("Database Server", 600.0, 20.0),
];

/// `(from lifeline, to lifeline, start offset, description)`.
const MESSAGES: [(usize, usize, f64, &str); 4] = [
    (0, 1, 50.0, "HTTP GET Request"),
    (1, 2, 150.0, "SQL Command"),
    (2, 1, 250.0, "Result Set"),
    (1, 0, 350.0, "HTTP Response"),
];

const FIRST_MESSAGE_COLOR: &str = "red";

/// Handles to every shape of the assembled diagram.
#[derive(Debug)]
pub struct CanonicalDiagram {
    pub graph: Graph,
    pub roles: [ShapeId; 3],
    pub backend: ShapeId,
    pub backend_refit: SubscriptionId,
    pub lifelines: [ShapeId; 3],
    pub messages: [ShapeId; 4],
    pub lifespan: ShapeId,
}

/// Builds the diagram without painting it.
pub fn build_canonical(config: &DiagramConfig) -> lifeline_core::Result<CanonicalDiagram> {
    let defaults = config.shapes();
    let max_y = config.paper().height;
    let mut graph = Graph::new();

    let mut roles = [ShapeId::new(0); 3];
    for (slot, (name, x, y)) in roles.iter_mut().zip(ROLES) {
        *slot = graph.add(role(name, x, y, &defaults));
    }

    let backend = graph.add(RoleGroup::new().with_padding(defaults.group_padding));
    graph.embed(backend, roles[1])?;
    graph.embed(backend, roles[2])?;
    graph.fit_roles(backend)?;
    let backend_refit = fit_roles_on_member_move(&mut graph, backend)?;

    let mut lifelines = [ShapeId::new(0); 3];
    for (slot, role) in lifelines.iter_mut().zip(roles) {
        let line = graph.add(Lifeline::new());
        graph.attach_to_role(line, role, max_y)?;
        *slot = line;
    }

    let mut messages = [ShapeId::new(0); 4];
    for (i, (slot, (from, to, start, text))) in messages.iter_mut().zip(MESSAGES).enumerate() {
        let mut m = Message::new();
        m.label_text.font_size = defaults.message_font_size;
        m.label_text.font_family = defaults.message_font_family.clone();
        m.set_color(defaults.message_color.as_str());
        m.set_from_to(lifelines[from], lifelines[to]);
        m.set_start(start);
        m.set_description(text);
        if i == 0 {
            m.set_color(FIRST_MESSAGE_COLOR);
        }
        *slot = graph.add(m);
    }

    let mut span = LifeSpan::new();
    span.attach_to_messages(messages[1], messages[2]);
    let lifespan = graph.add(span);

    graph.validate()?;
    tracing::debug!(shapes = graph.len(), "assembled canonical diagram");
    Ok(CanonicalDiagram {
        graph,
        roles,
        backend,
        backend_refit,
        lifelines,
        messages,
        lifespan,
    })
}

fn role(name: &str, x: f64, y: f64, defaults: &ShapeDefaults) -> Role {
    let mut role = Role::at(x, y).with_size(size(defaults.role_width, defaults.role_height));
    role.label.font_size = defaults.role_font_size;
    role.label.font_family = defaults.role_font_family.clone();
    role.set_name(name);
    role
}

/// Builds the diagram with `paper` frozen, then paints it with a single unfreeze.
///
/// Updates the paper had pending are folded into that paint.
pub fn assemble<S: Surface>(
    paper: &mut Paper<S>,
    config: &DiagramConfig,
) -> crate::render::Result<CanonicalDiagram> {
    paper.freeze();
    let diagram = build_canonical(config)?;
    paper.unfreeze(&diagram.graph)?;
    Ok(diagram)
}
