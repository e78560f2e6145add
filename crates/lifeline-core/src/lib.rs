#![forbid(unsafe_code)]

//! Sequence diagram model (headless).
//!
//! Roles, role groups, lifelines, messages and lifespans live in one [`Graph`]. Links reference
//! other shapes through symbolic [`Anchor`]s that are resolved to coordinates on demand, so
//! messages stay on their lifelines and lifespans stay between their messages while roles are
//! dragged around.
//!
//! - [`shape`]: the closed set of shape kinds and their mutators
//! - [`layout`]: lifeline attachment and group fitting, with re-fit subscriptions
//! - [`resolve`]: anchor resolution
//! - [`interaction`]: pointer-driven dragging with geometric clamping

pub mod anchor;
pub mod config;
pub mod error;
pub mod geom;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod resolve;
pub mod shape;

pub use anchor::{Anchor, Endpoint, Terminal};
pub use config::{DiagramConfig, InteractionConfig, PaperConfig, ShapeDefaults};
pub use error::{Error, Result};
pub use graph::{Graph, PositionChange, SubscriptionId};
pub use interaction::{Interaction, PointerOutcome};
pub use layout::fit_roles_on_member_move;
pub use resolve::{LinkGeometry, Resolver};
pub use shape::{
    LifeSpan, Lifeline, Message, MessageLabel, Role, RoleGroup, Shape, ShapeId, ShapeKind,
    ShapeType,
};
