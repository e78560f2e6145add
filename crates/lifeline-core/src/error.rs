use crate::shape::{ShapeId, ShapeType};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("unknown shape: {id}")]
    UnknownShape { id: ShapeId },

    #[error("shape {id} is a {actual}, expected {expected}")]
    KindMismatch {
        id: ShapeId,
        expected: &'static str,
        actual: ShapeType,
    },

    #[error("link {link} references missing shape {missing}")]
    DanglingEndpoint { link: ShapeId, missing: ShapeId },

    #[error("anchor resolution for link {id} refers back to itself")]
    AnchorCycle { id: ShapeId },

    #[error("cannot embed {child} into {parent}: it would contain itself")]
    EmbedCycle { parent: ShapeId, child: ShapeId },

    #[error("non-finite coordinate: ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("link {id} has no resolvable geometry")]
    EmptyLink { id: ShapeId },
}
