use thiserror::Error;

/// Problems with the command line, detected by the coordinator before any
/// message is exchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing matrix order")]
    MissingOrder,

    #[error("matrix order must be a positive integer, got {0:?}")]
    InvalidOrder(String),

    #[error("at least one participant is required")]
    NoParticipants,
}

/// Failures of a single send, receive or broadcast.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("participant {peer} is no longer reachable")]
    Disconnected { peer: usize },

    #[error("expected a message tagged {expected:?}, got {found:?}")]
    UnexpectedTag {
        expected: crate::comm::Tag,
        found: crate::comm::Tag,
    },

    #[error("message tagged {tag:?} carried the wrong kind of payload")]
    UnexpectedPayload { tag: crate::comm::Tag },

    #[error("expected {expected} values, received {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("rank {rank} is outside of a group of {size}")]
    RankOutOfRange { rank: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("assigned {rows} rows of a matrix of order {order}")]
    InconsistentAssignment { rows: usize, order: usize },

    #[error("MPI could not be initialized")]
    MpiInit,

    #[error("participant {rank} panicked")]
    ParticipantPanicked { rank: usize },

    #[error("failed to serialize the report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
