use thiserror::Error;

/// Errors that can be propagated out of this crate's field, polynomial,
/// Merkle, transcript and FRI operations.
///
/// `LowDegreeFailure` from the design notes is deliberately *not* a variant
/// here: rejecting a proof is a verdict returned from `Fri::verify`, not a
/// thrown error.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FriError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("bad parameter: {0}")]
    BadParameter(String),

    #[error("non-exact polynomial division: remainder is not zero")]
    NonExactDivision,

    #[error("transcript exhausted: attempted to pull past the write cursor")]
    TranscriptExhausted,

    #[error("merkle tree requires a power-of-two, non-empty leaf set")]
    BadLeafCount,

    #[error("malformed transcript item encoding")]
    MalformedTranscriptItem,
}

pub type FriResult<T> = Result<T, FriError>;
