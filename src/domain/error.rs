//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::Slot;

/// Fatal tree errors: the requested edit could not be carried out at all.
/// The tree is left exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node allocation failed: limit of {limit} nodes reached")]
    Allocation { limit: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Edits that are refused without touching the tree.
///
/// These are reported, not raised: callers get them back inside an
/// [`Outcome`] and decide whether to warn, ignore or abort.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("{0} child already exists")]
    SlotOccupied(Slot),

    #[error("no {0} subtree to delete")]
    SlotEmpty(Slot),

    #[error("current node is the root and has no parent")]
    AtRoot,

    #[error("current node has no {0} child")]
    NoChild(Slot),

    #[error("no current node")]
    NoCursor,
}

/// Result of a non-fatal edit or cursor move.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Done(T),
    Rejected(InvalidOperation),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<InvalidOperation> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Rejected(op) => Some(*op),
        }
    }

    pub fn into_result(self) -> Result<T, InvalidOperation> {
        match self {
            Outcome::Done(value) => Ok(value),
            Outcome::Rejected(op) => Err(op),
        }
    }

    /// Drop the payload, keeping only whether the edit went through.
    pub fn discard(self) -> Outcome {
        match self {
            Outcome::Done(_) => Outcome::Done(()),
            Outcome::Rejected(op) => Outcome::Rejected(op),
        }
    }
}
