//! Domain-specific errors.

use thiserror::Error;

use crate::domain::model::{Slot, Span};

/// Contract violations raised by the placement grid.
///
/// The grid validates before it appends, so a returned error always leaves the tracked
/// occupancy untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("span must cover at least one row and one column (got {rows}x{cols})")]
    ZeroSpan { rows: usize, cols: usize },
    #[error("item at {slot} spanning {span} overlaps the item anchored at {existing}")]
    Overlap {
        slot: Slot,
        span: Span,
        existing: Slot,
    },
    #[error("item at {slot} spanning {span} runs past the largest addressable cell")]
    OutOfBounds { slot: Slot, span: Span },
}

/// Failures while dispatching a button action to its host.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("script execution is disabled by the configured script policy")]
    ScriptDenied,
    #[error("script execution was declined")]
    ScriptDeclined,
    #[error("button has no entries to act on")]
    NoEntries,
    #[error("action host failed: {0}")]
    Host(#[from] anyhow::Error),
}

/// Error returned when parsing a [`ScriptPolicy`](crate::domain::model::ScriptPolicy) fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptPolicyParseError {
    #[error("unknown script policy '{0}' (expected deny, confirm, or allow)")]
    UnknownPolicy(String),
}
