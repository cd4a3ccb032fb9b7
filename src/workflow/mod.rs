//! Status transition model for orders and gadget requests.
//!
//! Everything in this module is pure: it computes which status changes are
//! legal and never touches storage. Mutations are carried out by the
//! consoles in [`crate::console`] after a gate check accepts them.

pub mod gate;
pub mod graph;
pub mod guard;
pub mod offer;
pub mod presenter;
pub mod status;

use std::fmt;

pub use gate::HasStatus;
pub use graph::StatusGraph;
pub use offer::{PriceRules, RequestState};
pub use presenter::{Present, StatusBadge};
pub use status::{EntityKind, OrderStatus, RequestStatus, WireStatus};

/// Errors raised by the transition model.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// A status literal that is not part of the domain's enumeration.
    UnknownStatus { kind: EntityKind, value: String },
    /// The gate refused `from -> to`.
    TransitionRefused {
        kind: EntityKind,
        from: &'static str,
        to: &'static str,
    },
    /// A bulk action was requested with no entities selected.
    EmptySelection,
    /// A bulk action was requested over entities with differing statuses.
    HeterogeneousSelection,
    /// An offer or chat action was attempted from the wrong status.
    Precondition {
        action: &'static str,
        required: &'static str,
        actual: &'static str,
    },
    InvalidPrice(String),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::UnknownStatus { kind, value } => {
                write!(f, "Unknown {kind} status '{value}'")
            }
            WorkflowError::TransitionRefused { kind, from, to } => {
                write!(f, "Transition {from} -> {to} is not allowed for {kind}")
            }
            WorkflowError::EmptySelection => write!(f, "No entities selected"),
            WorkflowError::HeterogeneousSelection => {
                write!(f, "Selected entities do not share one status")
            }
            WorkflowError::Precondition { action, required, actual } => write!(
                f,
                "Cannot {action}: status must be '{required}' but is '{actual}'"
            ),
            WorkflowError::InvalidPrice(reason) => write!(f, "Invalid offer price: {reason}"),
        }
    }
}

impl std::error::Error for WorkflowError {}
