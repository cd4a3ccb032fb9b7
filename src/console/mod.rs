//! Admin consoles: the service layer between HTTP handlers and the store.
//!
//! Each mutation follows the same order: claim the in-flight slot, load the
//! current record, ask the gate, write with compare-and-set, then audit.
//! Callers only ever see the state the store acknowledged.

pub mod orders;
pub mod requests;

pub use orders::{OrderConsole, OrderView};
pub use requests::{RequestConsole, RequestView};
pub use crate::workflow::offer::{ACTION_CLOSE_OFFER, ACTION_CREATE_OFFER};

pub const ACTION_STATUS: &str = "status";
pub const ACTION_CHAT: &str = "chat";
