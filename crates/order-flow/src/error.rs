//! Error types for the state machine.

use thiserror::Error;

use crate::status::OrderStatus;

/// Errors that can occur when advancing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The requested status is not reachable from the current one.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}
