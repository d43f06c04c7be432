//! Order lifecycle state machine.
//!
//! This crate owns the order status vocabulary and the transition rules:
//! a linear forward chain from acceptance to delivery, with cancellation
//! reachable from every non-terminal status. Operator choices always
//! collapse to "one forward step or cancel", so a control keyboard can
//! never jump a status ahead or revive a finished order.
//!
//! The crate is deliberately pure: no async, no I/O, no persistence. The
//! store crate builds its sanctioned mutation path on top of
//! [`validate_transition`].

pub mod error;
pub mod status;

pub use error::TransitionError;
pub use status::{
    is_valid_transition, next_actions, validate_transition, OrderStatus, StatusAction,
    UnknownStatus,
};
