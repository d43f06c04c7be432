//! Order notification rendering and dispatch.
//!
//! This crate composes the outbound messages for both audiences of an
//! order: the operator's control message (with its status-advance
//! keyboard) and the customer's confirmation and status updates. It also
//! reconciles the operator control message in place as the order moves
//! through its lifecycle.
//!
//! All network traffic goes through the [`Channel`] trait, so rendering
//! and dispatch logic is testable against a recording double.

pub mod channel;
pub mod customer;
pub mod dispatcher;
pub mod error;
pub mod operator;
pub mod reconciler;
pub mod templates;

pub use channel::{Channel, MessageRef, NoOpChannel, RecordingChannel};
pub use dispatcher::Notifier;
pub use error::NotifierError;
pub use reconciler::reconcile;
pub use templates::Lang;
