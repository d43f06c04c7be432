//! Order statuses and the transitions between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

/// Lifecycle status of an order.
///
/// The happy path is a straight line:
/// `accepted -> preparing -> cooking -> out_for_delivery -> delivered`.
/// `cancelled` is reachable from any non-terminal status. `delivered` and
/// `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Accepted,
    Preparing,
    Cooking,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Cooking,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// The wire/storage representation of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Cooking => "cooking",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The single forward step from this status, if any.
    pub fn forward(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Accepted => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Cooking),
            OrderStatus::Cooking => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(OrderStatus::Accepted),
            "preparing" => Ok(OrderStatus::Preparing),
            "cooking" => Ok(OrderStatus::Cooking),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A status string that is not one of the six defined values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

/// One pressable operator action: a button caption and the status it
/// transitions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusAction {
    pub label: &'static str,
    pub target: OrderStatus,
}

const CANCEL: StatusAction = StatusAction {
    label: "❌ Отменить заказ",
    target: OrderStatus::Cancelled,
};

/// The actions available to the operator at a given status.
///
/// Ordering is fixed: the forward step first, cancellation second, so
/// rendered keyboards are deterministic. Terminal statuses have no
/// actions.
pub fn next_actions(status: OrderStatus) -> &'static [StatusAction] {
    match status {
        OrderStatus::Accepted => &[
            StatusAction {
                label: "👨‍🍳 Начать готовить",
                target: OrderStatus::Preparing,
            },
            CANCEL,
        ],
        OrderStatus::Preparing => &[
            StatusAction {
                label: "🔥 Готово, упаковываем",
                target: OrderStatus::Cooking,
            },
            CANCEL,
        ],
        OrderStatus::Cooking => &[
            StatusAction {
                label: "🚗 Передать курьеру",
                target: OrderStatus::OutForDelivery,
            },
            CANCEL,
        ],
        OrderStatus::OutForDelivery => &[
            StatusAction {
                label: "✅ Заказ доставлен!",
                target: OrderStatus::Delivered,
            },
            CANCEL,
        ],
        OrderStatus::Delivered | OrderStatus::Cancelled => &[],
    }
}

/// Whether `to` is directly reachable from `from`.
///
/// True only for the single forward step or cancellation out of a
/// non-terminal status. Self-transitions, skips and backward moves are
/// all rejected.
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    next_actions(from).iter().any(|action| action.target == to)
}

/// Validate a transition, returning a typed error when it is not allowed.
pub fn validate_transition(from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition { from, to })
    }
}
