//! Order state machine.
//!
//! Orders move Created -> Paid -> Shipped, and may be Cancelled from
//! Created or Paid. Shipped and Cancelled are terminal. No status may
//! transition to itself.

use once_cell::sync::Lazy;
use order_types::{Order, OrderStatus};
use std::collections::{HashMap, HashSet};

/// Static transition table - each status maps to its allowed next statuses
static TRANSITIONS: Lazy<HashMap<OrderStatus, HashSet<OrderStatus>>> = Lazy::new(|| {
	let mut m = HashMap::new();
	m.insert(
		OrderStatus::Created,
		HashSet::from([OrderStatus::Paid, OrderStatus::Cancelled]),
	);
	m.insert(
		OrderStatus::Paid,
		HashSet::from([OrderStatus::Shipped, OrderStatus::Cancelled]),
	);
	m.insert(OrderStatus::Shipped, HashSet::new()); // terminal
	m.insert(OrderStatus::Cancelled, HashSet::new()); // terminal
	m
});

/// Rules governing order status changes and deletion.
pub struct OrderStateMachine;

impl OrderStateMachine {
	/// Checks if a status transition is allowed.
	pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
		TRANSITIONS
			.get(&from)
			.is_some_and(|allowed| allowed.contains(&to))
	}

	/// Lists the statuses reachable from `status`, in wire-code order.
	pub fn allowed_transitions(status: OrderStatus) -> Vec<OrderStatus> {
		OrderStatus::ALL
			.into_iter()
			.filter(|next| Self::is_valid_transition(status, *next))
			.collect()
	}

	/// Returns true when the status has no outgoing transitions.
	pub fn is_terminal(status: OrderStatus) -> bool {
		Self::allowed_transitions(status).is_empty()
	}

	/// Only orders that were never paid, shipped or cancelled may be deleted.
	pub fn can_be_deleted(order: &Order) -> bool {
		order.status == OrderStatus::Created
	}
}
