//! Order entity types.
//!
//! Defines the stored form of an order and the status enum that drives the
//! order lifecycle. Display labels and wire codes are explicit static tables.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned to an order by the store.
pub type OrderId = i64;

/// Maximum number of characters allowed in a customer name.
pub const MAX_CUSTOMER_NAME_LENGTH: usize = 100;

/// A customer purchase record tracked through a fixed lifecycle.
///
/// This is the stored form. Callers outside the store only ever receive
/// clones or projections ([`crate::OrderResponse`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Identifier assigned by the store. Zero until the order is inserted.
	pub id: OrderId,
	/// Name of the customer who placed the order.
	pub customer_name: String,
	/// Creation timestamp, immutable after creation.
	pub order_date: DateTime<Utc>,
	/// Total amount of the order, always greater than zero.
	pub total_amount: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
}

impl Order {
	/// Builds a fresh, not yet stored order in the `Created` status dated now.
	pub fn new(customer_name: impl Into<String>, total_amount: Decimal) -> Self {
		Self {
			id: 0,
			customer_name: customer_name.into(),
			order_date: Utc::now(),
			total_amount,
			status: OrderStatus::Created,
		}
	}

	/// Checks the field invariants of an order.
	pub fn is_valid(&self) -> bool {
		!self.customer_name.trim().is_empty()
			&& self.customer_name.chars().count() <= MAX_CUSTOMER_NAME_LENGTH
			&& self.total_amount > Decimal::ZERO
	}
}

/// Status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
	/// Order was created and awaits payment.
	Created,
	/// Order has been paid.
	Paid,
	/// Order has been shipped. Terminal.
	Shipped,
	/// Order was cancelled. Terminal.
	Cancelled,
}

/// Static status table: variant, name, wire code, display label.
const STATUS_TABLE: [(OrderStatus, &str, u8, &str); 4] = [
	(OrderStatus::Created, "Created", 0, "Criado"),
	(OrderStatus::Paid, "Paid", 1, "Pago"),
	(OrderStatus::Shipped, "Shipped", 2, "Enviado"),
	(OrderStatus::Cancelled, "Cancelled", 3, "Cancelado"),
];

impl OrderStatus {
	/// All statuses in wire-code order.
	pub const ALL: [OrderStatus; 4] = [
		OrderStatus::Created,
		OrderStatus::Paid,
		OrderStatus::Shipped,
		OrderStatus::Cancelled,
	];

	fn entry(&self) -> &'static (OrderStatus, &'static str, u8, &'static str) {
		&STATUS_TABLE[*self as usize]
	}

	/// Returns the variant name, e.g. `"Paid"`.
	pub fn as_str(&self) -> &'static str {
		self.entry().1
	}

	/// Returns the numeric wire code (`Created=0` .. `Cancelled=3`).
	pub fn code(&self) -> u8 {
		self.entry().2
	}

	/// Returns the localized display label, e.g. `"Pago"`.
	pub fn label(&self) -> &'static str {
		self.entry().3
	}

	/// Looks up a status by its wire code.
	pub fn from_code(code: u64) -> Option<Self> {
		STATUS_TABLE
			.iter()
			.find(|(_, _, c, _)| u64::from(*c) == code)
			.map(|(status, _, _, _)| *status)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		STATUS_TABLE
			.iter()
			.find(|(_, name, _, _)| name.eq_ignore_ascii_case(s.trim()))
			.map(|(status, _, _, _)| *status)
			.ok_or_else(|| format!("unknown order status '{}'", s))
	}
}

impl Serialize for OrderStatus {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for OrderStatus {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct StatusVisitor;

		impl de::Visitor<'_> for StatusVisitor {
			type Value = OrderStatus;

			fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
				f.write_str("an order status code (0-3) or name")
			}

			fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
				OrderStatus::from_code(v)
					.ok_or_else(|| E::custom(format!("invalid order status code {}", v)))
			}

			fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
				u64::try_from(v)
					.ok()
					.and_then(OrderStatus::from_code)
					.ok_or_else(|| E::custom(format!("invalid order status code {}", v)))
			}

			fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
				v.parse().map_err(E::custom)
			}
		}

		deserializer.deserialize_any(StatusVisitor)
	}
}
