//! Order lifecycle service.
//!
//! Validates input before the store is touched, enforces the status state
//! machine and projects stored orders for callers. Update and delete hold a
//! service-wide lock from the status read through the write, so two
//! concurrent requests can never both act on the same stale status.

mod error;

pub use error::{
	ErrorKind, OrderServiceError, CUSTOMER_NAME_REQUIRED, CUSTOMER_NAME_TOO_LONG,
	INTERNAL_ERROR_MESSAGE, INVALID_ORDER_ID, TOTAL_AMOUNT_NOT_POSITIVE,
};

use crate::state::OrderStateMachine;
use order_storage::OrderStore;
use order_types::{
	CreateOrderRequest, Order, OrderId, OrderResponse, UpdateOrderRequest,
	MAX_CUSTOMER_NAME_LENGTH,
};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

pub const LIST_SUCCESS: &str = "Pedidos recuperados com sucesso";
pub const GET_SUCCESS: &str = "Pedido encontrado com sucesso";
pub const CREATE_SUCCESS: &str = "Pedido criado com sucesso";
pub const UPDATE_SUCCESS: &str = "Pedido atualizado com sucesso";
pub const DELETE_SUCCESS: &str = "Pedido excluído com sucesso";

/// Service implementing the order lifecycle on top of an [`OrderStore`].
pub struct OrderService {
	store: Box<dyn OrderStore>,
	/// Serialises the check-then-act sequences of update and delete.
	transition_lock: Mutex<()>,
}

impl OrderService {
	pub fn new(store: Box<dyn OrderStore>) -> Self {
		Self {
			store,
			transition_lock: Mutex::new(()),
		}
	}

	/// Returns every order, sorted by id.
	#[instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<OrderResponse>, OrderServiceError> {
		let orders = self
			.store
			.list()
			.await
			.map_err(OrderServiceError::from)
			.inspect_err(log_failure)?;

		tracing::info!(count = orders.len(), "Listed orders");
		Ok(orders.iter().map(OrderResponse::from).collect())
	}

	#[instrument(skip(self))]
	pub async fn get(&self, id: OrderId) -> Result<OrderResponse, OrderServiceError> {
		let order = self.existing(id).await.inspect_err(log_failure)?;

		tracing::info!(order_id = id, "Order found");
		Ok(OrderResponse::from(order))
	}

	/// Creates an order in the `Created` status dated now.
	#[instrument(skip_all, fields(customer = %request.customer_name))]
	pub async fn create(
		&self,
		request: CreateOrderRequest,
	) -> Result<OrderResponse, OrderServiceError> {
		validate_details(&request.customer_name, request.total_amount).inspect_err(log_failure)?;

		let order = Order::new(request.customer_name, request.total_amount);
		ensure_valid(&order).inspect_err(log_failure)?;
		let created = self
			.store
			.insert(order)
			.await
			.map_err(OrderServiceError::from)
			.inspect_err(log_failure)?;

		tracing::info!(order_id = created.id, "Order created");
		Ok(OrderResponse::from(created))
	}

	/// Replaces name, amount and status of an order, keeping its id and date.
	///
	/// The requested status must be reachable from the current one.
	#[instrument(skip(self, request), fields(status = %request.status))]
	pub async fn update(
		&self,
		id: OrderId,
		request: UpdateOrderRequest,
	) -> Result<OrderResponse, OrderServiceError> {
		validate_id(id).inspect_err(log_failure)?;
		validate_details(&request.customer_name, request.total_amount).inspect_err(log_failure)?;

		let _guard = self.transition_lock.lock().await;
		let current = self.existing(id).await.inspect_err(log_failure)?;

		if !OrderStateMachine::is_valid_transition(current.status, request.status) {
			let err = OrderServiceError::InvalidTransition {
				from: current.status,
				to: request.status,
			};
			log_failure(&err);
			return Err(err);
		}

		let updated = Order {
			id,
			customer_name: request.customer_name,
			order_date: current.order_date,
			total_amount: request.total_amount,
			status: request.status,
		};
		ensure_valid(&updated).inspect_err(log_failure)?;

		let stored = self
			.store
			.replace(id, updated)
			.await
			.map_err(OrderServiceError::from)
			.and_then(|replaced| replaced.ok_or(OrderServiceError::NotFound(id)))
			.inspect_err(log_failure)?;

		tracing::info!(
			order_id = id,
			from = %current.status,
			to = %stored.status,
			"Order updated"
		);
		Ok(OrderResponse::from(stored))
	}

	/// Deletes an order. Only orders still in `Created` may be deleted.
	#[instrument(skip(self))]
	pub async fn delete(&self, id: OrderId) -> Result<bool, OrderServiceError> {
		validate_id(id).inspect_err(log_failure)?;

		let _guard = self.transition_lock.lock().await;
		let current = self.existing(id).await.inspect_err(log_failure)?;

		if !OrderStateMachine::can_be_deleted(&current) {
			let err = OrderServiceError::CannotDelete(current.status);
			log_failure(&err);
			return Err(err);
		}

		let removed = self
			.store
			.remove(id)
			.await
			.map_err(OrderServiceError::from)
			.inspect_err(log_failure)?;
		if !removed {
			let err = OrderServiceError::NotFound(id);
			log_failure(&err);
			return Err(err);
		}

		tracing::info!(order_id = id, "Order deleted");
		Ok(true)
	}

	/// Validates the id and fetches the order stored under it.
	async fn existing(&self, id: OrderId) -> Result<Order, OrderServiceError> {
		validate_id(id)?;
		self.store
			.get(id)
			.await?
			.ok_or(OrderServiceError::NotFound(id))
	}
}

fn validate_id(id: OrderId) -> Result<(), OrderServiceError> {
	if id <= 0 {
		return Err(OrderServiceError::invalid_input(INVALID_ORDER_ID));
	}
	Ok(())
}

fn validate_details(customer_name: &str, total_amount: Decimal) -> Result<(), OrderServiceError> {
	if customer_name.trim().is_empty() {
		return Err(OrderServiceError::invalid_input(CUSTOMER_NAME_REQUIRED));
	}
	if customer_name.chars().count() > MAX_CUSTOMER_NAME_LENGTH {
		return Err(OrderServiceError::invalid_input(CUSTOMER_NAME_TOO_LONG));
	}
	if total_amount <= Decimal::ZERO {
		return Err(OrderServiceError::invalid_input(TOTAL_AMOUNT_NOT_POSITIVE));
	}
	Ok(())
}

/// Final invariant check on a fully built order.
fn ensure_valid(order: &Order) -> Result<(), OrderServiceError> {
	if !order.is_valid() {
		return Err(OrderServiceError::Unexpected(format!(
			"order {} failed invariant check",
			order.id
		)));
	}
	Ok(())
}

fn log_failure(err: &OrderServiceError) {
	if err.is_expected() {
		tracing::warn!(error = %err, "Order operation rejected");
	} else {
		tracing::error!(error = %err, "Order operation failed");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_storage::implementations::memory::MemoryOrderStore;
	use order_storage::{MockOrderStore, StorageError};
	use order_types::OrderStatus;
	use std::sync::Arc;
	use std::time::Duration;

	fn service() -> OrderService {
		OrderService::new(Box::new(MemoryOrderStore::new()))
	}

	fn dec(s: &str) -> Decimal {
		s.parse().unwrap()
	}

	fn create_request(name: &str, amount: &str) -> CreateOrderRequest {
		CreateOrderRequest {
			customer_name: name.to_string(),
			total_amount: dec(amount),
		}
	}

	fn update_request(name: &str, amount: &str, status: OrderStatus) -> UpdateOrderRequest {
		UpdateOrderRequest {
			customer_name: name.to_string(),
			total_amount: dec(amount),
			status,
		}
	}

	/// Creates an order and drives it into `status` along legal edges.
	async fn order_in(service: &OrderService, status: OrderStatus) -> OrderId {
		let id = service
			.create(create_request("Alice", "100.00"))
			.await
			.unwrap()
			.id;
		let path: &[OrderStatus] = match status {
			OrderStatus::Created => &[],
			OrderStatus::Paid => &[OrderStatus::Paid],
			OrderStatus::Shipped => &[OrderStatus::Paid, OrderStatus::Shipped],
			OrderStatus::Cancelled => &[OrderStatus::Cancelled],
		};
		for next in path {
			service
				.update(id, update_request("Alice", "100.00", *next))
				.await
				.unwrap();
		}
		id
	}

	#[tokio::test]
	async fn test_lifecycle_scenario() {
		let service = service();

		let created = service
			.create(create_request("Alice", "100.00"))
			.await
			.unwrap();
		assert_eq!(created.id, 1);
		assert_eq!(created.status, OrderStatus::Created);
		assert_eq!(created.status_description, "Criado");

		let paid = service
			.update(1, update_request("Alice", "100.00", OrderStatus::Paid))
			.await
			.unwrap();
		assert_eq!(paid.status, OrderStatus::Paid);
		assert_eq!(paid.order_date, created.order_date);

		let err = service.delete(1).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidTransition);

		let shipped = service
			.update(1, update_request("Alice", "100.00", OrderStatus::Shipped))
			.await
			.unwrap();
		assert_eq!(shipped.status, OrderStatus::Shipped);

		let err = service
			.update(1, update_request("Alice", "100.00", OrderStatus::Created))
			.await
			.unwrap_err();
		assert!(matches!(
			err,
			OrderServiceError::InvalidTransition {
				from: OrderStatus::Shipped,
				to: OrderStatus::Created
			}
		));
	}

	#[tokio::test]
	async fn test_get_invalid_and_unknown_ids() {
		let service = service();

		let err = service.get(0).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
		assert_eq!(err.to_string(), INVALID_ORDER_ID);

		let err = service.get(9999).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
		assert_eq!(err.to_string(), "Pedido com ID 9999 não foi encontrado");
	}

	#[tokio::test]
	async fn test_get_after_delete_is_not_found() {
		let service = service();
		let id = order_in(&service, OrderStatus::Created).await;

		assert!(service.delete(id).await.unwrap());
		assert_eq!(
			service.get(id).await.unwrap_err().kind(),
			ErrorKind::NotFound
		);
		assert_eq!(
			service.delete(id).await.unwrap_err().kind(),
			ErrorKind::NotFound
		);
	}

	#[tokio::test]
	async fn test_ids_increase_across_deletes() {
		let service = service();
		let first = order_in(&service, OrderStatus::Created).await;
		service.delete(first).await.unwrap();
		let second = order_in(&service, OrderStatus::Created).await;
		assert!(second > first);
	}

	#[tokio::test]
	async fn test_create_validation_leaves_store_unchanged() {
		let service = service();
		order_in(&service, OrderStatus::Created).await;

		let cases = [
			(create_request("", "10"), CUSTOMER_NAME_REQUIRED),
			(create_request("   ", "10"), CUSTOMER_NAME_REQUIRED),
			(create_request(&"x".repeat(101), "10"), CUSTOMER_NAME_TOO_LONG),
			(create_request("Bob", "0"), TOTAL_AMOUNT_NOT_POSITIVE),
			(create_request("Bob", "-5.50"), TOTAL_AMOUNT_NOT_POSITIVE),
		];
		for (request, message) in cases {
			let err = service.create(request).await.unwrap_err();
			assert_eq!(err.kind(), ErrorKind::InvalidInput);
			assert_eq!(err.to_string(), message);
		}

		assert_eq!(service.list().await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn test_name_length_counts_characters() {
		let service = service();
		let name = "ç".repeat(100);
		let created = service.create(create_request(&name, "1")).await.unwrap();
		assert_eq!(created.customer_name, name);
	}

	#[tokio::test]
	async fn test_update_validation() {
		let service = service();
		let id = order_in(&service, OrderStatus::Created).await;

		let err = service
			.update(0, update_request("Alice", "1", OrderStatus::Paid))
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), INVALID_ORDER_ID);

		let err = service
			.update(id, update_request(" ", "1", OrderStatus::Paid))
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), CUSTOMER_NAME_REQUIRED);

		let err = service
			.update(id, update_request("Alice", "0", OrderStatus::Paid))
			.await
			.unwrap_err();
		assert_eq!(err.to_string(), TOTAL_AMOUNT_NOT_POSITIVE);

		let err = service
			.update(42, update_request("Alice", "1", OrderStatus::Paid))
			.await
			.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);

		assert_eq!(service.get(id).await.unwrap().status, OrderStatus::Created);
	}

	#[tokio::test]
	async fn test_every_transition_row() {
		for from in OrderStatus::ALL {
			for to in OrderStatus::ALL {
				let service = service();
				let id = order_in(&service, from).await;

				let result = service
					.update(id, update_request("Alice B.", "250.75", to))
					.await;
				let stored = service.get(id).await.unwrap();

				if OrderStateMachine::is_valid_transition(from, to) {
					let updated = result.unwrap();
					assert_eq!(updated.status, to);
					assert_eq!(stored.customer_name, "Alice B.");
					assert_eq!(stored.total_amount, dec("250.75"));
				} else {
					let err = result.unwrap_err();
					assert_eq!(err.kind(), ErrorKind::InvalidTransition, "{} -> {}", from, to);
					assert_eq!(stored.status, from);
					assert_eq!(stored.customer_name, "Alice");
				}
			}
		}
	}

	#[tokio::test]
	async fn test_delete_only_created() {
		for status in [OrderStatus::Paid, OrderStatus::Shipped, OrderStatus::Cancelled] {
			let service = service();
			let id = order_in(&service, status).await;

			let err = service.delete(id).await.unwrap_err();
			assert!(matches!(err, OrderServiceError::CannotDelete(s) if s == status));
			assert_eq!(err.kind(), ErrorKind::InvalidTransition);
			assert_eq!(service.get(id).await.unwrap().status, status);
		}

		let service = service();
		let id = order_in(&service, OrderStatus::Created).await;
		assert!(service.delete(id).await.unwrap());
		assert!(service.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_repeated_failures_do_not_mutate() {
		let service = service();
		let id = order_in(&service, OrderStatus::Paid).await;
		let before = service.get(id).await.unwrap();

		for _ in 0..3 {
			assert!(service.delete(id).await.is_err());
			assert!(service
				.update(id, update_request("Mallory", "1", OrderStatus::Created))
				.await
				.is_err());
		}

		assert_eq!(service.get(id).await.unwrap(), before);
	}

	#[tokio::test]
	async fn test_concurrent_updates_from_same_status() {
		let service = Arc::new(service());
		let id = order_in(&service, OrderStatus::Created).await;

		let handles: Vec<_> = (0..8)
			.map(|_| {
				let service = Arc::clone(&service);
				tokio::spawn(async move {
					service
						.update(id, update_request("Alice", "100.00", OrderStatus::Paid))
						.await
				})
			})
			.collect();

		let mut successes = 0;
		for handle in handles {
			if handle.await.unwrap().is_ok() {
				successes += 1;
			}
		}
		assert_eq!(successes, 1);
	}

	#[tokio::test]
	async fn test_invalid_delete_does_not_wait_for_transitions() {
		let service = service();
		let _in_flight = service.transition_lock.lock().await;

		let result = tokio::time::timeout(Duration::from_secs(1), service.delete(0))
			.await
			.expect("delete of an invalid id blocked on the transition lock");
		assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
	}

	#[tokio::test]
	async fn test_list_projects_orders() {
		let service = service();
		service
			.create(create_request("Alice", "1234.56"))
			.await
			.unwrap();
		service.create(create_request("Bob", "10")).await.unwrap();

		let orders = service.list().await.unwrap();
		assert_eq!(orders.len(), 2);
		assert_eq!(orders[0].customer_name, "Alice");
		assert_eq!(orders[0].formatted_total_amount, "R$ 1.234,56");
		assert_eq!(orders[1].id, 2);
	}

	#[tokio::test]
	async fn test_store_failure_is_unexpected() {
		let mut store = MockOrderStore::new();
		store
			.expect_list()
			.returning(|| Err(StorageError::Backend("connection lost".into())));
		store
			.expect_get()
			.returning(|_| Err(StorageError::Backend("connection lost".into())));
		let service = OrderService::new(Box::new(store));

		let err = service.list().await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Unexpected);
		assert_eq!(err.user_message(), INTERNAL_ERROR_MESSAGE);

		let err = service.get(1).await.unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Unexpected);
	}

	#[tokio::test]
	async fn test_invalid_input_never_reaches_store() {
		// A mock with no expectations panics on any call.
		let service = OrderService::new(Box::new(MockOrderStore::new()));

		assert!(service.get(-3).await.is_err());
		assert!(service.delete(0).await.is_err());
		assert!(service.create(create_request("", "1")).await.is_err());
		assert!(service
			.update(1, update_request("Alice", "-1", OrderStatus::Paid))
			.await
			.is_err());
	}
}
