//! In-memory order store.
//!
//! Orders live in a map guarded by a single mutex together with the id
//! counter, so every operation is atomic and ids are never reused. Nothing
//! survives a restart.

use crate::{OrderStore, StorageError, StorageFactory, StorageRegistry};
use async_trait::async_trait;
use order_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Order, OrderId, Schema,
	ValidationError,
};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Largest accepted `initial_capacity`.
const MAX_INITIAL_CAPACITY: i64 = 1_000_000;

/// State guarded by the store mutex.
#[derive(Debug)]
struct MemoryState {
	orders: HashMap<OrderId, Order>,
	/// Id handed to the next inserted order. Starts at 1, only grows.
	next_id: OrderId,
}

/// In-memory order store.
#[derive(Debug)]
pub struct MemoryOrderStore {
	state: Mutex<MemoryState>,
}

impl MemoryOrderStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::with_capacity(0)
	}

	/// Creates an empty store with room for `capacity` orders.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			state: Mutex::new(MemoryState {
				orders: HashMap::with_capacity(capacity),
				next_id: 1,
			}),
		}
	}
}

impl Default for MemoryOrderStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
	async fn list(&self) -> Result<Vec<Order>, StorageError> {
		let state = self.state.lock().await;
		let mut orders: Vec<Order> = state.orders.values().cloned().collect();
		orders.sort_by_key(|order| order.id);
		Ok(orders)
	}

	async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
		let state = self.state.lock().await;
		Ok(state.orders.get(&id).cloned())
	}

	async fn insert(&self, mut order: Order) -> Result<Order, StorageError> {
		let mut state = self.state.lock().await;
		let id = state.next_id;
		state.next_id = id
			.checked_add(1)
			.ok_or_else(|| StorageError::Backend("order id space exhausted".into()))?;

		order.id = id;
		state.orders.insert(id, order.clone());
		tracing::debug!(order_id = id, "Stored new order");
		Ok(order)
	}

	async fn replace(&self, id: OrderId, mut order: Order) -> Result<Option<Order>, StorageError> {
		let mut state = self.state.lock().await;
		let Some(slot) = state.orders.get_mut(&id) else {
			return Ok(None);
		};

		order.id = id;
		*slot = order.clone();
		Ok(Some(order))
	}

	async fn remove(&self, id: OrderId) -> Result<bool, StorageError> {
		let mut state = self.state.lock().await;
		Ok(state.orders.remove(&id).is_some())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryOrderStore.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new(
			"initial_capacity",
			FieldType::Integer {
				min: Some(0),
				max: Some(MAX_INITIAL_CAPACITY),
			},
		)]);
		schema.validate(config)
	}
}

/// Factory function to create a memory order store from configuration.
///
/// Configuration parameters:
/// - `initial_capacity` (optional): number of orders to pre-allocate room for
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn OrderStore>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(format!("Invalid configuration: {}", e)))?;

	let capacity = config
		.get("initial_capacity")
		.and_then(|v| v.as_integer())
		.and_then(|v| usize::try_from(v).ok())
		.unwrap_or(0);

	Ok(Box::new(MemoryOrderStore::with_capacity(capacity)))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
