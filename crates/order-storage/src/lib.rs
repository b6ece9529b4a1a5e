//! Storage module for the orders service.
//!
//! This module provides the abstraction the lifecycle service uses to hold
//! orders. A backend assigns identifiers, owns the order collection and
//! serialises access to it. Backends register themselves by name so the
//! service can pick one from configuration.

use async_trait::async_trait;
use order_types::{ConfigSchema, ImplementationRegistry, Order, OrderId};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod memory;
}

/// Errors that can occur during storage operations.
///
/// A missing order is not an error; lookups return `None` or `false`.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for order store backends.
///
/// Every operation is atomic with respect to the others: a backend must
/// behave as if a single lock guarded its whole state.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
	/// Returns every stored order, sorted by id.
	async fn list(&self) -> Result<Vec<Order>, StorageError>;

	/// Looks up an order by id.
	async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError>;

	/// Assigns the next unused id to `order`, stores it and returns the stored record.
	async fn insert(&self, order: Order) -> Result<Order, StorageError>;

	/// Overwrites the order at `id`, keeping that id.
	///
	/// Returns `None` without storing anything when no order exists at `id`.
	async fn replace(&self, id: OrderId, order: Order) -> Result<Option<Order>, StorageError>;

	/// Deletes the order at `id`, returning whether one was removed.
	async fn remove(&self, id: OrderId) -> Result<bool, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn OrderStore>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::memory;

	vec![(memory::Registry::NAME, memory::Registry::factory())]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_memory_backend_is_registered() {
		let implementations = get_all_implementations();
		assert_eq!(implementations.len(), 1);
		assert_eq!(implementations[0].0, "memory");

		let factory = implementations[0].1;
		let config = toml::Value::Table(toml::map::Map::new());
		assert!(factory(&config).is_ok());
	}
}
