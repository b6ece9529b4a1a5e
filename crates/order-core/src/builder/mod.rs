//! Builder for constructing the order service.
//!
//! Selects the configured primary store among the registered storage
//! factories, checks its configuration table against the store's schema and
//! wraps it in an [`OrderService`].

use crate::service::OrderService;
use order_config::Config;
use order_storage::{OrderStore, StorageError};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during service construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for an [`OrderService`] backed by a pluggable store.
pub struct OrderServiceBuilder {
	config: Config,
}

impl OrderServiceBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	/// Builds the service using the factory registered under `storage.primary`.
	pub fn build<SF>(self, storage_factories: HashMap<String, SF>) -> Result<OrderService, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn OrderStore>, StorageError>,
	{
		let primary = &self.config.storage.primary;
		let store_config = self.config.primary_storage_config().ok_or_else(|| {
			BuilderError::Config(format!(
				"Primary storage '{}' not found in implementations",
				primary
			))
		})?;
		let factory = storage_factories.get(primary).ok_or_else(|| {
			BuilderError::MissingComponent(format!(
				"No storage implementation registered as '{}'",
				primary
			))
		})?;

		let store = factory(store_config).map_err(|e| {
			tracing::error!(
				component = "storage",
				implementation = %primary,
				error = %e,
				"Failed to create storage implementation"
			);
			BuilderError::Config(format!(
				"Failed to create storage implementation '{}': {}",
				primary, e
			))
		})?;
		store.config_schema().validate(store_config).map_err(|e| {
			BuilderError::Config(format!(
				"Invalid configuration for storage '{}': {}",
				primary, e
			))
		})?;

		tracing::info!(component = "storage", implementation = %primary, "Loaded");
		Ok(OrderService::new(store))
	}
}
