//! Common types module for the orders service.
//!
//! This module defines the core data types and structures used throughout
//! the workspace. It provides a centralized location for shared types
//! to ensure consistency across the store, the lifecycle service and the
//! HTTP layer.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// The order entity and its status.
pub mod order;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Utility functions for presentation formatting.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use api::*;
pub use order::*;
pub use registry::ImplementationRegistry;
pub use utils::{format_currency, format_order_date};
pub use validation::*;
