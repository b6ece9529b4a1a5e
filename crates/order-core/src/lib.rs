//! Order lifecycle for the orders service.
//!
//! This crate is the only place business rules live. It validates input,
//! enforces the status state machine and orchestrates the order store,
//! turning store results into projections or classified failures. It also
//! provides the builder that wires a configured store into the service.

pub mod builder;
pub mod service;
pub mod state;

pub use builder::{BuilderError, OrderServiceBuilder};
pub use service::{ErrorKind, OrderService, OrderServiceError};
pub use state::OrderStateMachine;
