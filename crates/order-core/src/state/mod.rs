//! State management for orders.
//!
//! This module holds the status transition table and the rules derived from
//! it, independent of any storage.

pub mod order;

pub use order::OrderStateMachine;
