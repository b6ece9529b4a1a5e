//! Utility functions for presentation formatting.
//!
//! This module provides helpers that derive the display-only fields of the
//! order projection.

pub mod formatting;

pub use formatting::{format_currency, format_order_date};
