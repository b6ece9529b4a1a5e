//! API types for the orders HTTP API.
//!
//! This module defines the request and response types for the `/orders`
//! endpoints, the response envelope shared by every endpoint and the
//! structured error type with its HTTP status mapping.

use crate::{format_currency, format_order_date, Order, OrderId, OrderStatus};
use axum::{
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header carrying the request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Envelope wrapping every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	/// Whether the operation succeeded.
	pub success: bool,
	/// Human-readable outcome description.
	pub message: String,
	/// Payload, `null` on failure.
	pub data: Option<T>,
	/// Moment the response was produced.
	pub timestamp: DateTime<Utc>,
	/// Identifier of the request this response answers.
	pub request_id: Option<String>,
}

impl<T> ApiResponse<T> {
	/// Builds a successful envelope around `data`.
	pub fn success(data: T, message: impl Into<String>) -> Self {
		Self {
			success: true,
			message: message.into(),
			data: Some(data),
			timestamp: Utc::now(),
			request_id: None,
		}
	}

	/// Builds a failed envelope with no payload.
	pub fn error(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: message.into(),
			data: None,
			timestamp: Utc::now(),
			request_id: None,
		}
	}

	/// Attaches the request identifier.
	pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
		self.request_id = Some(request_id.into());
		self
	}
}

/// Read-facing projection of an order, including derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
	pub id: OrderId,
	pub customer_name: String,
	pub order_date: DateTime<Utc>,
	#[serde(with = "rust_decimal::serde::float")]
	pub total_amount: Decimal,
	pub status: OrderStatus,
	pub status_description: String,
	pub formatted_total_amount: String,
	pub formatted_order_date: String,
}

impl From<&Order> for OrderResponse {
	fn from(order: &Order) -> Self {
		Self {
			id: order.id,
			customer_name: order.customer_name.clone(),
			order_date: order.order_date,
			total_amount: order.total_amount,
			status: order.status,
			status_description: order.status.label().to_string(),
			formatted_total_amount: format_currency(order.total_amount),
			formatted_order_date: format_order_date(&order.order_date),
		}
	}
}

impl From<Order> for OrderResponse {
	fn from(order: Order) -> Self {
		Self::from(&order)
	}
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
	pub customer_name: String,
	pub total_amount: Decimal,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
	pub customer_name: String,
	pub total_amount: Decimal,
	pub status: OrderStatus,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum APIError {
	/// Invalid input or illegal status transition (400)
	BadRequest { message: String },
	/// No order at the requested id, or no such route (404)
	NotFound { message: String },
	/// Known route, unsupported method (405)
	MethodNotAllowed { message: String },
	/// The request did not complete within the configured timeout (408)
	RequestTimeout { message: String },
	/// Anything unexpected (500); the message is always generic
	InternalServerError { message: String },
}

impl APIError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			APIError::NotFound { .. } => StatusCode::NOT_FOUND,
			APIError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
			APIError::RequestTimeout { .. } => StatusCode::REQUEST_TIMEOUT,
			APIError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// The user-facing message.
	pub fn message(&self) -> &str {
		match self {
			APIError::BadRequest { message }
			| APIError::NotFound { message }
			| APIError::MethodNotAllowed { message }
			| APIError::RequestTimeout { message }
			| APIError::InternalServerError { message } => message,
		}
	}

	/// Convert to the failure envelope for JSON serialization.
	pub fn to_envelope(&self, request_id: Option<&str>) -> ApiResponse<serde_json::Value> {
		let envelope = ApiResponse::error(self.message());
		match request_id {
			Some(id) => envelope.with_request_id(id),
			None => envelope,
		}
	}

	/// Renders this error as a response carrying the given request id.
	pub fn into_response_with(self, request_id: Option<&str>) -> Response {
		let mut response = (self.status_code(), Json(self.to_envelope(request_id))).into_response();
		if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
			response.headers_mut().insert(REQUEST_ID_HEADER, value);
		}
		response
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message } => write!(f, "Bad Request: {}", message),
			APIError::NotFound { message } => write!(f, "Not Found: {}", message),
			APIError::MethodNotAllowed { message } => {
				write!(f, "Method Not Allowed: {}", message)
			},
			APIError::RequestTimeout { message } => write!(f, "Request Timeout: {}", message),
			APIError::InternalServerError { message } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		self.into_response_with(None)
	}
}
