//! Order endpoints.
//!
//! Each handler calls the lifecycle service and wraps the outcome in the
//! response envelope. Malformed path ids and bodies are answered with a 400
//! envelope before the service is reached.

use super::RequestId;
use crate::server::AppState;
use axum::{
	extract::{
		rejection::{JsonRejection, PathRejection},
		Path, State,
	},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Json, Response},
};
use order_core::service::{
	CREATE_SUCCESS, DELETE_SUCCESS, GET_SUCCESS, INVALID_ORDER_ID, LIST_SUCCESS, UPDATE_SUCCESS,
};
use order_core::OrderServiceError;
use order_types::{
	APIError, ApiResponse, CreateOrderRequest, OrderId, UpdateOrderRequest, REQUEST_ID_HEADER,
};
use serde::Serialize;

/// Prefix of the message returned for unreadable request bodies.
const INVALID_BODY_MESSAGE: &str = "Dados da requisição inválidos";

/// Handles GET /orders requests.
pub async fn list_orders(State(state): State<AppState>, RequestId(request_id): RequestId) -> Response {
	match state.orders.list().await {
		Ok(orders) => respond(StatusCode::OK, orders, LIST_SUCCESS, &request_id),
		Err(e) => failure(e, &request_id),
	}
}

/// Handles GET /orders/{id} requests.
pub async fn get_order(
	State(state): State<AppState>,
	RequestId(request_id): RequestId,
	id: Result<Path<OrderId>, PathRejection>,
) -> Response {
	let id = match path_id(id) {
		Ok(id) => id,
		Err(e) => return e.into_response_with(Some(&request_id)),
	};

	match state.orders.get(id).await {
		Ok(order) => respond(StatusCode::OK, order, GET_SUCCESS, &request_id),
		Err(e) => failure(e, &request_id),
	}
}

/// Handles POST /orders requests.
pub async fn create_order(
	State(state): State<AppState>,
	RequestId(request_id): RequestId,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Response {
	let request = match body(payload) {
		Ok(request) => request,
		Err(e) => return e.into_response_with(Some(&request_id)),
	};

	match state.orders.create(request).await {
		Ok(order) => respond(StatusCode::CREATED, order, CREATE_SUCCESS, &request_id),
		Err(e) => failure(e, &request_id),
	}
}

/// Handles PUT /orders/{id} requests.
pub async fn update_order(
	State(state): State<AppState>,
	RequestId(request_id): RequestId,
	id: Result<Path<OrderId>, PathRejection>,
	payload: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Response {
	let (id, request) = match path_id(id).and_then(|id| Ok((id, body(payload)?))) {
		Ok(parsed) => parsed,
		Err(e) => return e.into_response_with(Some(&request_id)),
	};

	match state.orders.update(id, request).await {
		Ok(order) => respond(StatusCode::OK, order, UPDATE_SUCCESS, &request_id),
		Err(e) => failure(e, &request_id),
	}
}

/// Handles DELETE /orders/{id} requests.
pub async fn delete_order(
	State(state): State<AppState>,
	RequestId(request_id): RequestId,
	id: Result<Path<OrderId>, PathRejection>,
) -> Response {
	let id = match path_id(id) {
		Ok(id) => id,
		Err(e) => return e.into_response_with(Some(&request_id)),
	};

	match state.orders.delete(id).await {
		Ok(deleted) => respond(StatusCode::OK, deleted, DELETE_SUCCESS, &request_id),
		Err(e) => failure(e, &request_id),
	}
}

fn path_id(id: Result<Path<OrderId>, PathRejection>) -> Result<OrderId, APIError> {
	id.map(|Path(id)| id).map_err(|rejection| {
		tracing::warn!(error = %rejection, "Rejected malformed order id");
		APIError::BadRequest {
			message: INVALID_ORDER_ID.to_string(),
		}
	})
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, APIError> {
	payload.map(|Json(request)| request).map_err(|rejection| {
		tracing::warn!(error = %rejection, "Rejected malformed request body");
		APIError::BadRequest {
			message: format!("{}: {}", INVALID_BODY_MESSAGE, rejection.body_text()),
		}
	})
}

fn respond<T: Serialize>(status: StatusCode, data: T, message: &str, request_id: &str) -> Response {
	let envelope = ApiResponse::success(data, message).with_request_id(request_id);
	let mut response = (status, Json(envelope)).into_response();
	if let Ok(value) = HeaderValue::from_str(request_id) {
		response.headers_mut().insert(REQUEST_ID_HEADER, value);
	}
	response
}

fn failure(err: OrderServiceError, request_id: &str) -> Response {
	APIError::from(err).into_response_with(Some(request_id))
}
