//! HTTP handlers for the orders API.

pub mod order;

use axum::{
	extract::FromRequestParts,
	http::request::Parts,
	response::Response,
	BoxError,
};
use order_core::service::INTERNAL_ERROR_MESSAGE;
use order_types::{APIError, REQUEST_ID_HEADER};
use std::convert::Infallible;
use tower::timeout::error::Elapsed;
use uuid::Uuid;

const ROUTE_NOT_FOUND: &str = "Recurso não encontrado";
const METHOD_NOT_ALLOWED: &str = "Método não permitido";
const REQUEST_TIMED_OUT: &str = "Tempo limite da requisição excedido";

/// Identifier of the current request, read from the `x-request-id` header.
///
/// The request-id middleware always sets the header; a fresh UUID is used
/// when the handler runs without it.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl<S> FromRequestParts<S> for RequestId
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let id = parts
			.headers
			.get(REQUEST_ID_HEADER)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned)
			.unwrap_or_else(|| Uuid::new_v4().to_string());
		Ok(RequestId(id))
	}
}

/// Fallback for paths outside the API.
pub async fn route_not_found(RequestId(request_id): RequestId) -> Response {
	APIError::NotFound {
		message: ROUTE_NOT_FOUND.to_string(),
	}
	.into_response_with(Some(&request_id))
}

/// Fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed(RequestId(request_id): RequestId) -> Response {
	APIError::MethodNotAllowed {
		message: METHOD_NOT_ALLOWED.to_string(),
	}
	.into_response_with(Some(&request_id))
}

/// Turns errors raised by the middleware stack into failure envelopes.
pub async fn handle_middleware_error(RequestId(request_id): RequestId, err: BoxError) -> Response {
	let api_error = if err.is::<Elapsed>() {
		tracing::warn!(request_id = %request_id, "Request timed out");
		APIError::RequestTimeout {
			message: REQUEST_TIMED_OUT.to_string(),
		}
	} else {
		tracing::error!(request_id = %request_id, error = %err, "Unhandled middleware error");
		APIError::InternalServerError {
			message: INTERNAL_ERROR_MESSAGE.to_string(),
		}
	};
	api_error.into_response_with(Some(&request_id))
}
