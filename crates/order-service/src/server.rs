//! HTTP server for the orders API.
//!
//! Builds the `/orders` router with request ids, tracing, CORS, timeouts
//! and a body size limit, and serves it until Ctrl+C.

use crate::apis::order::{create_order, delete_order, get_order, list_orders, update_order};
use crate::apis::{handle_middleware_error, method_not_allowed, route_not_found};
use axum::{
	error_handling::HandleErrorLayer,
	extract::DefaultBodyLimit,
	http::{HeaderValue, Method},
	routing::get,
	Router,
};
use order_config::{ApiConfig, CorsConfig};
use order_core::OrderService;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// The order lifecycle service handling every request.
	pub orders: Arc<OrderService>,
}

/// Builds the router for the orders API with all middleware applied.
///
/// Unknown routes, unsupported methods and timeouts answer with the same
/// failure envelope as the handlers.
pub fn build_router(state: AppState, api_config: &ApiConfig) -> Router {
	Router::new()
		.route("/orders", get(list_orders).post(create_order))
		.route(
			"/orders/{id}",
			get(get_order).put(update_order).delete(delete_order),
		)
		.method_not_allowed_fallback(method_not_allowed)
		.fallback(route_not_found)
		.layer(DefaultBodyLimit::max(api_config.max_request_size))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(cors_layer(api_config.cors.as_ref()))
				.layer(HandleErrorLayer::new(handle_middleware_error))
				.layer(TimeoutLayer::new(Duration::from_secs(
					api_config.timeout_seconds,
				))),
		)
		.with_state(state)
}

/// Starts the HTTP server for the API.
pub async fn start_server(
	api_config: ApiConfig,
	orders: Arc<OrderService>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = build_router(AppState { orders }, &api_config);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Orders API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => tracing::info!("Shutdown signal received"),
		Err(e) => {
			tracing::error!(error = %e, "Failed to listen for shutdown signal");
			std::future::pending::<()>().await;
		},
	}
}

/// Permissive when unconfigured; `"*"` among the origins allows any origin.
fn cors_layer(config: Option<&CorsConfig>) -> CorsLayer {
	let Some(cors) = config else {
		return CorsLayer::permissive();
	};

	let origin = if cors.allowed_origins.iter().any(|origin| origin == "*") {
		AllowOrigin::any()
	} else {
		let origins: Vec<HeaderValue> = cors
			.allowed_origins
			.iter()
			.filter_map(|origin| match origin.parse() {
				Ok(value) => Some(value),
				Err(_) => {
					tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
					None
				},
			})
			.collect();
		AllowOrigin::list(origins)
	};

	CorsLayer::new()
		.allow_origin(origin)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
		.allow_headers(Any)
}
