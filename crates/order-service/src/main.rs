//! Main entry point for the orders service.
//!
//! This binary loads the configuration, wires the configured order store
//! into the lifecycle service and serves the `/orders` HTTP API until
//! interrupted.

use clap::Parser;
use order_config::Config;
use order_core::{OrderService, OrderServiceBuilder};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

use order_storage::implementations::memory::create_storage as create_memory_storage;

/// Command-line arguments for the orders service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the orders service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the order service with the configured store
/// 5. Serves the HTTP API until Ctrl+C
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let api_config = config.api.clone();
	let service = Arc::new(build_service(config)?);

	server::start_server(api_config, service).await?;

	tracing::info!("Stopped orders service");
	Ok(())
}

/// Macro to create a factory HashMap with the appropriate type aliases
macro_rules! create_factory_map {
    ($interface:path, $error:path, $( $name:literal => $factory:expr ),* $(,)?) => {{
        let mut factories = std::collections::HashMap::new();
        $(
            factories.insert(
                $name.to_string(),
                $factory as fn(&toml::Value) -> Result<Box<dyn $interface>, $error>
            );
        )*
        factories
    }};
}

/// Builds the order service on top of the configured storage backend.
fn build_service(config: Config) -> Result<OrderService, Box<dyn std::error::Error>> {
	let storage_factories = create_factory_map!(
		order_storage::OrderStore,
		order_storage::StorageError,
		"memory" => create_memory_storage,
	);

	Ok(OrderServiceBuilder::new(config).build(storage_factories)?)
}
