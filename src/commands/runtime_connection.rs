// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Detects the socket, opens the client, negotiates the API version, and pings.

use dockclean::config::Config;
use dockclean::error::Result;
use dockclean::output::Output;
use dockclean::runtime::{BollardRuntime, ConnectionError, RuntimeInfoTrait, detect_runtime};

/// Connect to the container runtime described by `config`.
///
/// This handles the common pattern of:
/// 1. Detecting the runtime type and socket path
/// 2. Outputting progress messages
/// 3. Establishing and verifying the connection
pub async fn connect_to_runtime(config: &Config, output: &Output) -> Result<BollardRuntime> {
    output.progress("  → Detecting runtime...");
    let runtime_info =
        detect_runtime(&config.runtime_config()).map_err(ConnectionError::from)?;

    output.progress(&format!(
        "  → Found {} at {}",
        runtime_info.runtime_type, runtime_info.socket_path
    ));

    let runtime = BollardRuntime::connect(&runtime_info, config.timeout)
        .map_err(ConnectionError::from)?
        .negotiate()
        .await
        .map_err(ConnectionError::from)?;

    runtime.ping().await.map_err(ConnectionError::from)?;
    tracing::debug!(runtime = %runtime.runtime_type(), "runtime reachable");

    Ok(runtime)
}
