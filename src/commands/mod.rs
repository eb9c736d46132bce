// ABOUTME: Command module aggregator for the dockclean CLI.
// ABOUTME: Re-exports the clean command handler.

mod clean;
mod runtime_connection;

pub use clean::clean;
