// ABOUTME: Library root for dockclean - exposes the cleanup engine and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod runtime;
pub mod types;
