// ABOUTME: Library root for yardcheck - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod activity;
pub mod config;
pub mod diagnostics;
pub mod directory;
pub mod error;
pub mod output;
pub mod record;
pub mod types;
pub mod workflow;
