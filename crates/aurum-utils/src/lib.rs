//! Shared utilities for aurum-rs
//!
//! This crate provides common functionality used across the aurum-rs workspace:
//! tracing setup and the application-level configuration read from the environment.

pub mod config;
pub mod logging;

pub use config::{AppConfig, Environment};
pub use logging::{init_tracing, init_tracing_json};
