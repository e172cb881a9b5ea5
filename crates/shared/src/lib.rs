//! Shared types and configuration for Corebook.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for ledger listings
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
