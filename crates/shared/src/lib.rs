//! Shared types and configuration for Passbook.
//!
//! This crate provides common types used across all other crates:
//! - Money type with exact decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for history queries
//! - Configuration management

pub mod config;
pub mod types;

pub use config::LedgerConfig;
