//! Utils module - Shared utilities and helpers
//!
//! Helpers used across layers: reqwest error conversion, logging setup and
//! input validation.

/// reqwest and serde error conversion into [`crate::error::ApiError`]
pub mod error_helpers;

/// tracing subscriber setup
pub mod logging;

/// Input validation utilities
pub mod validation;
