//! Storage layer for polar-cli
//!
//! Handles configuration files (TOML) and access token storage (OS keyring).

use crate::error::StorageError;

pub mod config;
pub mod credentials;

type Result<T> = std::result::Result<T, StorageError>;
