//! # polar-cli
//!
//! Command-line client for the Polar billing API.
//!
//! Every command runs inside a guard that classifies failures into a single
//! user-facing category (authentication, validation, not found, API,
//! connection, timeout) with a hint and a stable exit code. Successful output
//! goes to stdout as a table, JSON or YAML; notices and errors go to stderr.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polar_cli::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> polar_cli::Result<()> {
//!     let client = PolarClient::new(Environment::Sandbox.server_url(), token)?;
//!     let service = ResourceService::new(client);
//!
//!     let params = ListParams { organization_id: Some(org_id), ..ListParams::default() };
//!     let products = service.list(&PRODUCTS, &params).await?;
//!     Renderer::new(OutputFormat::Table).print_list(
//!         &products.items,
//!         PRODUCTS.list_columns,
//!         Some(&products.pagination),
//!     )?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │            CLI Layer                │  clap types, dispatcher, command guard
//! ├─────────────────────────────────────┤
//! │           Core Layer                │  services, request builders, error classifier
//! ├─────────────────────────────────────┤
//! │    API / Storage / Display          │  HTTP client, config + keyring, renderers
//! ├─────────────────────────────────────┤
//! │           Utils Layer               │  validation, logging, error conversion
//! └─────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Polar HTTP client, list envelopes and the resource catalogue
//! - [`core`]: Services, request validation and error classification
//! - [`storage`]: Configuration file and access token storage
//! - [`display`]: Table/JSON/YAML rendering and the error panel
//! - [`error`]: Error hierarchy
//! - [`utils`]: Shared helpers

pub use error::AppError;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::client::PolarClient;
    pub use crate::api::models::{ListResource, Organization, Pagination};
    pub use crate::api::resources::*;
    pub use crate::core::classify::{CliFailure, ErrorCategory, Outcome, classify};
    pub use crate::core::services::types::ListParams;
    pub use crate::core::services::{
        organization_service::OrganizationService, resource_service::ResourceService,
    };
    pub use crate::display::{OutputFormat, Record, Renderer};
    pub use crate::error::{ApiError, AppError, CliError};
    pub use crate::storage::config::{Config, Environment};
    pub use crate::Result;
}

/// Main architecture layers (dependency flow: CLI → Core → API/Storage)
pub mod cli; // Command-line interface
pub mod core; // Business logic
pub mod storage; // Configuration and token persistence

/// Support modules (used across layers)
pub mod api; // Polar API client
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
