//! Process exit codes
//!
//! Scripts depend on these values, so they are fixed:
//!
//! - `0` success
//! - `1` generic or API error
//! - `2` authentication error (clap also uses `2` for usage errors)
//! - `3` validation error
//! - `4` resource not found
//! - `5` connection or timeout error
//! - `130` cancelled by the user

pub const OK: i32 = 0;
pub const ERROR: i32 = 1;
pub const AUTH_ERROR: i32 = 2;
pub const VALIDATION_ERROR: i32 = 3;
pub const NOT_FOUND: i32 = 4;
pub const CONNECTION_ERROR: i32 = 5;
pub const CANCELLED: i32 = 130;
