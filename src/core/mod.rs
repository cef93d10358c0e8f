//! Business logic: error classification, exit codes, request building and services

pub mod classify;
pub mod exit_codes;
pub mod requests;
pub mod services;
