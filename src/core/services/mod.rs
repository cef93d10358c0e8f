pub mod auth_service;
pub mod organization_service;
pub mod resource_service;
pub mod types;
