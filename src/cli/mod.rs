pub mod catalog_handler;
pub mod checkout_handler;
pub mod command_handlers;
pub mod context;
pub mod dispatcher;
pub mod guard;
pub mod main_types;
pub mod usage_handler;
