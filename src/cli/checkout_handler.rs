use crate::api::resources::{CHECKOUT_LINKS, CHECKOUTS, REFUNDS};
use crate::cli::command_handlers::{
    confirm, create_item, delete_item, list_params, print_item, print_list, update_item,
};
use crate::cli::context::CliContext;
use crate::cli::main_types::{CheckoutCommands, CheckoutLinkCommands, RefundCommands};
use crate::core::requests::{
    CheckoutCreate, CheckoutLinkCreate, CheckoutLinkUpdate, CheckoutUpdate, RefundCreate,
};
use crate::core::services::resource_service::ResourceService;
use crate::error::AppError;
use crate::storage::config::Config;

/// Handler for checkout link commands
#[derive(Default)]
pub struct CheckoutLinkHandler;

impl CheckoutLinkHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CheckoutLinkCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            CheckoutLinkCommands::List { list, product_id } => {
                let params = list_params(ctx, config, &CHECKOUT_LINKS, list)?
                    .with_filter("product_id", product_id);
                print_list(ctx, service, &CHECKOUT_LINKS, params).await
            }
            CheckoutLinkCommands::Get { id } => {
                print_item(ctx, service, &CHECKOUT_LINKS, &id).await
            }
            CheckoutLinkCommands::Create {
                product_id,
                success_url,
                label,
            } => {
                let request = CheckoutLinkCreate {
                    product_id,
                    success_url,
                    label,
                }
                .validated()?;
                create_item(ctx, service, &CHECKOUT_LINKS, &request).await
            }
            CheckoutLinkCommands::Update {
                id,
                label,
                success_url,
            } => {
                let request = CheckoutLinkUpdate { label, success_url }.validated()?;
                update_item(ctx, service, &CHECKOUT_LINKS, &id, request).await
            }
            CheckoutLinkCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &CHECKOUT_LINKS, &id, confirm).await
            }
        }
    }
}

/// Handler for checkout session commands
#[derive(Default)]
pub struct CheckoutHandler;

impl CheckoutHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CheckoutCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            CheckoutCommands::List { list, product_id } => {
                let params = list_params(ctx, config, &CHECKOUTS, list)?
                    .with_filter("product_id", product_id);
                print_list(ctx, service, &CHECKOUTS, params).await
            }
            CheckoutCommands::Get { id } => print_item(ctx, service, &CHECKOUTS, &id).await,
            CheckoutCommands::Create {
                products,
                success_url,
                customer_email,
                discount_id,
            } => {
                let request = CheckoutCreate {
                    products,
                    success_url,
                    customer_email,
                    discount_id,
                }
                .validated()?;
                create_item(ctx, service, &CHECKOUTS, &request).await
            }
            CheckoutCommands::Update { id, customer_email } => {
                let request = CheckoutUpdate { customer_email }.validated()?;
                update_item(ctx, service, &CHECKOUTS, &id, request).await
            }
        }
    }
}

/// Handler for refund commands
#[derive(Default)]
pub struct RefundHandler;

impl RefundHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: RefundCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            RefundCommands::List {
                list,
                order_id,
                customer_id,
                succeeded,
            } => {
                let params = list_params(ctx, config, &REFUNDS, list)?
                    .with_filter("order_id", order_id)
                    .with_filter("customer_id", customer_id)
                    .with_filter("succeeded", succeeded.map(|s| s.to_string()));
                print_list(ctx, service, &REFUNDS, params).await
            }
            RefundCommands::Get { id } => print_item(ctx, service, &REFUNDS, &id).await,
            RefundCommands::Create {
                order_id,
                reason,
                amount,
                comment,
                confirm: yes,
            } => {
                let request = RefundCreate {
                    order_id,
                    reason,
                    amount,
                    comment,
                }
                .validated()?;
                let scope = match request.amount {
                    Some(amount) => format!("{} cents of order {}", amount, request.order_id),
                    None => format!("order {} in full", request.order_id),
                };
                confirm(ctx, &format!("Refund {}?", scope), yes).await?;
                create_item(ctx, service, &REFUNDS, &request).await
            }
        }
    }
}
