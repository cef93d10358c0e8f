use crate::api::models::Organization;
use crate::api::resources::{
    CUSTOMERS, MEMBERS, ORDERS, ORGANIZATIONS, PRODUCTS, Resource, SUBSCRIPTIONS,
    WEBHOOK_DELIVERIES, WEBHOOK_ENDPOINTS, WEBHOOK_EVENTS,
};
use crate::cli::context::CliContext;
use crate::cli::main_types::{
    AuthCommands, ConfigCommands, ConfirmArgs, CustomerCommands, ListArgs, MemberCommands,
    OrderCommands, OrgCommands, ProductCommands, ReadOnlyCommands, SubscriptionCommands,
    WebhookCommands,
};
use crate::core::exit_codes;
use crate::core::requests::{
    CustomerCreate, CustomerUpdate, MemberCreate, MemberUpdate, OrderUpdate, OrganizationCreate,
    OrganizationUpdate, ProductBenefitsUpdate, ProductInput, ProductUpdate, SubscriptionCreate,
    SubscriptionUpdate, WebhookEndpointCreate, WebhookEndpointUpdate,
};
use crate::core::services::auth_service::{AuthService, accessible_organizations};
use crate::core::services::organization_service::{OrganizationService, resolve_org_id};
use crate::core::services::resource_service::ResourceService;
use crate::core::services::types::ListParams;
use crate::display::{Column, LooseRecord, OperationStatus, display_status};
use crate::error::{AppError, CliError};
use crate::storage::config::Config;
use crate::storage::credentials::{TokenStore, resolve_token};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// Organizations listed by `auth status`.
const STATUS_ORG_LIMIT: u32 = 10;

const STATUS_FIELDS: &[Column] = &[
    Column::new("Environment", "environment"),
    Column::new("API URL", "api_url"),
    Column::new("Token Source", "token_source"),
    Column::new("Authenticated", "authenticated"),
    Column::new("Organizations", "organizations"),
    Column::new("Organization Count", "organization_count"),
];

const CONFIG_FIELDS: &[Column] = &[
    Column::new("Environment", "environment"),
    Column::new("Default Environment", "default_environment"),
    Column::new("API URL", "api_url"),
    Column::new("Default Organization", "default_org_id"),
    Column::new("Config File", "config_file"),
];

const INVOICE_FIELDS: &[Column] = &[Column::new("Invoice URL", "url")];

pub(crate) fn notice(ctx: &CliContext, message: &str, status: OperationStatus) {
    display_status(message, status, ctx.stderr_colors());
}

pub(crate) fn item_id(item: &Value) -> &str {
    item.get("id").and_then(Value::as_str).unwrap_or("-")
}

/// Run a blocking terminal read on the blocking thread pool.
async fn read_blocking<F>(what: &'static str, read: F) -> Result<String, AppError>
where
    F: FnOnce() -> std::io::Result<String> + Send + 'static,
{
    let failed = |e: &dyn std::fmt::Display| {
        AppError::from(CliError::InvalidArguments(format!("Failed to read {}: {}", what, e)))
    };
    tokio::task::spawn_blocking(read)
        .await
        .map_err(|e| failed(&e))?
        .map_err(|e| failed(&e))
}

/// Ask for confirmation on stdin unless `--yes` was given. Declining exits with 1.
pub(crate) async fn confirm(
    ctx: &CliContext,
    question: &str,
    confirm: ConfirmArgs,
) -> Result<(), AppError> {
    if confirm.yes {
        return Ok(());
    }

    eprint!("{} [y/N]: ", question);
    let _ = std::io::stderr().flush();

    let answer = read_blocking("confirmation", || {
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer).map(|_| answer)
    })
    .await?;

    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => {
            notice(ctx, "Aborted", OperationStatus::Warning);
            Err(AppError::Exit(exit_codes::ERROR))
        }
    }
}

/// `--org`, else the configured default for the active environment.
pub(crate) fn org_id(ctx: &CliContext, config: &Config, org: Option<&str>) -> Result<String, AppError> {
    Ok(resolve_org_id(org, config.default_org_id(ctx.environment))?)
}

/// Scope and paging for an org-scoped list: `--org` wins over the configured default.
pub(crate) fn list_params(
    ctx: &CliContext,
    config: &Config,
    resource: &Resource,
    args: ListArgs,
) -> Result<ListParams, AppError> {
    if args.query.is_some() && !resource.searchable {
        return Err(CliError::InvalidArguments(format!(
            "--query is not supported for {} lists",
            resource.label.to_lowercase()
        ))
        .into());
    }

    let organization_id = if resource.org_scoped {
        Some(org_id(ctx, config, args.org.as_deref())?)
    } else {
        None
    };

    Ok(ListParams {
        organization_id,
        query: args.query,
        ..ListParams::page(args.page, args.limit)
    })
}

pub(crate) async fn print_list(
    ctx: &CliContext,
    service: &ResourceService,
    resource: &Resource,
    params: ListParams,
) -> Result<(), AppError> {
    let list = service.list(resource, &params).await?;
    ctx.renderer()
        .print_list(&list.items, resource.list_columns, Some(&list.pagination))?;
    Ok(())
}

pub(crate) async fn print_item(
    ctx: &CliContext,
    service: &ResourceService,
    resource: &Resource,
    id: &str,
) -> Result<(), AppError> {
    let item = service.get(resource, id).await?;
    ctx.renderer().print_detail(&item, resource.detail_fields)?;
    Ok(())
}

/// Notice on stderr, then the entity on stdout.
pub(crate) fn print_changed(
    ctx: &CliContext,
    resource: &Resource,
    item: &Value,
    verb: &str,
) -> Result<(), AppError> {
    notice(
        ctx,
        &format!("{} {}: {}", resource.label, verb, item_id(item)),
        OperationStatus::Success,
    );
    ctx.renderer().print_detail(item, resource.detail_fields)?;
    Ok(())
}

pub(crate) async fn create_item<B: Serialize>(
    ctx: &CliContext,
    service: &ResourceService,
    resource: &Resource,
    request: &B,
) -> Result<(), AppError> {
    let item = service.create(resource, request).await?;
    print_changed(ctx, resource, &item, "created")
}

/// PATCH the item, or report that there is nothing to send.
pub(crate) async fn update_item<B: Serialize>(
    ctx: &CliContext,
    service: &ResourceService,
    resource: &Resource,
    id: &str,
    request: Option<B>,
) -> Result<(), AppError> {
    let Some(request) = request else {
        return nothing_to_update(ctx);
    };
    let item = service.update(resource, id, &request).await?;
    print_changed(ctx, resource, &item, "updated")
}

pub(crate) async fn delete_item(
    ctx: &CliContext,
    service: &ResourceService,
    resource: &Resource,
    id: &str,
    yes: ConfirmArgs,
) -> Result<(), AppError> {
    let label = resource.label.to_lowercase();
    confirm(ctx, &format!("Delete {} {}?", label, id), yes).await?;
    service.delete(resource, id).await?;
    notice(
        ctx,
        &format!("{} deleted: {}", resource.label, id),
        OperationStatus::Success,
    );
    Ok(())
}

/// CSV export written verbatim to stdout.
async fn export(
    ctx: &CliContext,
    config: &Config,
    service: &ResourceService,
    resource: &Resource,
    org: Option<String>,
) -> Result<(), AppError> {
    let organization_id = org_id(ctx, config, org.as_deref())?;
    let csv = service.export(resource, &organization_id).await?;
    ctx.renderer().print_raw(&csv)?;
    Ok(())
}

pub(crate) fn nothing_to_update(ctx: &CliContext) -> Result<(), AppError> {
    notice(ctx, "Nothing to update.", OperationStatus::Warning);
    Err(AppError::Exit(exit_codes::OK))
}

#[derive(Default)]
pub struct AuthHandler;

impl AuthHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: AuthCommands,
        ctx: &CliContext,
        store: &dyn TokenStore,
    ) -> Result<(), AppError> {
        let service = AuthService::new(store, ctx.environment);

        match command {
            AuthCommands::Login { token } => {
                let token = match token {
                    Some(token) => token,
                    None => Self::prompt_token(ctx).await?,
                };
                let token = token.trim().to_string();
                if token.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "Access token must not be empty".to_string(),
                    )
                    .into());
                }

                let client = ctx.client_with_token(token.clone())?;
                let count = service.login(&client, &token).await?;
                notice(
                    ctx,
                    &format!(
                        "Logged in to {} ({} organization(s) accessible)",
                        ctx.environment, count
                    ),
                    OperationStatus::Success,
                );
                Ok(())
            }
            AuthCommands::Logout => {
                if !service.logout()? {
                    notice(
                        ctx,
                        &format!("Not logged in to {}.", ctx.environment),
                        OperationStatus::Info,
                    );
                    return Err(AppError::Exit(exit_codes::OK));
                }
                notice(
                    ctx,
                    &format!("Logged out of {}.", ctx.environment),
                    OperationStatus::Success,
                );
                Ok(())
            }
            AuthCommands::Status => {
                let Some(token) = resolve_token(ctx.access_token.as_deref(), store, ctx.environment)?
                else {
                    notice(
                        ctx,
                        &format!("Not logged in to {}.", ctx.environment),
                        OperationStatus::Warning,
                    );
                    return Err(AppError::Exit(exit_codes::ERROR));
                };

                let source = if ctx.access_token.as_deref().is_some_and(|t| !t.is_empty()) {
                    "environment"
                } else {
                    "keyring"
                };

                let client = ctx.client_with_token(token)?;
                let organizations = accessible_organizations(&client, STATUS_ORG_LIMIT).await?;
                let labels: Vec<String> =
                    organizations.items.iter().map(Organization::label).collect();

                let record = LooseRecord::new()
                    .with("environment", ctx.environment.as_str())
                    .with("api_url", ctx.api_base_url())
                    .with("token_source", source)
                    .with("authenticated", true)
                    .with("organizations", labels)
                    .with("organization_count", organizations.pagination.total_count);
                ctx.renderer().print_detail(&record, STATUS_FIELDS)?;
                Ok(())
            }
        }
    }

    async fn prompt_token(ctx: &CliContext) -> Result<String, AppError> {
        notice(
            ctx,
            &format!("Create a token at {}", ctx.environment.settings_url()),
            OperationStatus::Info,
        );
        read_blocking("access token", || rpassword::prompt_password("Access token: ")).await
    }
}

#[derive(Default)]
pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(
        &self,
        command: ConfigCommands,
        ctx: &CliContext,
        config: &Config,
    ) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                let record = LooseRecord::new()
                    .with("environment", ctx.environment.as_str())
                    .with("default_environment", config.default_environment.as_str())
                    .with("api_url", ctx.api_base_url())
                    .with("default_org_id", config.default_org_id(ctx.environment))
                    .with("config_file", ctx.config_path.display().to_string());
                ctx.renderer().print_detail(&record, CONFIG_FIELDS)?;
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct OrgHandler;

impl OrgHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: OrgCommands,
        ctx: &CliContext,
        service: &OrganizationService,
        config: &mut Config,
    ) -> Result<(), AppError> {
        let renderer = ctx.renderer();

        match command {
            OrgCommands::List(args) => {
                let list = service.list(&ListParams::page(args.page, args.limit)).await?;
                renderer.print_list(
                    &list.items,
                    ORGANIZATIONS.list_columns,
                    Some(&list.pagination),
                )?;
                Ok(())
            }
            OrgCommands::Get { id } => {
                let organization = service.find(&id).await?;
                renderer.print_detail(&organization, ORGANIZATIONS.detail_fields)?;
                Ok(())
            }
            OrgCommands::SetDefault { id } => {
                let organization = service.find(&id).await?;
                config.set_default_org_id(ctx.environment, organization.id.clone());
                config.save(&ctx.config_path)?;
                tracing::debug!(org_id = %organization.id, path = %ctx.config_path.display(), "default organization saved");
                notice(
                    ctx,
                    &format!("Default organization set: {}", organization.label()),
                    OperationStatus::Success,
                );
                Ok(())
            }
            OrgCommands::Create { name, slug } => {
                let request = OrganizationCreate { name, slug }.validated()?;
                let organization = service.create(&request).await?;
                notice(
                    ctx,
                    &format!("Organization created: {}", organization.label()),
                    OperationStatus::Success,
                );
                renderer.print_detail(&organization, ORGANIZATIONS.detail_fields)?;
                Ok(())
            }
            OrgCommands::Update { id, name } => {
                let Some(request) = OrganizationUpdate { name }.validated()? else {
                    return nothing_to_update(ctx);
                };
                let organization = service.update(&id, &request).await?;
                notice(
                    ctx,
                    &format!("Organization updated: {}", organization.label()),
                    OperationStatus::Success,
                );
                renderer.print_detail(&organization, ORGANIZATIONS.detail_fields)?;
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct MemberHandler;

impl MemberHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: MemberCommands,
        ctx: &CliContext,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            MemberCommands::List { page, customer_id } => {
                let params =
                    ListParams::page(page.page, page.limit).with_filter("customer_id", customer_id);
                print_list(ctx, service, &MEMBERS, params).await
            }
            MemberCommands::Get { id } => print_item(ctx, service, &MEMBERS, &id).await,
            MemberCommands::Create { customer_id } => {
                create_item(ctx, service, &MEMBERS, &MemberCreate { customer_id }).await
            }
            MemberCommands::Update { id, name, role } => {
                let request = MemberUpdate { name, role }.validated()?;
                update_item(ctx, service, &MEMBERS, &id, request).await
            }
            MemberCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &MEMBERS, &id, confirm).await
            }
        }
    }
}

#[derive(Default)]
pub struct ProductHandler;

impl ProductHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: ProductCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            ProductCommands::List(args) => {
                let params = list_params(ctx, config, &PRODUCTS, args)?;
                print_list(ctx, service, &PRODUCTS, params).await
            }
            ProductCommands::Get { id } => print_item(ctx, service, &PRODUCTS, &id).await,
            ProductCommands::Create {
                name,
                org,
                description,
                price_amount,
                price_currency,
                recurring_interval,
            } => {
                let request = ProductInput {
                    name,
                    organization_id: org,
                    description,
                    price_amount,
                    price_currency,
                    recurring_interval,
                }
                .build()?;
                create_item(ctx, service, &PRODUCTS, &request).await
            }
            ProductCommands::Update {
                id,
                name,
                description,
                is_archived,
            } => {
                let update = ProductUpdate {
                    name,
                    description,
                    is_archived,
                };
                update_item(ctx, service, &PRODUCTS, &id, update.validated()?).await
            }
            ProductCommands::UpdateBenefits { id, benefits } => {
                let request = ProductBenefitsUpdate { benefits }.validated()?;
                let product = service
                    .post_nested(&PRODUCTS, &id, "benefits", &request)
                    .await?;
                print_changed(ctx, &PRODUCTS, &product, "benefits updated")
            }
        }
    }
}

#[derive(Default)]
pub struct CustomerHandler;

impl CustomerHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CustomerCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            CustomerCommands::List { list, email } => {
                let params =
                    list_params(ctx, config, &CUSTOMERS, list)?.with_filter("email", email);
                print_list(ctx, service, &CUSTOMERS, params).await
            }
            CustomerCommands::Get { id } => print_item(ctx, service, &CUSTOMERS, &id).await,
            CustomerCommands::Create {
                email,
                name,
                external_id,
                org,
            } => {
                let request = CustomerCreate {
                    email,
                    name,
                    external_id,
                    organization_id: org,
                }
                .validated()?;
                create_item(ctx, service, &CUSTOMERS, &request).await
            }
            CustomerCommands::Update { id, email, name } => {
                let request = CustomerUpdate { email, name }.validated()?;
                update_item(ctx, service, &CUSTOMERS, &id, request).await
            }
            CustomerCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &CUSTOMERS, &id, confirm).await
            }
            CustomerCommands::State { id } => {
                let state = service.get_nested(&CUSTOMERS, &id, "state").await?;
                ctx.renderer().print_detail(&state, &[])?;
                Ok(())
            }
            CustomerCommands::Export { org } => export(ctx, config, service, &CUSTOMERS, org).await,
        }
    }
}

#[derive(Default)]
pub struct OrderHandler;

impl OrderHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: OrderCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            OrderCommands::List {
                list,
                product_id,
                customer_id,
            } => {
                let params = list_params(ctx, config, &ORDERS, list)?
                    .with_filter("product_id", product_id)
                    .with_filter("customer_id", customer_id);
                print_list(ctx, service, &ORDERS, params).await
            }
            OrderCommands::Get { id } => print_item(ctx, service, &ORDERS, &id).await,
            OrderCommands::Update { id, billing_name } => {
                let request = OrderUpdate { billing_name }.validated();
                update_item(ctx, service, &ORDERS, &id, request).await
            }
            OrderCommands::Invoice { id } => {
                let invoice = service.get_nested(&ORDERS, &id, "invoice").await?;
                ctx.renderer().print_detail(&invoice, INVOICE_FIELDS)?;
                Ok(())
            }
            OrderCommands::GenerateInvoice { id } => {
                service.trigger(&ORDERS, &id, "invoice").await?;
                notice(
                    ctx,
                    &format!("Invoice generation scheduled for order {}", id),
                    OperationStatus::Success,
                );
                Ok(())
            }
            OrderCommands::Export { org } => export(ctx, config, service, &ORDERS, org).await,
        }
    }
}

#[derive(Default)]
pub struct SubscriptionHandler;

impl SubscriptionHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: SubscriptionCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            SubscriptionCommands::List {
                list,
                product_id,
                customer_id,
                active,
            } => {
                let params = list_params(ctx, config, &SUBSCRIPTIONS, list)?
                    .with_filter("product_id", product_id)
                    .with_filter("customer_id", customer_id)
                    .with_filter("active", active.map(|a| a.to_string()));
                print_list(ctx, service, &SUBSCRIPTIONS, params).await
            }
            SubscriptionCommands::Get { id } => {
                print_item(ctx, service, &SUBSCRIPTIONS, &id).await
            }
            SubscriptionCommands::Create {
                product_id,
                customer_id,
            } => {
                let request = SubscriptionCreate {
                    product_id,
                    customer_id,
                }
                .validated()?;
                create_item(ctx, service, &SUBSCRIPTIONS, &request).await
            }
            SubscriptionCommands::Update {
                id,
                product_id,
                cancel_at_period_end,
            } => {
                let request = SubscriptionUpdate {
                    product_id,
                    cancel_at_period_end,
                }
                .validated()?;
                update_item(ctx, service, &SUBSCRIPTIONS, &id, request).await
            }
            SubscriptionCommands::Revoke { id, confirm: yes } => {
                confirm(ctx, &format!("Revoke subscription {}?", id), yes).await?;
                let subscription = service.delete(&SUBSCRIPTIONS, &id).await?;
                if subscription.is_null() {
                    notice(
                        ctx,
                        &format!("Subscription revoked: {}", id),
                        OperationStatus::Success,
                    );
                    return Ok(());
                }
                print_changed(ctx, &SUBSCRIPTIONS, &subscription, "revoked")
            }
            SubscriptionCommands::Export { org } => {
                export(ctx, config, service, &SUBSCRIPTIONS, org).await
            }
        }
    }
}

#[derive(Default)]
pub struct WebhookHandler;

impl WebhookHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: WebhookCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            WebhookCommands::Endpoints(args) => {
                let params = list_params(ctx, config, &WEBHOOK_ENDPOINTS, args)?;
                print_list(ctx, service, &WEBHOOK_ENDPOINTS, params).await
            }
            WebhookCommands::GetEndpoint { id } => {
                print_item(ctx, service, &WEBHOOK_ENDPOINTS, &id).await
            }
            WebhookCommands::CreateEndpoint {
                url,
                events,
                format,
                org,
            } => {
                let request = WebhookEndpointCreate {
                    url,
                    format,
                    events,
                    organization_id: org,
                }
                .validated()?;
                create_item(ctx, service, &WEBHOOK_ENDPOINTS, &request).await
            }
            WebhookCommands::UpdateEndpoint { id, url, events } => {
                let events = (!events.is_empty()).then_some(events);
                let request = WebhookEndpointUpdate { url, events }.validated()?;
                update_item(ctx, service, &WEBHOOK_ENDPOINTS, &id, request).await
            }
            WebhookCommands::DeleteEndpoint { id, confirm } => {
                delete_item(ctx, service, &WEBHOOK_ENDPOINTS, &id, confirm).await
            }
            WebhookCommands::ResetSecret { id, confirm: yes } => {
                confirm(
                    ctx,
                    &format!("Reset the signing secret of webhook endpoint {}?", id),
                    yes,
                )
                .await?;
                let endpoint = service.reset(&WEBHOOK_ENDPOINTS, &id, "secret").await?;
                print_changed(ctx, &WEBHOOK_ENDPOINTS, &endpoint, "secret reset")
            }
            WebhookCommands::Deliveries {
                page,
                endpoint_id,
                succeeded,
            } => {
                let params = ListParams::page(page.page, page.limit)
                    .with_filter("endpoint_id", endpoint_id)
                    .with_filter("succeeded", succeeded.map(|s| s.to_string()));
                print_list(ctx, service, &WEBHOOK_DELIVERIES, params).await
            }
            WebhookCommands::Redeliver { id } => {
                service.trigger(&WEBHOOK_EVENTS, &id, "redeliver").await?;
                notice(
                    ctx,
                    &format!("Webhook event queued for redelivery: {}", id),
                    OperationStatus::Success,
                );
                Ok(())
            }
        }
    }
}

/// `list` and `get` for resources the CLI only reads.
#[derive(Default)]
pub struct ReadOnlyHandler;

impl ReadOnlyHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        resource: &Resource,
        command: ReadOnlyCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            ReadOnlyCommands::List(args) => {
                let params = list_params(ctx, config, resource, args)?;
                print_list(ctx, service, resource, params).await
            }
            ReadOnlyCommands::Get { id } => print_item(ctx, service, resource, &id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::METERS;
    use crate::storage::config::Environment;
    use std::path::PathBuf;

    fn context() -> CliContext {
        CliContext {
            environment: Environment::Production,
            output_format: Default::default(),
            base_url: None,
            verbose: false,
            no_color: true,
            debug: false,
            config_path: PathBuf::from("/tmp/polar/config.toml"),
            access_token: None,
        }
    }

    fn args(org: Option<&str>, query: Option<&str>) -> ListArgs {
        ListArgs {
            org: org.map(str::to_string),
            query: query.map(str::to_string),
            page: 2,
            limit: 5,
        }
    }

    #[test]
    fn test_list_params_use_default_org() {
        let mut config = Config::default();
        config.set_default_org_id(Environment::Production, "org_default".to_string());

        let params = list_params(&context(), &config, &PRODUCTS, args(None, Some("pro")))
            .expect("params");
        assert_eq!(params.organization_id.as_deref(), Some("org_default"));
        assert_eq!(params.query.as_deref(), Some("pro"));
        assert_eq!((params.page, params.limit), (2, 5));

        let params = list_params(&context(), &config, &PRODUCTS, args(Some("org_flag"), None))
            .expect("params");
        assert_eq!(params.organization_id.as_deref(), Some("org_flag"));
    }

    #[test]
    fn test_list_params_require_org() {
        let result = list_params(&context(), &Config::default(), &METERS, args(None, None));
        assert!(matches!(result, Err(AppError::Cli(CliError::NoOrganization))));
    }

    #[test]
    fn test_query_rejected_for_unsearchable_resource() {
        let mut config = Config::default();
        config.set_default_org_id(Environment::Production, "org".to_string());
        let result = list_params(&context(), &config, &ORDERS, args(None, Some("x")));
        assert!(matches!(
            result,
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
    }

    #[tokio::test]
    async fn test_confirm_with_yes_skips_prompt() {
        let yes = ConfirmArgs { yes: true };
        assert!(confirm(&context(), "Delete?", yes).await.is_ok());
    }

    #[tokio::test]
    async fn test_read_blocking_maps_io_errors() {
        let result = read_blocking("answer", || {
            Err(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "closed"))
        })
        .await;
        match result {
            Err(AppError::Cli(CliError::InvalidArguments(msg))) => {
                assert_eq!(msg, "Failed to read answer: closed");
            }
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }

        let answer = read_blocking("answer", || Ok("y\n".to_string())).await;
        assert_eq!(answer.expect("answer"), "y\n");
    }

    #[test]
    fn test_item_id() {
        assert_eq!(item_id(&serde_json::json!({"id": "p_1"})), "p_1");
        assert_eq!(item_id(&Value::Null), "-");
    }
}
