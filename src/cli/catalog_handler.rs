use crate::api::resources::{
    ACTIVATION_FIELDS, BENEFIT_GRANTS, BENEFITS, CUSTOM_FIELDS, DISCOUNTS, FILES, LICENSE_KEY_PORTAL,
    LICENSE_KEYS,
};
use crate::cli::command_handlers::{
    create_item, delete_item, item_id, list_params, notice, nothing_to_update, org_id, print_changed,
    print_item, print_list, update_item,
};
use crate::cli::context::CliContext;
use crate::cli::main_types::{
    BenefitCommands, CustomFieldCommands, DiscountCommands, FileCommands, LicenseKeyCommands,
};
use crate::core::requests::{
    BenefitInput, BenefitUpdate, CustomFieldInput, CustomFieldUpdate, DiscountInput,
    DiscountUpdate, FileCreate, LicenseKeyAction, LicenseKeyUpdate, NameUpdate,
};
use crate::core::services::resource_service::ResourceService;
use crate::core::services::types::ListParams;
use crate::display::OperationStatus;
use crate::error::{AppError, CliError};
use crate::storage::config::Config;
use serde_json::Value;

/// Handler for discount commands
#[derive(Default)]
pub struct DiscountHandler;

impl DiscountHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: DiscountCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            DiscountCommands::List(args) => {
                let params = list_params(ctx, config, &DISCOUNTS, args)?;
                print_list(ctx, service, &DISCOUNTS, params).await
            }
            DiscountCommands::Get { id } => print_item(ctx, service, &DISCOUNTS, &id).await,
            DiscountCommands::Create {
                name,
                discount_type,
                amount,
                duration,
                duration_in_months,
                currency,
                code,
                max_redemptions,
                org,
            } => {
                let request = DiscountInput {
                    name,
                    discount_type,
                    amount,
                    duration,
                    duration_in_months,
                    currency,
                    code,
                    max_redemptions,
                    organization_id: org,
                }
                .build()?;
                create_item(ctx, service, &DISCOUNTS, &request).await
            }
            DiscountCommands::Update {
                id,
                name,
                code,
                max_redemptions,
            } => {
                let request = DiscountUpdate {
                    name,
                    code,
                    max_redemptions,
                }
                .validated()?;
                update_item(ctx, service, &DISCOUNTS, &id, request).await
            }
            DiscountCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &DISCOUNTS, &id, confirm).await
            }
        }
    }
}

/// Handler for benefit commands
#[derive(Default)]
pub struct BenefitHandler;

impl BenefitHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: BenefitCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            BenefitCommands::List(args) => {
                let params = list_params(ctx, config, &BENEFITS, args)?;
                print_list(ctx, service, &BENEFITS, params).await
            }
            BenefitCommands::Get { id } => print_item(ctx, service, &BENEFITS, &id).await,
            BenefitCommands::Create {
                description,
                benefit_type,
                selectable,
                tax_applicable,
                properties,
                org,
            } => {
                let request = BenefitInput {
                    benefit_type,
                    description,
                    selectable,
                    is_tax_applicable: tax_applicable,
                    properties,
                    organization_id: org,
                }
                .build()?;
                create_item(ctx, service, &BENEFITS, &request).await
            }
            BenefitCommands::Update { id, description } => {
                let request = BenefitUpdate { description }.validated()?;
                update_item(ctx, service, &BENEFITS, &id, request).await
            }
            BenefitCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &BENEFITS, &id, confirm).await
            }
            BenefitCommands::Grants { id, page, granted } => {
                let params = ListParams::page(page.page, page.limit)
                    .with_filter("is_granted", granted.map(|g| g.to_string()));
                let grants = service.list_nested(&BENEFITS, &id, "grants", &params).await?;
                ctx.renderer().print_list(
                    &grants.items,
                    BENEFIT_GRANTS.list_columns,
                    Some(&grants.pagination),
                )?;
                Ok(())
            }
        }
    }
}

/// Handler for license key commands. Validation and activation go through
/// the customer portal endpoints, which are keyed by organization.
#[derive(Default)]
pub struct LicenseKeyHandler;

impl LicenseKeyHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: LicenseKeyCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            LicenseKeyCommands::List { list, benefit_id } => {
                let params =
                    list_params(ctx, config, &LICENSE_KEYS, list)?.with_filter("benefit_id", benefit_id);
                print_list(ctx, service, &LICENSE_KEYS, params).await
            }
            LicenseKeyCommands::Get { id } => print_item(ctx, service, &LICENSE_KEYS, &id).await,
            LicenseKeyCommands::Update {
                id,
                status,
                limit_usage,
            } => {
                let request = LicenseKeyUpdate {
                    status,
                    limit_usage,
                }
                .validated()?;
                update_item(ctx, service, &LICENSE_KEYS, &id, request).await
            }
            LicenseKeyCommands::Validate { key, org } => {
                let request = LicenseKeyAction {
                    key,
                    organization_id: Some(org_id(ctx, config, org.as_deref())?),
                    ..LicenseKeyAction::default()
                }
                .validated()?;
                let validated = service
                    .post_action(&LICENSE_KEY_PORTAL, "validate", &request)
                    .await?;
                ctx.renderer()
                    .print_detail(&validated, LICENSE_KEY_PORTAL.detail_fields)?;
                Ok(())
            }
            LicenseKeyCommands::Activate { key, label, org } => {
                let request = LicenseKeyAction {
                    key,
                    label: Some(label),
                    organization_id: Some(org_id(ctx, config, org.as_deref())?),
                    ..LicenseKeyAction::default()
                }
                .validated()?;
                let activation = service
                    .post_action(&LICENSE_KEY_PORTAL, "activate", &request)
                    .await?;
                notice(
                    ctx,
                    &format!("License key activated: {}", item_id(&activation)),
                    OperationStatus::Success,
                );
                ctx.renderer().print_detail(&activation, ACTIVATION_FIELDS)?;
                Ok(())
            }
            LicenseKeyCommands::Deactivate {
                key,
                activation_id,
                org,
            } => {
                let request = LicenseKeyAction {
                    key,
                    activation_id: Some(activation_id.clone()),
                    organization_id: Some(org_id(ctx, config, org.as_deref())?),
                    ..LicenseKeyAction::default()
                }
                .validated()?;
                service
                    .post_action(&LICENSE_KEY_PORTAL, "deactivate", &request)
                    .await?;
                notice(
                    ctx,
                    &format!("License key activation removed: {}", activation_id),
                    OperationStatus::Success,
                );
                Ok(())
            }
            LicenseKeyCommands::GetActivation { id, activation_id } => {
                let child = format!("activations/{}", activation_id);
                let activation = service.get_nested(&LICENSE_KEYS, &id, &child).await?;
                ctx.renderer().print_detail(&activation, ACTIVATION_FIELDS)?;
                Ok(())
            }
        }
    }
}

/// Handler for custom field commands
#[derive(Default)]
pub struct CustomFieldHandler;

impl CustomFieldHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: CustomFieldCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            CustomFieldCommands::List(args) => {
                let params = list_params(ctx, config, &CUSTOM_FIELDS, args)?;
                print_list(ctx, service, &CUSTOM_FIELDS, params).await
            }
            CustomFieldCommands::Get { id } => {
                print_item(ctx, service, &CUSTOM_FIELDS, &id).await
            }
            CustomFieldCommands::Create {
                name,
                slug,
                field_type,
                properties,
                org,
            } => {
                let request = CustomFieldInput {
                    field_type,
                    name,
                    slug,
                    properties,
                    organization_id: org,
                }
                .build()?;
                create_item(ctx, service, &CUSTOM_FIELDS, &request).await
            }
            CustomFieldCommands::Update { id, name } => {
                let Some(NameUpdate { name: Some(name) }) = NameUpdate { name }.validated()? else {
                    return nothing_to_update(ctx);
                };
                let existing = service.get(&CUSTOM_FIELDS, &id).await?;
                let Some(field_type) = existing.get("type").and_then(Value::as_str) else {
                    return Err(CliError::InvalidArguments(format!(
                        "Custom field {} has no type",
                        id
                    ))
                    .into());
                };
                let request = CustomFieldUpdate {
                    field_type: field_type.to_string(),
                    name,
                };
                let field = service.update(&CUSTOM_FIELDS, &id, &request).await?;
                print_changed(ctx, &CUSTOM_FIELDS, &field, "updated")
            }
            CustomFieldCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &CUSTOM_FIELDS, &id, confirm).await
            }
        }
    }
}

/// Handler for file commands. `create` registers the upload and prints the
/// presigned part URLs returned by the API; the bytes are sent by the caller.
#[derive(Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: FileCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            FileCommands::List { page, org } => {
                let params = ListParams {
                    organization_id: Some(org_id(ctx, config, org.as_deref())?),
                    ..ListParams::page(page.page, page.limit)
                };
                print_list(ctx, service, &FILES, params).await
            }
            FileCommands::Create {
                name,
                mime_type,
                size,
                service: file_service,
                org,
            } => {
                let request = FileCreate::new(file_service, name, mime_type, size, org)?;
                tracing::debug!(parts = request.upload.parts.len(), "registering upload");
                create_item(ctx, service, &FILES, &request).await
            }
            FileCommands::Update { id, name } => {
                let request = NameUpdate { name }.validated()?;
                update_item(ctx, service, &FILES, &id, request).await
            }
            FileCommands::Delete { id, confirm } => {
                delete_item(ctx, service, &FILES, &id, confirm).await
            }
        }
    }
}
