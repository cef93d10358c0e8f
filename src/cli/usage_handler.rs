use crate::api::client::Query;
use crate::api::resources::{EVENT_NAME_COLUMNS, EVENT_TYPES, EVENTS, METERS, METRICS};
use crate::cli::command_handlers::{
    create_item, list_params, notice, org_id, print_item, print_list, update_item,
};
use crate::cli::context::CliContext;
use crate::cli::main_types::{EventCommands, EventTypeCommands, MeterCommands, MetricsCommands};
use crate::core::requests::{
    EventIngest, EventTypeUpdate, MeterInput, MetricsInput, NameUpdate, QuantitiesInput,
};
use crate::core::services::resource_service::ResourceService;
use crate::display::OperationStatus;
use crate::error::AppError;
use crate::storage::config::Config;
use serde_json::Value;

/// Handler for meter commands
#[derive(Default)]
pub struct MeterHandler;

impl MeterHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: MeterCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            MeterCommands::List(args) => {
                let params = list_params(ctx, config, &METERS, args)?;
                print_list(ctx, service, &METERS, params).await
            }
            MeterCommands::Get { id } => print_item(ctx, service, &METERS, &id).await,
            MeterCommands::Create {
                name,
                filter,
                aggregation,
                org,
            } => {
                let request = MeterInput {
                    name,
                    filter,
                    aggregation,
                    organization_id: org,
                }
                .build()?;
                create_item(ctx, service, &METERS, &request).await
            }
            MeterCommands::Update { id, name } => {
                let request = NameUpdate { name }.validated()?;
                update_item(ctx, service, &METERS, &id, request).await
            }
            MeterCommands::Quantities {
                id,
                start,
                end,
                interval,
            } => {
                let query = QuantitiesInput {
                    start,
                    end,
                    interval,
                }
                .build()?;
                let quantities = service.query_nested(&METERS, &id, "quantities", &query).await?;
                ctx.renderer().print_detail(&quantities, &[])?;
                Ok(())
            }
        }
    }
}

/// Handler for event commands
#[derive(Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: EventCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            EventCommands::List { list, customer_id } => {
                let params =
                    list_params(ctx, config, &EVENTS, list)?.with_filter("customer_id", customer_id);
                print_list(ctx, service, &EVENTS, params).await
            }
            EventCommands::Get { id } => print_item(ctx, service, &EVENTS, &id).await,
            EventCommands::Names(args) => {
                let params = list_params(ctx, config, &EVENTS, args)?;
                let names = service.list_action(&EVENTS, "names", &params).await?;
                ctx.renderer()
                    .print_list(&names.items, EVENT_NAME_COLUMNS, Some(&names.pagination))?;
                Ok(())
            }
            EventCommands::Ingest { events } => {
                let request = EventIngest::parse(&events)?;
                let sent = request.events.len() as u64;
                let response = service.post_action(&EVENTS, "ingest", &request).await?;
                let inserted = response
                    .get("inserted")
                    .and_then(Value::as_u64)
                    .unwrap_or(sent);
                notice(
                    ctx,
                    &format!("Events ingested: {}", inserted),
                    OperationStatus::Success,
                );
                Ok(())
            }
        }
    }
}

/// Handler for event type commands
#[derive(Default)]
pub struct EventTypeHandler;

impl EventTypeHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: EventTypeCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        match command {
            EventTypeCommands::List(args) => {
                let params = list_params(ctx, config, &EVENT_TYPES, args)?;
                print_list(ctx, service, &EVENT_TYPES, params).await
            }
            EventTypeCommands::Update { id, is_archived } => {
                let request = EventTypeUpdate { is_archived }.validated();
                update_item(ctx, service, &EVENT_TYPES, &id, request).await
            }
        }
    }
}

/// Handler for metrics commands. Reports are printed as documents.
#[derive(Default)]
pub struct MetricsHandler;

impl MetricsHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(
        &self,
        command: MetricsCommands,
        ctx: &CliContext,
        config: &Config,
        service: &ResourceService,
    ) -> Result<(), AppError> {
        let (action, query) = match command {
            MetricsCommands::Get {
                start_date,
                end_date,
                interval,
                org,
                product_id,
            } => {
                let query = MetricsInput {
                    start_date,
                    end_date,
                    interval,
                    organization_id: org_id(ctx, config, org.as_deref())?,
                    product_id,
                }
                .build()?;
                ("", query)
            }
            MetricsCommands::Limits => ("limits", Query::new()),
        };

        let report = service.get_action(&METRICS, action, &query).await?;
        ctx.renderer().print_detail(&report, METRICS.detail_fields)?;
        Ok(())
    }
}
