use crate::api::resources::{BENEFIT_GRANTS, DISPUTES, PAYMENTS, Resource};
use crate::cli::catalog_handler::{
    BenefitHandler, CustomFieldHandler, DiscountHandler, FileHandler, LicenseKeyHandler,
};
use crate::cli::checkout_handler::{CheckoutHandler, CheckoutLinkHandler, RefundHandler};
use crate::cli::command_handlers::{
    AuthHandler, ConfigHandler, CustomerHandler, MemberHandler, OrderHandler, OrgHandler,
    ProductHandler, ReadOnlyHandler, SubscriptionHandler, WebhookHandler,
};
use crate::cli::usage_handler::{EventHandler, EventTypeHandler, MeterHandler, MetricsHandler};
use crate::cli::context::CliContext;
use crate::cli::main_types::{Cli, Commands, ReadOnlyCommands};
use crate::core::services::organization_service::OrganizationService;
use crate::core::services::resource_service::ResourceService;
use crate::error::AppError;
use crate::storage::config::Config;
use crate::storage::credentials::TokenStore;

pub struct Dispatcher {
    context: CliContext,
    config: Config,
    store: Box<dyn TokenStore>,
}

impl Dispatcher {
    pub fn new(context: CliContext, config: Config, store: Box<dyn TokenStore>) -> Self {
        Self {
            context,
            config,
            store,
        }
    }

    /// Resolve the config file, load it and derive the invocation context.
    pub fn from_cli(cli: &Cli, store: Box<dyn TokenStore>) -> Result<Self, AppError> {
        let config_path = Config::config_file_path(cli.config_dir.as_deref())?;
        let config = Config::load(&config_path)?;
        tracing::debug!(path = %config_path.display(), "configuration loaded");

        let context = CliContext::new(cli, &config, config_path);
        Ok(Self::new(context, config, store))
    }

    pub fn context(&self) -> &CliContext {
        &self.context
    }

    fn resource_service(&self) -> Result<ResourceService, AppError> {
        Ok(ResourceService::new(self.context.client(self.store.as_ref())?))
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        tracing::debug!(
            command = command.name(),
            environment = %self.context.environment,
            output = ?self.context.output_format,
            "dispatching command"
        );

        match command {
            Commands::Auth { command } => {
                AuthHandler::new()
                    .handle(command, &self.context, self.store.as_ref())
                    .await
            }
            Commands::Config { command } => {
                ConfigHandler::new().handle(command, &self.context, &self.config)
            }
            Commands::Org { command } => {
                let service = OrganizationService::new(self.context.client(self.store.as_ref())?);
                OrgHandler::new()
                    .handle(command, &self.context, &service, &mut self.config)
                    .await
            }
            Commands::Members { command } => {
                let service = self.resource_service()?;
                MemberHandler::new()
                    .handle(command, &self.context, &service)
                    .await
            }
            Commands::Products { command } => {
                let service = self.resource_service()?;
                ProductHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Customers { command } => {
                let service = self.resource_service()?;
                CustomerHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Orders { command } => {
                let service = self.resource_service()?;
                OrderHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Subscriptions { command } => {
                let service = self.resource_service()?;
                SubscriptionHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Webhooks { command } => {
                let service = self.resource_service()?;
                WebhookHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Discounts { command } => {
                let service = self.resource_service()?;
                DiscountHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Benefits { command } => {
                let service = self.resource_service()?;
                BenefitHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::LicenseKeys { command } => {
                let service = self.resource_service()?;
                LicenseKeyHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Meters { command } => {
                let service = self.resource_service()?;
                MeterHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Events { command } => {
                let service = self.resource_service()?;
                EventHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::EventTypes { command } => {
                let service = self.resource_service()?;
                EventTypeHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Metrics { command } => {
                let service = self.resource_service()?;
                MetricsHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Files { command } => {
                let service = self.resource_service()?;
                FileHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Refunds { command } => {
                let service = self.resource_service()?;
                RefundHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Payments { command } => self.read_only(&PAYMENTS, command).await,
            Commands::Disputes { command } => self.read_only(&DISPUTES, command).await,
            Commands::CheckoutLinks { command } => {
                let service = self.resource_service()?;
                CheckoutLinkHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::Checkouts { command } => {
                let service = self.resource_service()?;
                CheckoutHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::CustomFields { command } => {
                let service = self.resource_service()?;
                CustomFieldHandler::new()
                    .handle(command, &self.context, &self.config, &service)
                    .await
            }
            Commands::BenefitGrants { command } => self.read_only(&BENEFIT_GRANTS, command).await,
        }
    }

    async fn read_only(
        &self,
        resource: &Resource,
        command: ReadOnlyCommands,
    ) -> Result<(), AppError> {
        let service = self.resource_service()?;
        ReadOnlyHandler::new()
            .handle(resource, command, &self.context, &self.config, &service)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::main_types::OrgCommands;
    use crate::error::CliError;
    use crate::storage::config::Environment;
    use crate::storage::credentials::MemoryTokenStore;
    use clap::Parser;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ORG_ID: &str = "1dbfc517-0bbf-4301-9ba8-555ca42b9737";

    fn dispatcher(dir: &TempDir, base_url: &str, store: MemoryTokenStore) -> (Dispatcher, Commands) {
        let config_dir = dir.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "polar",
            "--config-dir",
            config_dir.as_str(),
            "--base-url",
            base_url,
            "-o",
            "json",
            "config",
            "show",
        ])
        .expect("parse");
        let mut dispatcher = Dispatcher::from_cli(&cli, Box::new(store)).expect("dispatcher");
        dispatcher.context.access_token = None;
        (dispatcher, cli.command)
    }

    #[tokio::test]
    async fn test_config_show_needs_no_token() {
        let dir = TempDir::new().expect("temp dir");
        let (mut dispatcher, command) =
            dispatcher(&dir, "http://127.0.0.1:9", MemoryTokenStore::default());
        dispatcher.dispatch(command).await.expect("config show");
    }

    #[tokio::test]
    async fn test_api_command_without_token_fails_early() {
        let dir = TempDir::new().expect("temp dir");
        let (mut dispatcher, _) =
            dispatcher(&dir, "http://127.0.0.1:9", MemoryTokenStore::default());

        let result = dispatcher
            .dispatch(Commands::Org {
                command: OrgCommands::Get {
                    id: "acme".to_string(),
                },
            })
            .await;
        assert!(matches!(
            result,
            Err(AppError::Cli(CliError::NotAuthenticated { .. }))
        ));
    }

    #[tokio::test]
    async fn test_set_default_org_persists_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/organizations/"))
            .and(query_param("slug", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": ORG_ID, "name": "Acme", "slug": "acme"}],
                "pagination": {"total_count": 1, "max_page": 1}
            })))
            .mount(&server)
            .await;

        let dir = TempDir::new().expect("temp dir");
        let store = MemoryTokenStore::with_token(Environment::Production, "polar_oat_test");
        let (mut dispatcher, _) = dispatcher(&dir, &server.uri(), store);

        dispatcher
            .dispatch(Commands::Org {
                command: OrgCommands::SetDefault {
                    id: "acme".to_string(),
                },
            })
            .await
            .expect("set-default");

        let saved = Config::load(&dir.path().join("config.toml")).expect("load");
        assert_eq!(saved.default_org_id(Environment::Production), Some(ORG_ID));
    }
}
