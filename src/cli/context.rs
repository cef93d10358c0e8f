use crate::api::client::PolarClient;
use crate::cli::main_types::Cli;
use crate::display::{OutputFormat, Renderer};
use crate::error::{AppError, CliError};
use crate::storage::config::{Config, Environment};
use crate::storage::credentials::{TokenStore, resolve_token};
use std::path::PathBuf;

/// Per-invocation settings derived from global flags and the config file.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub environment: Environment,
    pub output_format: OutputFormat,
    pub base_url: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub debug: bool,
    pub config_path: PathBuf,
    pub access_token: Option<String>,
}

impl CliContext {
    /// `--sandbox` forces the sandbox; otherwise the configured default applies.
    pub fn new(cli: &Cli, config: &Config, config_path: PathBuf) -> Self {
        let environment = if cli.sandbox {
            Environment::Sandbox
        } else {
            config.default_environment
        };

        Self {
            environment,
            output_format: cli.output,
            base_url: cli.base_url.clone(),
            verbose: cli.verbose,
            no_color: cli.no_color,
            debug: cli.debug,
            config_path,
            access_token: cli.access_token.clone(),
        }
    }

    pub fn sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    pub fn api_base_url(&self) -> String {
        match self.base_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.environment.server_url().to_string(),
        }
    }

    pub fn stdout_colors(&self) -> bool {
        !self.no_color && atty::is(atty::Stream::Stdout)
    }

    pub fn stderr_colors(&self) -> bool {
        !self.no_color && atty::is(atty::Stream::Stderr)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.output_format).with_colors(self.stdout_colors())
    }

    /// Token for the current environment, or `NotAuthenticated`.
    pub fn token(&self, store: &dyn TokenStore) -> Result<String, AppError> {
        resolve_token(self.access_token.as_deref(), store, self.environment)?.ok_or_else(|| {
            CliError::NotAuthenticated {
                environment: self.environment.to_string(),
                sandbox: self.sandbox(),
            }
            .into()
        })
    }

    pub fn client_with_token(&self, token: String) -> Result<PolarClient, AppError> {
        tracing::debug!(base_url = %self.api_base_url(), environment = %self.environment, "creating client");
        Ok(PolarClient::new(&self.api_base_url(), token)?)
    }

    pub fn client(&self, store: &dyn TokenStore) -> Result<PolarClient, AppError> {
        let token = self.token(store)?;
        self.client_with_token(token)
    }
}
