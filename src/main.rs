use clap::Parser;
use polar_cli::cli::dispatcher::Dispatcher;
use polar_cli::cli::guard::{GuardOptions, run_guarded};
use polar_cli::cli::main_types::Cli;
use polar_cli::storage::credentials::KeyringTokenStore;
use polar_cli::utils::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = GuardOptions {
        debug: cli.debug,
        use_colors: !cli.no_color && atty::is(atty::Stream::Stderr),
    };

    let code = run_guarded(run(cli), options).await;
    std::process::exit(code);
}

async fn run(cli: Cli) -> polar_cli::Result<()> {
    let mut dispatcher = Dispatcher::from_cli(&cli, Box::new(KeyringTokenStore))?;
    if dispatcher.context().verbose {
        tracing::info!(
            environment = %dispatcher.context().environment,
            api_url = %dispatcher.context().api_base_url(),
            "verbose mode enabled"
        );
    }
    dispatcher.dispatch(cli.command).await
}
