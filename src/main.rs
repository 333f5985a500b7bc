//! loophole CLI binary entry point.

use loophole::cli::{AccountCommands, Cli, Commands};
use loophole::config::LoopholeConfig;
use loophole::error::LoopholeError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        if let Some(details) = e.details() {
            eprintln!("{details}");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), LoopholeError> {
    let config = LoopholeConfig::from_env()?;
    match cli.command {
        Commands::Account(account) => match account.command {
            AccountCommands::Login => loophole::cli::account::handle_login(&config).await,
            AccountCommands::Logout => loophole::cli::account::handle_logout(&config),
            AccountCommands::Status => loophole::cli::account::handle_status(&config),
        },
        Commands::Http(args) => loophole::cli::serve::handle_http(&config, args).await,
    }
}
