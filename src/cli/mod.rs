//! CLI entry point for loophole.

pub mod account;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// loophole CLI
#[derive(Parser, Debug)]
#[command(
    name = "loophole",
    version,
    about = "Expose local servers to the public internet"
)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to use your account
    Account(AccountArgs),
    /// Expose http server on given port to the public
    Http(HttpArgs),
}

/// Arguments for the `account` subcommand group.
#[derive(Parser, Debug)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommands,
}

/// Account subcommands for login, logout and status.
#[derive(Subcommand, Debug)]
pub enum AccountCommands {
    /// Log in through the device flow in your browser
    Login,
    /// Remove locally stored credentials
    Logout,
    /// Show whether you are logged in
    Status,
}

/// Arguments for `loophole http <port> [host]`.
#[derive(Parser, Debug)]
pub struct HttpArgs {
    /// Local port to expose
    pub port: u16,

    /// Local host to expose
    #[arg(default_value = "127.0.0.1")]
    pub host: String,

    #[command(flatten)]
    pub serve: ServeArgs,
}

/// Flags shared by every expose command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Private key path (generated when missing)
    #[arg(short = 'i', long, value_name = "PATH")]
    pub identity_file: Option<PathBuf>,

    /// Custom hostname you want to run service on
    #[arg(long)]
    pub hostname: Option<String>,

    /// Basic authentication username to protect site with
    #[arg(short = 'u', long)]
    pub basic_auth_username: Option<String>,

    /// Basic authentication password to protect site with
    #[arg(short = 'p', long)]
    pub basic_auth_password: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
