// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! codexi: operator CLI for the codexi daemon.

use anyhow::Result;
use clap::{Parser, Subcommand};

use codexi::client::GatewayClient;
use codexi::commands::{agent, daemon, models, run};
use codexi::exit_error::ExitError;
use codexi::output::OutputFormat;
use codexi::{color, env};

#[derive(Parser)]
#[command(
    name = "codexi",
    version,
    about = "Agent dashboard backend client",
    styles = color::styles()
)]
struct Cli {
    /// Gateway base URL (default: $CODEXI_GATEWAY_URL or http://127.0.0.1:7070)
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    /// Terminal WebSocket URL (default: $CODEXI_TERMINAL_URL or ws://127.0.0.1:7071)
    #[arg(long, global = true)]
    terminal_url: Option<String>,

    /// Bearer token for the daemon (default: $CODEXI_AUTH_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask an agent role to act on a message
    Agent(agent::AgentArgs),
    /// Run a command in a terminal session
    Run(run::RunArgs),
    /// List a vendor's models
    Models(models::ModelsArgs),
    /// Send one chat message to a vendor
    Chat(models::ChatArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
}

async fn dispatch(cli: Cli) -> Result<()> {
    let token = cli.token.or_else(env::auth_token);
    let gateway_url = cli.gateway_url.unwrap_or_else(env::gateway_url);
    let format = cli.output;

    match cli.command {
        Commands::Agent(args) => {
            agent::handle(args, GatewayClient::new(gateway_url, token), format).await
        }
        Commands::Run(args) => {
            let url = cli.terminal_url.unwrap_or_else(env::terminal_url);
            run::handle(args, &url, token.as_deref(), format).await
        }
        Commands::Models(args) => {
            models::models(args, GatewayClient::new(gateway_url, token), format).await
        }
        Commands::Chat(args) => {
            models::chat(args, GatewayClient::new(gateway_url, token), format).await
        }
        Commands::Daemon(args) => daemon::daemon(args, &gateway_url, format).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli).await {
        if let Some(exit) = err.downcast_ref::<ExitError>() {
            if !exit.message.is_empty() {
                eprintln!("{} {}", color::error("error:"), exit.message);
            }
            std::process::exit(exit.code);
        }
        eprintln!("{} {:#}", color::error("error:"), err);
        std::process::exit(1);
    }
}
