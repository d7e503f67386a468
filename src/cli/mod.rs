use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::auth::load_client_secret;
use crate::config::{self, RuntimeOptions};
use crate::errors::ServerResult;
use crate::gateway::{self, GatewayState};
use crate::tools::ToolRegistry;

#[derive(Parser)]
#[command(name = "workspace-mcp")]
#[command(about = "Google Workspace MCP server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve configuration, load credentials, and serve (the default)
    Serve,
    /// Resolve configuration and print the result without touching the
    /// network — a preflight for deployment pipelines
    Check,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await?,
        Commands::Check => check()?,
    }
    Ok(())
}

/// Startup path: resolve → load → bind, in that order. Any resolution or
/// loading failure propagates out and exits the process non-zero before a
/// listener ever opens.
async fn serve() -> ServerResult<()> {
    let env = config::process_env();
    let credentials = config::resolve(&env)?;
    let runtime = RuntimeOptions::resolve(&env)?;

    info!(
        "credential source resolved: {} (callback base {})",
        credentials.source.mode_name(),
        credentials.callback_base_uri
    );

    let client_secret = load_client_secret(&credentials).await?;
    let tools = ToolRegistry::from_options(&runtime);
    info!(
        "enabled tools: {}",
        tools.enabled().map(|t| t.id).collect::<Vec<_>>().join(", ")
    );

    let state = GatewayState {
        runtime: Arc::new(runtime),
        credentials: Arc::new(credentials),
        client_secret: Arc::new(client_secret),
        tools: Arc::new(tools),
    };
    gateway::start(state).await.map_err(Into::into)
}

/// Preflight: resolution only. No filesystem reads, no parameter-store calls.
fn check() -> ServerResult<()> {
    let env = config::process_env();
    let credentials = config::resolve(&env)?;
    let runtime = RuntimeOptions::resolve(&env)?;

    println!("credential mode:   {}", credentials.source.mode_name());
    println!("callback base URI: {}", credentials.callback_base_uri);
    println!("oauth redirect:    {}", credentials.oauth_redirect_uri());
    println!("port:              {}", runtime.port);
    println!(
        "tools:             {}",
        if runtime.enabled_tools.is_empty() {
            "(all)".to_string()
        } else {
            runtime.enabled_tools.join(", ")
        }
    );
    println!("email in header:   {}", runtime.email_in_header);
    Ok(())
}
