//! Entry point for the Azure DevOps MCP server.
//!
//! Resolves configuration, derives the operating mode, wires the credential
//! chain and connection provider, and serves the MCP protocol over stdio.

mod config;

use std::sync::Arc;

use azdo_client::UserAgentComposer;
use azdo_client::auth::credential_chain;
use azdo_client::connection::ConnectionProvider;
use azdo_mcp::AzdoMcp;
use azdo_mcp::server::serve_stdio;
use tracing_subscriber::EnvFilter;

use crate::config::AzdoConfig;

const PRODUCT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the MCP transport; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AzdoConfig::from_args()?;
    tracing::info!(
        organization = %config.organization,
        mode = ?config.mode,
        "starting azdo-mcpd"
    );

    let credential = credential_chain(config.credential_strategy, config.tenant_id.as_deref());
    let user_agent = Arc::new(UserAgentComposer::new(PRODUCT_VERSION));
    let provider = Arc::new(ConnectionProvider::new(
        &config.organization,
        config.pat.clone(),
        Arc::new(credential),
        Arc::clone(&user_agent),
    ));

    let service = AzdoMcp::new(config.mode, provider, user_agent);
    serve_stdio(service).await?;
    Ok(())
}
