//! MCP server runner for azdo-mcp.

use rmcp::serve_server;
use rmcp::transport::io::stdio;

use crate::AzdoMcp;

/// Serves the MCP server over stdio, blocking until the transport closes.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    service: AzdoMcp,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}
