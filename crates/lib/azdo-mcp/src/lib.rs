//! MCP server implementation for azdo-mcp.
//!
//! Exposes Azure DevOps resource families as MCP tools, gated by the
//! operating mode derived at process start. The tool catalog is assembled
//! once during startup and is read-only afterwards.

mod helpers;
mod tools;
pub mod gate;
pub mod server;

use std::sync::Arc;

use azdo_client::UserAgentComposer;
use azdo_client::connection::{Connection, ConnectionProvider};
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool_handler,
};
use rmcp::model::{
    ErrorCode,
    InitializeRequestParams,
    InitializeResult,
    ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;

use crate::gate::Mode;

const SERVER_INSTRUCTIONS: &str = r"azdo-mcp exposes Azure DevOps operations as MCP tools.

Tool families:
- Work items: backlogs, queries, comments, batch reads, and (outside
  read-only mode) create/update/comment/link operations.
- Core: projects and teams.
- Work: team iterations and settings.
- Builds: definitions, runs, logs, and queuing.
- Repos: repositories, branches, and pull requests.
- Releases: definitions and releases.
- Wiki: wikis, page listings, and page content.
- Test plans: plans, suites, and test cases.
- Search: code, wiki, and work-item search.
- Advanced security: alert listings and details.

In read-only mode only a fixed allow-list of work-item query tools is
available. All tools operate against the organization the server was started
for.";

/// MCP server wrapper around the connection provider and tool routers.
#[derive(Clone)]
pub struct AzdoMcp {
    tool_router: ToolRouter<Self>,
    provider: Arc<ConnectionProvider>,
    user_agent: Arc<UserAgentComposer>,
}

impl AzdoMcp {
    /// Builds the server with the catalog the given mode permits.
    ///
    /// Read-only mode registers only the work-item family and then prunes it
    /// down to the allow-list. Full and reviewer modes share the complete
    /// catalog.
    #[must_use]
    pub fn new(
        mode: Mode,
        provider: Arc<ConnectionProvider>,
        user_agent: Arc<UserAgentComposer>,
    ) -> Self {
        let tool_router = match mode {
            Mode::ReadOnly => {
                let mut router = Self::tool_router_workitems();
                gate::restrict_to_allow_list(&mut router, &gate::READ_ONLY_TOOLS);
                router
            }
            Mode::Full | Mode::Reviewer => {
                Self::tool_router_core()
                    + Self::tool_router_work()
                    + Self::tool_router_builds()
                    + Self::tool_router_repos()
                    + Self::tool_router_workitems()
                    + Self::tool_router_releases()
                    + Self::tool_router_wiki()
                    + Self::tool_router_testplans()
                    + Self::tool_router_search()
                    + Self::tool_router_advsec()
            }
        };
        Self {
            tool_router,
            provider,
            user_agent,
        }
    }

    /// Names of every registered tool, sorted for deterministic inspection.
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.into_owned())
            .collect();
        names.sort();
        names
    }

    pub(crate) async fn connection(&self) -> Result<Connection, ErrorData> {
        self.provider.provide().await.map_err(|err| {
            helpers::mcp_err(
                ErrorCode::INTERNAL_ERROR,
                format!("failed to authenticate to Azure DevOps: {err}"),
            )
        })
    }
}

#[tool_handler]
impl ServerHandler for AzdoMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn initialize(
        &self,
        request: InitializeRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, ErrorData> {
        self.user_agent
            .append_mcp_client_info(&request.client_info.name, &request.client_info.version);
        Ok(self.get_info())
    }
}
