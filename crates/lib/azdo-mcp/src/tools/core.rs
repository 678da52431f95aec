//! Project and team tools.

use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::AzdoMcp;
use crate::helpers;

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListProjectsParams {
    pub top: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetProjectParams {
    /// Project id or name.
    pub project: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTeamsParams {
    pub project: String,
    pub top: Option<u32>,
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the projects in the organization.")]
    async fn list_projects(
        &self,
        Parameters(params): Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!("{}/_apis/projects", connection.urls().core);
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        if let Some(skip) = params.skip {
            extra.push(("$skip", skip.to_string()));
        }
        let projects = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(projects)?]))
    }

    #[tool(description = "Fetch a project by id or name.")]
    async fn get_project(
        &self,
        Parameters(params): Parameters<GetProjectParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!("{}/_apis/projects/{}", connection.urls().core, params.project);
        let project = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(project)?]))
    }

    #[tool(description = "List the teams in a project.")]
    async fn list_teams(
        &self,
        Parameters(params): Parameters<ListTeamsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/_apis/projects/{}/teams",
            connection.urls().core,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let teams = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(teams)?]))
    }
}
