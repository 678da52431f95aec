//! Build pipeline tools.

use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::AzdoMcp;
use crate::helpers;

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListBuildDefinitionsParams {
    pub project: String,
    /// Filter by definition name, wildcards allowed.
    pub name: Option<String>,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListBuildsParams {
    pub project: String,
    pub definition_id: Option<u32>,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBuildParams {
    pub project: String,
    pub build_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetBuildLogParams {
    pub project: String,
    pub build_id: u32,
    pub log_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RunBuildParams {
    pub project: String,
    pub definition_id: u32,
    /// Branch to build, e.g. `refs/heads/main`.
    pub source_branch: Option<String>,
}

#[tool_router(router = tool_router_builds, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the build definitions in a project.")]
    async fn list_build_definitions(
        &self,
        Parameters(params): Parameters<ListBuildDefinitionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/build/definitions",
            connection.urls().core,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(name) = params.name {
            extra.push(("name", name));
        }
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let definitions = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(definitions)?]))
    }

    #[tool(description = "List builds in a project, optionally for one definition.")]
    async fn list_builds(
        &self,
        Parameters(params): Parameters<ListBuildsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/build/builds",
            connection.urls().core,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(definition_id) = params.definition_id {
            extra.push(("definitions", definition_id.to_string()));
        }
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let builds = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(builds)?]))
    }

    #[tool(description = "Fetch a single build by id.")]
    async fn get_build(
        &self,
        Parameters(params): Parameters<GetBuildParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/build/builds/{}",
            connection.urls().core,
            params.project,
            params.build_id
        );
        let build = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(build)?]))
    }

    #[tool(description = "Fetch the text of one log from a build.")]
    async fn get_build_log(
        &self,
        Parameters(params): Parameters<GetBuildLogParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/build/builds/{}/logs/{}",
            connection.urls().core,
            params.project,
            params.build_id,
            params.log_id
        );
        let log = connection
            .get_text(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::text(log)]))
    }

    #[tool(description = "Queue a new build for a definition.")]
    async fn run_build(
        &self,
        Parameters(params): Parameters<RunBuildParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/build/builds",
            connection.urls().core,
            params.project
        );
        let mut body = json!({ "definition": { "id": params.definition_id } });
        if let Some(source_branch) = params.source_branch {
            body["sourceBranch"] = json!(source_branch);
        }
        let build = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(build)?]))
    }
}
