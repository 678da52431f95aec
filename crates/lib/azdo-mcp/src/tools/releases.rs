//! Release management tools. These live on the release-management host.

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
pub struct ListReleaseDefinitionsParams {
    pub project: String,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListReleasesParams {
    pub project: String,
    pub definition_id: Option<u32>,
    pub top: Option<u32>,
}

#[tool_router(router = tool_router_releases, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the release definitions in a project.")]
    async fn list_release_definitions(
        &self,
        Parameters(params): Parameters<ListReleaseDefinitionsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/release/definitions",
            connection.urls().release,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let definitions = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(definitions)?]))
    }

    #[tool(description = "List releases in a project, optionally for one definition.")]
    async fn list_releases(
        &self,
        Parameters(params): Parameters<ListReleasesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/release/releases",
            connection.urls().release,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(definition_id) = params.definition_id {
            extra.push(("definitionId", definition_id.to_string()));
        }
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let releases = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(releases)?]))
    }
}
