//! Team settings and iteration tools.

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
pub struct ListTeamIterationsParams {
    pub project: String,
    pub team: String,
    /// Filter to a timeframe, e.g. `current`.
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTeamSettingsParams {
    pub project: String,
    pub team: String,
}

#[tool_router(router = tool_router_work, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List a team's iterations, optionally filtered to a timeframe.")]
    async fn list_team_iterations(
        &self,
        Parameters(params): Parameters<ListTeamIterationsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/{}/_apis/work/teamsettings/iterations",
            connection.urls().core,
            params.project,
            params.team
        );
        let mut extra = Vec::new();
        if let Some(timeframe) = params.timeframe {
            extra.push(("$timeframe", timeframe));
        }
        let iterations = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(iterations)?]))
    }

    #[tool(description = "Fetch a team's settings, including backlog and working-day configuration.")]
    async fn get_team_settings(
        &self,
        Parameters(params): Parameters<GetTeamSettingsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/{}/_apis/work/teamsettings",
            connection.urls().core,
            params.project,
            params.team
        );
        let settings = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(settings)?]))
    }
}
