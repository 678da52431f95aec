//! Advanced-security alert tools, served from the advanced-security host.

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

const ADVSEC_API_VERSION: &str = "7.2-preview.1";

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListAlertsParams {
    pub project: String,
    /// Repository id or name.
    pub repository: String,
    /// Filter by alert type: `code`, `secret`, or `dependency`.
    pub alert_type: Option<String>,
    /// Filter by states, comma separated, e.g. `active,fixed`.
    pub states: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetAlertParams {
    pub project: String,
    /// Repository id or name.
    pub repository: String,
    pub alert_id: u32,
}

#[tool_router(router = tool_router_advsec, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List advanced-security alerts for a repository.")]
    async fn list_alerts(
        &self,
        Parameters(params): Parameters<ListAlertsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/alert/repositories/{}/alerts",
            connection.urls().advsec,
            params.project,
            params.repository
        );
        let mut extra = Vec::new();
        if let Some(alert_type) = params.alert_type {
            extra.push(("criteria.alertType", alert_type));
        }
        if let Some(states) = params.states {
            extra.push(("criteria.states", states));
        }
        let alerts = connection
            .get_json_with(&url, ADVSEC_API_VERSION, &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(alerts)?]))
    }

    #[tool(description = "Fetch a single advanced-security alert by id.")]
    async fn get_alert(
        &self,
        Parameters(params): Parameters<GetAlertParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/alert/repositories/{}/alerts/{}",
            connection.urls().advsec,
            params.project,
            params.repository,
            params.alert_id
        );
        let alert = connection
            .get_json(&url, ADVSEC_API_VERSION)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(alert)?]))
    }
}
