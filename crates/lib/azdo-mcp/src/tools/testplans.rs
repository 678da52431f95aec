//! Test plan tools.

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
pub struct ListTestPlansParams {
    pub project: String,
    /// Restrict to active plans only.
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTestSuitesParams {
    pub project: String,
    pub plan_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTestCasesParams {
    pub project: String,
    pub plan_id: u32,
    pub suite_id: u32,
}

#[tool_router(router = tool_router_testplans, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the test plans in a project.")]
    async fn list_test_plans(
        &self,
        Parameters(params): Parameters<ListTestPlansParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/testplan/plans",
            connection.urls().core,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(active) = params.active {
            extra.push(("filterActivePlans", active.to_string()));
        }
        let plans = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(plans)?]))
    }

    #[tool(description = "List the suites of a test plan.")]
    async fn list_test_suites(
        &self,
        Parameters(params): Parameters<ListTestSuitesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/testplan/plans/{}/suites",
            connection.urls().core,
            params.project,
            params.plan_id
        );
        let suites = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(suites)?]))
    }

    #[tool(description = "List the test cases in a suite.")]
    async fn list_test_cases(
        &self,
        Parameters(params): Parameters<ListTestCasesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/testplan/plans/{}/suites/{}/testcase",
            connection.urls().core,
            params.project,
            params.plan_id,
            params.suite_id
        );
        let cases = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(cases)?]))
    }
}
