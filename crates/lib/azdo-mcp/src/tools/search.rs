//! Search tools. These POST against the search host rather than the core
//! organization host.

use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::AzdoMcp;
use crate::helpers;

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    pub search_text: String,
    /// Restrict the search to one project.
    pub project: Option<String>,
    pub top: Option<u32>,
}

fn search_body(params: &SearchParams) -> Value {
    let mut body = json!({
        "searchText": params.search_text,
        "$top": params.top.unwrap_or(25),
    });
    if let Some(project) = &params.project {
        body["filters"] = json!({ "Project": [project] });
    }
    body
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "Search code across the organization.")]
    async fn search_code(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/_apis/search/codesearchresults",
            connection.urls().search
        );
        let body = search_body(&params);
        let results = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(results)?]))
    }

    #[tool(description = "Search wiki pages across the organization.")]
    async fn search_wiki(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/_apis/search/wikisearchresults",
            connection.urls().search
        );
        let body = search_body(&params);
        let results = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(results)?]))
    }

    #[tool(description = "Search work items across the organization.")]
    async fn search_work_items(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/_apis/search/workitemsearchresults",
            connection.urls().search
        );
        let body = search_body(&params);
        let results = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(results)?]))
    }
}
