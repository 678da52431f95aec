//! Wiki tools.

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
pub struct ListWikisParams {
    pub project: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListWikiPagesParams {
    pub project: String,
    /// Wiki id or name.
    pub wiki: String,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetWikiPageContentParams {
    pub project: String,
    /// Wiki id or name.
    pub wiki: String,
    /// Page path, e.g. `/Onboarding/Setup`.
    pub path: String,
}

#[tool_router(router = tool_router_wiki, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the wikis in a project.")]
    async fn list_wikis(
        &self,
        Parameters(params): Parameters<ListWikisParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wiki/wikis",
            connection.urls().core,
            params.project
        );
        let wikis = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(wikis)?]))
    }

    #[tool(description = "List the pages of a wiki.")]
    async fn list_wiki_pages(
        &self,
        Parameters(params): Parameters<ListWikiPagesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wiki/wikis/{}/pagesbatch",
            connection.urls().core,
            params.project,
            params.wiki
        );
        let body = json!({ "top": params.top.unwrap_or(100) });
        let pages = connection
            .post_json(&url, "7.1-preview.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(pages)?]))
    }

    #[tool(description = "Fetch a wiki page with its content.")]
    async fn get_wiki_page_content(
        &self,
        Parameters(params): Parameters<GetWikiPageContentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wiki/wikis/{}/pages",
            connection.urls().core,
            params.project,
            params.wiki
        );
        let extra = vec![
            ("path", params.path),
            ("includeContent", "true".to_string()),
        ];
        let page = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(page)?]))
    }
}
