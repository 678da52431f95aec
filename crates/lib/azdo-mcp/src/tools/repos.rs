//! Git repository and pull-request tools.

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
pub struct ListRepositoriesParams {
    pub project: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListBranchesParams {
    pub project: String,
    pub repository_id: String,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListPullRequestsParams {
    pub project: String,
    pub repository_id: String,
    /// Filter by status: `active`, `completed`, `abandoned`, or `all`.
    pub status: Option<String>,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetPullRequestParams {
    pub project: String,
    pub repository_id: String,
    pub pull_request_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreatePullRequestParams {
    pub project: String,
    pub repository_id: String,
    /// Source ref, e.g. `refs/heads/topic`.
    pub source_ref: String,
    /// Target ref, e.g. `refs/heads/main`.
    pub target_ref: String,
    pub title: String,
    pub description: Option<String>,
}

#[tool_router(router = tool_router_repos, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List the Git repositories in a project.")]
    async fn list_repositories(
        &self,
        Parameters(params): Parameters<ListRepositoriesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/git/repositories",
            connection.urls().core,
            params.project
        );
        let repositories = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(repositories)?]))
    }

    #[tool(description = "List the branches of a repository.")]
    async fn list_branches(
        &self,
        Parameters(params): Parameters<ListBranchesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/refs",
            connection.urls().core,
            params.project,
            params.repository_id
        );
        let mut extra = vec![("filter", "heads/".to_string())];
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let branches = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(branches)?]))
    }

    #[tool(description = "List the pull requests of a repository.")]
    async fn list_pull_requests(
        &self,
        Parameters(params): Parameters<ListPullRequestsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/pullrequests",
            connection.urls().core,
            params.project,
            params.repository_id
        );
        let mut extra = Vec::new();
        if let Some(status) = params.status {
            extra.push(("searchCriteria.status", status));
        }
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let pull_requests = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(pull_requests)?]))
    }

    #[tool(description = "Fetch a single pull request by id.")]
    async fn get_pull_request(
        &self,
        Parameters(params): Parameters<GetPullRequestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/pullrequests/{}",
            connection.urls().core,
            params.project,
            params.repository_id,
            params.pull_request_id
        );
        let pull_request = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(pull_request)?]))
    }

    #[tool(description = "Create a pull request between two refs.")]
    async fn create_pull_request(
        &self,
        Parameters(params): Parameters<CreatePullRequestParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/git/repositories/{}/pullrequests",
            connection.urls().core,
            params.project,
            params.repository_id
        );
        let mut body = json!({
            "sourceRefName": params.source_ref,
            "targetRefName": params.target_ref,
            "title": params.title,
        });
        if let Some(description) = params.description {
            body["description"] = json!(description);
        }
        let pull_request = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(pull_request)?]))
    }
}
