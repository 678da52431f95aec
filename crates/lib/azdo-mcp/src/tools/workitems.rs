//! Work-item tools.
//!
//! The query/read tools in this family make up the read-only allow-list;
//! the write tools at the bottom exist only outside read-only mode once the
//! gate has pruned the catalog.

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
pub struct ListMyWorkItemsParams {
    pub project: String,
    /// Predefined query to run: `assignedtome` or `myactivity`.
    pub query: Option<String>,
    pub top: Option<u32>,
    pub include_completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListBacklogsParams {
    pub project: String,
    pub team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListBacklogWorkItemsParams {
    pub project: String,
    pub team: String,
    pub backlog_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetWorkItemParams {
    pub project: String,
    pub id: u32,
    /// Expansion level: `none`, `relations`, `fields`, or `all`.
    pub expand: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetWorkItemsBatchParams {
    pub project: String,
    pub ids: Vec<u32>,
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListWorkItemCommentsParams {
    pub project: String,
    pub work_item_id: u32,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetWorkItemsForIterationParams {
    pub project: String,
    pub team: String,
    pub iteration_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetWorkItemTypeParams {
    pub project: String,
    pub work_item_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetQueryParams {
    pub project: String,
    /// Query id or path.
    pub query: String,
    /// Expansion level: `none`, `wiql`, `clauses`, `all`, or `minimal`.
    pub expand: Option<String>,
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetQueryResultsParams {
    pub project: String,
    pub query_id: String,
    pub top: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WorkItemField {
    /// Field reference name, e.g. `System.Title`.
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateWorkItemParams {
    pub project: String,
    /// Work item type name, e.g. `Task` or `Bug`.
    pub work_item_type: String,
    pub fields: Vec<WorkItemField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateWorkItemParams {
    pub project: String,
    pub id: u32,
    pub fields: Vec<WorkItemField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AddWorkItemCommentParams {
    pub project: String,
    pub work_item_id: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LinkWorkItemsParams {
    pub project: String,
    pub id: u32,
    pub target_id: u32,
    /// Relation reference name; defaults to `System.LinkTypes.Related`.
    pub link_type: Option<String>,
}

fn patch_document(fields: &[WorkItemField]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|field| {
                json!({
                    "op": "add",
                    "path": format!("/fields/{}", field.name),
                    "value": field.value,
                })
            })
            .collect(),
    )
}

#[tool_router(router = tool_router_workitems, vis = "pub")]
impl AzdoMcp {
    #[tool(description = "List work items assigned to or recently touched by the signed-in user.")]
    async fn list_my_work_items(
        &self,
        Parameters(params): Parameters<ListMyWorkItemsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let query = params.query.unwrap_or_else(|| "assignedtome".to_string());
        let url = format!(
            "{}/{}/_apis/work/predefinedqueries/{query}",
            connection.urls().core,
            params.project
        );
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        if let Some(include_completed) = params.include_completed {
            extra.push(("includeCompleted", include_completed.to_string()));
        }
        let items = connection
            .get_json_with(&url, "7.1-preview.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(items)?]))
    }

    #[tool(description = "List the backlog levels for a team.")]
    async fn list_backlogs(
        &self,
        Parameters(params): Parameters<ListBacklogsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/{}/_apis/work/backlogs",
            connection.urls().core,
            params.project,
            params.team
        );
        let backlogs = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(backlogs)?]))
    }

    #[tool(description = "List the work items on one of a team's backlog levels.")]
    async fn list_backlog_work_items(
        &self,
        Parameters(params): Parameters<ListBacklogWorkItemsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/{}/_apis/work/backlogs/{}/workItems",
            connection.urls().core,
            params.project,
            params.team,
            params.backlog_id
        );
        let items = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(items)?]))
    }

    #[tool(description = "Fetch a single work item by id.")]
    async fn get_work_item(
        &self,
        Parameters(params): Parameters<GetWorkItemParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workitems/{}",
            connection.urls().core,
            params.project,
            params.id
        );
        let mut extra = Vec::new();
        if let Some(expand) = params.expand {
            extra.push(("$expand", expand));
        }
        let item = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(item)?]))
    }

    #[tool(description = "Fetch a batch of work items by id, optionally limited to named fields.")]
    async fn get_work_items_batch(
        &self,
        Parameters(params): Parameters<GetWorkItemsBatchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workitemsbatch",
            connection.urls().core,
            params.project
        );
        let mut body = json!({ "ids": params.ids });
        if let Some(fields) = params.fields {
            body["fields"] = json!(fields);
        }
        let items = connection
            .post_json(&url, "7.1", &body)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(items)?]))
    }

    #[tool(description = "List the comments on a work item.")]
    async fn list_work_item_comments(
        &self,
        Parameters(params): Parameters<ListWorkItemCommentsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workItems/{}/comments",
            connection.urls().core,
            params.project,
            params.work_item_id
        );
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let comments = connection
            .get_json_with(&url, "7.1-preview.3", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(comments)?]))
    }

    #[tool(description = "List the work items in a team iteration.")]
    async fn get_work_items_for_iteration(
        &self,
        Parameters(params): Parameters<GetWorkItemsForIterationParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/{}/_apis/work/teamsettings/iterations/{}/workitems",
            connection.urls().core,
            params.project,
            params.team,
            params.iteration_id
        );
        let items = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(items)?]))
    }

    #[tool(description = "Fetch a work item type definition, including its fields and states.")]
    async fn get_work_item_type(
        &self,
        Parameters(params): Parameters<GetWorkItemTypeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workitemtypes/{}",
            connection.urls().core,
            params.project,
            params.work_item_type
        );
        let item_type = connection
            .get_json(&url, "7.1")
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(item_type)?]))
    }

    #[tool(description = "Fetch a stored query by id or path.")]
    async fn get_query(
        &self,
        Parameters(params): Parameters<GetQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/queries/{}",
            connection.urls().core,
            params.project,
            params.query
        );
        let mut extra = Vec::new();
        if let Some(expand) = params.expand {
            extra.push(("$expand", expand));
        }
        if let Some(depth) = params.depth {
            extra.push(("$depth", depth.to_string()));
        }
        let query = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(query)?]))
    }

    #[tool(description = "Run a stored query by id and return the matching work item references.")]
    async fn get_query_results(
        &self,
        Parameters(params): Parameters<GetQueryResultsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/wiql/{}",
            connection.urls().core,
            params.project,
            params.query_id
        );
        let mut extra = Vec::new();
        if let Some(top) = params.top {
            extra.push(("$top", top.to_string()));
        }
        let results = connection
            .get_json_with(&url, "7.1", &extra)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(results)?]))
    }

    #[tool(description = "Create a work item from a set of field values.")]
    async fn create_work_item(
        &self,
        Parameters(params): Parameters<CreateWorkItemParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workitems/${}",
            connection.urls().core,
            params.project,
            params.work_item_type
        );
        let document = patch_document(&params.fields);
        let created = connection
            .post_patch_document(&url, "7.1", &document)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(created)?]))
    }

    #[tool(description = "Update fields on an existing work item.")]
    async fn update_work_item(
        &self,
        Parameters(params): Parameters<UpdateWorkItemParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workitems/{}",
            connection.urls().core,
            params.project,
            params.id
        );
        let document = patch_document(&params.fields);
        let updated = connection
            .patch_document(&url, "7.1", &document)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(updated)?]))
    }

    #[tool(description = "Add a comment to a work item.")]
    async fn add_work_item_comment(
        &self,
        Parameters(params): Parameters<AddWorkItemCommentParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let url = format!(
            "{}/{}/_apis/wit/workItems/{}/comments",
            connection.urls().core,
            params.project,
            params.work_item_id
        );
        let comment = connection
            .post_json(&url, "7.1-preview.3", &json!({ "text": params.text }))
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(comment)?]))
    }

    #[tool(description = "Link two work items with a relation.")]
    async fn link_work_items(
        &self,
        Parameters(params): Parameters<LinkWorkItemsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let connection = self.connection().await?;
        let target_url = format!(
            "{}/{}/_apis/wit/workItems/{}",
            connection.urls().core,
            params.project,
            params.target_id
        );
        let url = format!(
            "{}/{}/_apis/wit/workitems/{}",
            connection.urls().core,
            params.project,
            params.id
        );
        let link_type = params
            .link_type
            .unwrap_or_else(|| "System.LinkTypes.Related".to_string());
        let document = json!([{
            "op": "add",
            "path": "/relations/-",
            "value": { "rel": link_type, "url": target_url },
        }]);
        let updated = connection
            .patch_document(&url, "7.1", &document)
            .await
            .map_err(helpers::map_client_err)?;
        Ok(CallToolResult::success(vec![Content::json(updated)?]))
    }
}
