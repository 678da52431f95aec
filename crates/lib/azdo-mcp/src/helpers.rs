use std::borrow::Cow;

use azdo_client::error::ClientError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

/// Maps a backing-platform failure into the protocol error channel. Nothing
/// here is allowed to take down the transport loop.
pub fn map_client_err(err: ClientError) -> ErrorData {
    match err.status() {
        Some(404) => mcp_err(ErrorCode::RESOURCE_NOT_FOUND, err.to_string()),
        Some(401 | 403) => mcp_err(ErrorCode::INVALID_REQUEST, err.to_string()),
        _ => mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()),
    }
}
