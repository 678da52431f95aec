use std::sync::OnceLock;

/// Composes the user-agent string attached to backing-platform requests.
///
/// Starts as the bare product identifier and, once the MCP client has
/// introduced itself during `initialize`, carries its name and version for
/// request attribution. The client segment is recorded at most once.
pub struct UserAgentComposer {
    base: String,
    client_info: OnceLock<String>,
}

impl UserAgentComposer {
    #[must_use]
    pub fn new(product_version: &str) -> Self {
        Self {
            base: format!("AzureDevOps.MCP/{product_version}"),
            client_info: OnceLock::new(),
        }
    }

    /// Records the connecting MCP client's declared name and version.
    pub fn append_mcp_client_info(&self, name: &str, version: &str) {
        let _ = self.client_info.set(format!("{name}/{version}"));
    }

    #[must_use]
    pub fn user_agent(&self) -> String {
        match self.client_info.get() {
            Some(client) => format!("{client} {}", self.base),
            None => self.base.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_product_only() {
        let composer = UserAgentComposer::new("1.2.3");
        assert_eq!(composer.user_agent(), "AzureDevOps.MCP/1.2.3");
    }

    #[test]
    fn incorporates_client_info_once_known() {
        let composer = UserAgentComposer::new("1.2.3");
        composer.append_mcp_client_info("some-agent", "9.0");
        assert_eq!(composer.user_agent(), "some-agent/9.0 AzureDevOps.MCP/1.2.3");
    }

    #[test]
    fn first_client_info_wins() {
        let composer = UserAgentComposer::new("1.2.3");
        composer.append_mcp_client_info("first", "1");
        composer.append_mcp_client_info("second", "2");
        assert_eq!(composer.user_agent(), "first/1 AzureDevOps.MCP/1.2.3");
    }
}
