//! Credential resolution for Azure DevOps.
//!
//! Tokens are requested for the fixed Azure DevOps resource scope. Sources
//! are composed into a chain: an optional tenant-scoped Azure CLI credential
//! first, then the strategy's default source as fallback.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tokio::process::Command;

use crate::error::AuthError;

/// OAuth2 scope for Azure DevOps bearer tokens, the fixed resource id of the
/// Azure DevOps service principal.
pub const ADO_DEFAULT_SCOPE: &str = "499b84ac-1321-427f-aa17-267ca6975798/.default";

/// Tokens within this window of expiry are refreshed eagerly.
const EXPIRY_SLACK_SECS: i64 = 120;

/// A bearer token with its expiry, when the source reports one.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token is still usable without a refresh.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.expires_on.is_none_or(|expires_on| {
            expires_on - TimeDelta::seconds(EXPIRY_SLACK_SECS) > Utc::now()
        })
    }
}

/// A source of Azure DevOps bearer tokens.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Short source name used in chain-exhaustion diagnostics.
    fn name(&self) -> &'static str;

    /// Requests a token for the given scope.
    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError>;
}

/// Which default credential source backs the chain.
///
/// Selected by `ADO_MCP_AZURE_TOKEN_CREDENTIALS`; anything other than `prod`
/// falls back to the developer-workstation CLI source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialStrategy {
    #[default]
    Dev,
    Prod,
}

impl CredentialStrategy {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.eq_ignore_ascii_case("prod") => Self::Prod,
            _ => Self::Dev,
        }
    }
}

/// Shells out to `az account get-access-token`, optionally tenant-scoped.
#[derive(Debug, Default)]
pub struct AzureCliCredential {
    tenant_id: Option<String>,
}

#[derive(Deserialize)]
struct CliTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expires_on")]
    expires_on: Option<i64>,
}

impl AzureCliCredential {
    #[must_use]
    pub const fn new() -> Self {
        Self { tenant_id: None }
    }

    #[must_use]
    pub fn for_tenant(tenant_id: &str) -> Self {
        Self {
            tenant_id: Some(tenant_id.to_string()),
        }
    }
}

#[async_trait]
impl TokenCredential for AzureCliCredential {
    fn name(&self) -> &'static str {
        "azure-cli"
    }

    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        // `az` wants the bare resource id, not the OAuth2 scope form.
        let resource = scope.strip_suffix("/.default").unwrap_or(scope);
        let program = if cfg!(windows) { "az.cmd" } else { "az" };

        let mut command = Command::new(program);
        command.args([
            "account",
            "get-access-token",
            "--resource",
            resource,
            "--output",
            "json",
        ]);
        if let Some(tenant_id) = &self.tenant_id {
            command.args(["--tenant", tenant_id]);
        }

        let output = command
            .output()
            .await
            .map_err(|err| AuthError::Unavailable(format!("cannot run {program}: {err}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::Cli(stderr.trim().to_string()));
        }

        let response: CliTokenResponse = serde_json::from_slice(&output.stdout)
            .map_err(|err| AuthError::Malformed(err.to_string()))?;
        Ok(AccessToken {
            token: response.access_token,
            expires_on: response
                .expires_on
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

/// OAuth2 client-credentials flow against the Microsoft identity platform.
pub struct ClientSecretCredential {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct ClientSecretTokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

impl ClientSecretCredential {
    #[must_use]
    pub fn new(tenant_id: String, client_id: String, client_secret: String) -> Self {
        Self {
            tenant_id,
            client_id,
            client_secret,
            http: reqwest::Client::new(),
        }
    }

    /// Assembles the credential from the conventional `AZURE_*` triple, when
    /// all three are present.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let tenant_id = std::env::var("AZURE_TENANT_ID").ok()?;
        let client_id = std::env::var("AZURE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("AZURE_CLIENT_SECRET").ok()?;
        Some(Self::new(tenant_id, client_id, client_secret))
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    fn name(&self) -> &'static str {
        "client-secret"
    }

    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.tenant_id
        );
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|err| AuthError::Endpoint(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Endpoint(format!("HTTP {status}: {body}")));
        }

        let token: ClientSecretTokenResponse = response
            .json()
            .await
            .map_err(|err| AuthError::Malformed(err.to_string()))?;
        Ok(AccessToken {
            token: token.access_token,
            expires_on: token
                .expires_in
                .map(|secs| Utc::now() + TimeDelta::seconds(secs)),
        })
    }
}

/// Tries each source in order and returns the first token produced.
pub struct ChainedTokenCredential {
    sources: Vec<Arc<dyn TokenCredential>>,
}

impl ChainedTokenCredential {
    #[must_use]
    pub const fn new(sources: Vec<Arc<dyn TokenCredential>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl TokenCredential for ChainedTokenCredential {
    fn name(&self) -> &'static str {
        "chained"
    }

    async fn get_token(&self, scope: &str) -> Result<AccessToken, AuthError> {
        let mut failures = Vec::new();
        for source in &self.sources {
            match source.get_token(scope).await {
                Ok(token) => return Ok(token),
                Err(err) => {
                    tracing::debug!(source = source.name(), error = %err, "credential source failed");
                    failures.push(format!("{}: {err}", source.name()));
                }
            }
        }
        if failures.is_empty() {
            failures.push("no credential sources configured".to_string());
        }
        Err(AuthError::ChainExhausted(failures.join("; ")))
    }
}

/// Builds the credential chain for a process.
///
/// A supplied tenant id prepends a tenant-scoped CLI credential so the
/// tenant-scoped source is tried first and the strategy's default source is
/// the fallback.
#[must_use]
pub fn credential_chain(
    strategy: CredentialStrategy,
    tenant_id: Option<&str>,
) -> ChainedTokenCredential {
    let mut sources: Vec<Arc<dyn TokenCredential>> = Vec::new();
    if let Some(tenant_id) = tenant_id {
        sources.push(Arc::new(AzureCliCredential::for_tenant(tenant_id)));
    }
    match strategy {
        CredentialStrategy::Dev => sources.push(Arc::new(AzureCliCredential::new())),
        CredentialStrategy::Prod => {
            if let Some(credential) = ClientSecretCredential::from_env() {
                sources.push(Arc::new(credential));
            }
        }
    }
    ChainedTokenCredential::new(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCredential {
        name: &'static str,
        token: Result<&'static str, &'static str>,
    }

    #[async_trait]
    impl TokenCredential for FixedCredential {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn get_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
            match self.token {
                Ok(token) => Ok(AccessToken {
                    token: token.to_string(),
                    expires_on: None,
                }),
                Err(message) => Err(AuthError::Unavailable(message.to_string())),
            }
        }
    }

    #[test]
    fn strategy_defaults_to_dev() {
        assert_eq!(CredentialStrategy::parse(None), CredentialStrategy::Dev);
        assert_eq!(
            CredentialStrategy::parse(Some("dev")),
            CredentialStrategy::Dev
        );
        assert_eq!(
            CredentialStrategy::parse(Some("something-else")),
            CredentialStrategy::Dev
        );
        assert_eq!(
            CredentialStrategy::parse(Some("PROD")),
            CredentialStrategy::Prod
        );
    }

    #[test]
    fn token_without_expiry_is_fresh() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_on: None,
        };
        assert!(token.is_fresh());
    }

    #[test]
    fn token_near_expiry_is_stale() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_on: Some(Utc::now() + TimeDelta::seconds(30)),
        };
        assert!(!token.is_fresh());
    }

    #[tokio::test]
    async fn chain_returns_first_success() {
        let chain = ChainedTokenCredential::new(vec![
            Arc::new(FixedCredential {
                name: "first",
                token: Err("not signed in"),
            }),
            Arc::new(FixedCredential {
                name: "second",
                token: Ok("fallback-token"),
            }),
        ]);
        let token = chain.get_token(ADO_DEFAULT_SCOPE).await.expect("token");
        assert_eq!(token.token, "fallback-token");
    }

    #[tokio::test]
    async fn chain_reports_every_exhausted_source() {
        let chain = ChainedTokenCredential::new(vec![
            Arc::new(FixedCredential {
                name: "first",
                token: Err("no login"),
            }),
            Arc::new(FixedCredential {
                name: "second",
                token: Err("no identity"),
            }),
        ]);
        let err = chain
            .get_token(ADO_DEFAULT_SCOPE)
            .await
            .expect_err("chain must fail");
        let message = err.to_string();
        assert!(message.contains("first"));
        assert!(message.contains("second"));
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let chain = ChainedTokenCredential::new(Vec::new());
        assert!(chain.get_token(ADO_DEFAULT_SCOPE).await.is_err());
    }

    #[test]
    fn tenant_scoped_chain_tries_cli_first() {
        let chain = credential_chain(CredentialStrategy::Dev, Some("tenant-a"));
        assert_eq!(chain.sources.len(), 2);
        assert_eq!(chain.sources[0].name(), "azure-cli");
    }
}
