//! Lazy construction of authenticated Azure DevOps connections.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::UserAgentComposer;
use crate::auth::{ADO_DEFAULT_SCOPE, AccessToken, TokenCredential};
use crate::error::{AuthError, ClientError};

const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";

/// Service base URLs for one organization. Several resource families live on
/// dedicated hosts.
#[derive(Debug, Clone)]
pub struct OrgUrls {
    pub core: String,
    pub search: String,
    pub advsec: String,
    pub release: String,
}

impl OrgUrls {
    #[must_use]
    pub fn for_organization(organization: &str) -> Self {
        Self {
            core: format!("https://dev.azure.com/{organization}"),
            search: format!("https://almsearch.dev.azure.com/{organization}"),
            advsec: format!("https://advsec.dev.azure.com/{organization}"),
            release: format!("https://vsrm.dev.azure.com/{organization}"),
        }
    }
}

#[derive(Clone)]
enum AuthScheme {
    Pat(String),
    Bearer(String),
}

/// Hands out authenticated [`Connection`]s.
///
/// Construction is cheap; nothing touches the network until a bearer token is
/// actually needed. With a PAT configured the credential chain is never
/// invoked. The cached token is the only shared mutable state; a refresh race
/// at worst resolves the token twice.
pub struct ConnectionProvider {
    urls: OrgUrls,
    pat: Option<String>,
    credential: Arc<dyn TokenCredential>,
    user_agent: Arc<UserAgentComposer>,
    http: reqwest::Client,
    cached: RwLock<Option<AccessToken>>,
}

impl ConnectionProvider {
    #[must_use]
    pub fn new(
        organization: &str,
        pat: Option<String>,
        credential: Arc<dyn TokenCredential>,
        user_agent: Arc<UserAgentComposer>,
    ) -> Self {
        Self {
            urls: OrgUrls::for_organization(organization),
            pat,
            credential,
            user_agent,
            http: reqwest::Client::new(),
            cached: RwLock::new(None),
        }
    }

    /// Produces a connection bound to the organization, resolving a bearer
    /// token first unless a PAT is configured.
    ///
    /// # Errors
    /// Returns [`AuthError`] when no credential source can produce a token.
    pub async fn provide(&self) -> Result<Connection, AuthError> {
        let auth = if let Some(pat) = &self.pat {
            AuthScheme::Pat(pat.clone())
        } else {
            AuthScheme::Bearer(self.bearer_token().await?)
        };
        Ok(Connection {
            urls: self.urls.clone(),
            auth,
            http: self.http.clone(),
            user_agent: self.user_agent.user_agent(),
        })
    }

    async fn bearer_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_fresh() {
                    return Ok(token.token.clone());
                }
            }
        }

        tracing::debug!("resolving Azure DevOps bearer token");
        let token = self.credential.get_token(ADO_DEFAULT_SCOPE).await?;
        let value = token.token.clone();
        *self.cached.write().await = Some(token);
        Ok(value)
    }
}

/// An authenticated handle to one organization's REST surface.
#[derive(Clone)]
pub struct Connection {
    urls: OrgUrls,
    auth: AuthScheme,
    http: reqwest::Client,
    user_agent: String,
}

impl Connection {
    #[must_use]
    pub const fn urls(&self) -> &OrgUrls {
        &self.urls
    }

    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn get_json(&self, url: &str, api_version: &str) -> Result<Value, ClientError> {
        self.get_json_with(url, api_version, &[]).await
    }

    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn get_json_with(
        &self,
        url: &str,
        api_version: &str,
        query: &[(&str, String)],
    ) -> Result<Value, ClientError> {
        let builder = self.http.get(url).query(query);
        self.send("GET", builder, url, api_version).await
    }

    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn post_json(
        &self,
        url: &str,
        api_version: &str,
        body: &Value,
    ) -> Result<Value, ClientError> {
        let builder = self.http.post(url).json(body);
        self.send("POST", builder, url, api_version).await
    }

    /// POST of a JSON-patch document, as work-item creation requires.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn post_patch_document(
        &self,
        url: &str,
        api_version: &str,
        document: &Value,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_string(document)?;
        let builder = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body);
        self.send("POST", builder, url, api_version).await
    }

    /// PATCH of a JSON-patch document, as work-item updates require.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn patch_document(
        &self,
        url: &str,
        api_version: &str,
        document: &Value,
    ) -> Result<Value, ClientError> {
        let body = serde_json::to_string(document)?;
        let builder = self
            .http
            .patch(url)
            .header(CONTENT_TYPE, JSON_PATCH_CONTENT_TYPE)
            .body(body);
        self.send("PATCH", builder, url, api_version).await
    }

    /// Fetches a plain-text payload, such as a build log.
    ///
    /// # Errors
    /// Returns [`ClientError`] on transport failure or a non-success status.
    pub async fn get_text(&self, url: &str, api_version: &str) -> Result<String, ClientError> {
        let builder = self.prepare(self.http.get(url), api_version);
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                method: "GET",
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }

    async fn send(
        &self,
        method: &'static str,
        builder: reqwest::RequestBuilder,
        url: &str,
        api_version: &str,
    ) -> Result<Value, ClientError> {
        let builder = self.prepare(builder, api_version);
        let response = builder
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        response.json().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }

    fn prepare(
        &self,
        builder: reqwest::RequestBuilder,
        api_version: &str,
    ) -> reqwest::RequestBuilder {
        let builder = builder
            .query(&[("api-version", api_version)])
            .header(USER_AGENT, self.user_agent.as_str());
        match &self.auth {
            AuthScheme::Pat(pat) => builder.basic_auth("", Some(pat)),
            AuthScheme::Bearer(token) => builder.bearer_auth(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_urls_cover_every_service_host() {
        let urls = OrgUrls::for_organization("contoso");
        assert_eq!(urls.core, "https://dev.azure.com/contoso");
        assert_eq!(urls.search, "https://almsearch.dev.azure.com/contoso");
        assert_eq!(urls.advsec, "https://advsec.dev.azure.com/contoso");
        assert_eq!(urls.release, "https://vsrm.dev.azure.com/contoso");
    }
}
