//! Connection provider behavior that must hold without any network access.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use azdo_client::UserAgentComposer;
use azdo_client::auth::{AccessToken, TokenCredential};
use azdo_client::connection::ConnectionProvider;
use azdo_client::error::AuthError;

struct CountingCredential {
    calls: AtomicUsize,
}

impl CountingCredential {
    const fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenCredential for CountingCredential {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn get_token(&self, _scope: &str) -> Result<AccessToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken {
            token: "resolved-token".to_string(),
            expires_on: None,
        })
    }
}

fn provider_with(
    pat: Option<&str>,
    credential: Arc<CountingCredential>,
) -> ConnectionProvider {
    ConnectionProvider::new(
        "contoso",
        pat.map(ToString::to_string),
        credential,
        Arc::new(UserAgentComposer::new("0.0.0-test")),
    )
}

#[tokio::test]
async fn pat_bypasses_the_credential_chain() {
    let credential = Arc::new(CountingCredential::new());
    let provider = provider_with(Some("secret-pat"), Arc::clone(&credential));

    provider.provide().await.expect("connection");
    provider.provide().await.expect("connection");

    assert_eq!(credential.calls(), 0);
}

#[tokio::test]
async fn bearer_token_is_resolved_lazily_and_cached() {
    let credential = Arc::new(CountingCredential::new());
    let provider = provider_with(None, Arc::clone(&credential));
    assert_eq!(credential.calls(), 0);

    provider.provide().await.expect("connection");
    assert_eq!(credential.calls(), 1);

    // A fresh cached token is reused across subsequent connections.
    provider.provide().await.expect("connection");
    assert_eq!(credential.calls(), 1);
}
