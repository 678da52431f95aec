use clap::Parser;
use std::error::Error;
use std::fmt;

use azdo_client::auth::CredentialStrategy;
use azdo_mcp::gate::{self, Mode};

#[derive(Parser, Debug)]
#[command(name = "azdo-mcpd", version, about = "Azure DevOps MCP server.")]
struct CliArgs {
    /// Azure DevOps organization name.
    #[arg(env = "ADO_ORGANIZATION")]
    organization: Option<String>,

    /// Azure tenant id, for multi-tenant sign-in scenarios.
    #[arg(short, long)]
    tenant: Option<String>,

    /// Personal access token; bypasses the identity-provider token flow.
    #[arg(long, env = "ADO_PAT", hide_env_values = true)]
    pat: Option<String>,

    /// Credential-selection strategy for the identity-provider flow.
    #[arg(long, env = "ADO_MCP_AZURE_TOKEN_CREDENTIALS")]
    token_credentials: Option<String>,

    #[arg(long, env = "MCP_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "MCP_API_KEY_READ_ONLY", hide_env_values = true)]
    api_key_read_only: Option<String>,

    #[arg(long, env = "MCP_API_KEY_REVIEWER", hide_env_values = true)]
    api_key_reviewer: Option<String>,
}

/// Immutable process configuration, assembled once at startup. No other
/// component reads the environment directly.
#[derive(Debug, Clone)]
pub struct AzdoConfig {
    pub organization: String,
    pub tenant_id: Option<String>,
    pub pat: Option<String>,
    pub credential_strategy: CredentialStrategy,
    pub mode: Mode,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingOrganization,
    InvalidApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOrganization => f.write_str(
                "organization name must be provided via argument or ADO_ORGANIZATION",
            ),
            Self::InvalidApiKey => f.write_str("invalid or missing MCP_API_KEY"),
        }
    }
}

impl Error for ConfigError {}

impl AzdoConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for AzdoConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let organization = args
            .organization
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingOrganization)?;

        // The mode is settled before any tool can be registered.
        let mode = gate::derive_mode(
            args.api_key.as_deref(),
            args.api_key_read_only.as_deref(),
            args.api_key_reviewer.as_deref(),
        )
        .map_err(|_| ConfigError::InvalidApiKey)?;

        let pat = args.pat.filter(|value| !value.trim().is_empty());

        Ok(Self {
            organization,
            tenant_id: args.tenant,
            pat,
            credential_strategy: CredentialStrategy::parse(args.token_credentials.as_deref()),
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            organization: Some("contoso".to_string()),
            tenant: None,
            pat: None,
            token_credentials: None,
            api_key: Some("ro-key".to_string()),
            api_key_read_only: Some("ro-key".to_string()),
            api_key_reviewer: Some("rev-key".to_string()),
        }
    }

    #[test]
    fn missing_organization_is_fatal() {
        let mut args = base_args();
        args.organization = None;

        let err = AzdoConfig::try_from(args).expect_err("config must fail");

        assert!(matches!(err, ConfigError::MissingOrganization));
        assert!(err.to_string().contains("organization"));
    }

    #[test]
    fn blank_organization_is_fatal() {
        let mut args = base_args();
        args.organization = Some("   ".to_string());

        assert!(matches!(
            AzdoConfig::try_from(args),
            Err(ConfigError::MissingOrganization)
        ));
    }

    #[test]
    fn read_only_key_yields_read_only_mode() {
        let config = AzdoConfig::try_from(base_args()).expect("config should parse");
        assert_eq!(config.mode, Mode::ReadOnly);
    }

    #[test]
    fn reviewer_key_yields_reviewer_mode() {
        let mut args = base_args();
        args.api_key = Some("rev-key".to_string());

        let config = AzdoConfig::try_from(args).expect("config should parse");

        assert_eq!(config.mode, Mode::Reviewer);
    }

    #[test]
    fn unmatched_key_fails_before_any_registration() {
        let mut args = base_args();
        args.api_key = Some("unknown".to_string());

        assert!(matches!(
            AzdoConfig::try_from(args),
            Err(ConfigError::InvalidApiKey)
        ));
    }

    #[test]
    fn blank_pat_is_treated_as_absent() {
        let mut args = base_args();
        args.pat = Some("  ".to_string());

        let config = AzdoConfig::try_from(args).expect("config should parse");

        assert!(config.pat.is_none());
    }
}
