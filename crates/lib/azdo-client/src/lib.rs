//! Azure DevOps client plumbing for azdo-mcp.
//!
//! Provides credential resolution (PAT, Azure CLI, and client-secret chains),
//! lazy construction of authenticated connections to an organization, and the
//! user-agent composer used for request attribution.

pub mod auth;
pub mod connection;
pub mod error;
mod useragent;

pub use useragent::UserAgentComposer;
