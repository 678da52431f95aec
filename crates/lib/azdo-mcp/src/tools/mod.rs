//! MCP tool modules, one per Azure DevOps resource family.
//!
//! Every family is a `#[tool_router]` block on [`crate::AzdoMcp`]; omitting
//! a family's router from the merged catalog omits all of its tools for the
//! process lifetime.

mod advsec;
mod builds;
mod core;
mod releases;
mod repos;
mod search;
mod testplans;
mod wiki;
mod work;
mod workitems;
