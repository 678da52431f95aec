//! Operating-mode derivation and the read-only allow-list prune.

use std::error::Error;
use std::fmt;

use rmcp::handler::server::tool::ToolRouter;

/// Tool names permitted in read-only mode. Never mutated at runtime.
pub const READ_ONLY_TOOLS: [&str; 10] = [
    "list_my_work_items",
    "list_backlogs",
    "list_backlog_work_items",
    "get_work_item",
    "get_work_items_batch",
    "list_work_item_comments",
    "get_work_items_for_iteration",
    "get_work_item_type",
    "get_query",
    "get_query_results",
];

/// Coarse access-control level, computed once per process before any tool is
/// registered. Reviewer currently shares the full registration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Full,
    ReadOnly,
    Reviewer,
}

/// The submitted API key matched neither reference key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeError;

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid or missing MCP API key")
    }
}

impl Error for ModeError {}

/// Derives the operating mode by comparing the submitted API key against the
/// two reference keys. Pure; empty or absent values never match.
///
/// # Errors
/// Returns [`ModeError`] when the submitted key matches neither reference.
pub fn derive_mode(
    submitted: Option<&str>,
    read_only_reference: Option<&str>,
    reviewer_reference: Option<&str>,
) -> Result<Mode, ModeError> {
    let Some(submitted) = submitted.filter(|key| !key.is_empty()) else {
        return Err(ModeError);
    };
    let matches = |reference: Option<&str>| {
        reference.is_some_and(|reference| !reference.is_empty() && reference == submitted)
    };
    if matches(read_only_reference) {
        Ok(Mode::ReadOnly)
    } else if matches(reviewer_reference) {
        Ok(Mode::Reviewer)
    } else {
        Err(ModeError)
    }
}

/// Removes every registered tool whose name is not in the allow-list.
///
/// This is a second enforcement layer beyond registering only the read-only
/// family in the first place: it also holds if a future change registers
/// write tools inside that family. Idempotent.
pub fn restrict_to_allow_list<S>(router: &mut ToolRouter<S>, allow: &[&str])
where
    S: Send + Sync + 'static,
{
    let registered: Vec<String> = router
        .list_all()
        .into_iter()
        .map(|tool| tool.name.into_owned())
        .collect();
    for name in registered {
        if !allow.contains(&name.as_str()) {
            router.remove_route(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_key_selects_read_only_mode() {
        let mode = derive_mode(Some("alpha"), Some("alpha"), Some("beta"));
        assert_eq!(mode, Ok(Mode::ReadOnly));
    }

    #[test]
    fn reviewer_key_selects_reviewer_mode() {
        let mode = derive_mode(Some("beta"), Some("alpha"), Some("beta"));
        assert_eq!(mode, Ok(Mode::Reviewer));
    }

    #[test]
    fn read_only_reference_wins_when_both_match() {
        let mode = derive_mode(Some("same"), Some("same"), Some("same"));
        assert_eq!(mode, Ok(Mode::ReadOnly));
    }

    #[test]
    fn unmatched_key_is_rejected() {
        assert_eq!(
            derive_mode(Some("other"), Some("alpha"), Some("beta")),
            Err(ModeError)
        );
    }

    #[test]
    fn missing_key_is_rejected() {
        assert_eq!(derive_mode(None, Some("alpha"), Some("beta")), Err(ModeError));
    }

    #[test]
    fn empty_values_never_match() {
        assert_eq!(derive_mode(Some(""), Some(""), Some("beta")), Err(ModeError));
        assert_eq!(derive_mode(Some("alpha"), None, None), Err(ModeError));
    }
}
