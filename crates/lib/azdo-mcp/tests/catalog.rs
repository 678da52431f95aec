//! Catalog composition and mode-gating behavior.

use std::collections::BTreeSet;
use std::sync::Arc;

use azdo_client::UserAgentComposer;
use azdo_client::auth::{CredentialStrategy, credential_chain};
use azdo_client::connection::ConnectionProvider;
use azdo_mcp::AzdoMcp;
use azdo_mcp::gate::{self, Mode, READ_ONLY_TOOLS};

fn service(mode: Mode) -> AzdoMcp {
    let user_agent = Arc::new(UserAgentComposer::new("0.0.0-test"));
    let credential = credential_chain(CredentialStrategy::Dev, None);
    let provider = Arc::new(ConnectionProvider::new(
        "contoso",
        Some("test-pat".to_string()),
        Arc::new(credential),
        Arc::clone(&user_agent),
    ));
    AzdoMcp::new(mode, provider, user_agent)
}

fn name_set(service: &AzdoMcp) -> BTreeSet<String> {
    service.tool_names().into_iter().collect()
}

#[test]
fn read_only_catalog_is_exactly_the_allow_list() {
    let service = service(Mode::ReadOnly);
    let expected: BTreeSet<String> =
        READ_ONLY_TOOLS.iter().map(ToString::to_string).collect();
    assert_eq!(name_set(&service), expected);
}

#[test]
fn read_only_catalog_excludes_work_item_write_tools() {
    let service = service(Mode::ReadOnly);
    let names = name_set(&service);
    // These were registered by the work-item family and must be pruned.
    for write_tool in [
        "create_work_item",
        "update_work_item",
        "add_work_item_comment",
        "link_work_items",
    ] {
        assert!(!names.contains(write_tool), "{write_tool} must be pruned");
    }
}

#[test]
fn full_catalog_covers_every_resource_family() {
    let service = service(Mode::Full);
    let names = name_set(&service);
    for representative in [
        "get_work_item",
        "list_projects",
        "list_team_iterations",
        "list_builds",
        "list_repositories",
        "list_releases",
        "list_wikis",
        "list_test_plans",
        "search_code",
        "list_alerts",
    ] {
        assert!(names.contains(representative), "missing {representative}");
    }
}

#[test]
fn reviewer_catalog_matches_full_catalog() {
    assert_eq!(name_set(&service(Mode::Reviewer)), name_set(&service(Mode::Full)));
}

#[test]
fn full_catalog_is_strictly_larger_than_read_only() {
    let full = name_set(&service(Mode::Full));
    let read_only = name_set(&service(Mode::ReadOnly));
    assert!(read_only.is_subset(&full));
    assert!(full.len() > read_only.len());
}

#[test]
fn allow_list_prune_is_idempotent() {
    let mut router = AzdoMcp::tool_router_workitems();
    gate::restrict_to_allow_list(&mut router, &READ_ONLY_TOOLS);
    let after_first: BTreeSet<String> = router
        .list_all()
        .into_iter()
        .map(|tool| tool.name.into_owned())
        .collect();

    gate::restrict_to_allow_list(&mut router, &READ_ONLY_TOOLS);
    let after_second: BTreeSet<String> = router
        .list_all()
        .into_iter()
        .map(|tool| tool.name.into_owned())
        .collect();

    assert_eq!(after_first, after_second);
}

#[test]
fn prune_empties_a_family_with_no_allow_listed_tools() {
    let mut router = AzdoMcp::tool_router_builds();
    gate::restrict_to_allow_list(&mut router, &READ_ONLY_TOOLS);
    assert!(router.list_all().is_empty());
}
