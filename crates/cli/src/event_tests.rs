// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;
use serde_json::json;

use super::{decode, render};

fn rendered(payload: serde_json::Value) -> anyhow::Result<String> {
    let raw = payload.to_string();
    let event = decode(raw.as_bytes())?;
    Ok(render(&event, &raw))
}

#[test]
fn user_action_resource() -> anyhow::Result<()> {
    let line = rendered(json!({
        "id": "evt-1",
        "action": "create",
        "resource": {"id": "srv-1"},
        "user": {"email": "a@b.com"},
    }))?;
    assert_eq!(line, "<a@b.com> action:create resource:srv-1");
    Ok(())
}

#[test]
fn client_segment() -> anyhow::Result<()> {
    let line = rendered(json!({
        "id": "evt-1",
        "action": "reboot",
        "resource": {"id": "srv-1", "name": "web"},
        "client": {"id": "cli-abc12"},
    }))?;
    assert_eq!(line, " client:cli-abc12 action:reboot resource:srv-1");
    Ok(())
}

#[test]
fn id_only_falls_back_to_raw_payload() -> anyhow::Result<()> {
    let raw = r#"{"id":"evt-9"}"#;
    let event = decode(raw.as_bytes())?;
    assert_eq!(render(&event, raw), r#" event:{"id":"evt-9"}"#);
    Ok(())
}

#[yare::parameterized(
    self_reference   = { json!([{"id": "srv-1"}]), "" },
    other_single     = { json!([{"id": "srv-2"}]), " affects:srv-2" },
    two_entries      = { json!([{"id": "srv-1"}, {"id": "srv-2"}]), " affects:srv-1,srv-2" },
    empty_list       = { json!([]), "" },
    null_list        = { json!(null), "" },
)]
fn affects_segment(affects: serde_json::Value, expected_suffix: &str) {
    let line = rendered(json!({
        "id": "evt-1",
        "action": "update",
        "resource": {"id": "srv-1"},
        "affects": affects,
    }))
    .unwrap_or_default();
    assert_eq!(line, format!(" action:update resource:srv-1{expected_suffix}"));
}

#[test]
fn touches_follow_affects() -> anyhow::Result<()> {
    let line = rendered(json!({
        "id": "evt-1",
        "action": "map",
        "resource": {"id": "cip-1"},
        "affects": [{"id": "cip-1"}, {"id": "srv-1"}],
        "touches": [{"id": "int-1"}],
    }))?;
    assert_eq!(line, " action:map resource:cip-1 affects:cip-1,srv-1 touches:int-1");
    Ok(())
}

#[test]
fn single_related_entry_without_resource_is_shown() -> anyhow::Result<()> {
    let line = rendered(json!({"id": "evt-1", "touches": [{"id": "grp-1"}]}))?;
    assert!(line.ends_with(" touches:grp-1"), "{line}");
    Ok(())
}

#[test]
fn empty_strings_are_absent() -> anyhow::Result<()> {
    let line = rendered(json!({
        "id": "evt-1",
        "action": "",
        "resource": {"id": "srv-1"},
        "user": {"email": ""},
        "client": {"id": ""},
    }))?;
    assert_eq!(line, " resource:srv-1");
    Ok(())
}

#[test]
fn tolerates_unknown_and_null_fields() -> anyhow::Result<()> {
    let line = rendered(json!({
        "id": "evt-1",
        "state": "active",
        "account": {"id": "acc-1", "name": "Acme"},
        "resource": null,
        "user": null,
        "extra": {"nested": [1, 2, 3]},
    }))?;
    assert!(line.starts_with(" event:"), "{line}");
    Ok(())
}

#[yare::parameterized(
    not_json   = { b"not json" },
    no_id      = { br#"{"action":"create"}"# },
    wrong_type = { br#"{"id":"evt-1","affects":"srv-1"}"# },
    array      = { b"[]" },
)]
fn malformed_payloads_fail(raw: &[u8]) {
    assert!(decode(raw).is_err());
}

proptest! {
    #[test]
    fn render_never_panics_on_sparse_events(
        id in "[a-z0-9-]{1,12}",
        action in proptest::option::of("[a-z_]{0,10}"),
        resource in proptest::option::of("[a-z0-9-]{0,10}"),
        affects in proptest::collection::vec("[a-z0-9-]{0,10}", 0..4),
    ) {
        let payload = json!({
            "id": id,
            "action": action,
            "resource": resource.as_ref().map(|r| json!({"id": r})),
            "affects": affects.iter().map(|a| json!({"id": a})).collect::<Vec<_>>(),
        });
        let raw = payload.to_string();
        let event = decode(raw.as_bytes()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let line = render(&event, &raw);
        let has_resource = resource.as_deref().is_some_and(|r| !r.is_empty());
        prop_assert_eq!(line.contains(" resource:"), has_resource);
        prop_assert_eq!(line.contains(" event:"), !has_resource);
    }
}
