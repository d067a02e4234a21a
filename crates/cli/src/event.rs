// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Account event payloads and their one-line rendering.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A resource, user, account or API client referenced by an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// One account event. Only `id` is required; every other field varies by
/// event source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub resource: Option<EventResource>,
    #[serde(default)]
    pub account: Option<EventResource>,
    #[serde(default)]
    pub affects: Option<Vec<EventResource>>,
    #[serde(default)]
    pub touches: Option<Vec<EventResource>>,
    #[serde(default)]
    pub user: Option<EventResource>,
    #[serde(default)]
    pub client: Option<EventResource>,
}

impl Event {
    pub fn resource_id(&self) -> Option<&str> {
        non_empty(self.resource.as_ref().and_then(|r| r.id.as_deref()))
    }

    pub fn user_email(&self) -> Option<&str> {
        non_empty(self.user.as_ref().and_then(|u| u.email.as_deref()))
    }

    pub fn client_id(&self) -> Option<&str> {
        non_empty(self.client.as_ref().and_then(|c| c.id.as_deref()))
    }

    pub fn affected_ids(&self) -> Vec<&str> {
        ids(self.affects.as_deref())
    }

    pub fn touched_ids(&self) -> Vec<&str> {
        ids(self.touches.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn ids(list: Option<&[EventResource]>) -> Vec<&str> {
    list.unwrap_or_default().iter().filter_map(|r| non_empty(r.id.as_deref())).collect()
}

pub fn decode(raw: &[u8]) -> Result<Event, DecodeError> {
    Ok(serde_json::from_slice(raw)?)
}

/// One-line summary, e.g. `<a@b.com> action:create resource:srv-1`.
///
/// `raw` is the undecoded payload, shown as ` event:<raw>` when the event
/// names no resource.
pub fn render(event: &Event, raw: &str) -> String {
    let mut line = String::new();
    if let Some(email) = event.user_email() {
        line.push_str(&format!("<{email}>"));
    }
    if let Some(client) = event.client_id() {
        line.push_str(&format!(" client:{client}"));
    }
    if let Some(action) = non_empty(event.action.as_deref()) {
        line.push_str(&format!(" action:{action}"));
    }
    let resource_id = event.resource_id();
    match resource_id {
        Some(id) => line.push_str(&format!(" resource:{id}")),
        None => line.push_str(&format!(" event:{raw}")),
    }
    if let Some(segment) = related("affects", &event.affected_ids(), resource_id) {
        line.push_str(&segment);
    }
    if let Some(segment) = related("touches", &event.touched_ids(), resource_id) {
        line.push_str(&segment);
    }
    line
}

/// ` <label>:<ids>` unless the list is empty or only names the event's own
/// resource.
fn related(label: &str, ids: &[&str], resource_id: Option<&str>) -> Option<String> {
    let show = match ids {
        [] => false,
        [only] => Some(*only) != resource_id,
        _ => true,
    };
    show.then(|| format!(" {label}:{}", ids.join(",")))
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
