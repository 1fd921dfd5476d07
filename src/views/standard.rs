//! The views the platform queries. Documents are told apart by their `type` field.

use serde_json::{json, Value};

use super::View;
use crate::address::ViewName;

pub fn views() -> Vec<View> {
    vec![
        View::new(ViewName::new("members", "allNames"), members_all_names),
        View::new(ViewName::new("members", "byUsername"), members_by_username),
        View::counted(ViewName::new("followers", "perMember"), followers_per_member),
        View::counted(
            ViewName::new("followers", "perFollower"),
            followers_per_follower,
        ),
        View::counted(ViewName::new("stars", "perItem"), stars_per_item),
        View::counted(
            ViewName::new("subscriptions", "perItem"),
            subscriptions_per_item,
        ),
        View::counted(
            ViewName::new("classifications", "perTag"),
            classifications_per_tag,
        ),
        View::new(
            ViewName::new("revisions", "perUnversionId"),
            revisions_per_unversion_id,
        ),
        View::counted(ViewName::new("revisions", "perState"), revisions_per_state),
        View::counted(ViewName::new("badges", "perMember"), badges_per_member),
        View::new(ViewName::new("tags", "byName"), tags_by_name),
    ]
}

fn is_type(doc: &Value, typ: &str) -> bool {
    doc.get("type").and_then(Value::as_str) == Some(typ)
}

fn field<'a>(doc: &'a Value, name: &str) -> Option<&'a Value> {
    doc.get(name).filter(|v| !v.is_null())
}

fn id(doc: &Value) -> Value {
    doc.get("_id").cloned().unwrap_or(Value::Null)
}

/// Emits `[a, b]` when both fields are present.
fn pair(doc: &Value, typ: &str, a: &str, b: &str, value: Value) -> Vec<(Value, Value)> {
    if !is_type(doc, typ) {
        return vec![];
    }

    match (field(doc, a), field(doc, b)) {
        (Some(a), Some(b)) => vec![(json!([a, b]), value)],
        _ => vec![],
    }
}

fn members_all_names(doc: &Value) -> Vec<(Value, Value)> {
    if !is_type(doc, "member") {
        return vec![];
    }

    vec![(id(doc), json!([doc["username"], doc["email"]]))]
}

fn members_by_username(doc: &Value) -> Vec<(Value, Value)> {
    match field(doc, "username") {
        Some(username) if is_type(doc, "member") => vec![(username.clone(), id(doc))],
        _ => vec![],
    }
}

fn followers_per_member(doc: &Value) -> Vec<(Value, Value)> {
    pair(doc, "follower", "memberId", "followerId", Value::Null)
}

fn followers_per_follower(doc: &Value) -> Vec<(Value, Value)> {
    pair(doc, "follower", "followerId", "memberId", Value::Null)
}

fn stars_per_item(doc: &Value) -> Vec<(Value, Value)> {
    pair(doc, "star", "itemId", "userId", Value::Null)
}

fn subscriptions_per_item(doc: &Value) -> Vec<(Value, Value)> {
    pair(doc, "subscription", "itemId", "userId", Value::Null)
}

fn classifications_per_tag(doc: &Value) -> Vec<(Value, Value)> {
    let post_type = doc.get("postType").cloned().unwrap_or(Value::Null);
    pair(doc, "classification", "tagId", "postId", post_type)
}

fn revision_fields(doc: &Value) -> Option<(&Value, &Value)> {
    Some((field(doc, "unversionId")?, field(doc, "versionNumber")?))
}

fn revisions_per_unversion_id(doc: &Value) -> Vec<(Value, Value)> {
    let Some((unversion_id, version_number)) = revision_fields(doc) else {
        return vec![];
    };

    let summary = json!({
        "versionNumber": version_number,
        "previousVersionNumber": doc.get("previousVersionNumber"),
        "state": doc.get("state"),
        "creatorId": doc.get("creatorId"),
        "editSummary": doc.get("editSummary"),
    });

    vec![(json!([unversion_id, version_number]), summary)]
}

fn revisions_per_state(doc: &Value) -> Vec<(Value, Value)> {
    let Some((unversion_id, _)) = revision_fields(doc) else {
        return vec![];
    };

    match field(doc, "state") {
        Some(state) => vec![(
            json!([state, doc.get("moderatedAt")]),
            unversion_id.clone(),
        )],
        None => vec![],
    }
}

fn badges_per_member(doc: &Value) -> Vec<(Value, Value)> {
    let metal = doc.get("metal").cloned().unwrap_or(Value::Null);
    pair(doc, "badge", "memberId", "name", metal)
}

fn tags_by_name(doc: &Value) -> Vec<(Value, Value)> {
    match field(doc, "name") {
        Some(name) if is_type(doc, "tag") => vec![(name.clone(), id(doc))],
        _ => vec![],
    }
}
