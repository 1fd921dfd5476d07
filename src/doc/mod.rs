//! The documents of the platform, and how they map to JSON in a store.
//!
//! Every document carries a `type` field naming its kind, which the views rely on. It's added by
//! [`to_document`] and checked by [`from_document`], so the structs themselves don't have it.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    address::DocId,
    error::{Error, Result},
};

pub mod content;
pub mod member;
pub mod relation;
pub mod state;
pub mod versionable;

pub const TYPE_FIELD: &str = "type";

pub trait Document: Serialize + DeserializeOwned {
    /// The value of the `type` field.
    const TYPE: &'static str;

    fn id(&self) -> DocId;
}

pub fn to_document<D: Document>(doc: &D) -> Result<Value> {
    let mut value = serde_json::to_value(doc)?;

    let Some(object) = value.as_object_mut() else {
        return Err(Error::InvalidField(format!(
            "a {} must serialize to a JSON object",
            D::TYPE
        )));
    };
    object.insert(TYPE_FIELD.to_owned(), Value::String(D::TYPE.to_owned()));
    object.insert("_id".to_owned(), Value::String(doc.id().to_string()));

    Ok(value)
}

pub fn from_document<D: Document>(value: Value) -> Result<D> {
    let id = value
        .get("_id")
        .and_then(Value::as_str)
        .map(DocId::from)
        .unwrap_or_else(|| DocId::new(""));

    if value.get(TYPE_FIELD).and_then(Value::as_str) != Some(D::TYPE) {
        return Err(Error::WrongType {
            id,
            expected: D::TYPE,
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Seconds since the epoch.
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
