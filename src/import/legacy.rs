//! The legacy relational dump, one JSON array per table.

use std::path::Path;

use serde::{de, Deserialize, Deserializer};

use crate::error::Result;

/// Legacy booleans are stored either as `0`/`1` or as JSON booleans.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(value)) => Ok(value),
        Some(Flag::Int(0)) => Ok(false),
        Some(Flag::Int(1)) => Ok(true),
        Some(Flag::Int(other)) => Err(de::Error::custom(format!("expected 0 or 1, got {other}"))),
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyDump {
    #[serde(default)]
    pub members: Vec<LegacyMember>,
    #[serde(default)]
    pub items: Vec<LegacyItem>,
    #[serde(default)]
    pub categories: Vec<LegacyCategory>,
    #[serde(default)]
    pub item_categories: Vec<LegacyItemCategory>,
    #[serde(default)]
    pub favourites: Vec<LegacyFavourite>,
    #[serde(default)]
    pub threads: Vec<LegacyThread>,
    #[serde(default)]
    pub comments: Vec<LegacyComment>,
}

impl LegacyDump {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn member(&self, id_member: i64) -> Option<&LegacyMember> {
        self.members.iter().find(|m| m.id_member == id_member)
    }

    pub fn item(&self, id_item: i64) -> Option<&LegacyItem> {
        self.items.iter().find(|i| i.id_item == id_item)
    }

    pub fn category(&self, id_category: i64) -> Option<&LegacyCategory> {
        self.categories.iter().find(|c| c.id_category == id_category)
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMember {
    pub id_member: i64,
    /// The id the member keeps in the new store.
    pub id: String,
    pub nick_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub birthday: Option<i64>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub confirmation_hash: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub confirmed: bool,
    #[serde(default)]
    pub creation_date: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyItem {
    pub id_item: i64,
    pub id: String,
    pub stereotype: i64,
    #[serde(default)]
    pub id_member: Option<i64>,
    #[serde(default)]
    pub contributor_name: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub hit_num: u64,
    #[serde(default)]
    pub download_num: u64,
    #[serde(default, deserialize_with = "flag")]
    pub locked: bool,
    #[serde(default)]
    pub correlation_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCategory {
    pub id_category: i64,
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_update: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyItemCategory {
    pub id_item: i64,
    pub id_category: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFavourite {
    pub id_item: i64,
    pub id_member: i64,
    #[serde(default)]
    pub date: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyThread {
    pub id_item: i64,
    pub id_member: i64,
    #[serde(default)]
    pub creation_time: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyComment {
    pub id_comment: i64,
    pub id_item: i64,
    pub id_member: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub body: String,
}
