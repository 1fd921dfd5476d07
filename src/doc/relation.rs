//! Documents relating two entities: who follows whom, who starred what.

use serde::{Deserialize, Serialize};

use super::{now, Document};
use crate::address::DocId;

/// A document linking two ids.
pub trait Relation: Document {
    /// The end that isn't `owner`, if `owner` is one of the ends.
    fn other(&self, owner: &str) -> Option<&str>;
}

fn other<'a>(a: &'a str, b: &'a str, owner: &str) -> Option<&'a str> {
    if a == owner {
        Some(b)
    } else if b == owner {
        Some(a)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follower {
    #[serde(rename = "_id")]
    pub id: DocId,
    /// The member being followed.
    pub member_id: String,
    pub follower_id: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Follower {
    pub fn new(member_id: impl Into<String>, follower_id: impl Into<String>) -> Self {
        Follower {
            id: DocId::random(),
            member_id: member_id.into(),
            follower_id: follower_id.into(),
            created_at: now(),
        }
    }
}

impl Document for Follower {
    const TYPE: &'static str = "follower";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

impl Relation for Follower {
    fn other(&self, owner: &str) -> Option<&str> {
        other(&self.member_id, &self.follower_id, owner)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    #[serde(rename = "_id")]
    pub id: DocId,
    /// Unversion id of the starred item.
    pub item_id: String,
    pub user_id: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Star {
    pub fn new(item_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Star {
            id: DocId::random(),
            item_id: item_id.into(),
            user_id: user_id.into(),
            created_at: now(),
        }
    }
}

impl Document for Star {
    const TYPE: &'static str = "star";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

impl Relation for Star {
    fn other(&self, owner: &str) -> Option<&str> {
        other(&self.item_id, &self.user_id, owner)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub item_id: String,
    pub user_id: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Subscription {
    pub fn new(item_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Subscription {
            id: DocId::random(),
            item_id: item_id.into(),
            user_id: user_id.into(),
            created_at: now(),
        }
    }
}

impl Document for Subscription {
    const TYPE: &'static str = "subscription";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

impl Relation for Subscription {
    fn other(&self, owner: &str) -> Option<&str> {
        other(&self.item_id, &self.user_id, owner)
    }
}

/// A post filed under a tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub post_id: String,
    pub post_type: String,
    pub post_section: String,
    pub tag_id: String,
    #[serde(default)]
    pub created_at: i64,
}

impl Classification {
    pub fn new(
        post_id: impl Into<String>,
        post_type: impl Into<String>,
        post_section: impl Into<String>,
        tag_id: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Classification {
            id: DocId::random(),
            post_id: post_id.into(),
            post_type: post_type.into(),
            post_section: post_section.into(),
            tag_id: tag_id.into(),
            created_at,
        }
    }
}

impl Document for Classification {
    const TYPE: &'static str = "classification";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

impl Relation for Classification {
    fn other(&self, owner: &str) -> Option<&str> {
        other(&self.tag_id, &self.post_id, owner)
    }
}
