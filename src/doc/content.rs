//! What revisions are revisions of.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{now, Document};
use crate::address::DocId;

/// The payload of a [`Revision`](super::versionable::Revision).
pub trait Content: Serialize + DeserializeOwned + Clone {
    /// The `type` of the revision documents.
    const TYPE: &'static str;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub downloads: u64,
}

impl Content for Article {
    const TYPE: &'static str = "article";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<i64>,
    #[serde(default)]
    pub hits: u64,
    #[serde(default)]
    pub downloads: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
}

impl Content for Book {
    const TYPE: &'static str = "book";
}

/// An ordered series of posts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
    pub title: String,
    #[serde(default)]
    pub posts: Vec<String>,
    #[serde(default)]
    pub hits: u64,
}

impl Tutorial {
    /// Appends a post, unless it's already part of the tutorial.
    pub fn add_post(&mut self, post_id: impl Into<String>) -> bool {
        let post_id = post_id.into();
        if self.posts.contains(&post_id) {
            return false;
        }

        self.posts.push(post_id);
        true
    }
}

impl Content for Tutorial {
    const TYPE: &'static str = "tutorial";
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub post_id: String,
    pub body: String,
}

impl Content for Reply {
    const TYPE: &'static str = "reply";
}

/// Tags aren't versioned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

impl Tag {
    pub fn new(name: impl Into<String>, creator_id: Option<String>) -> Self {
        Tag {
            id: DocId::random(),
            name: name.into(),
            creator_id,
            created_at: now(),
        }
    }
}

impl Document for Tag {
    const TYPE: &'static str = "tag";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tutorial_posts() {
        let mut tutorial = Tutorial {
            title: "Rust".to_owned(),
            ..Default::default()
        };

        assert!(tutorial.add_post("part-1"));
        assert!(tutorial.add_post("part-2"));
        assert!(!tutorial.add_post("part-1"));
        assert_eq!(tutorial.posts, vec!["part-1", "part-2"]);
    }
}
