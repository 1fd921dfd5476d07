//! Badges, awarded by decorators observing what happens on the platform.
//!
//! A [`Decorator`] subscribes to event messages. The [`Dispatcher`] hands every published [`Event`] to
//! the decorators subscribed to its message, and each of them decides whether the event earns someone
//! a badge. Badge ids are deterministic, so awarding the same badge twice is a no-op.

use std::{fmt::Display, sync::Arc};

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    address::DocId,
    doc::{from_document, now, Document},
    error::Result,
    repository::DocRepository,
    store::{DocumentStore, StoreEx},
    views::ViewQuery,
};

mod beloved;
mod popular;

pub use beloved::Beloved;
pub use popular::Popular;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Bronze,
    Silver,
    Gold,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// `user_id` starred the item.
    Starred {
        item_id: String,
        author_id: Option<String>,
        user_id: String,
    },
    /// `follower_id` started following the member.
    Followed {
        member_id: String,
        follower_id: String,
    },
}

impl Event {
    /// What decorators subscribe to.
    pub fn message(&self) -> &'static str {
        match self {
            Event::Starred { .. } => "star",
            Event::Followed { .. } => "follow",
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Starred { item_id, user_id, .. } => write!(f, "{user_id} starred {item_id}"),
            Event::Followed {
                member_id,
                follower_id,
            } => write!(f, "{follower_id} followed {member_id}"),
        }
    }
}

/// An awarded badge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub member_id: String,
    pub name: String,
    pub metal: Metal,
    /// For badges awarded once per item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub awarded_at: i64,
}

impl Badge {
    pub fn new(member_id: &str, name: &str, metal: Metal, item_id: Option<&str>) -> Self {
        let id = match item_id {
            Some(item_id) => format!("badge::{member_id}::{name}::{item_id}"),
            None => format!("badge::{member_id}::{name}"),
        };

        Badge {
            id: DocId::new(id),
            member_id: member_id.to_owned(),
            name: name.to_owned(),
            metal,
            item_id: item_id.map(str::to_owned),
            awarded_at: now(),
        }
    }
}

impl Document for Badge {
    const TYPE: &'static str = "badge";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}

pub trait Decorator<S> {
    fn name(&self) -> &'static str;

    fn metal(&self) -> Metal;

    /// The event messages to be notified of.
    fn messages(&self) -> &'static [&'static str];

    /// Reacts to an event. Returns the badge awarded, if any.
    fn update<'a>(
        &'a self,
        repo: &'a DocRepository<S>,
        event: &'a Event,
    ) -> LocalBoxFuture<'a, Result<Option<Badge>>>;
}

/// Saves a badge unless the member already has it. Returns whether it was saved.
pub async fn award<S: DocumentStore>(repo: &DocRepository<S>, badge: &Badge) -> Result<bool> {
    if repo.exists(badge.id.clone()).await? {
        return Ok(false);
    }

    tracing::info!(member = %badge.member_id, badge = %badge.name, "badge awarded");
    repo.save(badge).await?;
    Ok(true)
}

/// The badges of a member, ordered by name.
pub async fn badges_of<S: DocumentStore>(
    repo: &DocRepository<S>,
    member_id: &str,
) -> Result<Vec<Badge>> {
    repo.store()
        .view("badges", "perMember")
        .docs(ViewQuery::new().key_prefix(vec![json!(member_id)]))
        .await
        .map_err(crate::Error::store)?
        .into_iter()
        .map(from_document)
        .collect()
}

pub struct Dispatcher<S> {
    decorators: Vec<Arc<dyn Decorator<S>>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Dispatcher {
            decorators: self.decorators.clone(),
        }
    }
}

impl<S> Default for Dispatcher<S> {
    fn default() -> Self {
        Dispatcher { decorators: vec![] }
    }
}

impl<S: DocumentStore + 'static> Dispatcher<S> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every decorator of the platform.
    pub fn standard() -> Self {
        Self::new().with(Beloved).with(Popular)
    }

    pub fn with(mut self, decorator: impl Decorator<S> + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    /// Notifies the subscribed decorators, one at a time. Returns the badges awarded.
    pub async fn notify(&self, repo: &DocRepository<S>, event: &Event) -> Result<Vec<Badge>> {
        tracing::debug!(%event, "dispatching");

        let mut awarded = vec![];
        for decorator in &self.decorators {
            if !decorator.messages().contains(&event.message()) {
                continue;
            }

            if let Some(badge) = decorator.update(repo, event).await? {
                awarded.push(badge);
            }
        }

        Ok(awarded)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stores::memory::MemoryDocStore;

    struct Welcome;

    impl<S: DocumentStore> Decorator<S> for Welcome {
        fn name(&self) -> &'static str {
            "Welcome"
        }

        fn metal(&self) -> Metal {
            Metal::Bronze
        }

        fn messages(&self) -> &'static [&'static str] {
            &["follow"]
        }

        fn update<'a>(
            &'a self,
            repo: &'a DocRepository<S>,
            event: &'a Event,
        ) -> LocalBoxFuture<'a, Result<Option<Badge>>> {
            Box::pin(async move {
                let Event::Followed { follower_id, .. } = event else {
                    return Ok(None);
                };

                let badge = Badge::new(follower_id, Decorator::<S>::name(self), Metal::Bronze, None);
                Ok(award(repo, &badge).await?.then_some(badge))
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch() -> Result<()> {
        let repo = DocRepository::new(MemoryDocStore::new());
        let dispatcher = Dispatcher::new().with(Welcome);

        let followed = Event::Followed {
            member_id: "ann".to_owned(),
            follower_id: "bob".to_owned(),
        };
        let starred = Event::Starred {
            item_id: "intro".to_owned(),
            author_id: None,
            user_id: "bob".to_owned(),
        };

        assert!(dispatcher.notify(&repo, &starred).await?.is_empty());

        let awarded = dispatcher.notify(&repo, &followed).await?;
        assert_eq!(awarded.len(), 1);
        assert_eq!(awarded[0].id.as_str(), "badge::bob::Welcome");

        // Once only.
        assert!(dispatcher.notify(&repo, &followed).await?.is_empty());

        let badges = badges_of(&repo, "bob").await?;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].metal, Metal::Bronze);

        Ok(())
    }
}
