use std::ops::Deref;

use super::RelationCollection;
use crate::{
    address::ViewName,
    badge::{Dispatcher, Event},
    doc::relation::Follower,
    error::{Error, Result},
    repository::DocRepository,
    security::user::User,
    store::DocumentStore,
};

/// The followers of a member.
pub struct FollowerCollection<S> {
    relations: RelationCollection<Follower, S>,
    dispatcher: Option<Dispatcher<S>>,
}

impl<S: DocumentStore + 'static> FollowerCollection<S> {
    pub fn new(repo: DocRepository<S>, member_id: impl Into<String>) -> Self {
        FollowerCollection {
            relations: RelationCollection::new(
                repo,
                ViewName::new("followers", "perMember"),
                member_id,
            ),
            dispatcher: None,
        }
    }

    /// Publishes [`Event::Followed`] on every new follower.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher<S>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// `follower` starts following the member.
    pub async fn follow(&self, follower: &User) -> Result<Follower> {
        let Some(follower_id) = follower.id() else {
            return Err(Error::not_enough_privileges());
        };
        let member_id = self.relations.owner_id();

        if follower_id == member_id {
            return Err(Error::UserMismatch("You can't follow yourself.".to_owned()));
        }
        if self.relations.exists(follower_id).await?.is_some() {
            return Err(Error::UserMismatch(
                "You are already following this member.".to_owned(),
            ));
        }

        let relation = Follower::new(member_id, follower_id);
        self.relations.add(&relation).await?;

        if let Some(dispatcher) = &self.dispatcher {
            let event = Event::Followed {
                member_id: member_id.to_owned(),
                follower_id: follower_id.to_owned(),
            };
            dispatcher.notify(self.relations.repo(), &event).await?;
        }

        Ok(relation)
    }

    /// `follower` stops following the member.
    pub async fn unfollow(&self, follower: &User) -> Result<Follower> {
        let Some(follower_id) = follower.id() else {
            return Err(Error::not_enough_privileges());
        };

        if self.relations.exists(follower_id).await?.is_none() {
            return Err(Error::UserMismatch(
                "You are not following this member.".to_owned(),
            ));
        }

        self.relations.remove(follower_id).await
    }
}

impl<S> Deref for FollowerCollection<S> {
    type Target = RelationCollection<Follower, S>;

    fn deref(&self) -> &Self::Target {
        &self.relations
    }
}

/// The members a member follows.
pub struct FollowingCollection<S> {
    relations: RelationCollection<Follower, S>,
}

impl<S: DocumentStore> FollowingCollection<S> {
    pub fn new(repo: DocRepository<S>, follower_id: impl Into<String>) -> Self {
        FollowingCollection {
            relations: RelationCollection::new(
                repo,
                ViewName::new("followers", "perFollower"),
                follower_id,
            ),
        }
    }

    pub async fn exists(&self, member_id: &str) -> Result<Option<Follower>> {
        self.relations.exists(member_id).await
    }

    pub async fn count(&self) -> Result<u64> {
        self.relations.count().await
    }

    pub async fn ids(&self) -> Result<Vec<String>> {
        self.relations.ids().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        badge::{badges_of, Metal},
        doc::versionable::test::user,
        stores::memory::MemoryDocStore,
    };

    #[tokio::test]
    async fn test_follow() -> Result<()> {
        let repo = DocRepository::new(MemoryDocStore::new());
        let ann = user("ann", &[]);
        let bob = user("bob", &[]);
        let ann_id = ann.id().unwrap();
        let bob_id = bob.id().unwrap();

        let followers = FollowerCollection::new(repo.clone(), ann_id);

        assert!(matches!(
            followers.follow(&ann).await,
            Err(Error::UserMismatch(msg)) if msg == "You can't follow yourself."
        ));
        assert!(matches!(
            followers.follow(&User::Guest).await,
            Err(Error::NotEnoughPrivileges(_))
        ));

        followers.follow(&bob).await?;
        assert!(matches!(
            followers.follow(&bob).await,
            Err(Error::UserMismatch(msg)) if msg == "You are already following this member."
        ));
        assert_eq!(followers.count().await?, 1);
        assert_eq!(followers.ids().await?, vec![bob_id.to_owned()]);

        let following = FollowingCollection::new(repo.clone(), bob_id);
        assert_eq!(following.ids().await?, vec![ann_id.to_owned()]);
        assert!(following.exists(ann_id).await?.is_some());

        let removed = followers.unfollow(&bob).await?;
        assert_eq!(removed.follower_id, bob_id);
        assert!(matches!(
            followers.unfollow(&bob).await,
            Err(Error::UserMismatch(msg)) if msg == "You are not following this member."
        ));
        assert_eq!(followers.count().await?, 0);
        assert_eq!(following.count().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_popular_badge() -> Result<()> {
        let repo = DocRepository::new(MemoryDocStore::new());
        let star = user("star", &[]);
        let star_id = star.id().unwrap();

        let followers =
            FollowerCollection::new(repo.clone(), star_id).with_dispatcher(Dispatcher::standard());

        for i in 0..9 {
            followers.follow(&user(&format!("fan{i}"), &[])).await?;
        }
        assert!(badges_of(&repo, star_id).await?.is_empty());

        followers.follow(&user("fan9", &[])).await?;
        followers.follow(&user("fan10", &[])).await?;

        let badges = badges_of(&repo, star_id).await?;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "Popular");
        assert_eq!(badges[0].metal, Metal::Bronze);

        Ok(())
    }
}
