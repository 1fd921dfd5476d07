use std::ops::Deref;

use super::RelationCollection;
use crate::{
    address::ViewName,
    badge::{Dispatcher, Event},
    doc::relation::Star,
    error::{Error, Result},
    repository::DocRepository,
    security::user::User,
    store::DocumentStore,
};

/// The stars on an item, keyed by its unversion id so they survive new revisions.
pub struct StarCollection<S> {
    relations: RelationCollection<Star, S>,
    author_id: Option<String>,
    dispatcher: Option<Dispatcher<S>>,
}

impl<S: DocumentStore + 'static> StarCollection<S> {
    pub fn new(repo: DocRepository<S>, item_id: impl Into<String>, author_id: Option<String>) -> Self {
        StarCollection {
            relations: RelationCollection::new(repo, ViewName::new("stars", "perItem"), item_id),
            author_id,
            dispatcher: None,
        }
    }

    /// Publishes [`Event::Starred`] on every new star.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher<S>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub async fn star(&self, user: &User) -> Result<Star> {
        let Some(user_id) = user.id() else {
            return Err(Error::not_enough_privileges());
        };
        let item_id = self.relations.owner_id();

        if self.author_id.as_deref() == Some(user_id) {
            return Err(Error::UserMismatch(
                "You can't star your own item.".to_owned(),
            ));
        }
        if self.relations.exists(user_id).await?.is_some() {
            return Err(Error::UserMismatch(
                "You have already starred this item.".to_owned(),
            ));
        }

        let star = Star::new(item_id, user_id);
        self.relations.add(&star).await?;

        if let Some(dispatcher) = &self.dispatcher {
            let event = Event::Starred {
                item_id: item_id.to_owned(),
                author_id: self.author_id.clone(),
                user_id: user_id.to_owned(),
            };
            dispatcher.notify(self.relations.repo(), &event).await?;
        }

        Ok(star)
    }

    pub async fn unstar(&self, user: &User) -> Result<Star> {
        let Some(user_id) = user.id() else {
            return Err(Error::not_enough_privileges());
        };

        if self.relations.exists(user_id).await?.is_none() {
            return Err(Error::UserMismatch(
                "You have not starred this item.".to_owned(),
            ));
        }

        self.relations.remove(user_id).await
    }
}

impl<S> Deref for StarCollection<S> {
    type Target = RelationCollection<Star, S>;

    fn deref(&self) -> &Self::Target {
        &self.relations
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
    async fn test_stars_and_beloved() -> Result<()> {
        let repo = DocRepository::new(MemoryDocStore::new());
        let author = user("ann", &[]);
        let author_id = author.id().unwrap().to_owned();

        let stars = StarCollection::new(repo.clone(), "intro", Some(author_id.clone()))
            .with_dispatcher(Dispatcher::standard());

        assert!(matches!(
            stars.star(&author).await,
            Err(Error::UserMismatch(msg)) if msg == "You can't star your own item."
        ));

        let bob = user("bob", &[]);
        stars.star(&bob).await?;
        assert!(stars.star(&bob).await.is_err());
        stars.unstar(&bob).await?;
        assert!(matches!(
            stars.unstar(&bob).await,
            Err(Error::UserMismatch(msg)) if msg == "You have not starred this item."
        ));

        for i in 0..10 {
            stars.star(&user(&format!("fan{i}"), &[])).await?;
        }
        assert_eq!(stars.count().await?, 10);

        let badges = badges_of(&repo, &author_id).await?;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "Beloved");
        assert_eq!(badges[0].metal, Metal::Silver);
        assert_eq!(badges[0].item_id.as_deref(), Some("intro"));

        // Once per item, again for another one.
        let other = StarCollection::new(repo.clone(), "outro", Some(author_id.clone()))
            .with_dispatcher(Dispatcher::standard());
        for i in 0..10 {
            other.star(&user(&format!("fan{i}"), &[])).await?;
        }
        assert_eq!(badges_of(&repo, &author_id).await?.len(), 2);

        Ok(())
    }
}
