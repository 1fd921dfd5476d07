use std::ops::Deref;

use super::RelationCollection;
use crate::{
    address::ViewName,
    doc::relation::Subscription,
    error::{Error, Result},
    repository::DocRepository,
    security::user::User,
    store::DocumentStore,
};

/// The members subscribed to an item.
pub struct SubscriptionCollection<S> {
    relations: RelationCollection<Subscription, S>,
}

impl<S: DocumentStore> SubscriptionCollection<S> {
    pub fn new(repo: DocRepository<S>, item_id: impl Into<String>) -> Self {
        SubscriptionCollection {
            relations: RelationCollection::new(
                repo,
                ViewName::new("subscriptions", "perItem"),
                item_id,
            ),
        }
    }

    pub async fn subscribe(&self, user: &User) -> Result<Subscription> {
        let Some(user_id) = user.id() else {
            return Err(Error::not_enough_privileges());
        };

        if self.relations.exists(user_id).await?.is_some() {
            return Err(Error::UserMismatch(
                "You are already subscribed to this item.".to_owned(),
            ));
        }

        let subscription = Subscription::new(self.relations.owner_id(), user_id);
        self.relations.add(&subscription).await?;
        Ok(subscription)
    }

    pub async fn unsubscribe(&self, user: &User) -> Result<Subscription> {
        let Some(user_id) = user.id() else {
            return Err(Error::not_enough_privileges());
        };

        if self.relations.exists(user_id).await?.is_none() {
            return Err(Error::UserMismatch(
                "You are not subscribed to this item.".to_owned(),
            ));
        }

        self.relations.remove(user_id).await
    }
}

impl<S> Deref for SubscriptionCollection<S> {
    type Target = RelationCollection<Subscription, S>;

    fn deref(&self) -> &Self::Target {
        &self.relations
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{doc::versionable::test::user, stores::memory::MemoryDocStore};

    #[tokio::test]
    async fn test_subscribe() -> Result<()> {
        let repo = DocRepository::new(MemoryDocStore::new());
        let subscriptions = SubscriptionCollection::new(repo, "intro");
        let ann = user("ann", &[]);

        assert!(subscriptions.subscribe(&User::Guest).await.is_err());
        subscriptions.subscribe(&ann).await?;
        assert!(subscriptions.subscribe(&ann).await.is_err());
        assert_eq!(subscriptions.count().await?, 1);

        subscriptions.unsubscribe(&ann).await?;
        assert!(subscriptions.unsubscribe(&ann).await.is_err());
        assert_eq!(subscriptions.count().await?, 0);

        Ok(())
    }
}
