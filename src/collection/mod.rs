//! Set-like collections of relations, backed by views keyed `[owner id, other id]`.

use std::{marker::PhantomData, sync::Arc};

use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    address::ViewName,
    doc::{from_document, relation::Relation},
    error::{Error, Result},
    location::Location,
    repository::DocRepository,
    store::{DocumentStore, StoreEx},
    views::ViewQuery,
};

mod follower;
pub mod role;
mod star;
mod subscription;

pub use follower::{FollowerCollection, FollowingCollection};
pub use star::StarCollection;
pub use subscription::SubscriptionCollection;

/// The relations of type `R` owned by one entity.
pub struct RelationCollection<R, S> {
    repo: DocRepository<S>,
    view: ViewName,
    owner_id: String,
    /// Cached until the next change made through this collection.
    count: Arc<RwLock<Option<u64>>>,
    phantom: PhantomData<fn() -> R>,
}

impl<R, S: Clone> Clone for RelationCollection<R, S> {
    fn clone(&self) -> Self {
        RelationCollection {
            repo: self.repo.clone(),
            view: self.view.clone(),
            owner_id: self.owner_id.clone(),
            count: self.count.clone(),
            phantom: PhantomData,
        }
    }
}

impl<R: Relation, S: DocumentStore> RelationCollection<R, S> {
    pub fn new(repo: DocRepository<S>, view: ViewName, owner_id: impl Into<String>) -> Self {
        RelationCollection {
            repo,
            view,
            owner_id: owner_id.into(),
            count: Default::default(),
            phantom: PhantomData,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn repo(&self) -> &DocRepository<S> {
        &self.repo
    }

    fn location(&self) -> Location<ViewName, S> {
        self.repo.store().sub(self.view.clone())
    }

    async fn invalidate_count(&self) {
        *self.count.write().await = None;
    }

    /// The relation with `other_id`, if any.
    pub async fn exists(&self, other_id: &str) -> Result<Option<R>> {
        let row = self
            .location()
            .first(
                ViewQuery::new()
                    .key(json!([self.owner_id, other_id]))
                    .include_docs(),
            )
            .await
            .map_err(Error::store)?;

        row.and_then(|row| row.doc).map(from_document).transpose()
    }

    pub async fn add(&self, relation: &R) -> Result<()> {
        let Some(other_id) = relation.other(&self.owner_id) else {
            return Err(Error::InvalidField(format!(
                "the {} doesn't involve {}",
                R::TYPE,
                self.owner_id
            )));
        };

        if self.exists(other_id).await?.is_some() {
            return Err(Error::UserMismatch(format!(
                "The {} already exists.",
                R::TYPE
            )));
        }

        self.repo.save(relation).await?;
        self.invalidate_count().await;

        tracing::debug!(view = %self.view, owner = %self.owner_id, other = %other_id, "relation added");
        Ok(())
    }

    /// Removes the relation with `other_id` and returns it.
    pub async fn remove(&self, other_id: &str) -> Result<R> {
        let Some(relation) = self.exists(other_id).await? else {
            return Err(Error::UserMismatch(format!(
                "The {} doesn't exist.",
                R::TYPE
            )));
        };

        self.repo.delete(relation.id()).await?;
        self.invalidate_count().await;

        tracing::debug!(view = %self.view, owner = %self.owner_id, other = %other_id, "relation removed");
        Ok(relation)
    }

    pub async fn count(&self) -> Result<u64> {
        if let Some(count) = *self.count.read().await {
            return Ok(count);
        }

        let count = self
            .location()
            .count(ViewQuery::new().key_prefix(vec![json!(self.owner_id)]))
            .await
            .map_err(Error::store)?;

        *self.count.write().await = Some(count);
        Ok(count)
    }

    /// The other ids, in key order.
    pub async fn ids(&self) -> Result<Vec<String>> {
        let rows = self
            .location()
            .rows(ViewQuery::new().key_prefix(vec![json!(self.owner_id)]))
            .await
            .map_err(Error::store)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.key[1].as_str().map(str::to_owned))
            .collect())
    }
}
