use futures::future::LocalBoxFuture;
use serde_json::json;

use super::{award, Badge, Decorator, Event, Metal};
use crate::{
    error::{Error, Result},
    repository::DocRepository,
    store::{DocumentStore, StoreEx},
    views::ViewQuery,
};

const FOLLOWERS: u64 = 10;

/// Followed by 10 members.
pub struct Popular;

impl<S: DocumentStore> Decorator<S> for Popular {
    fn name(&self) -> &'static str {
        "Popular"
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
            let Event::Followed { member_id, .. } = event else {
                return Ok(None);
            };

            let followers = repo
                .store()
                .view("followers", "perMember")
                .count(ViewQuery::new().key_prefix(vec![json!(member_id)]))
                .await
                .map_err(Error::store)?;

            if followers < FOLLOWERS {
                return Ok(None);
            }

            let badge = Badge::new(
                member_id,
                Decorator::<S>::name(self),
                Decorator::<S>::metal(self),
                None,
            );
            Ok(award(repo, &badge).await?.then_some(badge))
        })
    }
}
