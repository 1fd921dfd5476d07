use futures::future::LocalBoxFuture;
use serde_json::json;

use super::{award, Badge, Decorator, Event, Metal};
use crate::{
    error::{Error, Result},
    repository::DocRepository,
    store::{DocumentStore, StoreEx},
    views::ViewQuery,
};

const STARS: u64 = 10;

/// Wrote a post starred by 10 users. Awarded once per post.
pub struct Beloved;

impl<S: DocumentStore> Decorator<S> for Beloved {
    fn name(&self) -> &'static str {
        "Beloved"
    }

    fn metal(&self) -> Metal {
        Metal::Silver
    }

    fn messages(&self) -> &'static [&'static str] {
        &["star"]
    }

    fn update<'a>(
        &'a self,
        repo: &'a DocRepository<S>,
        event: &'a Event,
    ) -> LocalBoxFuture<'a, Result<Option<Badge>>> {
        Box::pin(async move {
            let Event::Starred {
                item_id,
                author_id: Some(author_id),
                ..
            } = event
            else {
                return Ok(None);
            };

            let stars = repo
                .store()
                .view("stars", "perItem")
                .count(ViewQuery::new().key_prefix(vec![json!(item_id)]))
                .await
                .map_err(Error::store)?;

            if stars < STARS {
                return Ok(None);
            }

            let badge = Badge::new(
                author_id,
                Decorator::<S>::name(self),
                Decorator::<S>::metal(self),
                Some(item_id.as_str()),
            );
            Ok(award(repo, &badge).await?.then_some(badge))
        })
    }
}
