use std::sync::Arc;

use derive_more::Display;
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use thiserror::Error;

use crate::{
    address::{
        primitive::{Existence, UniqueRootAddress},
        traits::{AddressableList, AddressableQuery, AddressableRead, AddressableWrite, StoreStream},
        Address, Addressable, DocId, ViewName,
    },
    store::{Store, StoreResult},
    views::{ViewError, ViewQuery, ViewRegistry, ViewRow, ViewSource},
};

#[derive(Display, Debug, Error)]
pub enum FilterDocsWrapperError<E> {
    StoreError(E),
    #[display(fmt = "document {} is hidden", _0)]
    WriteToHiddenDoc(String),
}

impl<E> From<E> for FilterDocsWrapperError<E> {
    fn from(value: E) -> Self {
        Self::StoreError(value)
    }
}

/// Wrap this over a document store to hide the documents failing a predicate.
///
/// Hidden documents read as missing, are skipped by listings and never show up in view rows.
///
/// ```
/// use serde_json::json;
///
/// use reindex::store::StoreEx;
/// use reindex::stores::memory::MemoryDocStore;
/// use reindex::wrappers::filter_docs::{hide_trashed, FilterDocsWrapperError};
///
/// # tokio_test::block_on(async {
/// let underlying = MemoryDocStore::new();
/// underlying.doc("a").write(&Some(json!({"state": "current"}))).await?;
/// underlying.doc("b").write(&Some(json!({"state": "deleted"}))).await?;
///
/// let store = hide_trashed(underlying);
///
/// assert!(store.doc("a").exists().await?);
/// assert!(!store.doc("b").exists().await?);
///
/// Ok::<(), FilterDocsWrapperError<_>>(())
/// # }).unwrap()
/// ```
pub struct FilterDocsWrapperStore<S: Store, F: Fn(&Value) -> bool> {
    underlying: S,
    filter: Arc<F>,
}

impl<S: Store, F: Fn(&Value) -> bool> Clone for FilterDocsWrapperStore<S, F> {
    fn clone(&self) -> Self {
        Self {
            underlying: self.underlying.clone(),
            filter: self.filter.clone(),
        }
    }
}

impl<S: Store, F: Fn(&Value) -> bool> FilterDocsWrapperStore<S, F> {
    /// Construct a `FilterDocsWrapperStore` out of a store and the predicate of the visible documents.
    pub fn new(underlying: S, filter: F) -> Self {
        FilterDocsWrapperStore {
            underlying,
            filter: Arc::new(filter),
        }
    }

    pub fn destruct(self) -> S {
        self.underlying
    }

    fn is_visible(&self, doc: &Value) -> bool {
        (self.filter)(doc)
    }
}

fn not_trashed(doc: &Value) -> bool {
    doc.get("state").and_then(Value::as_str) != Some("deleted")
}

/// Hides the revisions in the trash.
pub fn hide_trashed<S: Store>(store: S) -> FilterDocsWrapperStore<S, fn(&Value) -> bool> {
    FilterDocsWrapperStore::new(store, not_trashed as fn(&Value) -> bool)
}

impl<S: Store + ViewSource, F: Fn(&Value) -> bool> ViewSource for FilterDocsWrapperStore<S, F> {
    fn views(&self) -> &ViewRegistry {
        self.underlying.views()
    }
}

impl<S: Store, F: Fn(&Value) -> bool> Store for FilterDocsWrapperStore<S, F> {
    type Error = FilterDocsWrapperError<S::Error>;
}

impl<A: Address, S: Addressable<A>, F: Fn(&Value) -> bool> Addressable<A>
    for FilterDocsWrapperStore<S, F>
{
    type DefaultValue = S::DefaultValue;
}

impl<S: AddressableRead<Value, DocId>, F: Fn(&Value) -> bool> AddressableRead<Value, DocId>
    for FilterDocsWrapperStore<S, F>
{
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Value>, Self> {
        let doc = self.underlying.read(addr).await?;

        Ok(doc.filter(|doc| self.is_visible(doc)))
    }
}

impl<S: AddressableRead<Value, DocId>, F: Fn(&Value) -> bool> AddressableRead<Existence, DocId>
    for FilterDocsWrapperStore<S, F>
{
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Existence>, Self> {
        let doc: Option<Value> = self.underlying.read(addr).await?;

        Ok(doc.filter(|doc| self.is_visible(doc)).map(|_| Existence))
    }
}

impl<S, F> AddressableWrite<Value, DocId> for FilterDocsWrapperStore<S, F>
where
    S: AddressableRead<Value, DocId> + AddressableWrite<Value, DocId>,
    F: Fn(&Value) -> bool,
{
    async fn write(&self, addr: &DocId, value: &Option<Value>) -> StoreResult<(), Self> {
        let current: Option<Value> = self.underlying.read(addr).await?;

        if current.is_some_and(|doc| !self.is_visible(&doc)) {
            return Err(FilterDocsWrapperError::WriteToHiddenDoc(addr.to_string()));
        }

        Ok(self.underlying.write(addr, value).await?)
    }
}

impl<S, F> AddressableList<UniqueRootAddress> for FilterDocsWrapperStore<S, F>
where
    S: AddressableList<UniqueRootAddress, ItemAddress = DocId> + AddressableRead<Value, DocId> + 'static,
    F: Fn(&Value) -> bool + 'static,
{
    type ItemAddress = DocId;

    fn list(&self, addr: &UniqueRootAddress) -> StoreStream<DocId, Self> {
        let this = self.clone();

        self.underlying
            .list(addr)
            .map_err(FilterDocsWrapperError::from)
            .try_filter_map(move |id| {
                let this = this.clone();

                async move {
                    let doc: Option<Value> = this.underlying.read(&id).await?;
                    Ok(doc.filter(|doc| this.is_visible(doc)).map(|_| id))
                }
            })
            .boxed_local()
    }
}

impl<S, F> AddressableQuery<ViewQuery, ViewName> for FilterDocsWrapperStore<S, F>
where
    S: AddressableQuery<ViewQuery, ViewName, Row = ViewRow> + ViewSource + 'static,
    S::Error: From<ViewError>,
    F: Fn(&Value) -> bool + 'static,
{
    type Row = ViewRow;

    /// Asks the underlying store for every matching row with its document, then filters, reduces and
    /// paginates here.
    ///
    /// Reductions come from the view itself, so asking to reduce a view without one fails the same way
    /// it does on the underlying store.
    fn query(&self, addr: &ViewName, query: ViewQuery) -> StoreStream<ViewRow, Self> {
        let this = self.clone();
        let reduce = self.underlying.views().reduce_of(addr, &query);

        let underlying_query = ViewQuery {
            limit: None,
            skip: 0,
            reduce: false,
            include_docs: true,
            ..query.clone()
        };

        let rows = self.underlying.query(addr, underlying_query);

        stream::once(async move {
            let reduce = reduce.map_err(S::Error::from)?;

            let rows = rows
                .try_filter(|row| {
                    let visible = row.doc.as_ref().is_some_and(|doc| this.is_visible(doc));
                    async move { visible }
                })
                .try_collect::<Vec<_>>()
                .await?;

            if let Some(reduce) = reduce {
                return Ok(vec![ViewRow::reduced(reduce.apply(&rows))]);
            }

            let rows = rows
                .into_iter()
                .map(|row| ViewRow {
                    doc: row.doc.filter(|_| query.include_docs),
                    ..row
                })
                .collect();

            Ok::<_, FilterDocsWrapperError<S::Error>>(query.paginate(rows))
        })
        .map_ok(|rows| stream::iter(rows).map(Ok))
        .try_flatten()
        .boxed_local()
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::{
        store::StoreEx,
        stores::memory::{MemoryDocStore, MemoryDocStoreError},
        views::View,
    };

    async fn store() -> FilterDocsWrapperStore<MemoryDocStore, fn(&Value) -> bool> {
        let underlying = MemoryDocStore::new();

        for (id, item, user, state) in [
            ("s1", "intro", "ann", "current"),
            ("s2", "intro", "bob", "deleted"),
            ("s3", "intro", "cid", "current"),
        ] {
            underlying
                .doc(id)
                .write(&Some(json!({
                    "type": "star",
                    "itemId": item,
                    "userId": user,
                    "state": state,
                })))
                .await
                .unwrap();
        }

        hide_trashed(underlying)
    }

    #[tokio::test]
    async fn test_hidden_reads() -> Result<(), FilterDocsWrapperError<MemoryDocStoreError>> {
        let store = store().await;

        assert!(store.doc("s1").exists().await?);
        assert_eq!(store.doc("s2").getv().await?, None);

        let ids = store.root().list().try_collect::<Vec<_>>().await?;
        assert_eq!(ids, vec![DocId::from("s1"), DocId::from("s3")]);

        assert!(matches!(
            store.doc("s2").write(&Some(json!({"state": "current"}))).await,
            Err(FilterDocsWrapperError::WriteToHiddenDoc(id)) if id == "s2"
        ));
        store.doc("s4").write(&Some(json!({"state": "current"}))).await?;
        assert!(store.doc("s4").exists().await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_rows() -> Result<(), FilterDocsWrapperError<MemoryDocStoreError>> {
        let store = store().await;
        let view = store.view("stars", "perItem");
        let query = ViewQuery::new().key_prefix(vec![json!("intro")]);

        assert_eq!(view.count(query.clone()).await?, 2);

        let rows = view.rows(query.clone().skip(1)).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, json!(["intro", "cid"]));
        assert_eq!(rows[0].doc, None);

        let docs = view.docs(query.limit(1)).await?;
        assert_eq!(docs[0]["userId"], json!("ann"));

        Ok(())
    }

    #[tokio::test]
    async fn test_reduce_follows_the_view() -> Result<(), FilterDocsWrapperError<MemoryDocStoreError>> {
        let store = store().await;
        let stars = ViewQuery::new().key_prefix(vec![json!("intro")]).reduce();
        assert_eq!(store.view("stars", "perItem").count(stars).await?, 2);

        let names = store.view("members", "allNames").rows(ViewQuery::new().reduce()).await;
        assert!(matches!(
            names,
            Err(FilterDocsWrapperError::StoreError(MemoryDocStoreError::View(ViewError::NoReduce(name))))
                if name == "members/allNames"
        ));

        fn points(doc: &Value) -> Vec<(Value, Value)> {
            doc.get("points")
                .map(|points| vec![(Value::Null, points.clone())])
                .unwrap_or_default()
        }

        let mut views = ViewRegistry::new();
        views.register(View::summed(ViewName::new("points", "total"), points));
        let underlying = MemoryDocStore::with_views(views);
        for (id, points, state) in [("p1", 3, "current"), ("p2", 5, "deleted"), ("p3", 4, "current")] {
            underlying
                .doc(id)
                .write(&Some(json!({"points": points, "state": state})))
                .await?;
        }

        let rows = hide_trashed(underlying)
            .view("points", "total")
            .rows(ViewQuery::new().reduce())
            .await?;
        assert_eq!(rows, vec![ViewRow::reduced(7)]);

        Ok(())
    }
}
