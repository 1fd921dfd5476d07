use std::{collections::BTreeMap, sync::Arc};

use derive_more::{Display, From};
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
    address::{
        primitive::{Existence, Opaque, UniqueRootAddress},
        traits::{AddressableList, AddressableQuery, AddressableRead, AddressableWrite, StoreStream},
        Addressable, DesignDoc, DocId, ViewName,
    },
    store::{Store, StoreResult},
    views::{ViewError, ViewQuery, ViewRegistry, ViewRow, ViewSource},
};

#[derive(From, Display, Debug, Error, PartialEq, Eq)]
pub enum MemoryDocStoreError {
    View(ViewError),
    #[from(ignore)]
    #[display(fmt = "document {} is not a JSON object", _0)]
    NotADocument(DocId),
}

/// Documents in memory. Clones share the same documents.
#[derive(Debug, Clone)]
pub struct MemoryDocStore {
    docs: Arc<RwLock<BTreeMap<DocId, Value>>>,
    views: Arc<ViewRegistry>,
}

impl Default for MemoryDocStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocStore {
    /// An empty store answering the standard views.
    pub fn new() -> Self {
        Self::with_views(ViewRegistry::standard())
    }

    pub fn with_views(views: ViewRegistry) -> Self {
        MemoryDocStore {
            docs: Default::default(),
            views: Arc::new(views),
        }
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl ViewSource for MemoryDocStore {
    fn views(&self) -> &ViewRegistry {
        &self.views
    }
}

impl Store for MemoryDocStore {
    type Error = MemoryDocStoreError;
}

impl Addressable<DocId> for MemoryDocStore {
    type DefaultValue = Value;
}

impl Addressable<UniqueRootAddress> for MemoryDocStore {
    type DefaultValue = Opaque;
}

impl Addressable<DesignDoc> for MemoryDocStore {
    type DefaultValue = Opaque;
}

impl Addressable<ViewName> for MemoryDocStore {
    type DefaultValue = Opaque;
}

impl AddressableRead<Value, DocId> for MemoryDocStore {
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Value>, Self> {
        Ok(self.docs.read().await.get(addr).cloned())
    }
}

impl AddressableRead<Existence, DocId> for MemoryDocStore {
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Existence>, Self> {
        Ok(self.docs.read().await.contains_key(addr).then_some(Existence))
    }
}

impl AddressableWrite<Value, DocId> for MemoryDocStore {
    async fn write(&self, addr: &DocId, value: &Option<Value>) -> StoreResult<(), Self> {
        let mut docs = self.docs.write().await;

        match value {
            None => {
                docs.remove(addr);
            }
            Some(Value::Object(doc)) => {
                let mut doc = doc.clone();
                doc.insert("_id".to_owned(), Value::String(addr.to_string()));
                docs.insert(addr.clone(), Value::Object(doc));
            }
            Some(_) => return Err(MemoryDocStoreError::NotADocument(addr.clone())),
        }

        Ok(())
    }
}

impl AddressableList<UniqueRootAddress> for MemoryDocStore {
    type ItemAddress = DocId;

    fn list(&self, _addr: &UniqueRootAddress) -> StoreStream<DocId, Self> {
        let this = self.clone();

        stream::once(async move {
            let ids = this.docs.read().await.keys().cloned().collect::<Vec<_>>();

            Ok::<_, MemoryDocStoreError>(stream::iter(ids).map(Ok))
        })
        .try_flatten()
        .boxed_local()
    }
}

impl AddressableQuery<ViewQuery, ViewName> for MemoryDocStore {
    type Row = ViewRow;

    fn query(&self, addr: &ViewName, query: ViewQuery) -> StoreStream<ViewRow, Self> {
        let this = self.clone();
        let addr = addr.clone();

        stream::once(async move {
            let docs = this.docs.read().await;
            let rows = this.views.evaluate(&addr, docs.values(), &query)?;

            Ok::<_, MemoryDocStoreError>(stream::iter(rows).map(Ok))
        })
        .try_flatten()
        .boxed_local()
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::store::StoreEx;

    #[tokio::test]
    async fn test_read_write_delete() -> Result<(), MemoryDocStoreError> {
        let store = MemoryDocStore::new();
        let doc = store.doc("ann");

        assert_eq!(doc.getv().await?, None);
        assert!(!doc.exists().await?);

        doc.write(&Some(json!({"type": "member", "username": "ann"})))
            .await?;
        assert_eq!(doc.getv().await?.unwrap()["_id"], json!("ann"));
        assert!(doc.exists().await?);

        let clone = store.clone();
        assert!(clone.doc("ann").exists().await?);

        doc.write::<Value>(&None).await?;
        assert!(!doc.exists().await?);
        assert!(store.is_empty().await);

        // Deleting a missing document is fine.
        doc.write::<Value>(&None).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_not_a_document() {
        let store = MemoryDocStore::new();

        assert_eq!(
            store.doc("x").write(&Some(json!([1, 2]))).await,
            Err(MemoryDocStoreError::NotADocument("x".into()))
        );
    }

    #[tokio::test]
    async fn test_list_and_query() -> Result<(), MemoryDocStoreError> {
        let store = MemoryDocStore::new();

        for (id, member, follower) in [("f1", "ann", "bob"), ("f2", "ann", "cid")] {
            store
                .doc(id)
                .write(&Some(json!({
                    "type": "follower",
                    "memberId": member,
                    "followerId": follower,
                })))
                .await?;
        }

        let ids = store.root().list().try_collect::<Vec<_>>().await?;
        assert_eq!(ids, vec![DocId::from("f1"), DocId::from("f2")]);

        let view = store.view("followers", "perMember");
        let prefix = ViewQuery::new().key_prefix(vec![json!("ann")]);

        assert_eq!(view.count(prefix.clone()).await?, 2);
        assert_eq!(
            view.first(prefix.clone().descending()).await?.unwrap().id,
            Some(DocId::from("f2"))
        );
        assert_eq!(view.docs(prefix).await?[0]["followerId"], json!("bob"));

        assert!(matches!(
            store.view("nope", "nope").rows(ViewQuery::new()).await,
            Err(MemoryDocStoreError::View(ViewError::UnknownView(_)))
        ));

        Ok(())
    }
}
