use futures::TryStreamExt;
use serde_json::Value;

use crate::{
    address::{
        primitive::Existence,
        traits::{AddressableList, AddressableQuery, AddressableRead, AddressableWrite, StoreStream},
        Address, Addressable, SubAddress, ViewName,
    },
    store::{Store, StoreResult},
    views::{ViewQuery, ViewRow},
};

/// A pair of a store and an address. You can pass this object around,
/// use it to traverse the store, and get/change values.
#[derive(Clone)]
pub struct Location<Addr: Address, S: Store + Addressable<Addr>> {
    pub store: S,
    pub address: Addr,
}

impl<V, Addr: Address, S: Store + Addressable<Addr, DefaultValue = V>> Location<Addr, S> {
    /// Get a Value of the default type for this address.
    pub async fn getv(&self) -> StoreResult<Option<V>, S>
    where
        S: AddressableRead<V, Addr>,
    {
        self.get().await
    }

    /// Write a Value of the default type for this address.
    pub async fn writev(&self, v: &Option<V>) -> StoreResult<(), S>
    where
        S: AddressableWrite<V, Addr>,
    {
        self.write(v).await
    }
}

impl<Addr: Address, S: Store + Addressable<Addr>> Location<Addr, S> {
    /// Stream the addresses of the items under this location.
    pub fn list(&self) -> StoreStream<S::ItemAddress, S>
    where
        S: AddressableList<Addr>,
    {
        self.store.list(&self.address)
    }

    /// Type-safe navigation. Every store defines its own address types.
    ///
    /// ```
    /// use reindex::address::{DesignDoc, ViewName};
    /// use reindex::store::StoreEx;
    /// use reindex::stores::memory::MemoryDocStore;
    ///
    /// let store = MemoryDocStore::new();
    /// let location = store.sub(DesignDoc::new("followers")).sub("perMember");
    ///
    /// assert_eq!(location.address, ViewName::new("followers", "perMember"));
    /// ```
    pub fn sub<AR: Address, A2>(self, address: A2) -> Location<AR, S>
    where
        Addr: SubAddress<A2, Output = AR>,
        S: Addressable<AR>,
    {
        Location::new(self.address.sub(address), self.store)
    }

    /// Get a Value of a particular type from the store, if the store supports that.
    ///
    /// Often it's easier to use `location.getv()`, as it will return the default type
    /// for this kind of location.
    ///
    /// `None` means that the value doesn't exist.
    pub async fn get<Value>(&self) -> StoreResult<Option<Value>, S>
    where
        S: AddressableRead<Value, Addr>,
    {
        self.store.read(&self.address).await
    }

    /// Write a Value of a particular type to the store, if the store supports that.
    ///
    /// `None` deletes the value.
    pub async fn write<Value>(&self, value: &Option<Value>) -> StoreResult<(), S>
    where
        S: AddressableWrite<Value, Addr>,
    {
        self.store.write(&self.address, value).await
    }

    pub fn query<Query>(&self, query: Query) -> StoreStream<S::Row, S>
    where
        S: AddressableQuery<Query, Addr>,
    {
        self.store.query(&self.address, query)
    }

    /// Typically it's better to use `store.sub(address)`
    pub fn new(address: Addr, store: S) -> Self {
        Location { store, address }
    }
}

impl<Addr: Address, S: Store + AddressableRead<Existence, Addr>> Location<Addr, S> {
    /// Check existence by the address.
    pub async fn exists(&self) -> StoreResult<bool, S> {
        Ok(self.get::<Existence>().await?.is_some())
    }
}

impl<S: Store + AddressableQuery<ViewQuery, ViewName, Row = ViewRow>> Location<ViewName, S> {
    /// Collect all the rows of a view query.
    pub async fn rows(&self, query: ViewQuery) -> StoreResult<Vec<ViewRow>, S> {
        self.query(query).try_collect().await
    }

    /// The first row of a view query, if any.
    pub async fn first(&self, query: ViewQuery) -> StoreResult<Option<ViewRow>, S> {
        Ok(self.rows(query.limit(1)).await?.into_iter().next())
    }

    /// Run the query reduced. An empty match counts as zero.
    pub async fn count(&self, query: ViewQuery) -> StoreResult<u64, S> {
        Ok(self
            .rows(query.reduce())
            .await?
            .first()
            .and_then(|row| row.value.as_u64())
            .unwrap_or(0))
    }

    /// The documents of the matching rows, for views queried with `include_docs`.
    pub async fn docs(&self, query: ViewQuery) -> StoreResult<Vec<Value>, S> {
        Ok(self
            .rows(query.include_docs())
            .await?
            .into_iter()
            .filter_map(|row| row.doc)
            .collect())
    }
}
