use serde_json::Value;

use crate::{
    address::{
        primitive::{Existence, UniqueRootAddress},
        traits::{AddressableList, AddressableQuery, AddressableRead, AddressableWrite},
        *,
    },
    location::Location,
    views::{ViewQuery, ViewRow},
};

/// Main store driver
///
/// This and the related traits are what you need to implement
/// if you want to add a store.
pub trait Store: Clone {
    type Error: std::fmt::Debug + std::fmt::Display + Send + Sync + 'static;
}

pub trait StoreEx: Store {
    fn sub<Addr: Address>(&self, addr: Addr) -> Location<Addr, Self>
    where
        Self: Addressable<Addr>,
    {
        Location::new(addr, self.clone())
    }

    fn root(&self) -> Location<UniqueRootAddress, Self>
    where
        Self: Addressable<UniqueRootAddress>,
    {
        Location::new(UniqueRootAddress, self.clone())
    }

    /// Location of a document.
    fn doc(&self, id: impl Into<DocId>) -> Location<DocId, Self>
    where
        Self: Addressable<DocId>,
    {
        self.sub(id.into())
    }

    /// Location of a view, e.g. `store.view("followers", "perMember")`.
    fn view(&self, design: &str, view: &str) -> Location<ViewName, Self>
    where
        Self: Addressable<ViewName>,
    {
        self.sub(DesignDoc::new(design).sub(view))
    }
}

impl<S: Store> StoreEx for S {}

pub type StoreResult<V, S> = Result<V, <S as Store>::Error>;

/// Everything the domain layer needs from a store: JSON documents by id,
/// a listing of all of them, and view queries.
///
/// Implemented automatically for every store that has the capabilities.
pub trait DocumentStore:
    Store
    + AddressableRead<Value, DocId>
    + AddressableRead<Existence, DocId>
    + AddressableWrite<Value, DocId>
    + AddressableList<UniqueRootAddress, ItemAddress = DocId>
    + AddressableQuery<ViewQuery, ViewName, Row = ViewRow>
{
}

impl<S> DocumentStore for S where
    S: Store
        + AddressableRead<Value, DocId>
        + AddressableRead<Existence, DocId>
        + AddressableWrite<Value, DocId>
        + AddressableList<UniqueRootAddress, ItemAddress = DocId>
        + AddressableQuery<ViewQuery, ViewName, Row = ViewRow>
{
}
