use super::*;

pub trait AddressableList<ListAddr: Address>:
    Addressable<ListAddr> + Addressable<Self::ItemAddress>
{
    /// The address of the item in the list.
    type ItemAddress: Address;

    fn list(&self, addr: &ListAddr) -> StoreStream<Self::ItemAddress, Self>;
}

pub trait AddressableQuery<Query, A: Address>: Addressable<A> {
    type Row;

    /// Queries at an address. Every store can define its own queries.
    fn query(&self, addr: &A, query: Query) -> StoreStream<Self::Row, Self>;
}
