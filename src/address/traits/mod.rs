use futures::stream::LocalBoxStream;

use crate::store::StoreResult;

pub use super::{Address, Addressable, SubAddress};

mod list;

pub use list::*;

/// Uses pinned stream as a reasonable default because most of the
/// time you probably don't care too much.
/// You can use `.boxed_local()` on any stream with the correct items
/// to create this type.
pub type StoreStream<T, S> = LocalBoxStream<'static, StoreResult<T, S>>;

pub trait AddressableRead<Value, A: Address>: Addressable<A> {
    async fn read(&self, addr: &A) -> StoreResult<Option<Value>, Self>;
}

pub trait AddressableWrite<Value, A: Address>: Addressable<A> {
    /// `None` deletes whatever is at the address. Deleting nothing is fine.
    async fn write(&self, addr: &A, value: &Option<Value>) -> StoreResult<(), Self>;
}
