use std::fmt::Debug;

use crate::store::Store;

pub mod doc;
pub mod primitive;
pub mod traits;

pub use doc::*;

/// Must be a syntactically valid address: successfully parsed, but not yet validated.
///
/// You will want to implement [`SubAddress<NextPart>`](SubAddress) for this if your store supports several layers
/// of indirection, as `location.sub(addr_part: NextPart)` will add them.
pub trait Address: Eq + Clone + Debug + 'static {
    /// This should be an addressable, unique id in the container (not "own name")
    fn own_name(&self) -> String;

    /// The whole path
    fn as_parts(&self) -> Vec<String>;
}

pub trait Addressable<A: Address>: Store {
    /// The type you get from `location.getv()`.
    type DefaultValue;
}

pub trait SubAddress<Sub>: Address {
    type Output: Address;

    fn sub(self, sub: Sub) -> Self::Output;
}
