use std::fmt::Display;

use super::{Address, SubAddress};

/// Default value for layers that can't be read/written as values (the root, views).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Opaque {}

/// Simply a unit type for the root address. `store.root()` returns the location for this one.
///
/// It implements `SubAddress<A>` for every type, simply returning the other operand,
/// so you can easily chain them.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct UniqueRootAddress;

impl Display for UniqueRootAddress {
    fn fmt(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl Address for UniqueRootAddress {
    fn own_name(&self) -> String {
        "".to_owned()
    }

    fn as_parts(&self) -> Vec<String> {
        vec![]
    }
}

impl<A: Address> SubAddress<A> for UniqueRootAddress {
    type Output = A;

    fn sub(self, rhs: A) -> Self::Output {
        rhs
    }
}

/// Ask for this if you only care about the existence of a document
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Existence;
