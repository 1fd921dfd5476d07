use std::{
    fmt::Display,
    str::FromStr,
    sync::atomic::{AtomicI64, Ordering},
};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Address, SubAddress};

/// Separates the unversioned part of an id from its version number.
pub const SEPARATOR: &str = "::";

/// Id of a single document in a store.
#[derive(
    Clone, Debug, Display, From, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    pub fn new(id: impl Into<String>) -> Self {
        DocId(id.into())
    }

    /// A fresh random id.
    pub fn random() -> Self {
        DocId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id pruned of its version number.
    pub fn unversion(&self) -> &str {
        match self.0.find(SEPARATOR) {
            Some(pos) => &self.0[..pos],
            None => &self.0,
        }
    }
}

impl From<&str> for DocId {
    fn from(value: &str) -> Self {
        DocId(value.to_owned())
    }
}

impl From<&String> for DocId {
    fn from(value: &String) -> Self {
        DocId(value.clone())
    }
}

impl From<DocId> for String {
    fn from(value: DocId) -> Self {
        value.0
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Address for DocId {
    fn own_name(&self) -> String {
        self.0.clone()
    }

    fn as_parts(&self) -> Vec<String> {
        vec![self.0.clone()]
    }
}

#[derive(From, Display, Debug, Error, PartialEq, Eq)]
pub struct VersionedIdParseError(String);

static LAST_VERSION: AtomicI64 = AtomicI64::new(0);

/// A new version number: microseconds since the epoch, strictly increasing within the process.
pub fn next_version_number() -> String {
    let now = chrono::Utc::now().timestamp_micros();

    let mut last = LAST_VERSION.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_VERSION.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}

/// `<unversion id>::<version number>`
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VersionedId {
    pub unversion_id: String,
    pub version_number: String,
}

impl VersionedId {
    pub fn new(unversion_id: impl Into<String>, version_number: impl Into<String>) -> Self {
        VersionedId {
            unversion_id: unversion_id.into(),
            version_number: version_number.into(),
        }
    }

    /// A new unversion id with its first version number.
    pub fn fresh() -> Self {
        Self::new(DocId::random(), next_version_number())
    }

    /// Same unversion id, new version number.
    pub fn next(&self) -> Self {
        Self::new(self.unversion_id.clone(), next_version_number())
    }
}

impl Display for VersionedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.unversion_id, self.version_number)
    }
}

/// Parses `uid::version`. A plain `uid` gets a freshly generated version number.
impl FromStr for VersionedId {
    type Err = VersionedIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (unversion_id, version_number) = match value.split_once(SEPARATOR) {
            Some((uid, version)) => (uid, version.to_owned()),
            None => (value, next_version_number()),
        };

        if unversion_id.is_empty() {
            return Err(format!("missing unversion id in {value:?}").into());
        }
        if version_number.is_empty() || version_number.contains(SEPARATOR) {
            return Err(format!("bad version number in {value:?}").into());
        }

        Ok(VersionedId::new(unversion_id, version_number))
    }
}

impl From<VersionedId> for DocId {
    fn from(value: VersionedId) -> Self {
        DocId(value.to_string())
    }
}

impl From<&VersionedId> for DocId {
    fn from(value: &VersionedId) -> Self {
        DocId(value.to_string())
    }
}

impl Address for VersionedId {
    fn own_name(&self) -> String {
        self.version_number.clone()
    }

    fn as_parts(&self) -> Vec<String> {
        vec![self.unversion_id.clone(), self.version_number.clone()]
    }
}

/// A group of views, `design.sub("view")` addresses one of them.
#[derive(Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DesignDoc(String);

impl DesignDoc {
    pub fn new(name: impl Into<String>) -> Self {
        DesignDoc(name.into())
    }
}

impl Address for DesignDoc {
    fn own_name(&self) -> String {
        self.0.clone()
    }

    fn as_parts(&self) -> Vec<String> {
        vec![self.0.clone()]
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewName {
    pub design: String,
    pub view: String,
}

impl ViewName {
    pub fn new(design: impl Into<String>, view: impl Into<String>) -> Self {
        ViewName {
            design: design.into(),
            view: view.into(),
        }
    }
}

impl Display for ViewName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.design, self.view)
    }
}

impl Address for ViewName {
    fn own_name(&self) -> String {
        self.view.clone()
    }

    fn as_parts(&self) -> Vec<String> {
        vec![self.design.clone(), self.view.clone()]
    }
}

impl<'a> SubAddress<&'a str> for DesignDoc {
    type Output = ViewName;

    fn sub(self, view: &'a str) -> Self::Output {
        ViewName::new(self.0, view)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_versioned_id() {
        let id: VersionedId = "intro-to-rust::1400000000".parse().unwrap();
        assert_eq!(id.unversion_id, "intro-to-rust");
        assert_eq!(id.version_number, "1400000000");
        assert_eq!(DocId::from(&id).as_str(), "intro-to-rust::1400000000");
        assert_eq!(DocId::from(id).unversion(), "intro-to-rust");

        let generated: VersionedId = "intro-to-rust".parse().unwrap();
        assert_eq!(generated.unversion_id, "intro-to-rust");
        assert!(!generated.version_number.is_empty());

        assert!("::12".parse::<VersionedId>().is_err());
        assert!("abc::".parse::<VersionedId>().is_err());
    }

    #[test]
    fn test_version_numbers_increase() {
        let a = VersionedId::fresh();
        let b = a.next();
        let c = b.next();

        assert_eq!(a.unversion_id, c.unversion_id);
        assert!(a.version_number.parse::<i64>().unwrap() < b.version_number.parse::<i64>().unwrap());
        assert!(b.version_number.parse::<i64>().unwrap() < c.version_number.parse::<i64>().unwrap());
    }

    #[test]
    fn test_view_names() {
        let view = DesignDoc::new("followers").sub("perMember");
        assert_eq!(view, ViewName::new("followers", "perMember"));
        assert_eq!(view.to_string(), "followers/perMember");
        assert_eq!(view.as_parts(), vec!["followers", "perMember"]);
    }
}
