use derive_more::{Display, From};
use thiserror::Error;

use crate::address::DocId;

/// Errors of the domain layer.
///
/// Store drivers have their own error types, converted with [`Error::store`].
#[derive(From, Display, Debug, Error)]
pub enum Error {
    /// The user's roles don't allow the operation, or the document is in the wrong state for it.
    #[from(ignore)]
    NotEnoughPrivileges(String),
    /// The operation doesn't make sense for this pair of users.
    #[from(ignore)]
    UserMismatch(String),
    #[from(ignore)]
    InvalidField(String),
    #[from(ignore)]
    #[display(fmt = "document {} not found", _0)]
    NotFound(DocId),
    #[from(ignore)]
    #[display(fmt = "document {} is not a {}", id, expected)]
    WrongType { id: DocId, expected: &'static str },

    Json(serde_json::Error),
    Io(std::io::Error),
    #[from(ignore)]
    Store(anyhow::Error),
}

impl Error {
    pub fn store<E>(e: E) -> Self
    where
        E: std::fmt::Debug + std::fmt::Display + Send + Sync + 'static,
    {
        Error::Store(anyhow::anyhow!("{e}"))
    }

    pub fn not_enough_privileges() -> Self {
        Error::NotEnoughPrivileges("insufficient privileges or incompatible state".to_owned())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
