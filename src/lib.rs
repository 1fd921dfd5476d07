#![allow(async_fn_in_trait)]

//! # reindex
//!
//! `reindex` is the core of a content-publishing platform: articles, books, tutorials, replies and tags,
//! follower/star/subscription relations, badges and role-based moderation. Content lives in a document store,
//! and every change to a piece of content goes through a small, permission-gated lifecycle.
//!
//! It is not a web application. There is no HTTP layer, no sessions and no templates: the caller hands us a
//! [`security::user::User`] and we tell it whether that user may do something, and do it.
//!
//! Goals:
//!
//! * Keep the authorization rules in one place, one object per (role, action) pair.
//! * Keep the content lifecycle explicit: every transition is a method that either succeeds or refuses.
//! * Be indifferent to the store. Anything that can read/write JSON documents by id and answer
//!     map/reduce view queries will do (see [`store::DocumentStore`]).
//! * Provide a one-shot importer for the legacy relational dump.
//!
//! Non-goals:
//!
//! * Compatibility with any particular document database's view API.
//! * OAuth or any other identity provider integration.
//! * Concurrency control beyond what the store gives us. Last write wins.
//!
//! # Main concepts
//!
//! ## Store, address, location
//!
//! A storage system is defined around the concept of [`address::Address`]. Address uniquely identifies
//! a piece of content: a document ([`address::DocId`]), a versioned document ([`address::VersionedId`]),
//! or a view ([`address::ViewName`]).
//!
//! If a store understands a particular address, it implements [traits][`address::traits`] like
//! [`address::traits::AddressableRead`]. `AddressableRead<SomeType, SomeAddr>` means that `SomeAddr` can be used to
//! read a value of `SomeType`. [`address::primitive::Existence`] is the special value used to check whether
//! something exists at that address.
//!
//! [`location::Location`] is simply a pair of an address and a store. This is the value you'd most typically pass
//! around:
//!
//! ```
//! use serde_json::json;
//!
//! use reindex::store::StoreEx;
//! use reindex::stores::memory::MemoryDocStore;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryDocStore::new();
//! let location = store.doc("hello");
//!
//! location.write(&Some(json!({"type": "greeting"}))).await?;
//!
//! assert!(location.exists().await?);
//! assert_eq!(location.getv().await?.unwrap()["_id"], json!("hello"));
//! # Ok::<(), reindex::stores::memory::MemoryDocStoreError>(())
//! # }).unwrap()
//! ```
//!
//! ## Versionable documents
//!
//! Content is stored as [`doc::versionable::Revision`]s. A revision carries a [`doc::state::VersionState`]
//! (created → submitted → current/returned/rejected → deleted/restored) and every transition is checked against
//! the permission object the user's role defines for it (see [`security::permission`]).
//!
//! ## Collections
//!
//! Relations between entities (a member following another, a user starring an article) are documents too.
//! [`collection::RelationCollection`] wraps a view over them and exposes set-like operations.
//!
//! # Supported stores
//!
//! - [`stores::memory::MemoryDocStore`]
//! - [`stores::fs::FileSystemStore`] (feature `fs`)
//!
//! Wrappers:
//! - [`wrappers::filter_docs::FilterDocsWrapperStore`], e.g. to hide trashed documents
//!
pub mod store;

pub mod address;
pub mod badge;
pub mod collection;
pub mod config;
pub mod doc;
pub mod error;
pub mod import;
pub mod location;
pub mod repository;
pub mod security;
pub mod stores;
pub mod text;
pub mod views;
pub mod wrappers;

pub use error::{Error, Result};
