use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use derive_more::{Display, From};
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use thiserror::Error;

use crate::{
    address::{
        primitive::{Existence, Opaque, UniqueRootAddress},
        traits::{AddressableList, AddressableQuery, AddressableRead, AddressableWrite, StoreStream},
        Addressable, DesignDoc, DocId, ViewName,
    },
    store::{Store, StoreResult},
    views::{ViewError, ViewQuery, ViewRegistry, ViewRow, ViewSource},
};

const EXTENSION: &str = ".json";

#[derive(Error, Display, Debug, From)]
pub enum FileStoreError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
    View(ViewError),

    #[from(ignore)]
    #[display(fmt = "document {} is not a JSON object", _0)]
    NotADocument(DocId),
}

/// One JSON file per document, all in the base directory.
///
/// File names are the document ids with every character other than ASCII alphanumerics, `-` and `_`
/// percent-escaped, so `intro::1400000000` lands in `intro%3A%3A1400000000.json`.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_directory: Arc<PathBuf>,
    views: Arc<ViewRegistry>,
}

impl FileSystemStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_views(path, ViewRegistry::standard())
    }

    pub fn with_views(path: impl Into<PathBuf>, views: ViewRegistry) -> Self {
        FileSystemStore {
            base_directory: Arc::new(path.into()),
            views: Arc::new(views),
        }
    }

    pub fn here() -> StoreResult<Self, Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn get_complete_path(&self, addr: &DocId) -> PathBuf {
        self.base_directory.join(escape(addr.as_str()))
    }

    async fn read_doc(&self, addr: &DocId) -> StoreResult<Option<Value>, Self> {
        match tokio::fs::read(self.get_complete_path(addr)).await {
            Ok(contents) => Ok(Some(serde_json::from_slice(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn all_docs(&self) -> StoreResult<Vec<Value>, Self> {
        let ids = self.list(&UniqueRootAddress).try_collect::<Vec<_>>().await?;

        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            // Deleted in the meantime.
            if let Some(doc) = self.read_doc(&id).await? {
                docs.push(doc);
            }
        }

        Ok(docs)
    }
}

fn escape(id: &str) -> String {
    let mut name = String::with_capacity(id.len() + EXTENSION.len());

    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(byte as char);
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }

    name.push_str(EXTENSION);
    name
}

/// `None` for files that weren't written by us.
fn unescape(file_name: &str) -> Option<String> {
    let escaped = file_name.strip_suffix(EXTENSION)?;
    let mut bytes = Vec::with_capacity(escaped.len());

    let mut rest = escaped.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        if byte == b'%' {
            let hex = std::str::from_utf8(tail.get(..2)?).ok()?;
            bytes.push(u8::from_str_radix(hex, 16).ok()?);
            rest = &tail[2..];
        } else {
            bytes.push(byte);
            rest = tail;
        }
    }

    String::from_utf8(bytes).ok()
}

impl ViewSource for FileSystemStore {
    fn views(&self) -> &ViewRegistry {
        &self.views
    }
}

impl Store for FileSystemStore {
    type Error = FileStoreError;
}

impl Addressable<DocId> for FileSystemStore {
    type DefaultValue = Value;
}

impl Addressable<UniqueRootAddress> for FileSystemStore {
    type DefaultValue = Opaque;
}

impl Addressable<DesignDoc> for FileSystemStore {
    type DefaultValue = Opaque;
}

impl Addressable<ViewName> for FileSystemStore {
    type DefaultValue = Opaque;
}

impl AddressableRead<Value, DocId> for FileSystemStore {
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Value>, Self> {
        self.read_doc(addr).await
    }
}

impl AddressableRead<Existence, DocId> for FileSystemStore {
    async fn read(&self, addr: &DocId) -> StoreResult<Option<Existence>, Self> {
        match tokio::fs::metadata(self.get_complete_path(addr)).await {
            Ok(_) => Ok(Some(Existence)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl AddressableWrite<Value, DocId> for FileSystemStore {
    async fn write(&self, addr: &DocId, value: &Option<Value>) -> StoreResult<(), Self> {
        let path = self.get_complete_path(addr);

        match value {
            None => match tokio::fs::remove_file(path).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            },
            Some(Value::Object(doc)) => {
                let mut doc = doc.clone();
                doc.insert("_id".to_owned(), Value::String(addr.to_string()));

                tokio::fs::create_dir_all(&*self.base_directory).await?;
                Ok(tokio::fs::write(path, serde_json::to_vec_pretty(&doc)?).await?)
            }
            Some(_) => Err(FileStoreError::NotADocument(addr.clone())),
        }
    }
}

impl AddressableList<UniqueRootAddress> for FileSystemStore {
    type ItemAddress = DocId;

    fn list(&self, _addr: &UniqueRootAddress) -> StoreStream<DocId, Self> {
        let this = self.clone();

        stream::once(async move {
            let entries = match tokio::fs::read_dir(&*this.base_directory).await {
                Ok(entries) => tokio_stream::wrappers::ReadDirStream::new(entries)
                    .map_err(FileStoreError::from)
                    .boxed_local(),
                // Nothing was written yet.
                Err(e) if e.kind() == ErrorKind::NotFound => stream::empty().boxed_local(),
                Err(e) => return Err(e.into()),
            };

            Ok::<_, FileStoreError>(entries)
        })
        .try_flatten()
        .try_filter_map(|entry| async move {
            Ok(entry
                .file_name()
                .to_str()
                .and_then(unescape)
                .map(DocId::from))
        })
        .boxed_local()
    }
}

impl AddressableQuery<ViewQuery, ViewName> for FileSystemStore {
    type Row = ViewRow;

    /// Full scan: reads every document, then evaluates the view.
    fn query(&self, addr: &ViewName, query: ViewQuery) -> StoreStream<ViewRow, Self> {
        let this = self.clone();
        let addr = addr.clone();

        stream::once(async move {
            let docs = this.all_docs().await?;
            let rows = this.views.evaluate(&addr, &docs, &query)?;

            Ok::<_, FileStoreError>(stream::iter(rows).map(Ok))
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

    #[test]
    fn test_escape() {
        assert_eq!(escape("intro::14"), "intro%3A%3A14.json");
        assert_eq!(escape("a/b c"), "a%2Fb%20c.json");
        assert_eq!(unescape("intro%3A%3A14.json").as_deref(), Some("intro::14"));
        assert_eq!(unescape("a%2Fb%20c.json").as_deref(), Some("a/b c"));
        assert_eq!(unescape("README.md"), None);
        assert_eq!(unescape("broken%4.json"), None);
    }

    #[tokio::test]
    async fn test_files() -> Result<(), FileStoreError> {
        let dir = tempfile::tempdir()?;
        let store = FileSystemStore::new(dir.path().join("docs"));

        // The directory doesn't exist yet.
        assert!(store.root().list().try_collect::<Vec<_>>().await?.is_empty());

        let doc = store.doc("intro::1");
        doc.write(&Some(json!({"type": "member", "username": "ann", "email": "a@b.c"})))
            .await?;

        assert!(dir.path().join("docs/intro%3A%3A1.json").exists());
        assert_eq!(doc.getv().await?.unwrap()["_id"], json!("intro::1"));
        assert!(doc.exists().await?);

        let ids = store.root().list().try_collect::<Vec<_>>().await?;
        assert_eq!(ids, vec![DocId::from("intro::1")]);

        let rows = store
            .view("members", "byUsername")
            .rows(ViewQuery::new().key(json!("ann")))
            .await?;
        assert_eq!(rows[0].value, json!("intro::1"));

        doc.write::<Value>(&None).await?;
        assert!(!doc.exists().await?);
        doc.write::<Value>(&None).await?;

        Ok(())
    }
}
