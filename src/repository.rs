//! Typed access to the documents of a [`DocumentStore`].

use md5::{Digest, Md5};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    address::{DocId, VersionedId},
    doc::{
        content::Content,
        from_document,
        member::Member,
        now,
        state::VersionState,
        to_document,
        versionable::{Revision, REJECTED_TTL_SECS},
        Document,
    },
    error::{Error, Result},
    security::user::User,
    store::{DocumentStore, StoreEx},
    views::ViewQuery,
};

/// One line of the history of a piece of content.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub version_number: String,
    #[serde(default)]
    pub previous_version_number: Option<String>,
    pub state: VersionState,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub edit_summary: Option<String>,
}

/// `http://gravatar.com/avatar/<md5 of the lowercase email>?d=identicon`
pub fn gravatar(email: &str) -> String {
    let hash = Md5::digest(email.trim().to_lowercase().as_bytes());
    format!("http://gravatar.com/avatar/{hash:x}?d=identicon")
}

/// Version numbers are digit strings, compare them as numbers.
fn version_order(version: &str) -> (usize, &str) {
    (version.len(), version)
}

#[derive(Clone, Debug)]
pub struct DocRepository<S> {
    store: S,
}

impl<S: DocumentStore> DocRepository<S> {
    pub fn new(store: S) -> Self {
        DocRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn load<D: Document>(&self, id: impl Into<DocId>) -> Result<Option<D>> {
        let value: Option<Value> = self.store.doc(id).get().await.map_err(Error::store)?;

        value.map(from_document).transpose()
    }

    pub async fn fetch<D: Document>(&self, id: impl Into<DocId>) -> Result<D> {
        let id = id.into();

        self.load(id.clone()).await?.ok_or(Error::NotFound(id))
    }

    pub async fn exists(&self, id: impl Into<DocId>) -> Result<bool> {
        self.store.doc(id).exists().await.map_err(Error::store)
    }

    pub async fn save<D: Document>(&self, doc: &D) -> Result<()> {
        let value = to_document(doc)?;

        self.store
            .doc(doc.id())
            .write(&Some(value))
            .await
            .map_err(Error::store)
    }

    pub async fn delete(&self, id: impl Into<DocId>) -> Result<()> {
        self.store
            .doc(id)
            .write::<Value>(&None)
            .await
            .map_err(Error::store)
    }

    /// Saves a revision.
    ///
    /// A revision still `created` is submitted on the way. Saving a `current` revision makes the
    /// previously current versions `approved`.
    pub async fn save_revision<C: Content>(&self, revision: &mut Revision<C>) -> Result<()> {
        if revision.state() == VersionState::Created {
            revision.version.state = VersionState::Submitted;
        }

        if revision.state() == VersionState::Current {
            self.demote_current(&revision.version.unversion_id, &revision.id())
                .await?;
        }

        revision.version.modified_at = Some(now());
        self.save(revision).await
    }

    async fn demote_current(&self, unversion_id: &str, except: &DocId) -> Result<()> {
        for mut doc in self.versions(unversion_id).await? {
            let id = doc.get("_id").and_then(Value::as_str).map(DocId::from);

            if doc["state"] != json!(VersionState::Current.as_str()) || id.as_ref() == Some(except) {
                continue;
            }
            let Some(id) = id else { continue };

            tracing::debug!(%id, "demoting the previous current version");
            doc["state"] = json!(VersionState::Approved.as_str());
            self.store
                .doc(id)
                .write(&Some(doc))
                .await
                .map_err(Error::store)?;
        }

        Ok(())
    }

    /// Every revision of a piece of content, as stored.
    pub async fn versions(&self, unversion_id: &str) -> Result<Vec<Value>> {
        self.store
            .view("revisions", "perUnversionId")
            .docs(ViewQuery::new().key_prefix(vec![json!(unversion_id)]))
            .await
            .map_err(Error::store)
    }

    /// The history of a piece of content, the oldest version first.
    pub async fn past_versions_info(&self, unversion_id: &str) -> Result<Vec<VersionSummary>> {
        let rows = self
            .store
            .view("revisions", "perUnversionId")
            .rows(ViewQuery::new().key_prefix(vec![json!(unversion_id)]))
            .await
            .map_err(Error::store)?;

        let mut versions = rows
            .into_iter()
            .map(|row| serde_json::from_value::<VersionSummary>(row.value))
            .collect::<Result<Vec<_>, _>>()?;

        versions.sort_by(|a, b| version_order(&a.version_number).cmp(&version_order(&b.version_number)));
        Ok(versions)
    }

    pub async fn current_revision<C: Content>(&self, unversion_id: &str) -> Result<Option<Revision<C>>> {
        let current = self
            .versions(unversion_id)
            .await?
            .into_iter()
            .filter(|doc| doc["state"] == json!(VersionState::Current.as_str()))
            .max_by(|a, b| {
                let version = |doc: &Value| doc["versionNumber"].as_str().unwrap_or("").to_owned();
                version_order(&version(a)).cmp(&version_order(&version(b)))
            });

        current.map(from_document).transpose()
    }

    /// Makes a previous version current again: the given one, or the most recent `approved` one.
    pub async fn revert<C: Content>(
        &self,
        user: &User,
        unversion_id: &str,
        version_number: Option<&str>,
    ) -> Result<Revision<C>> {
        let version_number = match version_number {
            Some(version_number) => version_number.to_owned(),
            None => self
                .past_versions_info(unversion_id)
                .await?
                .into_iter()
                .rev()
                .find(|version| version.state == VersionState::Approved)
                .map(|version| version.version_number)
                .ok_or_else(|| Error::NotFound(unversion_id.into()))?,
        };

        let mut revision: Revision<C> = self
            .fetch(VersionedId::new(unversion_id, version_number))
            .await?;

        revision.revert(user)?;
        self.save_revision(&mut revision).await?;

        Ok(revision)
    }

    async fn author_names(&self, creator_id: &str) -> Result<Option<Value>> {
        let row = self
            .store
            .view("members", "allNames")
            .first(ViewQuery::new().key(json!(creator_id)))
            .await
            .map_err(Error::store)?;

        Ok(row.map(|row| row.value))
    }

    /// The author's username. Legacy content without a member author keeps the name it had.
    pub async fn author_username<C: Content>(&self, revision: &Revision<C>) -> Result<Option<String>> {
        let Some(creator_id) = &revision.version.creator_id else {
            return Ok(revision.version.username.clone());
        };

        Ok(self
            .author_names(creator_id)
            .await?
            .and_then(|names| names[0].as_str().map(str::to_owned)))
    }

    pub async fn author_gravatar<C: Content>(&self, revision: &Revision<C>) -> Result<Option<String>> {
        let Some(creator_id) = &revision.version.creator_id else {
            return Ok(None);
        };

        Ok(self
            .author_names(creator_id)
            .await?
            .and_then(|names| names[1].as_str().map(gravatar)))
    }

    pub async fn member_by_username(&self, username: &str) -> Result<Option<Member>> {
        let row = self
            .store
            .view("members", "byUsername")
            .first(ViewQuery::new().key(json!(username)))
            .await
            .map_err(Error::store)?;

        match row.and_then(|row| row.value.as_str().map(DocId::from)) {
            Some(id) => self.load(id).await,
            None => Ok(None),
        }
    }

    /// Deletes the revisions rejected more than [`REJECTED_TTL_SECS`] before `now`.
    /// Returns how many were deleted.
    pub async fn purge_rejected(&self, now: i64) -> Result<usize> {
        let rows = self
            .store
            .view("revisions", "perState")
            .rows(ViewQuery::new().key_prefix(vec![json!(VersionState::Rejected.as_str())]))
            .await
            .map_err(Error::store)?;

        let mut purged = 0;
        for row in rows {
            let moderated_at = row.key[1].as_i64().unwrap_or(0);
            let Some(id) = row.id else { continue };

            if now - moderated_at > REJECTED_TTL_SECS {
                tracing::debug!(%id, "purging rejected revision");
                self.delete(id).await?;
                purged += 1;
            }
        }

        Ok(purged)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        doc::{
            content::Article,
            versionable::test::{article, user},
        },
        security::role::Role,
        stores::memory::MemoryDocStore,
    };

    fn repo() -> DocRepository<MemoryDocStore> {
        DocRepository::new(MemoryDocStore::new())
    }

    #[test]
    fn test_gravatar() {
        assert_eq!(
            gravatar("MyEmailAddress@example.com "),
            "http://gravatar.com/avatar/0bc83cb571cd1c50ba6f3e8a78ef1346?d=identicon"
        );
    }

    #[tokio::test]
    async fn test_typed_documents() -> Result<()> {
        let repo = repo();
        let ann = Member::new("ann", "Ann@Example.com");

        repo.save(&ann).await?;
        assert!(repo.exists(ann.id.clone()).await?);
        assert_eq!(repo.fetch::<Member>(ann.id.clone()).await?, ann);
        assert_eq!(repo.member_by_username("ann").await?, Some(ann.clone()));
        assert_eq!(repo.member_by_username("bob").await?, None);

        assert!(matches!(
            repo.load::<Revision<Article>>(ann.id.clone()).await,
            Err(Error::WrongType { expected: "article", .. })
        ));

        repo.delete(ann.id.clone()).await?;
        assert!(matches!(
            repo.fetch::<Member>(ann.id.clone()).await,
            Err(Error::NotFound(_))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_versions() -> Result<()> {
        let repo = repo();
        let ann = Member::new("ann", "Ann@Example.com");
        repo.save(&ann).await?;

        let author = User::from(ann);
        let reviewer = user("rev", &[Role::Reviewer]);
        let moderator = user("mod", &[Role::Moderator]);

        let mut first = Revision::create(&author, article("rust"))?;
        repo.save_revision(&mut first).await?;
        assert_eq!(first.state(), VersionState::Submitted);

        first.approve(&reviewer)?;
        repo.save_revision(&mut first).await?;

        let mut second = first.new_revision(&author, article("rust, again"), "more")?;
        second.submit(&author)?;
        second.approve(&reviewer)?;
        repo.save_revision(&mut second).await?;

        let uid = first.version.unversion_id.clone();
        let history = repo.past_versions_info(&uid).await?;
        assert_eq!(
            history.iter().map(|v| v.state).collect::<Vec<_>>(),
            vec![VersionState::Approved, VersionState::Current]
        );
        assert_eq!(history[1].edit_summary.as_deref(), Some("more"));
        assert_eq!(
            history[1].previous_version_number.as_deref(),
            Some(first.version.version_number.as_str())
        );

        let current: Revision<Article> = repo.current_revision(&uid).await?.unwrap();
        assert_eq!(current.content.title, "rust, again");

        assert!(repo.revert::<Article>(&reviewer, &uid, None).await.is_err());
        let reverted = repo.revert::<Article>(&moderator, &uid, None).await?;
        assert_eq!(reverted.id(), first.id());

        let current: Revision<Article> = repo.current_revision(&uid).await?.unwrap();
        assert_eq!(current.content.title, "rust");
        let second: Revision<Article> = repo.fetch(second.id()).await?;
        assert_eq!(second.state(), VersionState::Approved);

        assert_eq!(repo.author_username(&current).await?.as_deref(), Some("ann"));
        assert_eq!(
            repo.author_gravatar(&current).await?,
            Some(gravatar("ann@example.com"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_purge_rejected() -> Result<()> {
        let repo = repo();
        let author = user("ann", &[]);
        let moderator = user("mod", &[Role::Moderator]);

        let mut rejected = Revision::create(&author, article("spam"))?;
        rejected.submit(&author)?;
        rejected.reject(&moderator, "spam")?;
        repo.save_revision(&mut rejected).await?;

        let mut pending = Revision::create(&author, article("ok"))?;
        repo.save_revision(&mut pending).await?;

        let rejected_at = rejected.version.moderated_at.unwrap();
        assert_eq!(repo.purge_rejected(rejected_at + 60).await?, 0);
        assert_eq!(repo.purge_rejected(rejected_at + REJECTED_TTL_SECS + 1).await?, 1);

        assert!(!repo.exists(rejected.id()).await?);
        assert!(repo.exists(pending.id()).await?);

        Ok(())
    }
}
