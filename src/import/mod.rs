//! One-shot import of the legacy relational dump.
//!
//! Every entity is imported on its own, in a fixed order (members first, so that posts can point to
//! their authors). A document that fails to save is logged and counted, and the import goes on: the
//! resulting [`ImportReport`] tells how many documents of each entity made it.

pub mod legacy;

use std::{
    cmp::Reverse,
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    path::Path,
    str::FromStr,
};

use once_cell::sync::Lazy;
use regex::Regex;

use self::legacy::{LegacyDump, LegacyItem};
use crate::{
    address::{next_version_number, DocId, VersionedId},
    doc::{
        content::{Article, Book, Content, Reply, Tag, Tutorial},
        member::Member,
        now,
        relation::{Classification, Star, Subscription},
        versionable::Revision,
        Document,
    },
    error::{Error, Result},
    repository::DocRepository,
    store::DocumentStore,
    text::{bbcode_to_markdown, html_to_bbcode, purge, truncate},
};

/// Legacy item stereotypes.
pub const ARTICLE: i64 = 2;
pub const BOOK: i64 = 11;

pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Classifications of imported posts all land in this section.
const SECTION: &str = "blog";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Entity {
    Users,
    Articles,
    Books,
    Tags,
    Classifications,
    Favorites,
    Tutorials,
    Subscriptions,
    Replies,
}

impl Entity {
    /// Every entity, in import order.
    pub const ALL: [Entity; 9] = [
        Entity::Users,
        Entity::Articles,
        Entity::Books,
        Entity::Tags,
        Entity::Classifications,
        Entity::Favorites,
        Entity::Tutorials,
        Entity::Subscriptions,
        Entity::Replies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Articles => "articles",
            Entity::Books => "books",
            Entity::Tags => "tags",
            Entity::Classifications => "classifications",
            Entity::Favorites => "favorites",
            Entity::Tutorials => "tutorials",
            Entity::Subscriptions => "subscriptions",
            Entity::Replies => "replies",
        }
    }

    /// Parses a list of entity names into the entities to import, in import order.
    ///
    /// `all`, or no name at all, selects every entity.
    pub fn select<T: AsRef<str>>(names: &[T]) -> Result<Vec<Entity>> {
        let mut selected: BTreeSet<Entity> = BTreeSet::new();

        for name in names {
            match name.as_ref() {
                "all" => selected.extend(Entity::ALL),
                name => {
                    selected.insert(name.parse::<Entity>()?);
                }
            }
        }

        if names.is_empty() {
            selected.extend(Entity::ALL);
        }

        Ok(selected.into_iter().collect())
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| Error::InvalidField(format!("unknown entity {s:?}")))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntityReport {
    pub imported: usize,
    pub failed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport(BTreeMap<Entity, EntityReport>);

impl ImportReport {
    pub fn get(&self, entity: Entity) -> Option<EntityReport> {
        self.0.get(&entity).copied()
    }

    pub fn failed(&self) -> usize {
        self.0.values().map(|report| report.failed).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, EntityReport)> + '_ {
        self.0.iter().map(|(entity, report)| (*entity, *report))
    }
}

impl Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (entity, report) in self.iter() {
            writeln!(
                f,
                "{entity}: {} imported, {} failed",
                report.imported, report.failed
            )?;
        }
        Ok(())
    }
}

static BOOK_SECTIONS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        "isbn",
        "authors",
        "publisher",
        "language",
        "year",
        "pages",
        "attachments",
        "review",
        "positive",
        "negative",
        "vendorLink",
    ]
    .into_iter()
    // Unwrap as the section names are constants
    .map(|name| (name, Regex::new(&format!(r"(?s)\[{name}\](.*?)\[/{name}\]")).unwrap()))
    .collect()
});

/// The non-empty `[name]...[/name]` sections of a legacy book body.
fn book_sections(body: &str) -> BTreeMap<&'static str, String> {
    BOOK_SECTIONS
        .iter()
        .filter_map(|(name, regex)| {
            let section = regex.captures(body)?.get(1)?.as_str().trim();
            (!section.is_empty()).then(|| (*name, section.to_owned()))
        })
        .collect()
}

fn tag_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// "Learning Rust (2/3)" is part of "Learning Rust".
fn tutorial_title(title: &str) -> String {
    title
        .trim_end_matches(|c: char| c.is_ascii_digit() || "()/".contains(c) || c.is_whitespace())
        .to_owned()
}

fn post_type(item: &LegacyItem) -> Option<&'static str> {
    match item.stereotype {
        ARTICLE => Some(Article::TYPE),
        BOOK => Some(Book::TYPE),
        _ => None,
    }
}

/// Imports a [`LegacyDump`] into a store.
pub struct Importer<S> {
    repo: DocRepository<S>,
    limit: Option<usize>,
    excerpt_length: usize,
}

impl<S: DocumentStore> Importer<S> {
    pub fn new(store: S) -> Self {
        Importer {
            repo: DocRepository::new(store),
            limit: None,
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
        }
    }

    /// Caps the number of rows imported per entity. `None` and `Some(0)` both import everything.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit.filter(|limit| *limit > 0);
        self
    }

    pub fn with_excerpt_length(mut self, excerpt_length: usize) -> Self {
        self.excerpt_length = excerpt_length;
        self
    }

    /// Reads the dump at `path` and imports it. An unreadable dump aborts before anything is written.
    pub async fn import_file(&self, path: impl AsRef<Path>, entities: &[Entity]) -> Result<ImportReport> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "reading the legacy dump");

        let dump = LegacyDump::from_file(path)?;
        Ok(self.import(&dump, entities).await)
    }

    pub async fn import(&self, dump: &LegacyDump, entities: &[Entity]) -> ImportReport {
        let mut report = ImportReport::default();

        for &entity in entities {
            tracing::info!(%entity, "importing");

            let entity_report = match entity {
                Entity::Users => self.users(dump).await,
                Entity::Articles => self.articles(dump).await,
                Entity::Books => self.books(dump).await,
                Entity::Tags => self.tags(dump).await,
                Entity::Classifications => self.classifications(dump).await,
                Entity::Favorites => self.favorites(dump).await,
                Entity::Tutorials => self.tutorials(dump).await,
                Entity::Subscriptions => self.subscriptions(dump).await,
                Entity::Replies => self.replies(dump).await,
            };

            tracing::info!(
                %entity,
                imported = entity_report.imported,
                failed = entity_report.failed,
                "done"
            );
            report.0.insert(entity, entity_report);
        }

        report
    }

    fn cap(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }

    async fn save<D: Document>(&self, entity: Entity, doc: &D, report: &mut EntityReport) {
        match self.repo.save(doc).await {
            Ok(()) => report.imported += 1,
            Err(e) => {
                tracing::error!(%entity, id = %doc.id(), error = %e, "failed to import");
                report.failed += 1;
            }
        }
    }

    fn excerpt(&self, markdown: &str) -> String {
        truncate(&purge(markdown), self.excerpt_length)
    }

    /// Items of a stereotype, most recent first.
    fn items<'a>(&self, dump: &'a LegacyDump, stereotype: i64) -> Vec<&'a LegacyItem> {
        let mut items: Vec<_> = dump
            .items
            .iter()
            .filter(|item| item.stereotype == stereotype)
            .collect();

        items.sort_by_key(|item| Reverse(item.date));
        items.truncate(self.cap());
        items
    }

    /// A published revision of `item`, written by its member, or else by its contributor.
    fn post<C: Content>(dump: &LegacyDump, item: &LegacyItem, id: VersionedId, content: C) -> Revision<C> {
        let creator_id = item
            .id_member
            .and_then(|id| dump.member(id))
            .map(|member| member.id.clone());

        let mut revision = Revision::imported(id, creator_id, item.date, content);
        if revision.version.creator_id.is_none() {
            revision.version.username = item
                .contributor_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned);
        }
        revision.version.locked = item.locked;
        revision
    }

    async fn users(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        for legacy in dump.members.iter().take(self.cap()) {
            let mut member = Member::new(legacy.nick_name.trim(), legacy.email.trim());
            member.id = DocId::new(&legacy.id);
            member.first_name = legacy.first_name.clone();
            member.last_name = legacy.last_name.clone();
            member.password = legacy.password.clone();
            member.sex = legacy.sex.clone();
            member.birthday = legacy.birthday;
            member.ip = legacy.ip_address.clone();
            member.created_at = legacy.creation_date;
            member.confirmation_hash = legacy.confirmation_hash.clone();
            if legacy.confirmed {
                member.confirm();
            }

            self.save(Entity::Users, &member, &mut report).await;
        }

        report
    }

    async fn articles(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        for item in self.items(dump, ARTICLE) {
            let body = bbcode_to_markdown(&html_to_bbcode(&item.body));
            let article = Article {
                title: item.title.trim().to_owned(),
                excerpt: Some(self.excerpt(&body)),
                body,
                published_at: Some(item.date),
                hits: item.hit_num,
                downloads: item.download_num,
            };

            let id = VersionedId::new(&item.id, next_version_number());
            let revision = Self::post(dump, item, id, article);
            self.save(Entity::Articles, &revision, &mut report).await;
        }

        report
    }

    async fn books(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        for item in self.items(dump, BOOK) {
            let mut sections = book_sections(&item.body);
            let review = sections
                .remove("review")
                .unwrap_or_else(|| item.body.clone());
            let body = bbcode_to_markdown(&review);

            let book = Book {
                title: item.title.trim().to_owned(),
                excerpt: Some(self.excerpt(&body)),
                body,
                published_at: Some(item.date),
                hits: item.hit_num,
                downloads: item.download_num,
                isbn: sections.remove("isbn"),
                authors: sections.remove("authors"),
                publisher: sections.remove("publisher"),
                language: sections.remove("language"),
                year: sections.remove("year"),
                pages: sections.remove("pages"),
                attachments: sections.remove("attachments"),
                vendor_link: sections.remove("vendorLink"),
                positive: sections.remove("positive").map(|s| bbcode_to_markdown(&s)),
                negative: sections.remove("negative").map(|s| bbcode_to_markdown(&s)),
            };

            let id = VersionedId::new(&item.id, next_version_number());
            let revision = Self::post(dump, item, id, book);
            self.save(Entity::Books, &revision, &mut report).await;
        }

        report
    }

    async fn tags(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();
        let creator_id = dump.member(1).map(|member| member.id.clone());

        for category in dump.categories.iter().take(self.cap()) {
            let tag = Tag {
                id: DocId::new(&category.id),
                name: tag_name(&category.name),
                creator_id: creator_id.clone(),
                created_at: category.last_update,
            };

            self.save(Entity::Tags, &tag, &mut report).await;
        }

        report
    }

    async fn classifications(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        let classifications = dump
            .item_categories
            .iter()
            .filter_map(|link| {
                let item = dump.item(link.id_item)?;
                let category = dump.category(link.id_category)?;
                let post_type = post_type(item)?;

                Some(Classification::new(
                    &item.id,
                    post_type,
                    SECTION,
                    &category.id,
                    item.date,
                ))
            })
            .take(self.cap());

        for classification in classifications {
            self.save(Entity::Classifications, &classification, &mut report)
                .await;
        }

        report
    }

    async fn favorites(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        let stars = dump
            .favourites
            .iter()
            .filter_map(|favourite| {
                let item = dump.item(favourite.id_item)?;
                let member = dump.member(favourite.id_member)?;
                post_type(item)?;

                let mut star = Star::new(&item.id, &member.id);
                star.created_at = favourite.date.unwrap_or_else(now);
                Some(star)
            })
            .take(self.cap());

        for star in stars {
            self.save(Entity::Favorites, &star, &mut report).await;
        }

        report
    }

    async fn tutorials(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        let mut series: BTreeMap<&str, Vec<&LegacyItem>> = BTreeMap::new();
        for item in dump.items.iter().filter(|item| item.stereotype == ARTICLE) {
            if let Some(code) = item.correlation_code.as_deref().filter(|c| !c.is_empty()) {
                series.entry(code).or_default().push(item);
            }
        }

        let mut series: Vec<_> = series
            .into_values()
            .filter(|items| items.len() > 1)
            .map(|mut items| {
                items.sort_by_key(|item| item.date);
                items
            })
            .collect();
        series.sort_by_key(|items| items[0].date);

        for items in series.into_iter().take(self.cap()) {
            let first = items[0];
            let mut tutorial = Tutorial {
                title: tutorial_title(&first.title),
                posts: Vec::new(),
                hits: items.iter().map(|item| item.hit_num).sum(),
            };
            for item in &items {
                tutorial.add_post(item.id.clone());
            }

            let revision = Self::post(dump, first, VersionedId::fresh(), tutorial);
            self.save(Entity::Tutorials, &revision, &mut report).await;
        }

        report
    }

    async fn subscriptions(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        let subscriptions = dump
            .threads
            .iter()
            .filter_map(|thread| {
                let item = dump.item(thread.id_item)?;
                let member = dump.member(thread.id_member)?;

                let mut subscription = Subscription::new(&item.id, &member.id);
                subscription.created_at = thread.creation_time.unwrap_or_else(now);
                Some(subscription)
            })
            .take(self.cap());

        for subscription in subscriptions {
            self.save(Entity::Subscriptions, &subscription, &mut report)
                .await;
        }

        report
    }

    async fn replies(&self, dump: &LegacyDump) -> EntityReport {
        let mut report = EntityReport::default();

        let mut comments: Vec<_> = dump.comments.iter().collect();
        comments.sort_by_key(|comment| Reverse(comment.date));

        let replies = comments
            .into_iter()
            .filter_map(|comment| {
                let item = dump.item(comment.id_item)?;
                let member = dump.member(comment.id_member)?;

                let reply = Reply {
                    post_id: item.id.clone(),
                    body: bbcode_to_markdown(&html_to_bbcode(&comment.body)),
                };
                Some(Revision::imported(
                    VersionedId::fresh(),
                    Some(member.id.clone()),
                    comment.date,
                    reply,
                ))
            })
            .take(self.cap());

        for reply in replies {
            self.save(Entity::Replies, &reply, &mut report).await;
        }

        report
    }
}

#[cfg(test)]
mod test {
    use futures::TryStreamExt;
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        doc::state::VersionState, store::StoreEx, stores::memory::MemoryDocStore,
        wrappers::filter_docs::hide_trashed,
    };

    const DUMP: &str = r#"{
        "members": [
            {"idMember": 1, "id": "root", "nickName": "root", "email": "root@example.com", "confirmed": 1},
            {"idMember": 2, "id": "ann", "nickName": "ann", "email": "ann@example.com",
             "confirmationHash": "abc", "confirmed": 0, "creationDate": 1000}
        ],
        "items": [
            {"idItem": 10, "id": "rust-1", "stereotype": 2, "idMember": 2, "title": "Learning Rust (1/2)",
             "body": "<p>Hello <b>world</b></p>", "date": 100, "hitNum": 5, "downloadNum": 1,
             "correlationCode": "rust"},
            {"idItem": 11, "id": "rust-2", "stereotype": 2, "contributorName": " Guest Writer ",
             "title": "Learning Rust (2/2)", "body": "Part two", "date": 200, "hitNum": 7,
             "correlationCode": "rust"},
            {"idItem": 12, "id": "dune", "stereotype": 11, "idMember": 1, "title": "Dune",
             "body": "[isbn]978-0441013593[/isbn][authors]Frank Herbert[/authors][review]A [b]classic[/b].[/review][positive]Worlds[/positive][negative][/negative]",
             "date": 300, "hitNum": 3},
            {"idItem": 13, "id": "news", "stereotype": 5, "title": "News", "date": 400}
        ],
        "categories": [
            {"idCategory": 1, "id": "tag-sf", "name": "Science Fiction", "lastUpdate": 50}
        ],
        "itemCategories": [
            {"idItem": 12, "idCategory": 1},
            {"idItem": 13, "idCategory": 1},
            {"idItem": 99, "idCategory": 1}
        ],
        "favourites": [
            {"idItem": 10, "idMember": 1, "date": 150},
            {"idItem": 13, "idMember": 1}
        ],
        "threads": [
            {"idItem": 10, "idMember": 2, "creationTime": 120}
        ],
        "comments": [
            {"idComment": 1, "idItem": 10, "idMember": 1, "date": 130, "body": "<i>Nice</i>"}
        ]
    }"#;

    async fn docs_of_type(store: &MemoryDocStore, typ: &str) -> Vec<Value> {
        let ids: Vec<DocId> = store.root().list().try_collect().await.unwrap();

        let mut docs = Vec::new();
        for id in ids {
            let doc: Value = store.doc(id).get().await.unwrap().unwrap();
            if doc["type"] == json!(typ) {
                docs.push(doc);
            }
        }
        docs
    }

    #[test]
    fn test_select() {
        assert_eq!(Entity::select::<&str>(&[]).unwrap(), Entity::ALL.to_vec());
        assert_eq!(Entity::select(&["all"]).unwrap(), Entity::ALL.to_vec());
        assert_eq!(
            Entity::select(&["replies", "users", "replies"]).unwrap(),
            vec![Entity::Users, Entity::Replies]
        );
        assert!(matches!(
            Entity::select(&["users", "widgets"]),
            Err(Error::InvalidField(_))
        ));
    }

    #[test]
    fn test_helpers() {
        assert_eq!(tag_name(" Science Fiction "), "science-fiction");
        assert_eq!(tutorial_title("Learning Rust (12/20) "), "Learning Rust");

        let sections = book_sections("[isbn] 123 [/isbn][year][/year][vendorLink]http://x[/vendorLink]");
        assert_eq!(sections.get("isbn").map(String::as_str), Some("123"));
        assert_eq!(sections.get("vendorLink").map(String::as_str), Some("http://x"));
        assert!(!sections.contains_key("year"));
    }

    #[tokio::test]
    async fn test_import_all() {
        let store = MemoryDocStore::new();
        let dump = LegacyDump::from_str(DUMP).unwrap();

        let report = Importer::new(store.clone())
            .import(&dump, &Entity::ALL)
            .await;

        let imported = |entity| report.get(entity).unwrap().imported;
        assert_eq!(imported(Entity::Users), 2);
        assert_eq!(imported(Entity::Articles), 2);
        assert_eq!(imported(Entity::Books), 1);
        assert_eq!(imported(Entity::Tags), 1);
        assert_eq!(imported(Entity::Classifications), 1);
        assert_eq!(imported(Entity::Favorites), 1);
        assert_eq!(imported(Entity::Tutorials), 1);
        assert_eq!(imported(Entity::Subscriptions), 1);
        assert_eq!(imported(Entity::Replies), 1);
        assert_eq!(report.failed(), 0);

        let repo = DocRepository::new(store.clone());

        let root: Member = repo.fetch("root").await.unwrap();
        assert!(root.confirmed);
        let ann: Member = repo.fetch("ann").await.unwrap();
        assert!(!ann.confirmed);
        assert_eq!(ann.confirmation_hash.as_deref(), Some("abc"));
        assert_eq!(ann.created_at, 1000);

        let first: Revision<Article> = repo.current_revision("rust-1").await.unwrap().unwrap();
        assert_eq!(first.state(), VersionState::Current);
        assert_eq!(first.version.creator_id.as_deref(), Some("ann"));
        assert_eq!(first.content.body, "Hello **world**");
        assert_eq!(first.content.excerpt.as_deref(), Some("Hello world"));
        assert_eq!((first.content.hits, first.content.downloads), (5, 1));

        let second: Revision<Article> = repo.current_revision("rust-2").await.unwrap().unwrap();
        assert_eq!(second.version.creator_id, None);
        assert_eq!(second.version.username.as_deref(), Some("Guest Writer"));
        assert_eq!(
            repo.author_username(&second).await.unwrap().as_deref(),
            Some("Guest Writer")
        );

        let dune: Revision<Book> = repo.current_revision("dune").await.unwrap().unwrap();
        assert_eq!(dune.content.isbn.as_deref(), Some("978-0441013593"));
        assert_eq!(dune.content.authors.as_deref(), Some("Frank Herbert"));
        assert_eq!(dune.content.body, "A **classic**.");
        assert_eq!(dune.content.positive.as_deref(), Some("Worlds"));
        assert_eq!(dune.content.negative, None);

        let tag: Tag = repo.fetch("tag-sf").await.unwrap();
        assert_eq!(tag.name, "science-fiction");
        assert_eq!(tag.creator_id.as_deref(), Some("root"));

        let classifications = docs_of_type(&store, "classification").await;
        assert_eq!(classifications[0]["postId"], json!("dune"));
        assert_eq!(classifications[0]["postType"], json!("book"));
        assert_eq!(classifications[0]["postSection"], json!("blog"));

        let stars = docs_of_type(&store, "star").await;
        assert_eq!(stars[0]["itemId"], json!("rust-1"));
        assert_eq!(stars[0]["createdAt"], json!(150));

        let tutorials = docs_of_type(&store, "tutorial").await;
        assert_eq!(tutorials[0]["title"], json!("Learning Rust"));
        assert_eq!(tutorials[0]["posts"], json!(["rust-1", "rust-2"]));
        assert_eq!(tutorials[0]["hits"], json!(12));
        assert_eq!(tutorials[0]["creatorId"], json!("ann"));

        let replies = docs_of_type(&store, "reply").await;
        assert_eq!(replies[0]["postId"], json!("rust-1"));
        assert_eq!(replies[0]["body"], json!("*Nice*"));
        assert_eq!(replies[0]["state"], json!("current"));
    }

    #[tokio::test]
    async fn test_limit() {
        let store = MemoryDocStore::new();
        let dump = LegacyDump::from_str(DUMP).unwrap();

        let report = Importer::new(store.clone())
            .with_limit(Some(1))
            .import(&dump, &[Entity::Users, Entity::Articles])
            .await;

        assert_eq!(report.get(Entity::Users).unwrap().imported, 1);
        assert_eq!(report.get(Entity::Articles).unwrap().imported, 1);
        assert_eq!(report.get(Entity::Books), None);

        // Most recent first
        let repo = DocRepository::new(store);
        assert!(repo
            .current_revision::<Article>("rust-2")
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .current_revision::<Article>("rust-1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_zero_limit_imports_everything() {
        let store = MemoryDocStore::new();
        let dump = LegacyDump::from_str(DUMP).unwrap();

        let report = Importer::new(store)
            .with_limit(Some(0))
            .import(&dump, &[Entity::Users, Entity::Articles])
            .await;

        assert_eq!(report.get(Entity::Users).unwrap().imported, 2);
        assert_eq!(report.get(Entity::Articles).unwrap().imported, 2);
    }

    #[tokio::test]
    async fn test_failures_are_counted() {
        let store = MemoryDocStore::new();
        store
            .doc("tag-sf")
            .write(&Some(json!({"type": "tag", "state": "deleted"})))
            .await
            .unwrap();

        let dump = LegacyDump::from_str(DUMP).unwrap();
        let report = Importer::new(hide_trashed(store))
            .import(&dump, &[Entity::Users, Entity::Tags])
            .await;

        assert_eq!(report.get(Entity::Users).unwrap().imported, 2);
        assert_eq!(
            report.get(Entity::Tags).unwrap(),
            EntityReport {
                imported: 0,
                failed: 1
            }
        );
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_dump() {
        let store = MemoryDocStore::new();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = Importer::new(store.clone())
            .import_file(&path, &Entity::ALL)
            .await;

        assert!(matches!(result, Err(Error::Json(_))));
        assert!(store.is_empty().await);
    }
}
