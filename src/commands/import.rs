use std::path::Path;

use anyhow::{Context, Result};
use reindex::{
    config::ImportConfig,
    import::{Entity, ImportReport, Importer},
    store::DocumentStore,
};

pub async fn run<S: DocumentStore>(
    store: S,
    config: &ImportConfig,
    dump: &Path,
    entities: &[String],
    limit: Option<usize>,
) -> Result<ImportReport> {
    let entities = Entity::select(entities)?;

    Importer::new(store)
        .with_limit(limit)
        .with_excerpt_length(config.excerpt_length)
        .import_file(dump, &entities)
        .await
        .with_context(|| format!("failed to import {}", dump.display()))
}

#[cfg(test)]
mod test {
    use reindex::stores::memory::MemoryDocStore;

    use super::*;

    #[tokio::test]
    async fn test_run() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("dump.json");
        std::fs::write(
            &dump,
            r#"{"members": [{"idMember": 1, "id": "root", "nickName": "root", "email": "root@example.com"}]}"#,
        )
        .unwrap();

        let store = MemoryDocStore::new();
        let report = run(
            store.clone(),
            &ImportConfig::default(),
            &dump,
            &["users".to_owned()],
            None,
        )
        .await
        .unwrap();

        assert_eq!(report.get(Entity::Users).unwrap().imported, 1);
        assert_eq!(report.to_string(), "users: 1 imported, 0 failed\n");
        assert_eq!(store.len().await, 1);

        assert!(run(store, &ImportConfig::default(), &dump, &["posts".to_owned()], None)
            .await
            .is_err());
    }
}
