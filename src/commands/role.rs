//! Role management from the console. Whoever runs the binary acts as the system, no permission checks.

use anyhow::{anyhow, Context, Result};
use reindex::{
    doc::member::Member, repository::DocRepository, security::role::Role, store::DocumentStore,
};

async fn member<S: DocumentStore>(repo: &DocRepository<S>, username: &str) -> Result<Member> {
    repo.member_by_username(username)
        .await
        .with_context(|| format!("failed to look up {username}"))?
        .ok_or_else(|| anyhow!("there is no member named {username}"))
}

pub async fn grant<S: DocumentStore>(repo: &DocRepository<S>, role: Role, username: &str) -> Result<String> {
    let mut member = member(repo, username).await?;

    if member.roles.are_superior_than(role, false) {
        return Ok("A superior role already exists for the member.".to_owned());
    }

    if !member.roles.grant(role)? {
        return Ok(format!("{username} is already {role}."));
    }

    repo.save(&member)
        .await
        .with_context(|| format!("failed to save {username}"))?;
    tracing::info!(%username, %role, "role granted");

    Ok(format!("Granted {role} to {username}."))
}

pub async fn revoke<S: DocumentStore>(repo: &DocRepository<S>, role: Role, username: &str) -> Result<String> {
    let mut member = member(repo, username).await?;

    if !member.roles.revoke(role)? {
        return Ok(format!("{username} is not {role}."));
    }

    repo.save(&member)
        .await
        .with_context(|| format!("failed to save {username}"))?;
    tracing::info!(%username, %role, "role revoked");

    Ok(format!("Revoked {role} from {username}."))
}

pub async fn roles<S: DocumentStore>(repo: &DocRepository<S>, username: &str) -> Result<String> {
    let member = member(repo, username).await?;

    Ok(member
        .roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", "))
}

#[cfg(test)]
mod test {
    use reindex::stores::memory::MemoryDocStore;

    use super::*;

    async fn repo_with_ann() -> DocRepository<MemoryDocStore> {
        let repo = DocRepository::new(MemoryDocStore::new());
        repo.save(&Member::new("ann", "ann@example.com")).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_grant_and_revoke() {
        let repo = repo_with_ann().await;

        assert_eq!(roles(&repo, "ann").await.unwrap(), "member");
        assert_eq!(
            grant(&repo, Role::Editor, "ann").await.unwrap(),
            "Granted editor to ann."
        );
        assert_eq!(
            grant(&repo, Role::Editor, "ann").await.unwrap(),
            "ann is already editor."
        );
        assert_eq!(roles(&repo, "ann").await.unwrap(), "member, editor");

        assert_eq!(
            revoke(&repo, Role::Editor, "ann").await.unwrap(),
            "Revoked editor from ann."
        );
        assert_eq!(
            revoke(&repo, Role::Editor, "ann").await.unwrap(),
            "ann is not editor."
        );
        assert!(revoke(&repo, Role::Member, "ann").await.is_err());
    }

    #[tokio::test]
    async fn test_superior_role() {
        let repo = repo_with_ann().await;

        grant(&repo, Role::Moderator, "ann").await.unwrap();
        assert_eq!(
            grant(&repo, Role::Reviewer, "ann").await.unwrap(),
            "A superior role already exists for the member."
        );
        assert_eq!(roles(&repo, "ann").await.unwrap(), "member, moderator");
    }

    #[tokio::test]
    async fn test_unknown_member() {
        let repo = repo_with_ann().await;

        let err = grant(&repo, Role::Admin, "bob").await.unwrap_err();
        assert_eq!(err.to_string(), "there is no member named bob");
    }
}
