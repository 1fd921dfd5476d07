//! Versionable documents: content with a lifecycle.
//!
//! Every revision of a piece of content is its own document, `<unversion id>::<version number>`. A new
//! revision starts `created`, goes to peer review when submitted and, once approved, becomes the
//! `current` version. Every transition is allowed or refused by the permission object resolved for the
//! acting user's role (see [`crate::security::action`]).

use serde::{Deserialize, Serialize};

use super::{content::Content, now, state::VersionState, Document};
use crate::{
    address::{next_version_number, DocId, VersionedId},
    error::{Error, Result},
    security::{
        action::{
            ApproveRevision, EditPost, LockPost, MoveRevisionToTrash, RejectRevision,
            RestoreRevision, ReturnForRevision, RevertToVersion, SubmitRevision, ViewPost,
        },
        permission::Action,
        user::User,
    },
};

/// Rejected revisions are purged this long after the rejection.
pub const REJECTED_TTL_SECS: i64 = 10 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub state: VersionState,
    pub unversion_id: String,
    pub version_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_version_number: Option<String>,

    #[serde(default)]
    pub creator_id: Option<String>,
    /// Author name of legacy content whose author isn't a member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<i64>,

    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_state: Option<VersionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dustman_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderated_at: Option<i64>,
}

impl VersionInfo {
    pub fn new(
        unversion_id: impl Into<String>,
        version_number: impl Into<String>,
        creator_id: Option<String>,
    ) -> Self {
        VersionInfo {
            state: VersionState::Created,
            unversion_id: unversion_id.into(),
            version_number: version_number.into(),
            previous_version_number: None,
            creator_id,
            username: None,
            created_at: now(),
            modified_at: None,
            locked: false,
            edit_summary: None,
            prev_state: None,
            dustman_id: None,
            deleted_at: None,
            reject_reason: None,
            moderator_id: None,
            moderated_at: None,
        }
    }

    pub fn versioned_id(&self) -> VersionedId {
        VersionedId::new(self.unversion_id.clone(), self.version_number.clone())
    }

    pub fn id(&self) -> DocId {
        self.versioned_id().into()
    }

    /// Splits `uid::version`, generating a version number when there's none.
    pub fn set_id(&mut self, value: &str) -> Result<()> {
        let id: VersionedId = value
            .parse()
            .map_err(|e| Error::InvalidField(format!("{e}")))?;

        self.unversion_id = id.unversion_id;
        self.version_number = id.version_number;
        Ok(())
    }

    fn moderate(&mut self, user: &User, reason: Option<String>) {
        self.reject_reason = reason;
        self.moderator_id = user.id().map(str::to_owned);
        self.moderated_at = Some(now());
    }
}

/// A revision of some content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Revision<C> {
    #[serde(flatten)]
    pub version: VersionInfo,
    #[serde(flatten)]
    pub content: C,
}

impl<C: Content> Document for Revision<C> {
    const TYPE: &'static str = C::TYPE;

    fn id(&self) -> DocId {
        self.version.id()
    }
}

fn ensure<A: Action<Context = VersionInfo>>(user: &User, info: &VersionInfo) -> Result<()> {
    if user.has::<A>(info) {
        Ok(())
    } else {
        tracing::debug!(
            action = A::NAME,
            user = ?user.id(),
            id = %info.id(),
            state = %info.state,
            "refused"
        );
        Err(Error::not_enough_privileges())
    }
}

impl<C: Content> Revision<C> {
    /// A brand new piece of content, written by a member.
    pub fn create(user: &User, content: C) -> Result<Self> {
        let Some(creator_id) = user.id() else {
            return Err(Error::not_enough_privileges());
        };

        let id = VersionedId::fresh();
        Ok(Revision {
            version: VersionInfo::new(id.unversion_id, id.version_number, Some(creator_id.to_owned())),
            content,
        })
    }

    /// Published content coming from somewhere else, no questions asked.
    pub fn imported(id: VersionedId, creator_id: Option<String>, created_at: i64, content: C) -> Self {
        let mut version = VersionInfo::new(id.unversion_id, id.version_number, creator_id);
        version.state = VersionState::Current;
        version.created_at = created_at;

        Revision { version, content }
    }

    pub fn id(&self) -> DocId {
        self.version.id()
    }

    pub fn versioned_id(&self) -> VersionedId {
        self.version.versioned_id()
    }

    pub fn state(&self) -> VersionState {
        self.version.state
    }

    pub fn set_id(&mut self, value: &str) -> Result<()> {
        self.version.set_id(value)
    }

    pub fn can_view(&self, user: &User) -> bool {
        user.has::<ViewPost>(&self.version)
    }

    pub fn can_edit(&self, user: &User) -> bool {
        user.has::<EditPost>(&self.version)
    }

    fn transition(&mut self, to: VersionState) {
        tracing::debug!(id = %self.id(), from = %self.version.state, %to, "state transition");
        self.version.state = to;
    }

    /// Submits the revision for peer review.
    pub fn submit(&mut self, user: &User) -> Result<()> {
        ensure::<SubmitRevision>(user, &self.version)?;
        self.transition(VersionState::Submitted);
        Ok(())
    }

    /// Makes the revision the current version.
    pub fn approve(&mut self, user: &User) -> Result<()> {
        ensure::<ApproveRevision>(user, &self.version)?;
        self.transition(VersionState::Current);
        self.version.moderate(user, None);
        Ok(())
    }

    /// Asks the author to revise the revision before it can be published.
    pub fn return_for_revision(&mut self, user: &User, reason: impl Into<String>) -> Result<()> {
        ensure::<ReturnForRevision>(user, &self.version)?;
        self.transition(VersionState::Returned);
        self.version.moderate(user, Some(reason.into()));
        Ok(())
    }

    /// The revision is purged [`REJECTED_TTL_SECS`] later.
    pub fn reject(&mut self, user: &User, reason: impl Into<String>) -> Result<()> {
        ensure::<RejectRevision>(user, &self.version)?;
        self.transition(VersionState::Rejected);
        self.version.moderate(user, Some(reason.into()));
        Ok(())
    }

    /// Makes this approved version current again.
    ///
    /// Checked against this revision: it's the version being reverted to. Saving it demotes the
    /// previously current one (see [`crate::repository::DocRepository::save_revision`]).
    pub fn revert(&mut self, user: &User) -> Result<()> {
        ensure::<RevertToVersion>(user, &self.version)?;
        self.transition(VersionState::Current);
        self.version.moderator_id = user.id().map(str::to_owned);
        self.version.moderated_at = Some(now());
        Ok(())
    }

    pub fn move_to_trash(&mut self, user: &User) -> Result<()> {
        ensure::<MoveRevisionToTrash>(user, &self.version)?;

        self.version.prev_state = Some(self.version.state);
        self.transition(VersionState::Deleted);
        self.version.dustman_id = user.id().map(str::to_owned);
        self.version.deleted_at = Some(now());
        Ok(())
    }

    /// Takes the revision out of the trash, back to the state it was in.
    pub fn restore(&mut self, user: &User) -> Result<()> {
        ensure::<RestoreRevision>(user, &self.version)?;

        let previous = self.version.prev_state.take().unwrap_or(VersionState::Created);
        self.transition(previous);
        self.version.dustman_id = None;
        self.version.deleted_at = None;
        Ok(())
    }

    pub fn lock(&mut self, user: &User) -> Result<()> {
        ensure::<LockPost>(user, &self.version)?;
        self.version.locked = true;
        Ok(())
    }

    pub fn unlock(&mut self, user: &User) -> Result<()> {
        ensure::<LockPost>(user, &self.version)?;
        self.version.locked = false;
        Ok(())
    }

    /// An edit: a new `created` revision of the same content.
    pub fn new_revision(
        &self,
        user: &User,
        content: C,
        edit_summary: impl Into<String>,
    ) -> Result<Self> {
        ensure::<EditPost>(user, &self.version)?;

        let mut version = VersionInfo::new(
            self.version.unversion_id.clone(),
            next_version_number(),
            user.id().map(str::to_owned),
        );
        version.previous_version_number = Some(self.version.version_number.clone());
        version.edit_summary = Some(edit_summary.into());

        tracing::debug!(id = %version.id(), previous = %self.id(), "new revision");

        Ok(Revision { version, content })
    }
}
