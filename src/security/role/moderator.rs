use crate::{
    doc::{state::VersionState, versionable::VersionInfo},
    security::{permission::Permission, user::User},
};

pub struct ViewPostPermission;

impl Permission for ViewPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to read any revision, including the ones in the trash."
    }

    fn check(&self, _user: &User, _context: &VersionInfo) -> bool {
        true
    }
}

pub struct EditPostPermission;

impl Permission for EditPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to edit any post that is not in the trash, even a locked one."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        context.state != VersionState::Deleted
    }
}

pub struct MoveRevisionToTrashPermission;

impl Permission for MoveRevisionToTrashPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to move any revision to the trash."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        context.state != VersionState::Deleted
    }
}

/// Checked against the version to revert to.
pub struct RevertToVersionPermission;

impl Permission for RevertToVersionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to make a previously approved version the current one."
    }

    fn check(&self, _user: &User, target: &VersionInfo) -> bool {
        target.state == VersionState::Approved
    }
}

pub struct RestoreRevisionPermission;

impl Permission for RestoreRevisionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to restore a revision from the trash."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        context.state == VersionState::Deleted
    }
}

pub struct LockPostPermission;

impl Permission for LockPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to lock or unlock a post against edits."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        context.state != VersionState::Deleted
    }
}
