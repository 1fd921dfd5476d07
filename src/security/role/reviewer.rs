use crate::{
    doc::{state::VersionState, versionable::VersionInfo},
    security::{permission::Permission, user::User},
};

fn is_submitted_for_peer_review(context: &VersionInfo) -> bool {
    context.state == VersionState::Submitted
}

pub struct ApproveRevisionPermission;

impl Permission for ApproveRevisionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to approve a revision submitted for peer review, making it the current version."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        is_submitted_for_peer_review(context)
    }
}

pub struct RejectRevisionPermission;

impl Permission for RejectRevisionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to reject a revision submitted for peer review. Reserved to moderators."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        user.is_moderator() && is_submitted_for_peer_review(context)
    }
}

pub struct ReturnForRevisionPermission;

impl Permission for ReturnForRevisionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to return a revision submitted for peer review to its author."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        is_submitted_for_peer_review(context)
    }
}
