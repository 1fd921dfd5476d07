use super::{
    permission::{Action, Permission},
    role::{admin, editor, guest, member, moderator, reviewer, Role},
    user::User,
};
use crate::doc::versionable::VersionInfo;

type PostPermission = &'static dyn Permission<Context = VersionInfo>;

pub struct ViewPost;

impl Action for ViewPost {
    type Context = VersionInfo;
    const NAME: &'static str = "view post";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Guest => Some(&guest::ViewPostPermission),
            Role::Member => Some(&member::ViewPostPermission),
            Role::Moderator => Some(&moderator::ViewPostPermission),
            _ => None,
        }
    }
}

pub struct SubmitRevision;

impl Action for SubmitRevision {
    type Context = VersionInfo;
    const NAME: &'static str = "submit revision";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Member => Some(&member::SubmitRevisionPermission),
            _ => None,
        }
    }
}

pub struct EditPost;

impl Action for EditPost {
    type Context = VersionInfo;
    const NAME: &'static str = "edit post";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Member => Some(&member::EditPostPermission),
            Role::Editor => Some(&editor::EditPostPermission),
            Role::Moderator => Some(&moderator::EditPostPermission),
            _ => None,
        }
    }
}

pub struct MoveRevisionToTrash;

impl Action for MoveRevisionToTrash {
    type Context = VersionInfo;
    const NAME: &'static str = "move revision to trash";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Member => Some(&member::MoveRevisionToTrashPermission),
            Role::Moderator => Some(&moderator::MoveRevisionToTrashPermission),
            _ => None,
        }
    }
}

pub struct ApproveRevision;

impl Action for ApproveRevision {
    type Context = VersionInfo;
    const NAME: &'static str = "approve revision";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Reviewer => Some(&reviewer::ApproveRevisionPermission),
            _ => None,
        }
    }
}

pub struct RejectRevision;

impl Action for RejectRevision {
    type Context = VersionInfo;
    const NAME: &'static str = "reject revision";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Reviewer => Some(&reviewer::RejectRevisionPermission),
            _ => None,
        }
    }
}

pub struct ReturnForRevision;

impl Action for ReturnForRevision {
    type Context = VersionInfo;
    const NAME: &'static str = "return for revision";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Reviewer => Some(&reviewer::ReturnForRevisionPermission),
            _ => None,
        }
    }
}

pub struct RevertToVersion;

impl Action for RevertToVersion {
    type Context = VersionInfo;
    const NAME: &'static str = "revert to version";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Moderator => Some(&moderator::RevertToVersionPermission),
            _ => None,
        }
    }
}

pub struct RestoreRevision;

impl Action for RestoreRevision {
    type Context = VersionInfo;
    const NAME: &'static str = "restore revision";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Moderator => Some(&moderator::RestoreRevisionPermission),
            _ => None,
        }
    }
}

pub struct LockPost;

impl Action for LockPost {
    type Context = VersionInfo;
    const NAME: &'static str = "lock post";

    fn permission(role: Role) -> Option<PostPermission> {
        match role {
            Role::Moderator => Some(&moderator::LockPostPermission),
            _ => None,
        }
    }
}

pub struct ImpersonateUser;

impl Action for ImpersonateUser {
    type Context = User;
    const NAME: &'static str = "impersonate user";

    fn permission(role: Role) -> Option<&'static dyn Permission<Context = User>> {
        match role {
            Role::Member => Some(&member::ImpersonateUserPermission),
            Role::Admin => Some(&admin::ImpersonateUserPermission),
            _ => None,
        }
    }
}

pub struct GrantRole;

impl Action for GrantRole {
    type Context = Role;
    const NAME: &'static str = "grant role";

    fn permission(role: Role) -> Option<&'static dyn Permission<Context = Role>> {
        match role {
            Role::Admin => Some(&admin::GrantRolePermission),
            _ => None,
        }
    }
}

pub struct RevokeRole;

impl Action for RevokeRole {
    type Context = Role;
    const NAME: &'static str = "revoke role";

    fn permission(role: Role) -> Option<&'static dyn Permission<Context = Role>> {
        match role {
            Role::Admin => Some(&admin::RevokeRolePermission),
            _ => None,
        }
    }
}
