use super::member;
use crate::{
    doc::{state::VersionState, versionable::VersionInfo},
    security::{permission::Permission, user::User},
};

pub struct EditPostPermission;

impl Permission for EditPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to edit one's own posts, and any published post that is not locked."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        member::EditPostPermission.check(user, context)
            || (!context.locked && context.state == VersionState::Current)
    }
}
