use crate::{
    doc::{state::VersionState, versionable::VersionInfo},
    security::{permission::Permission, user::User},
};

pub struct ViewPostPermission;

impl Permission for ViewPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to read a published post."
    }

    fn check(&self, _user: &User, context: &VersionInfo) -> bool {
        context.state == VersionState::Current
    }
}
