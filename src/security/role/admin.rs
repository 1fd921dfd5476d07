use super::{member, Role};
use crate::security::{permission::Permission, user::User};

pub struct ImpersonateUserPermission;

impl Permission for ImpersonateUserPermission {
    type Context = User;

    fn description(&self) -> &'static str {
        "Permission to impersonate any user but another admin."
    }

    fn check(&self, user: &User, target: &User) -> bool {
        (target.is_member() && !target.is_admin())
            || member::ImpersonateUserPermission.check(user, target)
    }
}

pub struct GrantRolePermission;

impl Permission for GrantRolePermission {
    type Context = Role;

    fn description(&self) -> &'static str {
        "Permission to grant any role below admin."
    }

    fn check(&self, _user: &User, role: &Role) -> bool {
        Role::Admin.is_superior_than(*role)
    }
}

pub struct RevokeRolePermission;

impl Permission for RevokeRolePermission {
    type Context = Role;

    fn description(&self) -> &'static str {
        "Permission to revoke any role below admin."
    }

    fn check(&self, _user: &User, role: &Role) -> bool {
        Role::Admin.is_superior_than(*role)
    }
}
