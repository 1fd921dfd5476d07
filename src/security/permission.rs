//! Permission objects and the actions they guard.
//!
//! Every (role, action) pair with a rule has its own object, living in the role's module (see
//! [`crate::security::role`]). An [`Action`] maps a role to the object that role defines for it, if any.

use super::{role::Role, user::User};

/// One authorization rule for one (role, action) pair.
pub trait Permission: Sync {
    /// What the rule is checked against: a revision, another user, a role.
    type Context: ?Sized;

    fn description(&self) -> &'static str;

    fn check(&self, user: &User, context: &Self::Context) -> bool;
}

/// Something a user may or may not be allowed to do.
pub trait Action {
    type Context: ?Sized + 'static;

    const NAME: &'static str;

    /// The permission object `role` itself defines for this action.
    fn permission(role: Role) -> Option<&'static dyn Permission<Context = Self::Context>>;

    /// The permission object that decides for a user with `role`: the one of the first role, walking down
    /// from `role`, that defines one.
    fn resolve(role: Role) -> Option<&'static dyn Permission<Context = Self::Context>> {
        role.inferiors().find_map(Self::permission)
    }
}
