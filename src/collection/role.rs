use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    security::role::Role,
};

/// The roles of a member. Never empty: every member is at least a [`Role::Member`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeSet<Role>", into = "BTreeSet<Role>")]
pub struct RoleCollection(BTreeSet<Role>);

impl TryFrom<BTreeSet<Role>> for RoleCollection {
    type Error = Error;

    fn try_from(mut roles: BTreeSet<Role>) -> Result<Self> {
        if roles.contains(&Role::Guest) {
            return Err(Error::InvalidField(
                "guest can't be among the roles of a member".to_owned(),
            ));
        }

        roles.insert(Role::Member);
        Ok(RoleCollection(roles))
    }
}

impl From<RoleCollection> for BTreeSet<Role> {
    fn from(roles: RoleCollection) -> Self {
        roles.0
    }
}

impl Default for RoleCollection {
    fn default() -> Self {
        RoleCollection(BTreeSet::from([Role::Member]))
    }
}

impl RoleCollection {
    /// Adds a role. Returns `false` if it was already there.
    pub fn grant(&mut self, role: Role) -> Result<bool> {
        if role == Role::Guest {
            return Err(Error::InvalidField(
                "guest is not a role that can be granted".to_owned(),
            ));
        }

        Ok(self.0.insert(role))
    }

    /// Removes a role. Returns `false` if it wasn't there.
    pub fn revoke(&mut self, role: Role) -> Result<bool> {
        if role <= Role::Member {
            return Err(Error::InvalidField(format!("the {role} role can't be revoked")));
        }

        Ok(self.0.remove(&role))
    }

    pub fn exists(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn highest(&self) -> Role {
        self.0.last().copied().unwrap_or(Role::Member)
    }

    /// Whether some held role is superior to `role` (or the same, with `or_equal`).
    pub fn are_superior_than(&self, role: Role, or_equal: bool) -> bool {
        self.0
            .iter()
            .any(|held| held.is_superior_than(role) || (or_equal && *held == role))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grant_revoke() {
        let mut roles = RoleCollection::default();
        assert_eq!(roles.highest(), Role::Member);
        assert!(roles.grant(Role::Guest).is_err());

        assert!(roles.grant(Role::Reviewer).unwrap());
        assert!(!roles.grant(Role::Reviewer).unwrap());
        assert!(roles.grant(Role::Editor).unwrap());
        assert_eq!(roles.highest(), Role::Reviewer);

        assert!(roles.are_superior_than(Role::Editor, false));
        assert!(!roles.are_superior_than(Role::Reviewer, false));
        assert!(roles.are_superior_than(Role::Reviewer, true));

        assert!(roles.revoke(Role::Member).is_err());
        assert!(roles.revoke(Role::Reviewer).unwrap());
        assert!(!roles.revoke(Role::Admin).unwrap());
        assert_eq!(roles.highest(), Role::Editor);
        assert!(roles.exists(Role::Member));

        assert_eq!(
            serde_json::to_value(&roles).unwrap(),
            serde_json::json!(["member", "editor"])
        );
    }

    #[test]
    fn test_deserialize_keeps_member() {
        let mut roles: RoleCollection = serde_json::from_value(serde_json::json!(["admin"])).unwrap();
        assert!(roles.exists(Role::Member));
        assert_eq!(roles.highest(), Role::Admin);

        assert!(roles.revoke(Role::Admin).unwrap());
        assert!(roles.exists(Role::Member));
        assert_eq!(roles.highest(), Role::Member);
        assert_eq!(
            serde_json::to_value(&roles).unwrap(),
            serde_json::json!(["member"])
        );

        let empty: RoleCollection = serde_json::from_value(serde_json::json!([])).unwrap();
        assert_eq!(empty, RoleCollection::default());

        assert!(serde_json::from_value::<RoleCollection>(serde_json::json!(["guest", "member"])).is_err());
    }
}
