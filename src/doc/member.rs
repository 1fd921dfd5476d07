use serde::{Deserialize, Serialize};

use super::{now, Document};
use crate::{
    address::DocId,
    collection::role::RoleCollection,
    error::{Error, Result},
    security::{
        action::{GrantRole, RevokeRole},
        role::Role,
        user::User,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: DocId,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Password hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_hash: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub roles: RoleCollection,
}

impl Member {
    pub fn new(username: &str, email: &str) -> Self {
        Member {
            id: DocId::random(),
            username: username.to_owned(),
            email: email.to_owned(),
            first_name: None,
            last_name: None,
            password: None,
            birthday: None,
            sex: None,
            ip: None,
            created_at: now(),
            confirmation_hash: None,
            confirmed: false,
            roles: Default::default(),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        self.id.as_str() == id
    }

    pub fn confirm(&mut self) {
        self.confirmed = true;
        self.confirmation_hash = None;
    }

    /// Grants a role on behalf of `user`. Returns `false` if the member already had it.
    pub fn grant_role(&mut self, user: &User, role: Role) -> Result<bool> {
        if !user.has::<GrantRole>(&role) {
            return Err(Error::not_enough_privileges());
        }

        let granted = self.roles.grant(role)?;
        tracing::debug!(member = %self.username, %role, granted, "grant role");
        Ok(granted)
    }

    /// Revokes a role on behalf of `user`. Returns `false` if the member didn't have it.
    pub fn revoke_role(&mut self, user: &User, role: Role) -> Result<bool> {
        if !user.has::<RevokeRole>(&role) {
            return Err(Error::not_enough_privileges());
        }

        let revoked = self.roles.revoke(role)?;
        tracing::debug!(member = %self.username, %role, revoked, "revoke role");
        Ok(revoked)
    }
}

impl Document for Member {
    const TYPE: &'static str = "member";

    fn id(&self) -> DocId {
        self.id.clone()
    }
}
