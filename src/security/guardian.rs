use super::{action::ImpersonateUser, user::User};
use crate::error::{Error, Result};

/// Holds the user of the session, and whom they are acting as.
#[derive(Clone, Debug)]
pub struct Guardian {
    user: User,
    impersonator: Option<User>,
}

impl Guardian {
    pub fn new(user: User) -> Self {
        Guardian {
            user,
            impersonator: None,
        }
    }

    /// The user the session is acting as.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The signed-in user, while impersonating someone else.
    pub fn impersonator(&self) -> Option<&User> {
        self.impersonator.as_ref()
    }

    /// Admins can act as any non-admin member, members can act as a guest.
    pub fn impersonate(&mut self, target: User) -> Result<()> {
        let actual = self.impersonator.as_ref().unwrap_or(&self.user);

        if !actual.has::<ImpersonateUser>(&target) {
            return Err(Error::NotEnoughPrivileges(
                "insufficient privileges to impersonate another user".to_owned(),
            ));
        }

        tracing::debug!(user = ?actual.id(), target = ?target.id(), "impersonating");

        let actual = self.impersonator.take().unwrap_or_else(|| self.user.clone());
        self.impersonator = Some(actual);
        self.user = target;

        Ok(())
    }

    /// Back to the signed-in user.
    pub fn stop_impersonating(&mut self) {
        if let Some(user) = self.impersonator.take() {
            self.user = user;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{doc::member::Member, security::role::Role};

    fn member(username: &str, role: Option<Role>) -> User {
        let mut member = Member::new(username, &format!("{username}@example.com"));
        if let Some(role) = role {
            member.roles.grant(role).unwrap();
        }
        User::from(member)
    }

    #[test]
    fn test_impersonate() {
        let admin = member("root", Some(Role::Admin));
        let other_admin = member("boss", Some(Role::Admin));
        let moderator = member("mod", Some(Role::Moderator));

        let mut guardian = Guardian::new(admin.clone());
        assert!(matches!(
            guardian.impersonate(other_admin),
            Err(Error::NotEnoughPrivileges(_))
        ));

        guardian.impersonate(moderator.clone()).unwrap();
        assert_eq!(guardian.user(), &moderator);
        assert_eq!(guardian.impersonator(), Some(&admin));

        // Still judged as the admin.
        guardian.impersonate(User::Guest).unwrap();
        assert!(guardian.user().is_guest());
        assert_eq!(guardian.impersonator(), Some(&admin));

        guardian.stop_impersonating();
        assert_eq!(guardian.user(), &admin);
    }

    #[test]
    fn test_members_only_become_guests() {
        let ann = member("ann", None);
        let mut guardian = Guardian::new(ann.clone());

        assert!(guardian.impersonate(member("bob", None)).is_err());
        guardian.impersonate(User::Guest).unwrap();

        let mut guardian = Guardian::new(User::Guest);
        assert!(guardian.impersonate(User::Guest).is_err());
        assert!(guardian.impersonate(ann).is_err());
    }
}
