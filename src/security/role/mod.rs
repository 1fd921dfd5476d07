//! Roles, and the permission objects each of them defines.
//!
//! A role only defines the permission objects for the actions it changes. Resolution walks down
//! [`Role::inferiors`], so an admin gets every moderator rule it doesn't override, and so on.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod admin;
pub mod editor;
pub mod guest;
pub mod member;
pub mod moderator;
pub mod reviewer;

/// Totally ordered, from the least to the most privileged.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Member,
    Editor,
    Reviewer,
    Moderator,
    Admin,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Guest,
        Role::Member,
        Role::Editor,
        Role::Reviewer,
        Role::Moderator,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Member => "member",
            Role::Editor => "editor",
            Role::Reviewer => "reviewer",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn is_superior_than(&self, other: Role) -> bool {
        *self > other
    }

    /// This role and every role below it, the most privileged first.
    pub fn inferiors(&self) -> impl Iterator<Item = Role> {
        let this = *self;
        Role::ALL.into_iter().rev().filter(move |role| *role <= this)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::InvalidField(format!("unknown role {s:?}")))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_order() {
        assert!(Role::Admin.is_superior_than(Role::Moderator));
        assert!(Role::Reviewer.is_superior_than(Role::Editor));
        assert!(!Role::Member.is_superior_than(Role::Member));

        assert_eq!(
            Role::Editor.inferiors().collect::<Vec<_>>(),
            vec![Role::Editor, Role::Member, Role::Guest]
        );
        assert_eq!(Role::Guest.inferiors().collect::<Vec<_>>(), vec![Role::Guest]);
    }

    #[test]
    fn test_names() {
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert_eq!(Role::Reviewer.to_string(), "reviewer");
        assert!("overlord".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
