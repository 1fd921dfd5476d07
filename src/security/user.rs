use super::{permission::Action, role::Role};
use crate::doc::member::Member;

/// Whoever is using the platform: an anonymous guest or a signed-in member.
#[derive(Clone, Debug, PartialEq)]
pub enum User {
    Guest,
    Member(Box<Member>),
}

impl From<Member> for User {
    fn from(member: Member) -> Self {
        User::Member(Box::new(member))
    }
}

impl User {
    pub fn id(&self) -> Option<&str> {
        self.member().map(|member| member.id.as_str())
    }

    pub fn member(&self) -> Option<&Member> {
        match self {
            User::Guest => None,
            User::Member(member) => Some(member),
        }
    }

    /// The most privileged role held.
    pub fn role(&self) -> Role {
        match self {
            User::Guest => Role::Guest,
            User::Member(member) => member.roles.highest(),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, User::Guest)
    }

    pub fn is_member(&self) -> bool {
        !self.is_guest()
    }

    pub fn is_editor(&self) -> bool {
        self.role() >= Role::Editor
    }

    pub fn is_reviewer(&self) -> bool {
        self.role() >= Role::Reviewer
    }

    pub fn is_moderator(&self) -> bool {
        self.role() >= Role::Moderator
    }

    pub fn is_admin(&self) -> bool {
        self.role() >= Role::Admin
    }

    /// Whether this is the member with the given id. Guests match nothing.
    pub fn matches(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Whether the permission object resolved for the user's role allows `A` on `context`.
    pub fn has<A: Action>(&self, context: &A::Context) -> bool {
        A::resolve(self.role()).is_some_and(|permission| permission.check(self, context))
    }
}
