use super::guest;
use crate::{
    doc::{state::VersionState, versionable::VersionInfo},
    security::{permission::Permission, user::User},
};

fn is_author(user: &User, context: &VersionInfo) -> bool {
    context
        .creator_id
        .as_deref()
        .is_some_and(|creator| user.matches(creator))
}

pub struct ViewPostPermission;

impl Permission for ViewPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to read a published post, or any revision of one's own that is not in the trash."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        guest::ViewPostPermission.check(user, context)
            || (is_author(user, context) && context.state != VersionState::Deleted)
    }
}

pub struct SubmitRevisionPermission;

impl Permission for SubmitRevisionPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to submit one's own revision for peer review."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        is_author(user, context)
            && matches!(context.state, VersionState::Created | VersionState::Returned)
    }
}

/// Also guards creating a new revision out of an existing one.
pub struct EditPostPermission;

impl Permission for EditPostPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to edit one's own post, unless it's locked, rejected or in the trash."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        is_author(user, context)
            && !context.locked
            && !matches!(context.state, VersionState::Deleted | VersionState::Rejected)
    }
}

pub struct MoveRevisionToTrashPermission;

impl Permission for MoveRevisionToTrashPermission {
    type Context = VersionInfo;

    fn description(&self) -> &'static str {
        "Permission to move to the trash one's own revision that has not been published."
    }

    fn check(&self, user: &User, context: &VersionInfo) -> bool {
        is_author(user, context)
            && matches!(
                context.state,
                VersionState::Created
                    | VersionState::Submitted
                    | VersionState::Returned
                    | VersionState::Rejected
            )
    }
}

pub struct ImpersonateUserPermission;

impl Permission for ImpersonateUserPermission {
    type Context = User;

    fn description(&self) -> &'static str {
        "Permission to browse the site as a guest."
    }

    fn check(&self, _user: &User, target: &User) -> bool {
        target.is_guest()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{doc::member::Member, security::role::Role};

    fn info(state: VersionState, creator: &str) -> VersionInfo {
        let mut info = VersionInfo::new("intro", "1", Some(creator.to_owned()));
        info.state = state;
        info
    }

    #[test]
    fn test_author_rules() {
        let ann = User::from(Member::new("ann", "ann@example.com"));
        let bob = User::from(Member::new("bob", "bob@example.com"));
        let ann_id = ann.id().unwrap().to_owned();

        let returned = info(VersionState::Returned, &ann_id);
        assert!(SubmitRevisionPermission.check(&ann, &returned));
        assert!(!SubmitRevisionPermission.check(&bob, &returned));
        assert!(!SubmitRevisionPermission.check(&ann, &info(VersionState::Current, &ann_id)));

        let mut locked = info(VersionState::Current, &ann_id);
        assert!(EditPostPermission.check(&ann, &locked));
        locked.locked = true;
        assert!(!EditPostPermission.check(&ann, &locked));
        assert!(!EditPostPermission.check(&ann, &info(VersionState::Rejected, &ann_id)));

        assert!(MoveRevisionToTrashPermission.check(&ann, &info(VersionState::Rejected, &ann_id)));
        assert!(!MoveRevisionToTrashPermission.check(&ann, &info(VersionState::Current, &ann_id)));

        assert!(ViewPostPermission.check(&ann, &info(VersionState::Submitted, &ann_id)));
        assert!(!ViewPostPermission.check(&bob, &info(VersionState::Submitted, &ann_id)));
        assert!(ViewPostPermission.check(&bob, &info(VersionState::Current, &ann_id)));
        assert!(!ViewPostPermission.check(&ann, &info(VersionState::Deleted, &ann_id)));

        assert!(ImpersonateUserPermission.check(&ann, &User::Guest));
        assert!(!ImpersonateUserPermission.check(&ann, &bob));
        assert_eq!(ann.role(), Role::Member);
    }
}
