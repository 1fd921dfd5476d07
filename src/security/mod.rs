//! Roles, permission objects and the users they apply to.

pub mod action;
pub mod guardian;
pub mod permission;
pub mod role;
pub mod user;
