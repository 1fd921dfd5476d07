pub mod import;
pub mod role;
