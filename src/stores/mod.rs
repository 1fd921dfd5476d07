#[cfg(feature = "fs")]
pub mod fs;

pub mod memory;
