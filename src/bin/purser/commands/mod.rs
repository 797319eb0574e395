//! Command implementations

pub mod completions;
pub mod doctor;
pub mod generate;
pub mod generators;
pub mod init;
pub mod validate;
