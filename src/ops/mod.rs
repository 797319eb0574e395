//! High-level operations.
//!
//! This module contains the implementation of Purser commands.

pub mod doctor;
pub mod generate;

pub use doctor::{doctor, format_report, CheckResult, DoctorOptions, DoctorReport};
pub use generate::{
    prepare, run, GenerateOptions, GenerateOutcome, PreparedGenerate, DEFAULT_OUTPUT,
};
