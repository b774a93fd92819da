//! CLI Commands

pub mod notify;
pub mod run;
pub mod summary;
