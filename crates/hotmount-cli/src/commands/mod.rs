//! Command implementations for the hotmount CLI.
//!
//! - [`dev`] - Development server with hot reload
//! - [`check`] - Configuration validation
//! - [`schema`] - Configuration schema output
//!
//! Each command provides an `execute` function that takes the parsed
//! command arguments and returns a Result.

pub mod check;
pub mod dev;
pub mod schema;

// Re-export execute functions for convenience
pub use check::execute as check_execute;
pub use dev::execute as dev_execute;
pub use schema::execute as schema_execute;
