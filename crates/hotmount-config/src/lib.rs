//! Configuration model for hotmount.
//!
//! A project describes which application module to mount, which adapter
//! bridges requests into it, and how the development server behaves. The
//! settings live in `hotmount.toml` or in a `[package.metadata.hotmount]`
//! table of the project's `Cargo.toml`, and can be overridden with
//! `HOTMOUNT_*` environment variables.

pub mod config;
pub mod dev;
pub mod discovery;
pub mod error;
pub mod mount;
pub mod validation;

// Re-export main types
pub use config::*;
pub use dev::*;
pub use error::*;
pub use mount::*;

// Re-export discovery and validation
pub use discovery::{ConfigDiscovery, ENV_PREFIX, discover};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
