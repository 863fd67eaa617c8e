//! Command-line interface definition, built with clap's derive macros.
//!
//! - `hotmount dev` - serve the application with full-restart hot reload
//! - `hotmount check` - validate configuration without starting a server
//! - `hotmount schema` - print the JSON schema of the configuration

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, DevArgs};

/// hotmount - serve a Rust web application with hot reload
#[derive(Parser, Debug)]
#[command(
    name = "hotmount",
    version,
    about = "Serve a Rust web application from a development server with hot reload",
    long_about = "hotmount mounts your application's entry module behind a development server.\n\
                  Every request is bridged through an adapter for your web stack, and file\n\
                  changes reload connected clients and restart the server."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
