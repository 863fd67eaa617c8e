use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available hotmount subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Serves the configured entry module through its adapter, watches the
    /// project, and restarts the server whenever a file changes.
    Dev(DevArgs),

    /// Validate configuration
    ///
    /// Loads hotmount.toml (or Cargo.toml metadata), checks every field and
    /// that the entry module exists, then prints the derived build settings.
    Check(CheckArgs),

    /// Print the JSON schema of the configuration file
    Schema,
}

/// Arguments for the dev command
#[derive(Args, Debug, Default)]
pub struct DevArgs {
    /// Port to listen on (overrides the config file)
    ///
    /// The next free port is used if this one is taken.
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Host address to bind (overrides the config file)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Project root; relative paths are resolved against it
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Adapter name (overrides the config file)
    #[arg(short, long, value_name = "NAME")]
    pub adapter: Option<String>,

    /// Entry module (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    pub entry: Option<String>,

    /// Explicit config file instead of discovery
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Explicit config file instead of discovery
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
