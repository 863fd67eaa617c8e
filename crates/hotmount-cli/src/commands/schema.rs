//! Schema command implementation.

use hotmount_config::HotmountConfig;

use crate::error::Result;

/// Print the JSON schema of the configuration file to stdout.
pub async fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&HotmountConfig::json_schema())?);
    Ok(())
}
