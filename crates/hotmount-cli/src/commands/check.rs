//! Check command implementation.
//!
//! Validates configuration without starting a server.

use hotmount::{AdapterConfig, AdapterRegistry, MountPlugin, SetupError};
use hotmount_config::{ConfigDiscovery, ConfigValidator, FsValidator};

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load the discovered or given config file
/// 2. Validate fields and check that the entry module exists
/// 3. Resolve the adapter against the registry
/// 4. Print the derived build settings
///
/// # Errors
///
/// Returns errors for invalid configuration, missing files or an unknown
/// adapter.
pub async fn execute(args: CheckArgs, registry: AdapterRegistry) -> Result<()> {
    ui::info("Checking configuration...");

    let cwd = match args.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let discovery = ConfigDiscovery::new(&cwd);
    let config = match &args.config {
        Some(path) => discovery.load_from(&cwd.join(path))?,
        None => discovery.load()?,
    };

    FsValidator::new(&cwd).validate(&config)?;
    ui::success("Configuration is valid");

    let plugin = MountPlugin::with_registry(AdapterConfig::from(config.mount), registry);
    if plugin.registry().resolve(&plugin.config().adapter).is_none() {
        return Err(SetupError::UnknownAdapter {
            adapter: plugin.config().adapter.to_string(),
            known: plugin.registry().names().join(", "),
        }
        .into());
    }
    ui::success(&format!("Adapter `{}` is available", plugin.config().adapter));

    println!("{}", serde_json::to_string_pretty(&plugin.build_settings())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/app.rs"), "// app").unwrap();
        fs::write(temp.path().join("hotmount.toml"), config).unwrap();
        temp
    }

    fn args(temp: &TempDir) -> CheckArgs {
        CheckArgs {
            config: None,
            cwd: Some(temp.path().to_path_buf()),
        }
    }

    #[tokio::test]
    async fn test_valid_config_passes() {
        let temp = project("entry = \"src/app.rs\"\nadapter = \"managed\"\n");
        execute(args(&temp), AdapterRegistry::builtin()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_adapter_fails() {
        let temp = project("entry = \"src/app.rs\"\nadapter = \"koa\"\n");
        let err = execute(args(&temp), AdapterRegistry::builtin())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Setup(SetupError::UnknownAdapter { ref adapter, .. }) if adapter == "koa"
        ));
    }

    #[tokio::test]
    async fn test_explicit_config_file() {
        let temp = project("entry = \"src/missing.rs\"\nadapter = \"axum\"\n");
        fs::write(
            temp.path().join("alt.toml"),
            "entry = \"src/app.rs\"\nadapter = \"tower\"\n",
        )
        .unwrap();

        let mut args = args(&temp);
        args.config = Some("alt.toml".into());
        execute(args, AdapterRegistry::builtin()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_entry_fails() {
        let temp = project("entry = \"src/missing.rs\"\nadapter = \"axum\"\n");
        let err = execute(args(&temp), AdapterRegistry::builtin())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
