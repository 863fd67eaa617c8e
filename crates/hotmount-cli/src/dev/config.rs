//! Development server configuration.
//!
//! Layers the project's hotmount configuration with `dev` command flags and
//! resolves the listen address.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use hotmount_config::{
    ConfigDiscovery, ConfigError, ConfigValidator, DevSettings, ENV_PREFIX, FsValidator,
    MountConfig, discovery,
};

use crate::cli::DevArgs;
use crate::error::{CliError, Result};

/// Ports tried after the requested one before giving up.
const PORT_SEARCH_SPAN: u16 = 10;

/// Resolved dev server configuration.
#[derive(Debug, Clone)]
pub struct DevConfig {
    pub mount: MountConfig,
    pub settings: DevSettings,
    /// Address the server binds
    pub addr: SocketAddr,
    /// Project root
    pub cwd: PathBuf,
}

impl DevConfig {
    /// Load configuration for the `dev` command.
    ///
    /// Priority: CLI flags > `HOTMOUNT_*` environment > config file. Without
    /// a config file, `--entry` and `--adapter` must both be given.
    pub fn from_args(args: &DevArgs) -> Result<Self> {
        let cwd = match &args.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        if !cwd.is_dir() {
            return Err(CliError::FileNotFound(cwd));
        }

        let figment = base_figment(&cwd, args.config.as_deref(), args)?;
        let config = discovery::extract(&apply_overrides(figment, args))?;
        FsValidator::new(&cwd).validate(&config)?;

        let addr = Self::find_available_port(&config.dev.host, config.dev.port)?;
        Ok(Self {
            mount: config.mount,
            settings: config.dev,
            addr,
            cwd,
        })
    }

    /// Use the requested port if free, otherwise the next free one.
    fn find_available_port(host: &str, requested_port: u16) -> Result<SocketAddr> {
        use std::net::TcpListener;

        let ip: IpAddr = host.parse().map_err(|_| ConfigError::InvalidValue {
            field: "dev.host".to_string(),
            hint: Some(format!("'{host}' is not an IP address")),
        })?;

        // Port 0 asks the OS for any free port at bind time
        if requested_port == 0 {
            return Ok(SocketAddr::new(ip, 0));
        }

        for offset in 0..=PORT_SEARCH_SPAN {
            let port = requested_port.saturating_add(offset);
            let addr = SocketAddr::new(ip, port);
            if TcpListener::bind(addr).is_ok() {
                if offset > 0 {
                    crate::ui::warning(&format!(
                        "Port {requested_port} is busy, using port {port} instead"
                    ));
                }
                return Ok(addr);
            }
        }

        Err(ConfigError::InvalidValue {
            field: "dev.port".to_string(),
            hint: Some(format!(
                "Ports {}-{} are all in use. Try a different port.",
                requested_port,
                requested_port.saturating_add(PORT_SEARCH_SPAN)
            )),
        }
        .into())
    }

    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Directories to watch, resolved against the project root.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        if self.settings.watch_paths.is_empty() {
            return vec![self.cwd.clone()];
        }
        self.settings
            .watch_paths
            .iter()
            .map(|path| self.cwd.join(path))
            .collect()
    }

    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.settings.debounce_ms)
    }

    pub fn restart_debounce(&self) -> Duration {
        Duration::from_millis(self.settings.restart_debounce_ms)
    }
}

/// File and environment layers. A missing file is only an error when the
/// flags cannot stand in for it.
fn base_figment(cwd: &Path, config: Option<&Path>, args: &DevArgs) -> Result<Figment> {
    let discovery = ConfigDiscovery::new(cwd);
    if let Some(path) = config {
        return Ok(discovery.figment_from(&cwd.join(path))?);
    }

    match discovery.figment() {
        Ok(figment) => Ok(figment),
        Err(ConfigError::NotFound) if args.entry.is_some() && args.adapter.is_some() => {
            tracing::debug!("No config file found, using command line settings");
            Ok(Figment::new().merge(Env::prefixed(ENV_PREFIX).split("__")))
        }
        Err(err) => Err(err.into()),
    }
}

fn apply_overrides(mut figment: Figment, args: &DevArgs) -> Figment {
    if let Some(entry) = &args.entry {
        figment = figment.merge(Serialized::default("entry", entry));
    }
    if let Some(adapter) = &args.adapter {
        figment = figment.merge(Serialized::default("adapter", adapter));
    }
    if let Some(host) = &args.host {
        figment = figment.merge(Serialized::default("dev.host", host));
    }
    if let Some(port) = args.port {
        figment = figment.merge(Serialized::default("dev.port", port));
    }
    figment
}
