//! Layered configuration for the server.
//!
//! Sources, later wins: built-in defaults, the optional YAML file,
//! `APP__`-prefixed environment variables (`__` separates nesting levels),
//! the plain `PORT` variable, and finally CLI overrides.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use equation_solver::{CorsConfig, EquationSolverConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables merged into the configuration.
pub const ENV_PREFIX: &str = "APP__";
/// Plain variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub equation_solver: EquationSolverConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Interface to listen on. Default: `0.0.0.0`
    pub bind_addr: String,
    /// Default: `8000`
    pub port: u16,
    /// Requests running longer are answered with `504`. Default: `30`
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_owned(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl AppConfig {
    /// Loads defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    /// Returns an error when a source cannot be read, a key is unknown, a value
    /// has the wrong type, or `PORT` is not a valid port number.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: AppConfig = figment
            .extract()
            .context("failed to load configuration")?;

        if let Ok(port) = std::env::var(PORT_ENV) {
            config.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid {PORT_ENV} value: {port:?}"))?;
        }

        Ok(config)
    }

    /// Applies `--port` and `-v` from the command line.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.port = port;
        }
        let level = match verbose {
            0 => return,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        level.clone_into(&mut self.logging.level);
    }

    /// Address the listener binds to.
    ///
    /// # Errors
    /// Returns an error when `server.bind_addr` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind_addr
            .parse()
            .with_context(|| format!("invalid server.bind_addr: {:?}", self.server.bind_addr))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Renders the effective configuration as YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    fn load_clean(path: Option<&Path>) -> Result<AppConfig> {
        temp_env::with_vars_unset(
            [
                PORT_ENV,
                "APP__SERVER__PORT",
                "APP__SERVER__BIND_ADDR",
                "APP__LOGGING__LEVEL",
            ],
            || AppConfig::load(path),
        )
    }

    #[test]
    fn test_defaults() {
        let config = load_clean(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cors.allow_origin, "*");
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let file = write_config(
            "server:\n  port: 9100\nlogging:\n  format: json\ncors:\n  allow_origin: \"https://example.com\"\n",
        );
        let config = load_clean(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.cors.allow_origin, "https://example.com");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let file = write_config("server:\n  prot: 9100\n");
        assert!(load_clean(Some(file.path())).is_err());
    }

    #[test]
    fn test_port_variable_overrides_file_and_prefixed_env() {
        let file = write_config("server:\n  port: 9100\n");
        let config = temp_env::with_vars(
            [(PORT_ENV, Some("9300")), ("APP__SERVER__PORT", Some("9200"))],
            || AppConfig::load(Some(file.path())),
        )
        .unwrap();
        assert_eq!(config.server.port, 9300);
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        let file = write_config("server:\n  port: 9100\n");
        let config = temp_env::with_vars(
            [
                (PORT_ENV, None),
                ("APP__SERVER__PORT", Some("9200")),
                ("APP__LOGGING__LEVEL", Some("debug")),
            ],
            || AppConfig::load(Some(file.path())),
        )
        .unwrap();
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_port_variable() {
        let result = temp_env::with_var(PORT_ENV, Some("eighty"), || AppConfig::load(None));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config.apply_cli_overrides(Some(7000), 0);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.logging.level, "info");

        config.apply_cli_overrides(None, 2);
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.logging.level, "debug");

        config.apply_cli_overrides(None, 5);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_invalid_bind_addr() {
        let mut config = AppConfig::default();
        config.server.bind_addr = "localhost".to_owned();
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_yaml_rendering_mentions_sections() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        for key in ["server", "logging", "equation_solver", "cors", "port"] {
            assert!(yaml.contains(key), "missing {key} in:\n{yaml}");
        }
    }
}
