//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Built-in defaults (see [`Config::default`])
//! 2. User config: `~/.config/address-relink/config.toml` (XDG) or platform config dir
//! 3. Project config: `.address-relink.toml`
//! 4. Legacy environment variables: `DRY_RUN`, `SPARQL_ENDPOINT`
//! 5. Environment variables: `RELINK_*`, nested with `__`
//!
//! Command-line flags are applied on top by the CLI (see [`Overrides`]).
//!
//! # Example
//!
//! ```toml
//! [sparql]
//! endpoint = "http://localhost:8890/sparql"
//! timeout_secs = 60
//!
//! [registry]
//! endpoint = "http://localhost:6969/match"
//! retries = 5
//! backoff_factor = 0.5
//!
//! [run]
//! dry_run = true
//! sample_size = 10
//! output = "output.sparql"
//! ```
//!
//! The same keys can be set from the environment, e.g.
//! `RELINK_REGISTRY__RETRIES=3` or `RELINK_RUN__OUTPUT=patch.sparql`.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::RetryPolicy;

/// Default SPARQL endpoint (local Virtuoso).
pub const DEFAULT_SPARQL_ENDPOINT: &str = "http://localhost:8890/sparql";

/// Default address registry match endpoint.
pub const DEFAULT_REGISTRY_ENDPOINT: &str = "http://localhost:6969/match";

/// Number of candidates processed when sampling is enabled.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Annotation attached to every linked registry address.
pub const DEFAULT_NOTE: &str = "Re-attached with script. Data-quality issue. SeeAlso OP-3721";

const PROJECT_CONFIG: &str = ".address-relink.toml";
const ENV_PREFIX: &str = "RELINK_";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sparql: SparqlConfig,
    pub registry: RegistryConfig,
    pub run: RunConfig,
    pub patch: PatchConfig,
}

/// Knowledge graph endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparqlConfig {
    /// SPARQL query endpoint. An empty value falls back to the default.
    pub endpoint: String,
    /// Request timeout for the candidate query.
    pub timeout_secs: u64,
}

impl Default for SparqlConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Address registry endpoint and its retry budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub endpoint: String,
    /// Total number of attempts per lookup.
    pub retries: u32,
    /// Base of the exponential backoff, in seconds.
    pub backoff_factor: f64,
    pub timeout_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_REGISTRY_ENDPOINT.to_string(),
            retries: 5,
            backoff_factor: 0.5,
            timeout_secs: 10,
        }
    }
}

impl RegistryConfig {
    /// Retry policy used for every registry lookup.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retries,
            self.backoff_factor,
            Duration::from_secs(self.timeout_secs),
        )
    }
}

/// Run-level switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Only process the first `sample_size` candidates.
    #[serde(deserialize_with = "lenient_bool")]
    pub dry_run: bool,
    pub sample_size: usize,
    /// Destination of the patch document.
    pub output: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            sample_size: DEFAULT_SAMPLE_SIZE,
            output: PathBuf::from("output.sparql"),
        }
    }
}

/// Patch document settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// `skos:note` attached to each linked registry address.
    pub note: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            note: DEFAULT_NOTE.to_string(),
        }
    }
}

/// Command-line overrides, applied after every figment layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dry_run: bool,
    pub sample_size: Option<usize>,
    pub output: Option<PathBuf>,
    pub sparql_endpoint: Option<String>,
    pub registry_endpoint: Option<String>,
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(
            &Self::user_config_path(),
            Path::new(PROJECT_CONFIG),
        ))
    }

    /// Builds the provider stack for the given config file locations.
    ///
    /// Missing files are skipped by figment.
    pub fn figment(user_config: &Path, project_config: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(project_config))
            // Layer 3: Legacy unprefixed variables
            .merge(
                Env::raw()
                    .only(&["DRY_RUN"])
                    .map(|_| "run.dry_run".into()),
            )
            .merge(
                Env::raw()
                    .only(&["SPARQL_ENDPOINT"])
                    .map(|_| "sparql.endpoint".into()),
            )
            // Layer 4: Prefixed variables (highest priority)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts and normalizes a config from a figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Config = figment.extract()?;
        if config.sparql.endpoint.trim().is_empty() {
            config.sparql.endpoint = DEFAULT_SPARQL_ENDPOINT.to_string();
        }
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn apply(&mut self, overrides: &Overrides) {
        if overrides.dry_run {
            self.run.dry_run = true;
        }
        if let Some(size) = overrides.sample_size {
            self.run.sample_size = size;
        }
        if let Some(output) = &overrides.output {
            self.run.output = output.clone();
        }
        if let Some(endpoint) = &overrides.sparql_endpoint {
            self.sparql.endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &overrides.registry_endpoint {
            self.registry.endpoint = endpoint.clone();
        }
    }

    /// Maximum number of candidates to process, if sampling is enabled.
    pub fn sample_limit(&self) -> Option<usize> {
        self.run.dry_run.then_some(self.run.sample_size)
    }

    /// User config path: ~/.config/address-relink/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("address-relink")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("address-relink").join("config.toml"))
            .unwrap_or_default()
    }
}

/// Accepts a real boolean or any casing of the string `true`.
///
/// Anything else, including `1` or `yes`, reads as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.trim().eq_ignore_ascii_case("true"),
        Flag::Other(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const VARS: &[&str] = &[
        "DRY_RUN",
        "SPARQL_ENDPOINT",
        "RELINK_REGISTRY__RETRIES",
        "RELINK_RUN__OUTPUT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    fn load_without_files() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        Config::from_figment(Config::figment(&missing, &missing)).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = load_without_files();
        assert_eq!(config, Config::default());
        assert_eq!(config.sparql.endpoint, DEFAULT_SPARQL_ENDPOINT);
        assert_eq!(config.registry.retries, 5);
        assert_eq!(config.registry.backoff_factor, 0.5);
        assert_eq!(config.sample_limit(), None);
    }

    #[test]
    #[serial]
    fn test_legacy_env_vars() {
        clear_env();
        std::env::set_var("DRY_RUN", "TRUE");
        std::env::set_var("SPARQL_ENDPOINT", "http://graph.example/sparql");

        let config = load_without_files();
        clear_env();

        assert!(config.run.dry_run);
        assert_eq!(config.sample_limit(), Some(DEFAULT_SAMPLE_SIZE));
        assert_eq!(config.sparql.endpoint, "http://graph.example/sparql");
    }

    #[test]
    #[serial]
    fn test_dry_run_other_values_disable() {
        clear_env();
        std::env::set_var("DRY_RUN", "yes");
        let config = load_without_files();
        clear_env();

        assert!(!config.run.dry_run);
    }

    #[test]
    #[serial]
    fn test_empty_sparql_endpoint_falls_back() {
        clear_env();
        std::env::set_var("SPARQL_ENDPOINT", "");
        let config = load_without_files();
        clear_env();

        assert_eq!(config.sparql.endpoint, DEFAULT_SPARQL_ENDPOINT);
    }

    #[test]
    #[serial]
    fn test_prefixed_env_overrides_project_file() {
        clear_env();
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join(PROJECT_CONFIG);
        fs::write(
            &project,
            "[registry]\nretries = 2\nbackoff_factor = 1.5\n\n[run]\noutput = \"from-file.sparql\"\n",
        )
        .unwrap();
        std::env::set_var("RELINK_RUN__OUTPUT", "from-env.sparql");

        let config =
            Config::from_figment(Config::figment(&dir.path().join("user.toml"), &project))
                .unwrap();
        clear_env();

        assert_eq!(config.registry.retries, 2);
        assert_eq!(config.registry.backoff_factor, 1.5);
        assert_eq!(config.run.output, PathBuf::from("from-env.sparql"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply(&Overrides {
            dry_run: true,
            sample_size: Some(3),
            output: Some(PathBuf::from("patch.sparql")),
            sparql_endpoint: None,
            registry_endpoint: Some("http://registry/match".to_string()),
        });

        assert_eq!(config.sample_limit(), Some(3));
        assert_eq!(config.run.output, PathBuf::from("patch.sparql"));
        assert_eq!(config.sparql.endpoint, DEFAULT_SPARQL_ENDPOINT);
        assert_eq!(config.registry.endpoint, "http://registry/match");
    }
}
