//! Export policy configuration.
//!
//! The setting deny-list, the "new code" metric key prefix and the set of
//! platform-provided link types are policy data that varies between
//! deployments, so they are loaded in layers instead of hard-coded:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. Environment variables (`PROJDUMP_` prefix, `__` as separator)

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::errors::ExportResult;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "PROJDUMP_";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Project setting keys that are environment specific and never exported.
    #[serde(default = "default_ignored_setting_keys")]
    pub ignored_setting_keys: Vec<String>,
    /// Metric keys starting with this prefix are "new code" variants whose
    /// value is exported as a variation.
    #[serde(default = "default_new_code_metric_prefix")]
    pub new_code_metric_prefix: String,
    /// Link types created by the platform rather than by users.
    #[serde(default = "default_provided_link_types")]
    pub provided_link_types: Vec<String>,
}

fn default_ignored_setting_keys() -> Vec<String> {
    vec!["sonar.issues.defaultAssigneeLogin".to_string()]
}

fn default_new_code_metric_prefix() -> String {
    "new_".to_string()
}

fn default_provided_link_types() -> Vec<String> {
    ["homepage", "ci", "issue", "scm", "scm_dev"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ignored_setting_keys: default_ignored_setting_keys(),
            new_code_metric_prefix: default_new_code_metric_prefix(),
            provided_link_types: default_provided_link_types(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from defaults, an optional TOML file and the
    /// environment.
    pub fn load(toml_path: Option<&Path>) -> ExportResult<Self> {
        Ok(Self::figment(toml_path).extract()?)
    }

    /// Build the provider chain. Public so callers can merge more providers.
    pub fn figment(toml_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = toml_path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn is_new_code_metric(&self, metric_key: &str) -> bool {
        !self.new_code_metric_prefix.is_empty()
            && metric_key.starts_with(&self.new_code_metric_prefix)
    }

    pub fn is_ignored_setting(&self, key: &str) -> bool {
        self.ignored_setting_keys.iter().any(|k| k == key)
    }

    pub fn is_provided_link(&self, link_type: &str) -> bool {
        self.provided_link_types.iter().any(|t| t == link_type)
    }
}
