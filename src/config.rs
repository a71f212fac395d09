use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::hazard::rules::{ClassificationRule, CodeMatcher, RuleTable};
use crate::models::HazardLevel;

/// Root configuration structure, deserialized from `.ghs-checkr/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Hazard classification settings.
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// PubChem client settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Controls how hazard codes are mapped to levels.
#[derive(Debug, Default, Deserialize)]
pub struct ClassificationConfig {
    /// Use only the rules below and drop the built-in table.
    #[serde(default)]
    pub replace_builtin: bool,
    /// Exit with code 1 when any substance reaches this level.
    #[serde(default)]
    pub fail_on: Option<HazardLevel>,
    /// Extra rules keyed by code (`"H350i"`) or range (`"H3xx"`, `"H30x"`).
    #[serde(default)]
    pub rules: BTreeMap<String, HazardLevel>,
}

/// Settings for the PubChem lookup client.
#[derive(Debug, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Lookups in flight at once. PubChem throttles above five requests per second.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_base_url() -> String {
    "https://pubchem.ncbi.nlm.nih.gov".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

impl Default for LookupConfig {
    fn default() -> Self {
        LookupConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<working_dir>/.ghs-checkr/config.toml`
/// 3. `~/.config/ghs-checkr/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = working_dir.join(".ghs-checkr").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("ghs-checkr").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

impl Config {
    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        // Every substance is at least `none`, so this would fail every run.
        if self.classification.fail_on == Some(HazardLevel::None) {
            bail!("classification.fail_on must be low or above, not none");
        }
        if self.lookup.timeout_secs == 0 {
            bail!("lookup.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

impl ClassificationConfig {
    /// Build the rule table: configured rules first, then the built-in table
    /// unless `replace_builtin` is set.
    ///
    /// Configured rules are ordered exact codes first, then ranges from
    /// narrowest to widest, so `H30x` is consulted before `H3xx`.
    pub fn rule_table(&self) -> Result<RuleTable> {
        let mut custom = self
            .rules
            .iter()
            .map(|(pattern, level)| {
                let matcher = CodeMatcher::parse(pattern).context("in [classification.rules]")?;
                Ok(ClassificationRule {
                    matcher,
                    level: *level,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        custom.sort_by_key(|rule| rule.matcher.specificity());

        let mut table = if self.replace_builtin {
            RuleTable::default()
        } else {
            RuleTable::builtin()
        };
        table.prepend(custom);
        Ok(table)
    }
}
