//! Configuration management with layered hierarchy

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::Project;

/// Currency used when none is configured
const DEFAULT_CURRENCY: &str = "USD";

/// FWC configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Author recorded on new production orders
    pub author: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Currency code shown next to money amounts
    pub currency: Option<String>,

    /// Fee added to a product's price for custom designs
    pub customization_fee: Option<Decimal>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let project = Project::discover().ok();
        Self::load_for(project.as_ref())
    }

    /// Load configuration for a known project (or none)
    pub fn load_for(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/fwc/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (.fwc/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 4. Environment variables
        if let Ok(author) = std::env::var("FWC_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(currency) = std::env::var("FWC_CURRENCY") {
            config.currency = Some(currency);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "fwc")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.author.is_some() {
            self.author = other.author;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.currency.is_some() {
            self.currency = other.currency;
        }
        if other.customization_fee.is_some() {
            self.customization_fee = other.customization_fee;
        }
    }

    /// Get the author name, falling back to git config or username
    pub fn author(&self) -> String {
        if let Some(ref author) = self.author {
            return author.clone();
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string())
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Customization fee, 50.00 unless configured
    pub fn customization_fee(&self) -> Decimal {
        self.customization_fee.unwrap_or_else(|| Decimal::new(5000, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.currency(), "USD");
        assert_eq!(config.customization_fee(), Decimal::new(50, 0));
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut config: Config = serde_yml::from_str("currency: EUR\nauthor: alice\n").unwrap();
        let project: Config = serde_yml::from_str("customization_fee: \"35.00\"\nauthor: bob\n").unwrap();
        config.merge(project);

        assert_eq!(config.currency(), "EUR");
        assert_eq!(config.author(), "bob");
        assert_eq!(config.customization_fee(), "35.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_project_config_file_is_read() {
        let tmp = tempfile::tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::write(project.config_path(), "customization_fee: \"20\"\n").unwrap();

        let config = Config::load_for(Some(&project));
        assert_eq!(config.customization_fee(), Decimal::new(20, 0));
    }
}
