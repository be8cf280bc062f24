use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analytics::Goals;
use crate::models::TransactionType;

const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "finances.db";

/// Static settings injected into the core and the CLI.
///
/// Every key is optional in the file; anything left out takes the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: Option<PathBuf>,
    pub currency_symbol: String,
    /// Shared suggestion list, used for a type whose own list is empty.
    pub categories: Vec<String>,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
    pub goals: Goals,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            currency_symbol: "Bs".into(),
            categories: Vec::new(),
            income_categories: to_strings(&["Sale", "Service", "Investment", "Other Income"]),
            expense_categories: to_strings(&[
                "Raw Material",
                "Labor",
                "Operating Expenses",
                "Fixed Salaries",
                "Advertising",
                "Maintenance",
                "Other Expenses",
            ]),
            goals: Goals::default(),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "bookkeeper", "Bookkeeper")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
}

impl Config {
    /// Loads `explicit` if given, otherwise `config.json` from the platform
    /// config directory. Only the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let path = project_dirs()?.config_dir().join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Suggested categories for a transaction type. A type without its own
    /// list falls back to the shared one.
    pub fn suggested_categories(&self, kind: TransactionType) -> &[String] {
        let own = match kind {
            TransactionType::Income => &self.income_categories,
            TransactionType::Expense => &self.expense_categories,
        };
        if own.is_empty() {
            &self.categories
        } else {
            own
        }
    }

    /// The configured database file, or `finances.db` in the platform data
    /// directory. The parent directory is created if needed.
    pub fn database_path(&self) -> Result<PathBuf> {
        let path = match &self.database_path {
            Some(p) => p.clone(),
            None => project_dirs()?.data_dir().join(DATABASE_FILE),
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        }
        Ok(path)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
