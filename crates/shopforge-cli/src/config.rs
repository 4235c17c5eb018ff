use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shopforge_eval::EvaluateOptions;
use shopforge_generate::GenerateOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings read from `shopforge.toml`; every section is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopforgeConfig {
    /// Registry directory for per-invocation `config.json` and `logs.ndjson`.
    pub runs_dir: PathBuf,
    pub generate: GenerateOptions,
    pub evaluate: EvaluateOptions,
    pub database: DatabaseSettings,
}

impl Default for ShopforgeConfig {
    fn default() -> Self {
        Self {
            runs_dir: PathBuf::from("runs"),
            generate: GenerateOptions::default(),
            evaluate: EvaluateOptions::default(),
            database: DatabaseSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db/ecom.db"),
        }
    }
}

/// Read the config file at `path`, or fall back to defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<ShopforgeConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ShopforgeConfig::default());
    };
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: ShopforgeConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shopforge_generate::{CountRange, EntityCounts};

    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: ShopforgeConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config.runs_dir, PathBuf::from("runs"));
        assert_eq!(config.generate.seed, 2024);
        assert!(config.evaluate.strict);
        assert_eq!(config.database.path, PathBuf::from("db/ecom.db"));
    }

    #[test]
    fn generate_section_overrides_options() {
        let config: ShopforgeConfig = toml::from_str(
            r#"
            runs_dir = "out/runs"

            [generate]
            seed = 99
            out_dir = "out/data"
            reference_time = "2025-02-01T10:00:00"
            require_item_coverage = true

            [generate.count_range]
            min = 5
            max = 9

            [generate.counts]
            customers = 3
            products = 2
            orders = 2
            order_items = 3
            payments = 1

            [database]
            path = "out/shop.db"
            "#,
        )
        .expect("parse config");

        assert_eq!(config.runs_dir, PathBuf::from("out/runs"));
        assert_eq!(config.generate.seed, 99);
        assert_eq!(config.generate.count_range, CountRange { min: 5, max: 9 });
        assert_eq!(
            config.generate.counts,
            Some(EntityCounts {
                customers: 3,
                products: 2,
                orders: 2,
                order_items: 3,
                payments: 1,
            })
        );
        assert_eq!(
            config.generate.reference_time,
            NaiveDate::from_ymd_opt(2025, 2, 1).and_then(|date| date.and_hms_opt(10, 0, 0))
        );
        assert!(config.generate.require_item_coverage);
        assert_eq!(config.database.path, PathBuf::from("out/shop.db"));
    }

    #[test]
    fn unknown_file_is_reported() {
        let err = load_config(Some(Path::new("/nonexistent/shopforge.toml")))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
