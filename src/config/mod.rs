pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATASET_PATH: &str = "./datasets/recipes.csv";
pub const DEFAULT_DATASET_NAME: &str = "recipes";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_INDEX_FIELD: &str = "name";
pub const DEFAULT_CONTENT_FIELD: &str = "ingredients";
pub const DEFAULT_LOOKUP_FIELD: &str = "name";
pub const DEFAULT_K: usize = 10;

/// 合併 CLI 與 TOML 之後的最終設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub dataset_path: String,
    pub dataset_name: String,
    pub host: String,
    pub port: u16,
    pub index_field: String,
    pub content_field: String,
    pub lookup_field: String,
    pub k: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            index_field: DEFAULT_INDEX_FIELD.to_string(),
            content_field: DEFAULT_CONTENT_FIELD.to_string(),
            lookup_field: DEFAULT_LOOKUP_FIELD.to_string(),
            k: DEFAULT_K,
        }
    }
}

impl ConfigProvider for AppSettings {
    fn dataset_path(&self) -> &str {
        &self.dataset_path
    }

    fn dataset_name(&self) -> &str {
        &self.dataset_name
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}

impl Validate for AppSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dataset.path", &self.dataset_path)?;
        validation::validate_file_extension("dataset.path", &self.dataset_path, &["csv"])?;
        validation::validate_non_empty_string("dataset.name", &self.dataset_name)?;
        validation::validate_non_empty_string("server.host", &self.host)?;
        validation::validate_range("server.port", self.port, 1, u16::MAX)?;
        validation::validate_non_empty_string("recommender.index_field", &self.index_field)?;
        validation::validate_non_empty_string("recommender.content_field", &self.content_field)?;
        validation::validate_non_empty_string("recommender.lookup_field", &self.lookup_field)?;
        validation::validate_positive_number("recommender.k", self.k, 1)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use cli_args::CliConfig;

#[cfg(feature = "cli")]
mod cli_args {
    use super::toml_config::TomlConfig;
    use super::AppSettings;
    use crate::utils::error::Result;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "recipe-recommender")]
    #[command(about = "Serve recipe recommendations over HTTP")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// CSV dataset to index [default: ./datasets/recipes.csv]
        #[arg(long)]
        pub dataset_path: Option<String>,

        /// Dataset name [default: recipes]
        #[arg(long)]
        pub dataset_name: Option<String>,

        /// Bind host [default: 127.0.0.1]
        #[arg(long)]
        pub host: Option<String>,

        /// Bind port [default: 5000]
        #[arg(short, long)]
        pub port: Option<u16>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// 先讀 TOML，再套用命令列覆蓋
        pub fn resolve(&self) -> Result<AppSettings> {
            let mut settings = match &self.config {
                Some(path) => {
                    let config = TomlConfig::from_file(path)?;
                    config.validate()?;
                    config.into_settings()
                }
                None => AppSettings::default(),
            };

            if let Some(path) = &self.dataset_path {
                settings.dataset_path = path.clone();
            }
            if let Some(name) = &self.dataset_name {
                settings.dataset_name = name.clone();
            }
            if let Some(host) = &self.host {
                settings.host = host.clone();
            }
            if let Some(port) = self.port {
                settings.port = port;
            }

            Ok(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!((settings.host.as_str(), settings.port), ("127.0.0.1", 5000));
        assert_eq!(settings.k, 10);
        assert_eq!(settings.lookup_field, "name");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let settings = AppSettings {
            k: 0,
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = AppSettings {
            dataset_path: "recipes.json".to_string(),
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_defaults() {
        use clap::Parser;

        let cli = CliConfig::parse_from([
            "recipe-recommender",
            "--port",
            "8080",
            "--dataset-path",
            "/data/menu.csv",
        ]);
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.dataset_path, "/data/menu.csv");
        assert_eq!(settings.dataset_name, DEFAULT_DATASET_NAME);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_toml_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 9000\n")
            .unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_str().unwrap().to_string()),
            port: Some(9100),
            ..CliConfig::default()
        };
        let settings = cli.resolve().unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 9100);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_rejects_dataset_section_without_path() {
        use crate::utils::error::RecommenderError;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[dataset]\nname = \"recipes\"\n").unwrap();

        let cli = CliConfig {
            config: Some(file.path().to_str().unwrap().to_string()),
            ..CliConfig::default()
        };
        assert!(matches!(
            cli.resolve(),
            Err(RecommenderError::MissingConfigError { .. })
        ));
    }
}
