use super::AppSettings;
use crate::utils::error::{RecommenderError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub dataset: Option<DatasetConfig>,
    pub recommender: Option<RecommenderConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub index_field: Option<String>,
    pub content_field: Option<String>,
    pub lookup_field: Option<String>,
    pub k: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RecommenderError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RecommenderError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_PATH})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 套用預設值後轉成 AppSettings
    pub fn into_settings(self) -> AppSettings {
        let mut settings = AppSettings::default();

        if let Some(server) = self.server {
            if let Some(host) = server.host {
                settings.host = host;
            }
            if let Some(port) = server.port {
                settings.port = port;
            }
        }

        if let Some(dataset) = self.dataset {
            if let Some(path) = dataset.path {
                settings.dataset_path = path;
            }
            if let Some(name) = dataset.name {
                settings.dataset_name = name;
            }
        }

        if let Some(recommender) = self.recommender {
            if let Some(field) = recommender.index_field {
                settings.index_field = field;
            }
            if let Some(field) = recommender.content_field {
                settings.content_field = field;
            }
            if let Some(field) = recommender.lookup_field {
                settings.lookup_field = field;
            }
            if let Some(k) = recommender.k {
                settings.k = k;
            }
        }

        settings
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        // 有寫 [dataset] 區塊就必須給 path
        if let Some(dataset) = &self.dataset {
            validation::validate_required_field("dataset.path", &dataset.path)?;
        }
        self.clone().into_settings().validate()
    }
}
