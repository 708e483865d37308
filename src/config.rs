use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::llm::LlmConfig;
use crate::tools::chrome::BrowserConfig;
use crate::types::error::{AppError, AppResult};

pub const DEFAULT_CONFIG_FILE: &str = "page-audit.yaml";

/// 全部配置项都有默认值，YAML 文件中只需要写要覆盖的部分
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub browser: BrowserConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            browser: BrowserConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text).map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&text)
    }

    /// Loads `path` when given, else the default file if present, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    pub fn log_level(&self) -> AppResult<Level> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| AppError::Config(format!("invalid log_level: {}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            r#"
llm:
  model: gemini-2.0-flash
browser:
  headless: false
log_level: debug
"#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert!(config.llm.search_grounding);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "browser:\n  viewport_height: 1080").unwrap();

        let config = AppConfig::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.browser.viewport_height, 1080);
        assert_eq!(config.browser.viewport_width, 1280);
    }

    #[test]
    fn bad_input_is_config_error() {
        assert!(matches!(AppConfig::from_yaml("llm: [1, 2"), Err(AppError::Config(_))));
        assert!(matches!(
            AppConfig::load("/no/such/page-audit.yaml"),
            Err(AppError::Config(_))
        ));

        let config = AppConfig { log_level: "loud".into(), ..AppConfig::default() };
        assert!(config.log_level().is_err());
    }
}
