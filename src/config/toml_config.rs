use crate::config::OutputFormat;
use crate::domain::model::{NarrativeSettings, DEFAULT_NARRATIVE_MODEL};
use crate::utils::error::{Result, SkillError};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    pub narrative: Option<NarrativeConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub endpoint: String,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

fn default_enabled() -> bool {
    true
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SkillError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${NARRATIVE_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SkillError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 啟用時才回傳旁述服務設定
    pub fn narrative_settings(&self) -> Option<NarrativeSettings> {
        let narrative = self.narrative.as_ref().filter(|n| n.enabled)?;

        let mut settings = NarrativeSettings::new(
            narrative.endpoint.clone(),
            narrative
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_NARRATIVE_MODEL.to_string()),
        );
        // 未替換的 ${VAR} 視為沒有設定金鑰
        settings.api_key = narrative
            .api_key
            .clone()
            .filter(|key| !key.is_empty() && !key.starts_with("${"));
        if let Some(max_tokens) = narrative.max_tokens {
            settings.max_tokens = max_tokens;
        }
        if let Some(temperature) = narrative.temperature {
            settings.temperature = temperature;
        }
        Some(settings)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.registry.path {
            validate_path("registry.path", path)?;
        }

        if let Some(narrative) = self.narrative.as_ref().filter(|n| n.enabled) {
            validate_url("narrative.endpoint", &narrative.endpoint)?;
            if let Some(max_tokens) = narrative.max_tokens {
                validate_range("narrative.max_tokens", max_tokens, 1, 8192)?;
            }
            if let Some(temperature) = narrative.temperature {
                validate_range("narrative.temperature", temperature, 0.0, 1.0)?;
            }
        }

        Ok(())
    }
}
