pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::CourseRecord;
use crate::utils::error::{Result, SkillError};
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, CourseQuery};
#[cfg(feature = "cli")]
use crate::domain::model::{NarrativeSettings, DEFAULT_NARRATIVE_MODEL};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_REGISTRY_PATH: &str = "./registry.json";

/// Parses one registry snapshot (a JSON array of courses).
pub fn parse_registry(location: &str, data: &[u8]) -> Result<Vec<CourseRecord>> {
    let courses: Vec<CourseRecord> = serde_json::from_slice(data)
        .map_err(|e| SkillError::registry_malformed(location, e))?;

    let without_code = courses
        .iter()
        .filter(|course| course.matchable_code().is_none())
        .count();
    if without_code > 0 {
        tracing::debug!(
            "{} registry courses have no code and will never match",
            without_code
        );
    }

    Ok(courses)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "skill-profile")]
#[command(about = "Match completed courses against a skill registry and build a skill profile")]
pub struct CliConfig {
    /// Registry snapshot (JSON array of courses)
    #[arg(long)]
    pub registry: Option<String>,

    /// JSON file with {"coursesList": [...]} or a bare list of [title, code] pairs
    #[arg(long)]
    pub courses: Option<String>,

    /// Extra course as TITLE=CODE, appended after the file entries
    #[arg(long = "course")]
    pub course: Vec<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the result here instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub narrative_endpoint: Option<String>,

    #[arg(long)]
    pub narrative_model: Option<String>,

    #[arg(long, help = "Skip narrative enrichment even when configured")]
    pub no_narrative: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(skip)]
    pub file: Option<TomlConfig>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 讀取 --config 指定的 TOML，命令列參數優先
    pub fn load_file(&mut self) -> Result<()> {
        if let Some(path) = &self.config {
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            tracing::debug!("Loaded configuration file {}", path);
            self.file = Some(file);
        }
        Ok(())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.file.as_ref().and_then(|f| f.output.format))
            .unwrap_or_default()
    }

    /// Course queries from `--courses` followed by every `--course`.
    pub fn course_queries(&self) -> Result<Vec<CourseQuery>> {
        let mut queries = match &self.courses {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                let document: serde_json::Value = serde_json::from_str(&content)?;
                crate::app::handler::parse_courses_list(&document)?
            }
            None => Vec::new(),
        };

        for entry in &self.course {
            queries.push(parse_course_arg(entry));
        }

        Ok(queries)
    }
}

/// `TITLE=CODE`; without `=` the whole argument is the code.
#[cfg(feature = "cli")]
fn parse_course_arg(entry: &str) -> CourseQuery {
    match entry.rsplit_once('=') {
        Some((title, code)) => CourseQuery::new(title, code),
        None => CourseQuery::new("", entry),
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn registry_location(&self) -> &str {
        self.registry
            .as_deref()
            .or_else(|| self.file.as_ref().and_then(|f| f.registry.path.as_deref()))
            .unwrap_or(DEFAULT_REGISTRY_PATH)
    }

    fn narrative_settings(&self) -> Option<NarrativeSettings> {
        if self.no_narrative {
            return None;
        }

        let mut settings = match (&self.narrative_endpoint, &self.file) {
            (Some(endpoint), file) => {
                let mut settings = file
                    .as_ref()
                    .and_then(TomlConfig::narrative_settings)
                    .unwrap_or_else(|| NarrativeSettings::new("", DEFAULT_NARRATIVE_MODEL));
                settings.endpoint = endpoint.clone();
                settings
            }
            (None, Some(file)) => file.narrative_settings()?,
            (None, None) => return None,
        };

        if let Some(model) = &self.narrative_model {
            settings.model = model.clone();
        }
        if settings.api_key.is_none() {
            settings.api_key = std::env::var("NARRATIVE_API_KEY").ok();
        }
        Some(settings)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("registry", self.registry_location())?;
        if let Some(path) = &self.courses {
            validate_path("courses", path)?;
        }
        if self.courses.is_none() && self.course.is_empty() {
            return Err(SkillError::MissingConfigError {
                field: "courses or course".to_string(),
            });
        }
        for entry in &self.course {
            validate_non_empty_string("course", &parse_course_arg(entry).code)?;
        }
        if let Some(path) = &self.output {
            validate_path("output", path)?;
        }
        if let Some(settings) = self.narrative_settings() {
            validate_url("narrative_endpoint", &settings.endpoint)?;
        }

        Ok(())
    }
}
