pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod narrative;
pub mod output;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::FileRegistry, OutputFormat};

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Registry};

pub use crate::core::analyzer::{analyze, Analysis, SkillAnalyzer};
pub use domain::model::{CourseQuery, CourseRecord, InterestSelection, SkillProfile};
pub use narrative::ChatNarrativeGenerator;
pub use utils::error::{Result, SkillError};
