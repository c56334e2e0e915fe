use crate::domain::model::{CourseRecord, NarrativeSettings};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Supplies one full registry snapshot per invocation.
pub trait RegistrySource: Send + Sync {
    fn location(&self) -> &str;
    fn load(&self) -> impl std::future::Future<Output = Result<Vec<CourseRecord>>> + Send;
}

/// Text collaborator; returned strings are attached verbatim.
#[async_trait]
pub trait NarrativeGenerator: Send + Sync {
    async fn skill_pathway(&self, skill_name: &str) -> Result<String>;
    async fn summary(&self, skill_names: &[String], courses: &[CourseRecord]) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn registry_location(&self) -> &str;
    fn narrative_settings(&self) -> Option<NarrativeSettings>;
}
