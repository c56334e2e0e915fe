use crate::config::parse_registry;
use crate::core::{CourseRecord, RegistrySource};
use crate::utils::error::{Result, SkillError};

/// Registry snapshot stored as a JSON file on local disk.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: String,
}

impl FileRegistry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl RegistrySource for FileRegistry {
    fn location(&self) -> &str {
        &self.path
    }

    async fn load(&self) -> Result<Vec<CourseRecord>> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| SkillError::registry_unavailable(&self.path, e))?;
        parse_registry(&self.path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_registry_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"code": "CS101", "name": "Intro", "description": "Basics",
                 "skills_curated": [{"skill_id": "sk-1", "skill": "Python",
                   "category": "Programming", "frequency": 30, "skill_level": 2}]},
                {"code": null, "name": "Orientation"}
            ]"#,
        )
        .unwrap();

        let registry = FileRegistry::new(file.path().to_str().unwrap());
        let courses = registry.load().await.unwrap();

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].skills[0].skill_name, "Python");
        assert!(courses[1].matchable_code().is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let registry = FileRegistry::new("/nonexistent/registry.json");
        let err = registry.load().await.unwrap_err();
        assert!(matches!(err, SkillError::RegistryUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"courses\": 3}").unwrap();

        let registry = FileRegistry::new(file.path().to_str().unwrap());
        let err = registry.load().await.unwrap_err();
        assert!(matches!(err, SkillError::RegistryMalformed { .. }));
    }
}
