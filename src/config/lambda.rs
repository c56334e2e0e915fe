use crate::config::parse_registry;
use crate::core::{ConfigProvider, CourseRecord, RegistrySource};
use crate::domain::model::{NarrativeSettings, DEFAULT_NARRATIVE_MODEL};
use crate::utils::error::{Result, SkillError};
use crate::utils::validation::{parse_s3_uri, validate_aws_region, validate_url, Validate};
use aws_sdk_s3::Client as S3Client;
use std::env;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub registry_uri: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub s3_region: String,
    pub narrative_endpoint: Option<String>,
    pub narrative_model: String,
    pub narrative_api_key: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let registry_uri =
            env::var("REGISTRY_S3_URI").map_err(|_| SkillError::MissingConfigError {
                field: "REGISTRY_S3_URI".to_string(),
            })?;
        let (s3_bucket, s3_key) = parse_s3_uri("REGISTRY_S3_URI", &registry_uri)?;

        Ok(Self {
            registry_uri,
            s3_bucket,
            s3_key,
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            narrative_endpoint: env::var("NARRATIVE_ENDPOINT")
                .ok()
                .filter(|v| !v.is_empty()),
            narrative_model: env::var("NARRATIVE_MODEL")
                .unwrap_or_else(|_| DEFAULT_NARRATIVE_MODEL.to_string()),
            narrative_api_key: env::var("NARRATIVE_API_KEY").ok().filter(|v| !v.is_empty()),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn registry_location(&self) -> &str {
        &self.registry_uri
    }

    fn narrative_settings(&self) -> Option<NarrativeSettings> {
        let endpoint = self.narrative_endpoint.as_ref()?;
        let mut settings = NarrativeSettings::new(endpoint.clone(), self.narrative_model.clone());
        settings.api_key = self.narrative_api_key.clone();
        Some(settings)
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        parse_s3_uri("REGISTRY_S3_URI", &self.registry_uri)?;
        validate_aws_region("S3_REGION", &self.s3_region)?;
        if let Some(endpoint) = &self.narrative_endpoint {
            validate_url("NARRATIVE_ENDPOINT", endpoint)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

/// Registry snapshot stored as one S3 object.
#[derive(Debug, Clone)]
pub struct S3Registry {
    client: S3Client,
    bucket: String,
    key: String,
    location: String,
}

impl S3Registry {
    pub fn new(client: S3Client, bucket: String, key: String) -> Self {
        let location = format!("s3://{}/{}", bucket, key);
        Self {
            client,
            bucket,
            key,
            location,
        }
    }
}

impl RegistrySource for S3Registry {
    fn location(&self) -> &str {
        &self.location
    }

    async fn load(&self) -> Result<Vec<CourseRecord>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await
            .map_err(|e| {
                SkillError::registry_unavailable(
                    &self.location,
                    format!("{:?}", e.into_service_error()),
                )
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| SkillError::registry_unavailable(&self.location, e))?;

        parse_registry(&self.location, &data.into_bytes())
    }
}
