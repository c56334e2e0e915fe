use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use skill_profile::app::handler::{self, HandlerResponse};
use skill_profile::utils::{logger, validation::Validate};
use skill_profile::{narrative, LambdaConfig, S3Registry, SkillAnalyzer};

async fn function_handler(event: LambdaEvent<Value>) -> Result<HandlerResponse, Error> {
    tracing::info!("Starting skill profile Lambda function");

    // 每次調用都重新讀取 registry 快照
    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let registry = S3Registry::new(
        s3_client,
        lambda_config.s3_bucket.clone(),
        lambda_config.s3_key.clone(),
    );
    let narrative = narrative::from_config(&lambda_config)
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    let analyzer = SkillAnalyzer::new(registry).with_optional_narrative(narrative);

    let response = handler::handle(&analyzer, &event.payload).await;

    tracing::info!(
        "Skill profile Lambda function finished with status {}",
        response.status_code
    );
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
