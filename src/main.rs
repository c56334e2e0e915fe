use clap::Parser;
use skill_profile::core::ConfigProvider;
use skill_profile::utils::error::ErrorSeverity;
use skill_profile::utils::{logger, validation::Validate};
use skill_profile::{narrative, output, CliConfig, FileRegistry, SkillAnalyzer, SkillError};

async fn run(mut config: CliConfig) -> Result<(), SkillError> {
    config.load_file()?;
    config.validate()?;

    let queries = config.course_queries()?;
    tracing::info!("Analyzing {} course queries", queries.len());

    let registry = FileRegistry::new(config.registry_location());
    let analyzer = SkillAnalyzer::new_with_monitoring(registry, config.monitor)
        .with_optional_narrative(narrative::from_config(&config)?);

    let profile = analyzer.run(&queries).await?;
    let rendered = output::render(&profile, config.output_format())?;

    match &config.output {
        Some(path) => {
            tokio::fs::write(path, rendered).await?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => println!("{}", rendered),
    }

    if !profile.unresolved.is_empty() {
        tracing::warn!(
            "Could not find the following courses in registry: {:?}",
            profile
                .unresolved
                .iter()
                .map(|u| (u.title.as_str(), u.code.as_str()))
                .collect::<Vec<_>>()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting skill-profile CLI");
    tracing::debug!("CLI config: {:?}", config);
    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Skill profile failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}
