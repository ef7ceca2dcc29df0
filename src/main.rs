use std::sync::Arc;

use clap::Parser;
use recipe_recommender::core::ConfigProvider;
use recipe_recommender::utils::error::ErrorSeverity;
use recipe_recommender::utils::{logger, validation::Validate};
use recipe_recommender::{
    AppSettings, AppState, CliConfig, LocalStorage, Recommender, RecommenderError,
    RecommenderServer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting recipe-recommender");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match cli.resolve().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    let recommender = match build_recommender(&settings).await {
        Ok(recommender) => recommender,
        Err(e) => fail(e),
    };

    tracing::info!(
        "📚 Recommender '{}' ready with {} records",
        recommender.name(),
        recommender.len()
    );

    let state = AppState::new(Arc::new(recommender), &settings);
    let server = RecommenderServer::bind(&settings, state).await?;
    server.run().await?;

    Ok(())
}

async fn build_recommender(settings: &AppSettings) -> recipe_recommender::Result<Recommender> {
    let storage = LocalStorage::new(".".to_string());
    let mut recommender =
        Recommender::from_storage(&storage, settings.dataset_path(), settings.dataset_name())
            .await?;
    recommender.setup(&settings.index_field, &settings.content_field)?;
    Ok(recommender)
}

fn fail(e: RecommenderError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
