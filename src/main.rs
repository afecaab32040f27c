use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_studio_backend::controllers::{
    credentials::CredentialController, generation::GenerationController,
    segments::SegmentController,
};
use voice_studio_backend::domain::credential::CredentialService;
use voice_studio_backend::domain::generation::{
    BatchOrchestrator, GenerationService, SegmentGenerator,
};
use voice_studio_backend::domain::quota::QuotaService;
use voice_studio_backend::domain::segment::{SegmentService, SegmentStore};
use voice_studio_backend::domain::voice::LanguageDetection;
use voice_studio_backend::infrastructure::config::{Config, LogFormat};
use voice_studio_backend::infrastructure::db::{check_connection, create_pool, ensure_schema};
use voice_studio_backend::infrastructure::http::{start_http_server, AppControllers};
use voice_studio_backend::infrastructure::providers::{GeminiConfig, GeminiSpeechProvider};
use voice_studio_backend::infrastructure::repositories::{
    CredentialRepository, InMemorySettingsRepository, PgSettingsRepository, SettingsRepository,
    UsageRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(
        "Starting Voice Studio Backend on {}:{}",
        config.host,
        config.port
    );

    // Settings storage: Postgres when configured, process memory otherwise
    let settings: Arc<dyn SettingsRepository> = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            check_connection(&pool).await?;
            ensure_schema(&pool).await?;
            tracing::info!("Database connection verified");
            Arc::new(PgSettingsRepository::new(Arc::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, settings are kept in memory only");
            Arc::new(InMemorySettingsRepository::new())
        }
    };

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Repositories
    let usage_repo = Arc::new(UsageRepository::new(settings.clone()));
    let credential_repo = Arc::new(CredentialRepository::new(settings.clone()));

    // 2. Speech provider
    let provider = Arc::new(GeminiSpeechProvider::new(GeminiConfig {
        base_url: config.gemini_api_base_url.clone(),
        tts_model: config.tts_model.clone(),
        translation_model: config.translation_model.clone(),
        timeout: Duration::from_secs(config.provider_timeout_secs),
    })?);
    tracing::info!(model = %config.tts_model, "Speech provider initialized");

    // 3. Services
    let quota_service = Arc::new(
        QuotaService::load(
            usage_repo,
            config.free_usage_limit,
            chrono::Duration::minutes(config.free_usage_window_minutes),
        )
        .await?,
    );
    let credential_service = Arc::new(CredentialService::new(
        credential_repo,
        quota_service.clone(),
        config.system_api_key.clone(),
    ));
    credential_service.bootstrap().await?;

    let store = Arc::new(SegmentStore::new());
    let segment_service = Arc::new(SegmentService::new(store.clone(), config.segment_max_words));

    let generator = Arc::new(SegmentGenerator::new(
        provider,
        Arc::new(LanguageDetection::new()),
    ));
    let orchestrator = Arc::new(BatchOrchestrator::new(
        generator.clone(),
        store.clone(),
        quota_service.clone(),
    ));
    let generation_service = Arc::new(GenerationService::new(
        generator,
        orchestrator,
        store,
        credential_service.clone(),
        quota_service.clone(),
        config.preview_cache_enabled,
    ));

    // 4. Controllers
    let controllers = AppControllers {
        settings,
        segments: Arc::new(SegmentController::new(segment_service)),
        generation: Arc::new(GenerationController::new(generation_service)),
        credentials: Arc::new(CredentialController::new(credential_service, quota_service)),
    };

    start_http_server(config, controllers)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voice_studio_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
