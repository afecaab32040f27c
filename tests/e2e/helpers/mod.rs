use anyhow::Result;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod mock_provider;

use api_client::TestClient;
use mock_provider::MockSpeechProvider;

pub const SYSTEM_KEY: &str = "system-test-key-0000";
pub const FREE_USAGE_LIMIT: u32 = 10;

pub struct TestContext {
    pub client: TestClient,
    pub provider: Arc<MockSpeechProvider>,
    #[allow(dead_code)]
    pub settings: Arc<voice_studio_backend::infrastructure::repositories::InMemorySettingsRepository>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let provider = Arc::new(MockSpeechProvider::new());
            let settings = Arc::new(
                voice_studio_backend::infrastructure::repositories::InMemorySettingsRepository::new(),
            );

            let app = create_app(settings.clone(), provider.clone())
                .await
                .expect("Failed to create app");

            // Start server on an ephemeral port
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

            Self {
                client: TestClient::new(&base_url),
                provider,
                settings,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {}
    }
}

impl TestContext {
    /// Store user credentials through the API
    pub async fn use_keys(&self, keys: &[&str]) {
        self.client
            .put("/api/credentials", &json!({ "keys": keys }))
            .await
            .unwrap()
            .assert_status(hyper::StatusCode::OK);
    }

    /// Load text and return the segment list body
    pub async fn load_text(&self, text: &str, max_words: Option<usize>) -> Value {
        let response = self
            .client
            .post("/api/segments", &json!({ "text": text, "max_words": max_words }))
            .await
            .unwrap();
        response.assert_status(hyper::StatusCode::OK);
        response.body.clone().unwrap()
    }
}

/// Segment ids in order from a segment list body
pub fn segment_ids(list: &Value) -> Vec<String> {
    list["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn segment_statuses(list: &Value) -> Vec<String> {
    list["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["status"].as_str().unwrap().to_string())
        .collect()
}

/// Voice body that skips translation
pub fn auto_voice() -> Value {
    json!({ "voice": { "language": "auto" } })
}

async fn create_app(
    settings: Arc<voice_studio_backend::infrastructure::repositories::InMemorySettingsRepository>,
    provider: Arc<MockSpeechProvider>,
) -> Result<Router> {
    use voice_studio_backend::{
        controllers::{
            credentials::CredentialController, generation::GenerationController,
            segments::SegmentController,
        },
        domain::{
            credential::CredentialService,
            generation::{BatchOrchestrator, GenerationService, SegmentGenerator},
            quota::QuotaService,
            segment::{SegmentService, SegmentStore, DEFAULT_MAX_WORDS},
            voice::LanguageDetection,
        },
        infrastructure::{
            http::{build_router, AppControllers},
            repositories::{CredentialRepository, UsageRepository},
        },
    };

    let usage_repo = Arc::new(UsageRepository::new(settings.clone()));
    let credential_repo = Arc::new(CredentialRepository::new(settings.clone()));

    let quota_service = Arc::new(
        QuotaService::load(usage_repo, FREE_USAGE_LIMIT, chrono::Duration::minutes(120)).await?,
    );
    let credential_service = Arc::new(CredentialService::new(
        credential_repo,
        quota_service.clone(),
        Some(SYSTEM_KEY.to_string()),
    ));
    credential_service.bootstrap().await?;

    let store = Arc::new(SegmentStore::new());
    let segment_service = Arc::new(SegmentService::new(store.clone(), DEFAULT_MAX_WORDS));

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
        false,
    ));

    Ok(build_router(AppControllers {
        settings,
        segments: Arc::new(SegmentController::new(segment_service)),
        generation: Arc::new(GenerationController::new(generation_service)),
        credentials: Arc::new(CredentialController::new(credential_service, quota_service)),
    }))
}
