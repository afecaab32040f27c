pub mod credential_repository;
pub mod settings_repository;
pub mod usage_repository;

pub use credential_repository::CredentialRepository;
pub use settings_repository::{InMemorySettingsRepository, PgSettingsRepository, SettingsRepository};
pub use usage_repository::UsageRepository;
