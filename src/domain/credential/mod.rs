pub mod dto;
pub mod error;
pub mod pool;
pub mod service;

pub use error::CredentialError;
pub use pool::{Credential, CredentialPool, CredentialSource};
pub use service::CredentialService;
