use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Opaque provider authorization token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last four characters, enough to tell keys apart
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.masked())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialSource {
    /// Credentials supplied by the caller
    User,
    /// The configured system credential, gated by the shared quota
    Shared,
}

/// Non-empty ordered set of interchangeable credentials.
///
/// Clones share the round-robin cursor used for single-shot assignment.
#[derive(Debug, Clone)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
    source: CredentialSource,
    cursor: Arc<AtomicUsize>,
}

impl CredentialPool {
    /// `None` when `credentials` is empty
    pub fn new(credentials: Vec<Credential>, source: CredentialSource) -> Option<Self> {
        if credentials.is_empty() {
            return None;
        }
        Some(Self {
            credentials: credentials.into(),
            source,
            cursor: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn is_shared(&self) -> bool {
        self.source == CredentialSource::Shared
    }

    pub fn get(&self, index: usize) -> Option<&Credential> {
        self.credentials.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }

    /// Any-of assignment for single-shot calls: rotates through the pool.
    pub fn next(&self) -> (usize, &Credential) {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.credentials.len();
        (index, &self.credentials[index])
    }
}
