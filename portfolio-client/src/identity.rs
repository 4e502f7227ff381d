use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::info;
use rand::Rng;
use serde_json::{Map, Value};

use crate::errors::ClientError;

/// Storage key under which the anonymous identity is kept.
pub const IDENTITY_KEY: &str = "userIdentifier";

const SUFFIX_LENGTH: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentityToken {
    fn from(value: String) -> Self {
        IdentityToken(value)
    }
}

/// `anon_<unix millis>_<9 random base36 chars>`
pub fn generate_identity() -> IdentityToken {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    IdentityToken(format!("anon_{}_{}", chrono::Utc::now().timestamp_millis(), suffix))
}

pub trait IdentityProvider {
    /// Returns the stored identity, creating and persisting one on first use.
    fn get_or_create_identity(&self) -> Result<IdentityToken, ClientError>;
}

/// Persists the identity in a JSON key-value file shared with other settings.
pub struct FileIdentityProvider {
    path: PathBuf,
}

impl FileIdentityProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_entries(&self) -> Result<Map<String, Value>, ClientError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(ClientError::IdentityStorage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

impl IdentityProvider for FileIdentityProvider {
    fn get_or_create_identity(&self) -> Result<IdentityToken, ClientError> {
        let mut entries = self.read_entries()?;

        if let Some(Value::String(existing)) = entries.get(IDENTITY_KEY) {
            if !existing.is_empty() {
                return Ok(IdentityToken(existing.clone()));
            }
        }

        let identity = generate_identity();
        entries.insert(IDENTITY_KEY.to_string(), Value::String(identity.0.clone()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(entries))?)?;

        info!("created anonymous identity in {}", self.path.display());

        Ok(identity)
    }
}

#[derive(Default)]
pub struct MemoryIdentityProvider {
    identity: Mutex<Option<IdentityToken>>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(identity: impl Into<String>) -> Self {
        Self {
            identity: Mutex::new(Some(IdentityToken(identity.into()))),
        }
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn get_or_create_identity(&self) -> Result<IdentityToken, ClientError> {
        let mut identity = self.identity.lock()?;

        Ok(identity.get_or_insert_with(generate_identity).clone())
    }
}
