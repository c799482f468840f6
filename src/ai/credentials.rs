//! Credential Resolution
//!
//! Credentials are never part of [`Config`](crate::config::Config). Callers
//! hand a [`CredentialSource`] to the selector and the publish pipeline; the
//! default [`EnvThenSecretStore`] checks environment variables first and a
//! directory of secret files second.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::debug;

/// Which secret is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    Gemini,
    /// Used both by the hosted-models backend and the repository host
    GitHub,
    OpenAiCompatible,
}

impl CredentialKey {
    /// Environment variables checked, in order
    pub fn env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_AI_API_KEY"],
            Self::GitHub => &["GITHUB_TOKEN", "BLOG_GITHUB_TOKEN"],
            Self::OpenAiCompatible => &["DEEPSEEK_API_KEY", "OPENAI_API_KEY"],
        }
    }

    /// File name inside the secret store directory
    pub fn secret_name(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::GitHub => "GITHUB_TOKEN",
            Self::OpenAiCompatible => "DEEPSEEK_API_KEY",
        }
    }
}

/// Caller-supplied credential lookup
pub trait CredentialSource: Send + Sync {
    fn resolve(&self, key: CredentialKey) -> Option<SecretString>;
}

impl<F> CredentialSource for F
where
    F: Fn(CredentialKey) -> Option<SecretString> + Send + Sync,
{
    fn resolve(&self, key: CredentialKey) -> Option<SecretString> {
        self(key)
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variables, then `{dir}/{SECRET_NAME}` files
pub struct EnvThenSecretStore {
    env: EnvLookup,
    secrets_dir: Option<PathBuf>,
}

impl std::fmt::Debug for EnvThenSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvThenSecretStore")
            .field("secrets_dir", &self.secrets_dir)
            .finish_non_exhaustive()
    }
}

impl EnvThenSecretStore {
    /// Reads the process environment
    pub fn new(secrets_dir: Option<PathBuf>) -> Self {
        Self::with_env(secrets_dir, |name| std::env::var(name).ok())
    }

    /// Uses `env` in place of the process environment
    pub fn with_env<E>(secrets_dir: Option<PathBuf>, env: E) -> Self
    where
        E: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env: Box::new(env),
            secrets_dir,
        }
    }

    fn from_env(&self, key: CredentialKey) -> Option<String> {
        key.env_vars().iter().find_map(|var| {
            (self.env)(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .inspect(|_| debug!("Credential for {:?} found in ${}", key, var))
        })
    }

    fn from_store(&self, dir: &Path, key: CredentialKey) -> Option<String> {
        let path = dir.join(key.secret_name());
        let value = std::fs::read_to_string(&path).ok()?;
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        debug!("Credential for {:?} found in secret store", key);
        Some(value.to_string())
    }
}

impl CredentialSource for EnvThenSecretStore {
    fn resolve(&self, key: CredentialKey) -> Option<SecretString> {
        self.from_env(key)
            .or_else(|| {
                self.secrets_dir
                    .as_deref()
                    .and_then(|dir| self.from_store(dir, key))
            })
            .map(SecretString::from)
    }
}
