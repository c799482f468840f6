//! AI Integration Layer
//!
//! Backend abstraction, credential lookup and decoding of model output.

pub mod credentials;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use credentials::{CredentialKey, CredentialSource, EnvThenSecretStore};
pub use provider::{
    AiProvider, GeminiProvider, GitHubModelsProvider, OpenAiCompatibleProvider, ProbeReport,
    Provider, ProviderConfig, ProviderKind, ProviderSelector,
};
pub use timeout::{TimeoutConfig, with_timeout_map};
pub use validation::{ResponseExtractor, extract_json_from_response};
