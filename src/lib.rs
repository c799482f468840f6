//! Autoblog - AI Blog Post Generation and Publishing
//!
//! Generates marketing blog posts through an ordered set of AI backends and
//! delivers them to a Git host with a tiered fallback chain.
//!
//! ## Core Features
//!
//! - **Provider Selection**: Gemini, GitHub Models and an optional
//!   OpenAI-compatible backend, probed in priority order
//! - **Response Extraction**: JSON recovery from fenced or chatty model output
//! - **Publish Pipeline**: direct commit with retries, pull request, local save
//!
//! ## Quick Start
//!
//! ```ignore
//! use autoblog::{ConfigLoader, ContentWorkflow, PublishOptions};
//! use autoblog::cli::CommandContext;
//!
//! let ctx = CommandContext::load(None)?;
//! let provider = ctx.selector().select().await?;
//! let workflow = ContentWorkflow::new(provider, ctx.pipeline()?);
//! let report = workflow.run(PublishOptions::default()).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: provider abstraction, credentials, response extraction
//! - [`publish`]: post preparation, repository host, fallback pipeline
//! - [`workflow`]: market, strategy and writer agents
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod publish;
pub mod types;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{BlogError, ErrorCategory, Result};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    AiProvider, CredentialKey, CredentialSource, EnvThenSecretStore, Provider, ProviderKind,
    ProviderSelector, ResponseExtractor, extract_json_from_response,
};

// =============================================================================
// Publish Re-exports
// =============================================================================

pub use publish::{
    GitHubHost, PublishAttemptResult, PublishMethod, PublishOptions, PublishPipeline,
    RepositoryHost,
};
pub use workflow::{ContentStrategy, ContentWorkflow, WorkflowReport};
