//! Publish Pipeline
//!
//! Delivers a generated post through increasingly conservative strategies:
//! direct commit with bounded retries, then a pull request, then a local file.
//! Only a failed local save is reported as an error.
//!
//! ## Modules
//!
//! - `post`: title, slug, path and front matter
//! - `host`: repository host trait and the GitHub implementation
//! - `stage`: fallback state machine

mod host;
mod post;
mod stage;

pub use host::{Committer, GitHubHost, HostResult, RepositoryHost};
pub use post::{BlogPost, FrontMatter, PostDefaults, extract_title, slugify};
pub use stage::{PublishMethod, PublishStage, StageOutcome};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::config::PublishConfig;
use crate::types::{BlogError, PublishAttemptError, Result};

/// Caller intent for one publish
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Triggered by a schedule rather than a person
    pub scheduled: bool,
    pub manual: bool,
    pub featured: bool,
}

impl PublishOptions {
    /// Scheduled runs are always featured
    pub fn is_featured(&self) -> bool {
        self.featured || self.scheduled
    }
}

/// Outcome of a publish; immutable once returned
#[derive(Debug, Clone, Serialize)]
pub struct PublishAttemptResult {
    pub success: bool,
    pub method: PublishMethod,
    /// Commit/PR URL or local path
    pub location: String,
    /// Last remote failure when a fallback was used
    pub error: Option<String>,
    pub title: String,
    pub slug: String,
    pub file_name: String,
    pub file_path: String,
    pub live_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Tiered delivery against an optional repository host
pub struct PublishPipeline<H> {
    host: Option<H>,
    config: PublishConfig,
}

impl<H: RepositoryHost> PublishPipeline<H> {
    /// `host = None` means every publish is saved locally
    pub fn new(host: Option<H>, config: PublishConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub async fn publish(
        &self,
        content: &str,
        options: PublishOptions,
    ) -> Result<PublishAttemptResult> {
        self.publish_at(content, options, Utc::now()).await
    }

    /// Publish with an explicit timestamp for the path and front matter
    #[instrument(skip(self, content), fields(featured = options.is_featured()))]
    pub async fn publish_at(
        &self,
        content: &str,
        options: PublishOptions,
        now: DateTime<Utc>,
    ) -> Result<PublishAttemptResult> {
        let defaults = PostDefaults {
            author: self.config.author.clone(),
            tags: self.config.tags.clone(),
        };
        let post = BlogPost::prepare(
            content,
            &self.config.blog_path,
            &defaults,
            options.is_featured(),
            now,
        )?;
        info!("Publishing \"{}\" as {}", post.title, post.file_path);

        let max_attempts = self.config.max_attempts.max(1);
        let mut stage = PublishStage::Start;
        let mut location = String::new();
        let mut last_error: Option<PublishAttemptError> = None;

        while !stage.is_terminal() {
            let outcome = match stage {
                PublishStage::Start => match &self.host {
                    Some(host) => {
                        debug!("Repository host configured: {}", host.describe());
                        StageOutcome::HostReady
                    }
                    None => {
                        warn!("No repository host configured - saving content locally");
                        StageOutcome::NoHost
                    }
                },

                PublishStage::DirectCommit { attempt } => {
                    match self.direct_commit(&post).await {
                        Ok(url) => {
                            info!("Content published by direct commit: {}", url);
                            location = url;
                            last_error = None;
                            StageOutcome::Succeeded
                        }
                        Err(e) => {
                            warn!(
                                kind = %e.kind,
                                "Direct commit attempt {}/{} failed: {}",
                                attempt, max_attempts, e
                            );
                            last_error = Some(e);
                            if attempt < max_attempts {
                                self.backoff(attempt).await;
                            }
                            StageOutcome::Failed
                        }
                    }
                }

                PublishStage::PullRequest => match self.pull_request(&post).await {
                    Ok(url) => {
                        info!("Content submitted as pull request: {}", url);
                        location = url;
                        StageOutcome::Succeeded
                    }
                    Err(e) => {
                        warn!(kind = %e.kind, "Pull request fallback failed: {}", e);
                        last_error = Some(e);
                        StageOutcome::Failed
                    }
                },

                PublishStage::LocalSave => match self.save_locally(&post).await {
                    Ok(path) => {
                        info!("Content saved locally: {}", path.display());
                        location = path.display().to_string();
                        StageOutcome::Succeeded
                    }
                    Err(e) => {
                        error!("Local save failed: {}", e);
                        return Err(e);
                    }
                },

                PublishStage::Completed(_) | PublishStage::Aborted => break,
            };

            let next = stage.next(outcome, max_attempts);
            debug!("Publish stage {} -> {}", stage, next);
            stage = next;
        }

        let PublishStage::Completed(method) = stage else {
            return Err(BlogError::Config(format!(
                "publish pipeline stopped in stage {}",
                stage
            )));
        };

        Ok(PublishAttemptResult {
            success: true,
            method,
            location,
            error: last_error.map(|e| e.to_string()),
            live_url: post.live_url(self.config.site_url.as_deref(), &self.config.blog_path),
            title: post.title,
            slug: post.slug,
            file_name: post.file_name,
            file_path: post.file_path,
            published_at: post.published_at,
        })
    }

    fn host(&self) -> HostResult<&H> {
        self.host.as_ref().ok_or_else(|| {
            PublishAttemptError::new("resolve host", None, "no repository host configured")
        })
    }

    /// Linear backoff: attempt index times the configured delay
    async fn backoff(&self, attempt: u32) {
        let delay = self.config.retry_delay() * attempt;
        if !delay.is_zero() {
            debug!("Retrying direct commit in {:?}", delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn direct_commit(&self, post: &BlogPost) -> HostResult<String> {
        self.host()?
            .put_file(&post.file_path, &post.document, &post.commit_message(), None)
            .await
    }

    async fn pull_request(&self, post: &BlogPost) -> HostResult<String> {
        let host = self.host()?;

        let base = host.default_branch().await?;
        let base_sha = host.branch_sha(&base).await?;

        let branch = format!(
            "{}/{}-{}",
            self.config.branch_prefix.trim_matches('/'),
            post.file_name.trim_end_matches(".md"),
            post.published_at.format("%H%M%S")
        );
        host.create_branch(&branch, &base_sha).await?;

        self.submit_branch(host, post, &branch, &base)
            .await
            .map_err(|mut e| {
                warn!(branch = %branch, "Branch left on remote after failed pull request");
                e.message = format!("{} (branch {} left on remote)", e.message, branch);
                e
            })
    }

    /// Write the post on `branch` and open the pull request against `base`
    async fn submit_branch(
        &self,
        host: &H,
        post: &BlogPost,
        branch: &str,
        base: &str,
    ) -> HostResult<String> {
        host.put_file(
            &post.file_path,
            &post.document,
            &post.commit_message(),
            Some(branch),
        )
        .await?;

        let body = format!(
            "Automated post `{}`.\n\nDirect commit to `{}` failed; opened for review instead.",
            post.file_path, base
        );
        host.open_pull_request(&post.title, branch, base, &body)
            .await
    }

    async fn save_locally(&self, post: &BlogPost) -> Result<PathBuf> {
        let path = self.config.local_root.join(&post.file_path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| BlogError::LocalSave {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, &post.document)
            .await
            .map_err(|source| BlogError::LocalSave {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}
