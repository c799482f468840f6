//! Publish Command
//!
//! Publish an existing markdown file through the fallback pipeline.
//!
//! Usage:
//!   autoblog publish <FILE> [--featured]

use std::path::Path;

use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::publish::PublishOptions;
use crate::types::{BlogError, Result};

pub async fn run(ctx: &CommandContext, file: &Path, featured: bool) -> Result<()> {
    let output = Output::new();

    let content = tokio::fs::read_to_string(file).await?;
    if content.trim().is_empty() {
        return Err(BlogError::Config(format!(
            "{} is empty; nothing to publish",
            file.display()
        )));
    }

    let result = ctx
        .pipeline()?
        .publish(
            &content,
            PublishOptions {
                manual: true,
                featured,
                ..PublishOptions::default()
            },
        )
        .await?;

    output.publish_result(&result);
    Ok(())
}
