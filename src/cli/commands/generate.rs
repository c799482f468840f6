//! Generate Command
//!
//! Select a provider, run the content workflow and publish the result.
//!
//! Usage:
//!   autoblog generate [--featured] [--scheduled]

use crate::ai::provider::AiProvider;
use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::publish::PublishOptions;
use crate::types::Result;
use crate::workflow::ContentWorkflow;

pub async fn run(ctx: &CommandContext, featured: bool, scheduled: bool) -> Result<()> {
    let output = Output::new();
    output.header("Autoblog: generating a new post");

    let provider = ctx.selector().select().await?;
    output.info(&format!(
        "Using {} (model: {})",
        provider.name(),
        provider.model()
    ));

    let workflow = ContentWorkflow::new(provider, ctx.pipeline()?);
    let report = workflow
        .run(PublishOptions {
            scheduled,
            manual: !scheduled,
            featured,
        })
        .await?;

    output.field("Topic", &report.strategy.topic);
    output.publish_result(&report.publish);
    Ok(())
}
