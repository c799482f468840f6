//! Providers Command
//!
//! Probe every configured backend in priority order.
//!
//! Usage:
//!   autoblog providers

use console::style;

use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::types::Result;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let output = Output::new();
    output.header("AI providers (priority order)");

    let reports = ctx.selector().probe_all().await;
    for (index, report) in reports.iter().enumerate() {
        let status = match (report.has_credential, report.available) {
            (_, true) => style("available").green(),
            (false, false) => style("no credential").yellow(),
            (true, false) => style("unavailable").red(),
        };
        println!(
            "  {}. {:<18} {:<20} {}",
            index + 1,
            report.kind.name(),
            report.model,
            status
        );
    }

    match reports.iter().find(|r| r.available) {
        Some(first) => output.success(&format!("{} would be selected", first.kind)),
        None => output.error("No provider available"),
    }
    Ok(())
}
