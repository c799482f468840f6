//! Config Command
//!
//! Manage autoblog configuration.
//!
//! Usage:
//!   autoblog config show [-f toml|json]
//!   autoblog config path
//!   autoblog config init [-g] [--force]

use crate::cli::CommandContext;
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{BlogError, Result};

/// Print the merged effective configuration
pub fn show(ctx: &CommandContext, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(&ctx.config)?,
        "toml" => toml::to_string_pretty(&ctx.config)
            .map_err(|e| BlogError::Config(format!("Failed to render config: {}", e)))?,
        other => {
            return Err(BlogError::Config(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// Show configuration file paths
pub fn path() -> Result<()> {
    let output = Output::new();
    match ConfigLoader::global_config_path() {
        Some(global) => output.field("Global", &global.display().to_string()),
        None => output.field("Global", "(unavailable)"),
    }
    output.field(
        "Project",
        &ConfigLoader::project_config_path().display().to_string(),
    );
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    Output::new().success(&format!("Configuration ready: {}", path.display()));
    Ok(())
}
