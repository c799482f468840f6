use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use autoblog::cli::CommandContext;
use autoblog::cli::commands;

#[derive(Parser)]
#[command(name = "autoblog")]
#[command(
    version,
    about = "AI blog post generation with tiered publishing to a Git host"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(
        long,
        short,
        global = true,
        help = "Use this config file instead of the global/project lookup"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a post with the first available AI provider and publish it
    Generate {
        #[arg(long, help = "Mark the post as featured")]
        featured: bool,
        #[arg(long, help = "Treat this run as a scheduled run (implies featured)")]
        scheduled: bool,
    },

    /// Publish an existing markdown file
    Publish {
        #[arg(help = "Markdown file with a top-level '# ' title")]
        file: PathBuf,
        #[arg(long, help = "Mark the post as featured")]
        featured: bool,
    },

    /// Probe configured AI providers in priority order
    Providers,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mautoblog encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Config commands that must work before a valid config exists
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Path => return Ok(commands::config::path()?),
            ConfigAction::Init { global, force } => {
                return Ok(commands::config::init(*global, *force)?);
            }
            ConfigAction::Show { .. } => {}
        }
    }

    let ctx = CommandContext::load(cli.config.as_deref())?;
    let rt = Runtime::new()?;

    match cli.command {
        Commands::Generate {
            featured,
            scheduled,
        } => {
            rt.block_on(commands::generate::run(&ctx, featured, scheduled))?;
        }
        Commands::Publish { file, featured } => {
            rt.block_on(commands::publish::run(&ctx, &file, featured))?;
        }
        Commands::Providers => {
            rt.block_on(commands::providers::run(&ctx))?;
        }
        Commands::Config { action } => {
            if let ConfigAction::Show { format } = action {
                commands::config::show(&ctx, &format)?;
            }
        }
    }

    Ok(())
}
