use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "docflow")]
#[command(
    version,
    about = "Documentation automation pipeline: detect, generate, enhance, publish"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize docflow in the current directory
    Init {
        #[arg(long, help = "Project name used in generated pages")]
        name: Option<String>,
        #[arg(long, short, help = "Overwrite existing configuration")]
        force: bool,
    },

    /// Regenerate the documentation tree (deterministic, no AI)
    Generate,

    /// Run the full pipeline once over a set of changed paths
    Run {
        #[arg(help = "Changed file paths (e.g. from a version-control diff)")]
        paths: Vec<PathBuf>,
        #[arg(long, short, help = "Modules known to have changed")]
        module: Vec<String>,
        #[arg(long, help = "Mark the shared type declarations as changed")]
        types_changed: bool,
        #[arg(long, help = "Force AI enhancement regardless of the threshold")]
        enhance: bool,
        #[arg(long, help = "Skip AI enhancement regardless of the threshold")]
        no_enhance: bool,
        #[arg(long, help = "Skip the git publish step")]
        no_publish: bool,
    },

    /// Enhance already-generated pages with AI insights
    Enhance {
        #[arg(help = "Modules to enhance")]
        modules: Vec<String>,
        #[arg(long, help = "Enhance every module in the catalogue")]
        all: bool,
    },

    /// Watch the source tree and process changes continuously
    Watch,

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
        #[arg(long, help = "Output as JSON instead of TOML")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize global configuration
    Init {
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
        eprintln!("\x1b[31mdocflow encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
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
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { name, force } => {
            docflow::cli::commands::init::run(name.as_deref(), force)?;
        }
        Commands::Generate => {
            docflow::cli::commands::generate::run()?;
        }
        Commands::Run {
            paths,
            module,
            types_changed,
            enhance,
            no_enhance,
            no_publish,
        } => {
            if enhance && no_enhance {
                anyhow::bail!("--enhance and --no-enhance are mutually exclusive");
            }
            let forced = if enhance {
                Some(true)
            } else if no_enhance {
                Some(false)
            } else {
                None
            };

            let rt = Runtime::new()?;
            rt.block_on(docflow::cli::commands::run::run(
                docflow::cli::commands::run::RunOptions {
                    paths,
                    modules: module,
                    types_changed,
                    enhance: forced,
                    no_publish,
                },
            ))?;
        }
        Commands::Enhance { modules, all } => {
            let rt = Runtime::new()?;
            rt.block_on(docflow::cli::commands::enhance::run(modules, all))?;
        }
        Commands::Watch => {
            let rt = Runtime::new()?;
            rt.block_on(docflow::cli::commands::watch::run())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => {
                docflow::cli::commands::config::show(json)?;
            }
            ConfigAction::Path => {
                docflow::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                docflow::cli::commands::config::init_global(force)?;
            }
        },
    }

    Ok(())
}
