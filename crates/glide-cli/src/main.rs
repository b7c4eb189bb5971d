use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glide_core::AppConfig;

mod commands;

use commands::simulate::{parse_fold, parse_scroll_command, MotionArg, SimulateArgs};
use glide_core::motion::ScrollCommand;

#[derive(Parser)]
#[command(name = "glide")]
#[command(author, version, about = "Smooth, line-quantized scrolling and jumping for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of ~/.config/glide/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a file in the pager
    View {
        /// File to show
        file: PathBuf,
    },
    /// Run one motion headless and print every tick
    Simulate {
        /// Number of lines in the buffer
        #[arg(long)]
        lines: usize,
        /// Window height (defaults to ui.sim_height)
        #[arg(long)]
        height: Option<usize>,
        /// Starting cursor line
        #[arg(long, default_value_t = 1)]
        from: usize,
        /// Closed fold over a line range, e.g. 40-60 (repeatable)
        #[arg(long = "fold", value_parser = parse_fold)]
        folds: Vec<(usize, usize)>,
        /// Scroll by N lines (negative scrolls up)
        #[arg(long, allow_hyphen_values = true, group = "motion")]
        scroll: Option<i64>,
        /// Full-window scroll forward, same as --scroll-command page-down
        #[arg(long, group = "motion")]
        page_down: bool,
        /// Scroll command: <C-d>, <C-u>, <C-f>, <C-b> or half-page-down, page-up, ...
        #[arg(long, value_parser = parse_scroll_command, group = "motion")]
        scroll_command: Option<ScrollCommand>,
        /// Named jump: gg, G, j or k
        #[arg(long, group = "motion")]
        jump: Option<String>,
        /// Count for --page-down, --scroll-command or --jump
        #[arg(long)]
        count: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show or initialize the configuration
    Config {
        /// Write the default configuration if no file exists
        #[arg(long)]
        init: bool,
        /// Only print the config file location
        #[arg(long)]
        path: bool,
    },
}

/// Install the global subscriber
///
/// Precedence: RUST_LOG env var > config file > default "info". With a log
/// file, output goes there only, so nothing lands on the pager's screen.
fn init_logging(config: &AppConfig, log_file: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("glide={0},glide_core={0},glide_tui={0}", config.general.log_level)));

    if let Some(file_name) = log_file {
        let log_dir = config.log_dir();
        match std::fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(non_blocking)
                            .with_ansi(false),
                    )
                    .init();
                return Some(guard);
            }
            Err(e) => {
                // No stderr fallback: it would draw over the pager
                eprintln!("Warning: Could not create log directory {:?}: {}", log_dir, e);
                return None;
            }
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
    None
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    let log_file = matches!(cli.command, Commands::View { .. }).then_some("glide.log");
    let _log_guard = init_logging(&config, log_file);

    match cli.command {
        Commands::View { file } => commands::view::run(config, cli.config, &file),
        Commands::Simulate {
            lines,
            height,
            from,
            folds,
            scroll,
            page_down,
            scroll_command,
            jump,
            count,
            json,
        } => {
            let motion = if let Some(lines) = scroll {
                MotionArg::Scroll(lines)
            } else if page_down {
                MotionArg::Command(ScrollCommand::PageDown)
            } else if let Some(command) = scroll_command {
                MotionArg::Command(command)
            } else if let Some(name) = jump {
                MotionArg::Jump(name)
            } else {
                anyhow::bail!("one of --scroll, --page-down, --scroll-command or --jump is required");
            };
            let args = SimulateArgs {
                lines,
                height: height.unwrap_or(config.ui.sim_height),
                from,
                folds,
                motion,
                count,
                json,
            };
            commands::simulate::run(&config, &args)
        }
        Commands::Config { init, path } => commands::config::run(&config, cli.config, init, path),
    }
}
