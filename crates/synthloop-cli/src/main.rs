#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use synthloop_core::config::load_user_config;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "synthloop: crafting loop discovery for item catalogs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(flatten)]
    catalog: cmd::CatalogArgs,

    /// Project config file to use instead of ./synthloop.toml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Items",
        about = "Show one item",
        long_about = "Show an item's categories, recipe and effects, plus what it is used in and made from.",
        after_help = "EXAMPLES:\n    # Show an item\n    synthloop show \"Kindling Coal\"\n\n    # Emit machine-readable output\n    synthloop show Craft --format json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Items",
        about = "Find items by name or category",
        long_about = "Case-insensitive name search, or category search when TERM starts with \"(\".",
        after_help = "EXAMPLES:\n    # Names containing \"ore\"\n    synthloop search ore\n\n    # Craftable items tagged (Fuel)\n    synthloop search \"(Fuel)\" --craftable"
    )]
    Search(cmd::search::SearchArgs),

    #[command(
        next_help_heading = "Relations",
        about = "List items that can be crafted using an item",
        after_help = "EXAMPLES:\n    synthloop uses Uni"
    )]
    Uses(cmd::uses::UsesArgs),

    #[command(
        next_help_heading = "Relations",
        about = "List items an item can be crafted from",
        after_help = "EXAMPLES:\n    synthloop ingredients Craft"
    )]
    Ingredients(cmd::uses::IngredientsArgs),

    #[command(
        next_help_heading = "Relations",
        about = "Explain how two items relate",
        long_about = "Report whether A is an ingredient of B, B of A, both, or neither, with the matching requirement.",
        after_help = "EXAMPLES:\n    synthloop explain Craft \"Kindling Coal\""
    )]
    Explain(cmd::explain::ExplainArgs),

    #[command(next_help_heading = "Loops", about = "Discover crafting loops")]
    Loops(cmd::loops::LoopsArgs),

    #[command(
        next_help_heading = "Loops",
        about = "Summarize the craft graph",
        after_help = "EXAMPLES:\n    synthloop stats\n\n    # Emit machine-readable output\n    synthloop stats --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    synthloop completions bash > ~/.local/share/bash-completion/completions/synthloop"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Cli {
    /// `-c/--catalog` values from both sides of the subcommand name, in
    /// command-line order.
    fn catalog_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.catalog.catalogs.clone();
        paths.extend_from_slice(self.command.catalogs());
        paths
    }
}

impl Commands {
    fn catalogs(&self) -> &[PathBuf] {
        match self {
            Self::Show(args) => &args.catalog.catalogs,
            Self::Search(args) => &args.catalog.catalogs,
            Self::Uses(args) => &args.catalog.catalogs,
            Self::Ingredients(args) => &args.catalog.catalogs,
            Self::Explain(args) => &args.catalog.catalogs,
            Self::Loops(args) => args.catalogs(),
            Self::Stats(args) => &args.catalog.catalogs,
            Self::Completions(_) => &[],
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SYNTHLOOP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "synthloop=debug,info"
        } else {
            "synthloop=info,warn"
        })
    });

    let format = env::var("SYNTHLOOP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let project_root = env::current_dir()?;
    let catalogs = cli.catalog_paths();
    let session = cmd::open_session(&catalogs, cli.config.as_deref(), &project_root)?;
    debug!(items = session.catalog.len(), "catalog ready");

    match &cli.command {
        Commands::Show(args) => cmd::show::run_show(args, output, &session),
        Commands::Search(args) => cmd::search::run_search(args, output, &session),
        Commands::Uses(args) => cmd::uses::run_uses(args, output, &session),
        Commands::Ingredients(args) => cmd::uses::run_ingredients(args, output, &session),
        Commands::Explain(args) => cmd::explain::run_explain(args, output, &session),
        Commands::Loops(args) => cmd::loops::run_loops(args, output, &session),
        Commands::Stats(args) => cmd::stats::run_stats(args, output, &session),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let user = load_user_config().unwrap_or_else(|err| {
        warn!("ignoring user config: {err:#}");
        synthloop_core::config::UserConfig::default()
    });
    let output = resolve_output_mode(cli.format, cli.json, user.output.as_deref());
    if !output.is_pretty() || env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
