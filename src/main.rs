//! OrgSearch CLI
//!
//! Interactive live search against the organizer backend, plus one-shot
//! query and analyze commands.

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use orgsearch::tui::ui::{cell_text, result_columns};
use orgsearch::{
    AppConfig, HttpBackend, OrgSearchError, SearchController, SearchStatus,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// OrgSearch - live search for a local file-organizing service
///
/// Type to search; queries are debounced and only the newest answer is
/// shown.
#[derive(Parser)]
#[command(name = "orgsearch")]
#[command(author = "OrgSearch Contributors")]
#[command(version)]
#[command(about = "Live search for a local file-organizing service", long_about = None)]
struct Cli {
    /// Config file (default: orgsearch.toml in the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Organizer backend base URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Quiet period after typing before a query is sent, in milliseconds
    #[arg(long, global = true)]
    debounce_ms: Option<u64>,

    /// Seconds a query may take before it fails
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search (default)
    Tui,

    /// Run a single search and print the results
    Query {
        /// Search text
        #[arg(allow_hyphen_values = true)]
        text: String,

        /// Print the result set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the organizer where a file belongs
    Analyze {
        /// File to analyze
        path: PathBuf,

        /// Print the suggestion as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();
    let mut backend_url = None;

    let result = load_config(&cli).and_then(|config| {
        let level = orgsearch::logging::level_for(cli.verbose, &config.log_level);
        let log_path = orgsearch::logging::init(level, config.log_file.as_deref());
        info!(version = orgsearch::VERSION, backend = %config.backend_url, "OrgSearch starting up");
        backend_url = Some(config.backend_url.clone());

        match cli.command {
            None | Some(Commands::Tui) => cmd_tui(&config),
            Some(Commands::Query { text, json }) => cmd_query(&config, &text, json),
            Some(Commands::Analyze { path, json }) => cmd_analyze(&config, &path, json),
            Some(Commands::Config) => cmd_config(&config, cli.config.as_deref(), log_path),
        }
    });

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        if let (true, Some(url)) = (e.is_backend_failure(), backend_url) {
            eprintln!(
                "{} is the organizer running at {}?",
                style("Hint:").yellow(),
                style(url).cyan()
            );
        }
        std::process::exit(1);
    }
}

/// File (or defaults) first, then command-line overrides
fn load_config(cli: &Cli) -> orgsearch::Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(ms) = cli.debounce_ms {
        config.debounce_ms = ms;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    config.validate()?;
    Ok(config)
}

fn controller_for(config: &AppConfig) -> orgsearch::Result<SearchController> {
    let backend = HttpBackend::from_config(config)?;
    Ok(SearchController::new(
        Arc::new(backend),
        config.controller_settings(),
    ))
}

/// Interactive search
fn cmd_tui(config: &AppConfig) -> orgsearch::Result<()> {
    let controller = controller_for(config)?;
    orgsearch::tui::run(controller, &config.backend_url)
}

/// One-shot search through the same controller the TUI uses
fn cmd_query(config: &AppConfig, text: &str, json: bool) -> orgsearch::Result<()> {
    let mut controller = controller_for(config)?;
    controller.set_query(text);

    if text.trim().is_empty() {
        println!("{} Empty query, nothing to search", style("!").yellow().bold());
        return Ok(());
    }

    let start = Instant::now();
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(format!("Searching for '{}'...", text));
    spinner.enable_steady_tick(Duration::from_millis(80));

    controller.flush();
    while !controller.is_settled() {
        controller.wait_for_response(Duration::from_millis(100));
        controller.poll();
    }
    spinner.finish_and_clear();

    let results = controller.results();

    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else if results.status == SearchStatus::Ready {
        println!(
            "{} Found {} results for '{}' in {}:",
            style("→").cyan().bold(),
            style(results.len()).green(),
            style(text).yellow(),
            HumanDuration(start.elapsed())
        );
        println!();

        let columns = result_columns(&results.items, 6);
        for (i, item) in results.items.iter().enumerate() {
            let mut fields = columns
                .iter()
                .filter_map(|key| item.get(key).map(|v| (key, cell_text(key, v))))
                .filter(|(_, v)| !v.is_empty());

            let Some((_, head)) = fields.next() else {
                continue;
            };
            println!(
                "  {} {}",
                style(format!("{:3}.", i + 1)).dim(),
                style(head).cyan()
            );
            for (key, value) in fields {
                println!("      {} {}", style(format!("{}:", key)).dim(), value);
            }
        }
    }

    if results.status == SearchStatus::Failed {
        let message = results.error.clone().unwrap_or_else(|| "query failed".to_string());
        return Err(OrgSearchError::QueryFailed(message));
    }
    Ok(())
}

/// Organize suggestion for one file
fn cmd_analyze(config: &AppConfig, path: &Path, json: bool) -> orgsearch::Result<()> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);

    let backend = HttpBackend::from_config(config)?;
    let suggestion = backend.analyze(&content)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
        return Ok(());
    }

    println!(
        "{} {}",
        style("File:").bold(),
        style(path.display()).cyan()
    );
    println!(
        "{} {}",
        style("Suggested name:").bold(),
        style(&suggestion.filename).green()
    );
    println!(
        "{} {}",
        style("Suggested folder:").bold(),
        style(&suggestion.folder).green()
    );
    println!(
        "{} {}",
        style("Destination:").dim(),
        suggestion.destination()
    );
    Ok(())
}

fn cmd_config(
    config: &AppConfig,
    explicit: Option<&Path>,
    log_path: Option<PathBuf>,
) -> orgsearch::Result<()> {
    let label = if explicit.is_some() { "# Config:" } else { "# Global config:" };
    println!(
        "{} {}",
        style(label).dim(),
        orgsearch::config::config_source(explicit)
    );
    match log_path {
        Some(path) => println!("{} {}", style("# Log file:").dim(), path.display()),
        None => println!("{}", style("# Log file: disabled").dim()),
    }
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
