use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use market_catalog::Catalog;
use std::path::{Path, PathBuf};

mod browse;
mod config;
mod facets;
mod list;
mod show;

use config::Config;

#[derive(Parser)]
#[command(name = "market")]
#[command(about = "Search and browse the template market catalog", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Catalog file (.toml or .json) to use instead of the built-in one
    #[arg(long, global = true, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    catalog: Option<PathBuf>,

    /// Config file [default: <config dir>/template-market/config.toml]
    #[arg(long, global = true, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog interactively
    #[command(alias = "b")]
    Browse(browse::BrowseArgs),

    /// List templates matching a search and filters
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Show one template in detail
    Show(show::ShowArgs),

    /// Print the type and category selector entries
    Facets(facets::FacetsArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug, RUST_LOG overrides either
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    let mut logger = env_logger::Builder::from_env(env);
    if matches!(cli.command, Commands::Browse(_)) {
        // stderr belongs to the terminal UI
        match browse::log_file() {
            Some(file) => logger.target(env_logger::Target::Pipe(Box::new(file))),
            None => logger.filter_level(log::LevelFilter::Off),
        };
    }
    logger.init();

    let config = Config::load(cli.config.as_deref())?;
    let catalog = load_catalog(cli.catalog.as_deref(), &config)?;

    match cli.command {
        Commands::Browse(args) => browse::execute(args, catalog, &config),
        Commands::List(args) => list::execute(args, &catalog),
        Commands::Show(args) => show::execute(args, &catalog),
        Commands::Facets(args) => facets::execute(args, &catalog),
    }
}

/// `--catalog` wins over the config file, which wins over the built-in catalog
fn load_catalog(flag: Option<&Path>, config: &Config) -> anyhow::Result<Catalog> {
    match flag.or(config.catalog.as_deref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}
