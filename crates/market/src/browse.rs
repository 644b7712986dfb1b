use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use market_catalog::{Catalog, Controller, PresentationMode};

use crate::config::Config;

#[derive(Args, Debug, Clone)]
#[command(about = "Browse the catalog in an interactive terminal UI")]
pub struct BrowseArgs {
    /// Initial layout (grid or list); defaults to the config's ui.default_mode
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<PresentationMode>,
}

/// `<cache_dir>/template-market/market.log`
fn log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("template-market").join("market.log"))
}

/// Log file that replaces stderr while the UI owns the terminal
pub fn log_file() -> Option<File> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    File::create(&path).ok()
}

pub fn execute(args: BrowseArgs, catalog: Catalog, config: &Config) -> Result<()> {
    let mode = args.mode.unwrap_or(config.ui.default_mode);
    log::info!(
        "Browsing {} templates in {} mode",
        catalog.len(),
        mode
    );
    market_tui::run(Controller::new(catalog, mode))
}
