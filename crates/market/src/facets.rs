use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use market_catalog::{Catalog, Facets};

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum FacetsFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for FacetsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FacetsFormat::Text => write!(f, "text"),
            FacetsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "Print the type and category selector entries")]
pub struct FacetsArgs {
    /// Output format
    #[arg(short, long, default_value_t = FacetsFormat::Text)]
    pub format: FacetsFormat,
}

pub fn execute(args: FacetsArgs, catalog: &Catalog) -> Result<()> {
    let facets = Facets::from_catalog(catalog);
    let mut writer = io::stdout().lock();

    match args.format {
        FacetsFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&facets)?)?,
        FacetsFormat::Text => {
            let kinds: Vec<String> = facets.kinds.iter().map(ToString::to_string).collect();
            let categories: Vec<String> =
                facets.categories.iter().map(ToString::to_string).collect();
            writeln!(writer, "{} {}", "类型:".bold(), kinds.join(", "))?;
            writeln!(writer, "{} {}", "分类:".bold(), categories.join(", "))?;
        }
    }
    Ok(())
}
