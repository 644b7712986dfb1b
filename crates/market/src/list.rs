use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use market_catalog::{Catalog, FilterQuery, TemplateRecord, TemplateType, format_number};

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for ListFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListFormat::Table => write!(f, "table"),
            ListFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "List templates matching a search and filters")]
pub struct ListArgs {
    /// Case-insensitive text matched against title, description, and tags
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Template type, by label (框架图) or slug (diagram-framework)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub kind: Option<TemplateType>,

    /// Exact category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Output format
    #[arg(short, long, default_value_t = ListFormat::Table)]
    pub format: ListFormat,
}

pub fn execute(args: ListArgs, catalog: &Catalog) -> Result<()> {
    let query = FilterQuery {
        search: args.search,
        kind: args.kind,
        category: args.category,
    };
    let records = market_catalog::filter(catalog, &query);
    log::debug!("{} of {} templates match", records.len(), catalog.len());

    let records: Vec<&TemplateRecord> = records.iter().map(|r| &**r).collect();
    let mut writer = io::stdout().lock();
    match args.format {
        ListFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&records)?)?,
        ListFormat::Table if records.is_empty() => writeln!(writer, "未找到匹配的模板")?,
        ListFormat::Table => write_table(&records, writer)?,
    }

    Ok(())
}

fn write_table<W: Write>(records: &[&TemplateRecord], mut writer: W) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(comfy_table::ContentArrangement::DynamicFullWidth);

    table.set_header(vec![
        "ID", "Title", "Type", "Category", "Price", "Rating", "Downloads", "Tags",
    ]);
    for record in records {
        table.add_row(vec![
            record.id.clone(),
            record.title.clone(),
            record.kind.label().to_string(),
            record.category.clone(),
            record.price_label(),
            format_number(record.rating),
            record.downloads_label(),
            record.tags.join(", "),
        ]);
    }

    writeln!(writer, "{table}")?;
    writeln!(writer, "{} 个模板", records.len())?;
    Ok(())
}
