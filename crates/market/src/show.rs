use std::io::{self, Write};

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use colored::Colorize;
use market_catalog::{Catalog, TemplateRecord, format_number};
use unicode_width::UnicodeWidthStr;

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum ShowFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for ShowFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShowFormat::Text => write!(f, "text"),
            ShowFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "Show one template in detail")]
pub struct ShowArgs {
    /// Template id
    pub id: String,

    /// Output format
    #[arg(short, long, default_value_t = ShowFormat::Text)]
    pub format: ShowFormat,
}

pub fn execute(args: ShowArgs, catalog: &Catalog) -> Result<()> {
    let Some(record) = catalog.get(&args.id) else {
        bail!("Template '{}' not found", args.id);
    };

    let mut writer = io::stdout().lock();
    match args.format {
        ShowFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&**record)?)?,
        ShowFormat::Text => write_detail(record, writer)?,
    }
    Ok(())
}

/// Pad a label to a fixed display width so values line up
fn label(text: &str) -> String {
    const WIDTH: usize = 10;
    format!("  {text}{}", " ".repeat(WIDTH.saturating_sub(text.width())))
}

fn write_detail<W: Write>(record: &TemplateRecord, mut writer: W) -> io::Result<()> {
    writeln!(
        writer,
        "{} [{}]",
        record.title.bold(),
        record.kind.label().cyan()
    )?;

    let price = if record.is_free() {
        record.price_label().green()
    } else {
        record.price_label().yellow()
    };
    let premium = if record.is_premium {
        format!("  {}", "★ 高级".magenta())
    } else {
        String::new()
    };

    writeln!(writer, "{}{}", label("ID").dimmed(), record.id)?;
    writeln!(writer, "{}{}", label("分类").dimmed(), record.category)?;
    writeln!(writer, "{}{}", label("作者").dimmed(), record.author)?;
    writeln!(writer, "{}{}{}", label("价格").dimmed(), price, premium)?;
    writeln!(
        writer,
        "{}★ {}",
        label("评分").dimmed(),
        format_number(record.rating)
    )?;
    writeln!(writer, "{}{}", label("下载量").dimmed(), record.downloads_label())?;
    writeln!(writer, "{}{}", label("创建时间").dimmed(), record.created_at)?;
    if !record.tags.is_empty() {
        let tags: Vec<String> = record.tags.iter().map(|t| format!("#{t}")).collect();
        writeln!(writer, "{}{}", label("标签").dimmed(), tags.join(" "))?;
    }
    if let Some(thumbnail) = &record.thumbnail {
        writeln!(writer, "{}{}", label("预览图").dimmed(), thumbnail.blue())?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", record.description)?;
    writeln!(writer, "{}", record.summary().dimmed())?;
    writeln!(writer)?;
    writeln!(writer, "  → {}", record.primary_action_label().bold())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_text() {
        colored::control::set_override(false);
        let catalog = Catalog::builtin().unwrap();
        let mut out = Vec::new();
        write_detail(catalog.get("5").unwrap(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.starts_with("系统架构设计图 [框架图]\n"));
        assert!(out.contains("  价格      免费\n"));
        assert!(out.contains("#架构 #系统设计 #技术"));
        assert!(out.contains("这是一个专业设计的框架图模板，适用于技术场景。"));
        assert!(out.trim_end().ends_with("→ 免费下载"));
    }

    #[test]
    fn test_label_width() {
        assert_eq!(label("ID"), "  ID        ");
        assert_eq!(label("创建时间"), "  创建时间  ");
    }
}
