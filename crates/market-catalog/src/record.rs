//! Template records and their classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of template formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TemplateType {
    #[serde(
        rename = "纯PPT",
        alias = "deck-only",
        alias = "deck_only",
        alias = "DeckOnly"
    )]
    DeckOnly,
    #[serde(
        rename = "纯文档",
        alias = "document-only",
        alias = "document_only",
        alias = "DocumentOnly"
    )]
    DocumentOnly,
    #[serde(
        rename = "交互式HTML",
        alias = "interactive-html",
        alias = "interactive_html",
        alias = "InteractiveHTML"
    )]
    InteractiveHtml,
    #[serde(
        rename = "框架图",
        alias = "diagram-framework",
        alias = "diagram_framework",
        alias = "DiagramFramework"
    )]
    DiagramFramework,
}

impl TemplateType {
    pub const ALL: &'static [TemplateType] = &[
        TemplateType::DeckOnly,
        TemplateType::DocumentOnly,
        TemplateType::InteractiveHtml,
        TemplateType::DiagramFramework,
    ];

    /// Display label shown in selectors and badges
    pub fn label(&self) -> &'static str {
        match self {
            TemplateType::DeckOnly => "纯PPT",
            TemplateType::DocumentOnly => "纯文档",
            TemplateType::InteractiveHtml => "交互式HTML",
            TemplateType::DiagramFramework => "框架图",
        }
    }

    /// Short machine-readable name. `_` and `-` are interchangeable when parsing.
    pub fn slug(&self) -> &'static str {
        match self {
            TemplateType::DeckOnly => "deck-only",
            TemplateType::DocumentOnly => "document-only",
            TemplateType::InteractiveHtml => "interactive-html",
            TemplateType::DiagramFramework => "diagram-framework",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown template type label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template type '{0}'")]
pub struct UnknownTemplateType(pub String);

impl FromStr for TemplateType {
    type Err = UnknownTemplateType;

    /// Accepts the display label, the slug, or the variant name (case-insensitive for ASCII)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().replace('_', "-");
        let needle = needle.as_str();
        TemplateType::ALL
            .iter()
            .copied()
            .find(|t| {
                t.label().eq_ignore_ascii_case(needle)
                    || t.slug().eq_ignore_ascii_case(needle)
                    || format!("{t:?}").eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownTemplateType(s.to_string()))
    }
}

/// One template entry. Never mutated once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TemplateType,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub author: String,
    pub rating: f64,
    pub downloads: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Zero means free. Independent of `is_premium`.
    pub price: f64,
    #[serde(alias = "isPremium", default)]
    pub is_premium: bool,
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

impl TemplateRecord {
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }

    /// `免费` for free records, `¥<price>` otherwise
    pub fn price_label(&self) -> String {
        if self.is_free() {
            "免费".to_string()
        } else {
            format!("¥{}", format_number(self.price))
        }
    }

    /// Label for the primary purchase action in the detail view
    pub fn primary_action_label(&self) -> &'static str {
        if self.is_free() {
            "免费下载"
        } else {
            "立即购买"
        }
    }

    /// First `n` tags, as shown on cards
    pub fn tag_preview(&self, n: usize) -> &[String] {
        &self.tags[..self.tags.len().min(n)]
    }

    /// Download count with thousands separators
    pub fn downloads_label(&self) -> String {
        group_thousands(self.downloads)
    }

    /// Generated summary paragraph for the description tab
    pub fn summary(&self) -> String {
        format!(
            "这是一个专业设计的{}模板，适用于{}场景。",
            self.kind.label(),
            self.category
        )
    }
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
pub(crate) fn sample_record(
    id: &str,
    title: &str,
    kind: TemplateType,
    category: &str,
) -> TemplateRecord {
    TemplateRecord {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        category: category.to_string(),
        description: String::new(),
        thumbnail: None,
        author: "tester".to_string(),
        rating: 4.0,
        downloads: 0,
        tags: Vec::new(),
        price: 0.0,
        is_premium: false,
        created_at: "2024-01-01".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_type_from_str() {
        assert_eq!("框架图".parse(), Ok(TemplateType::DiagramFramework));
        assert_eq!("deck-only".parse(), Ok(TemplateType::DeckOnly));
        assert_eq!("InteractiveHTML".parse(), Ok(TemplateType::InteractiveHtml));
        assert_eq!("纯PPT".parse(), Ok(TemplateType::DeckOnly));
        assert!("spreadsheet".parse::<TemplateType>().is_err());
    }

    #[test]
    fn test_slug_spellings_agree_between_cli_and_files() {
        for kind in TemplateType::ALL {
            let hyphen = kind.slug();
            let underscore = hyphen.replace('-', "_");
            assert_eq!(hyphen.parse(), Ok(*kind));
            assert_eq!(underscore.parse(), Ok(*kind));

            let from_hyphen: TemplateType = serde_json::from_str(&format!("\"{hyphen}\"")).unwrap();
            let from_underscore: TemplateType =
                serde_json::from_str(&format!("\"{underscore}\"")).unwrap();
            assert_eq!(from_hyphen, *kind);
            assert_eq!(from_underscore, *kind);
        }
    }

    #[test]
    fn test_price_label() {
        let mut record = sample_record("1", "a", TemplateType::DeckOnly, "商业");
        assert_eq!(record.price_label(), "免费");
        assert_eq!(record.primary_action_label(), "免费下载");

        record.price = 29.0;
        assert_eq!(record.price_label(), "¥29");
        assert_eq!(record.primary_action_label(), "立即购买");

        record.price = 9.5;
        assert_eq!(record.price_label(), "¥9.5");
    }

    #[test]
    fn test_price_and_premium_are_independent() {
        let mut record = sample_record("1", "a", TemplateType::DeckOnly, "商业");
        record.is_premium = true;
        assert!(record.is_free());
        assert!(record.is_premium);

        record.price = 10.0;
        record.is_premium = false;
        assert!(!record.is_free());
        assert!(!record.is_premium);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(673), "673");
        assert_eq!(group_thousands(1234), "1,234");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_tag_preview() {
        let mut record = sample_record("1", "a", TemplateType::DeckOnly, "商业");
        record.tags = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(record.tag_preview(2), &["a".to_string(), "b".to_string()]);
        assert_eq!(record.tag_preview(5).len(), 3);
    }

    #[test]
    fn test_summary() {
        let record = sample_record("5", "a", TemplateType::DiagramFramework, "技术");
        assert_eq!(record.summary(), "这是一个专业设计的框架图模板，适用于技术场景。");
    }
}
