//! Read-only catalog of template records

use crate::facets::ALL_LABEL;
use crate::record::TemplateRecord;
use crate::{CatalogError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Sample catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// On-disk catalog layout: a `templates` array of records
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    templates: Vec<TemplateRecord>,
}

/// Fixed-size, immutable collection of records. Records are shared so the view
/// state can hold on to a selection without borrowing the catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Arc<TemplateRecord>>,
}

impl Catalog {
    /// The sample catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Build a catalog from records, validating ids, prices, and ratings
    pub fn from_records(records: Vec<TemplateRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            if record.id.trim().is_empty() {
                return Err(CatalogError::EmptyId {
                    title: record.title.clone(),
                });
            }
            if !seen.insert(record.id.as_str()) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
            if record.category.trim() == ALL_LABEL {
                return Err(CatalogError::ReservedCategory {
                    id: record.id.clone(),
                });
            }
            if !record.price.is_finite() || record.price < 0.0 {
                return Err(CatalogError::InvalidPrice {
                    id: record.id.clone(),
                    price: record.price,
                });
            }
            if !record.rating.is_finite() {
                return Err(CatalogError::InvalidRating {
                    id: record.id.clone(),
                    rating: record.rating,
                });
            }
        }

        log::debug!("Loaded catalog with {} records", records.len());

        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(s)?;
        Self::from_records(file.templates)
    }

    /// JSON catalogs may be a bare array or wrapped in `{ "templates": [...] }`
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        let records = if value.is_array() {
            serde_json::from_value::<Vec<TemplateRecord>>(value)?
        } else {
            serde_json::from_value::<CatalogFile>(value)?.templates
        };
        Self::from_records(records)
    }

    /// Load a catalog file, choosing the parser from the file extension
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        };

        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&contents)
    }

    pub fn records(&self) -> &[Arc<TemplateRecord>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TemplateRecord>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&Arc<TemplateRecord>> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TemplateType;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);

        let ids: Vec<_> = catalog.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);

        let architecture = catalog.get("5").unwrap();
        assert_eq!(architecture.title, "系统架构设计图");
        assert_eq!(architecture.kind, TemplateType::DiagramFramework);
        assert_eq!(architecture.tags, vec!["架构", "系统设计", "技术"]);
        assert!(architecture.is_free());
        assert!(!architecture.is_premium);

        let plan = catalog.get("1").unwrap();
        assert_eq!(plan.price, 29.0);
        assert_eq!(plan.downloads, 1234);
        assert!(plan.is_premium);
        assert!(plan.thumbnail.is_some());
    }

    #[test]
    fn test_json_catalog_with_camel_case_fields() {
        let json = r#"[
            {
                "id": "a",
                "title": "Quarterly Review",
                "type": "纯文档",
                "category": "报告",
                "description": "Numbers",
                "author": "ops",
                "rating": 4.1,
                "downloads": 12,
                "tags": ["review"],
                "price": 0,
                "isPremium": true,
                "createdAt": "2024-02-01"
            }
        ]"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        let record = catalog.get("a").unwrap();
        assert_eq!(record.kind, TemplateType::DocumentOnly);
        assert!(record.is_premium);
        assert!(record.is_free());
        assert_eq!(record.created_at, "2024-02-01");
    }

    #[test]
    fn test_json_catalog_wrapped() {
        let json = r#"{"templates": [{
            "id": "x", "title": "t", "type": "diagram_framework", "category": "c",
            "description": "d", "author": "a", "rating": 1, "downloads": 0,
            "price": 5, "is_premium": false, "created_at": "2024-01-01"
        }]}"#;

        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].kind, TemplateType::DiagramFramework);
        assert!(catalog.records()[0].tags.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let toml = r#"
[[templates]]
id = "1"
title = "a"
type = "纯PPT"
category = "c"
description = "d"
author = "x"
rating = 1.0
downloads = 1
price = 0
created_at = "2024-01-01"

[[templates]]
id = "1"
title = "b"
type = "纯PPT"
category = "c"
description = "d"
author = "x"
rating = 1.0
downloads = 1
price = 0
created_at = "2024-01-01"
"#;
        let err = Catalog::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "1"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut record =
            crate::record::sample_record("neg", "Broken", TemplateType::DeckOnly, "c");
        record.price = -1.0;
        let err = Catalog::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPrice { .. }));
    }

    #[test]
    fn test_rejects_empty_id() {
        let record = crate::record::sample_record("  ", "Nameless", TemplateType::DeckOnly, "c");
        let err = Catalog::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId { .. }));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("catalog.toml");
        std::fs::write(&toml_path, BUILTIN_CATALOG).unwrap();
        assert_eq!(Catalog::load(&toml_path).unwrap().len(), 6);

        let json_path = dir.path().join("catalog.json");
        let builtin = Catalog::builtin().unwrap();
        let records: Vec<_> = builtin.iter().map(|r| (**r).clone()).collect();
        let mut file = std::fs::File::create(&json_path).unwrap();
        file.write_all(serde_json::to_string(&records).unwrap().as_bytes())
            .unwrap();
        let loaded = Catalog::load(&json_path).unwrap();
        assert_eq!(loaded.len(), 6);
        assert_eq!(loaded.get("3").unwrap().title, "交互式产品展示");

        let yaml_path = dir.path().join("catalog.yaml");
        std::fs::write(&yaml_path, "templates: []").unwrap();
        assert!(matches!(
            Catalog::load(&yaml_path),
            Err(CatalogError::UnsupportedFormat(_))
        ));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Catalog::load(&missing),
            Err(CatalogError::Io { .. })
        ));
    }

    #[test]
    fn test_load_checks_extension_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            Catalog::load(&missing),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_json_error_names_bad_value() {
        let json = r#"[{
            "id": "x", "title": "t", "type": "spreadsheet", "category": "c",
            "description": "d", "author": "a", "rating": 1, "downloads": 0,
            "price": 0, "created_at": "2024-01-01"
        }]"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
        let message = err.to_string();
        assert!(message.contains("spreadsheet"), "{message}");
        assert!(!message.contains("untagged"), "{message}");

        let wrapped = format!(r#"{{"templates": {json}}}"#);
        let message = Catalog::from_json_str(&wrapped).unwrap_err().to_string();
        assert!(message.contains("spreadsheet"), "{message}");
    }

    #[test]
    fn test_rejects_category_named_like_all_entry() {
        let record = crate::record::sample_record("r", "Reserved", TemplateType::DeckOnly, "全部");
        let err = Catalog::from_records(vec![record]).unwrap_err();
        assert!(matches!(err, CatalogError::ReservedCategory { ref id } if id == "r"));
        assert!(err.to_string().contains("全部"));
    }
}
