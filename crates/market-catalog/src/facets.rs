//! Distinct type and category values used to populate filter selectors

use crate::catalog::Catalog;
use crate::record::TemplateType;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Label of the unrestricted selector entry. Catalogs may not use it as a category.
pub const ALL_LABEL: &str = "全部";

/// One selector entry: either no restriction or a concrete value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T: Serialize> Serialize for Facet<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Facet::All => serializer.serialize_str(ALL_LABEL),
            Facet::Only(value) => value.serialize(serializer),
        }
    }
}

impl<T> Facet<T> {
    /// `None` for `All`, so the value plugs straight into a filter query
    pub fn into_option(self) -> Option<T> {
        match self {
            Facet::All => None,
            Facet::Only(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for Facet<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Facet::All,
            Some(value) => Facet::Only(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Facet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::All => f.write_str(ALL_LABEL),
            Facet::Only(value) => value.fmt(f),
        }
    }
}

/// Selector contents derived from the catalog, each led by `Facet::All`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub kinds: Vec<Facet<TemplateType>>,
    pub categories: Vec<Facet<String>>,
}

impl Facets {
    /// Distinct values in order of first appearance in the catalog
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let kinds = std::iter::once(Facet::All)
            .chain(catalog.iter().map(|r| r.kind).unique().map(Facet::Only))
            .collect();
        let categories = std::iter::once(Facet::All)
            .chain(
                catalog
                    .iter()
                    .map(|r| r.category.clone())
                    .unique()
                    .map(Facet::Only),
            )
            .collect();

        Self { kinds, categories }
    }

    /// Entry following `current` in the kind selector, wrapping to `All`
    pub fn next_kind(&self, current: Option<TemplateType>) -> Option<TemplateType> {
        cycle(&self.kinds, &Facet::from(current), 1).into_option()
    }

    pub fn prev_kind(&self, current: Option<TemplateType>) -> Option<TemplateType> {
        cycle(&self.kinds, &Facet::from(current), -1).into_option()
    }

    /// Entry following `current` in the category selector, wrapping to `All`
    pub fn next_category(&self, current: Option<&str>) -> Option<String> {
        let current = Facet::from(current.map(str::to_string));
        cycle(&self.categories, &current, 1).into_option()
    }

    pub fn prev_category(&self, current: Option<&str>) -> Option<String> {
        let current = Facet::from(current.map(str::to_string));
        cycle(&self.categories, &current, -1).into_option()
    }
}

/// Step through `entries` from `current`; unknown entries restart at `All`
fn cycle<T: Clone + PartialEq>(
    entries: &[Facet<T>],
    current: &Facet<T>,
    step: isize,
) -> Facet<T> {
    if entries.is_empty() {
        return Facet::All;
    }
    let Some(index) = entries.iter().position(|e| e == current) else {
        return Facet::All;
    };
    let len = entries.len() as isize;
    let next = (index as isize + step).rem_euclid(len) as usize;
    entries[next].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facets_from_builtin() {
        let catalog = Catalog::builtin().unwrap();
        let facets = Facets::from_catalog(&catalog);

        let kinds: Vec<String> = facets.kinds.iter().map(|f| f.to_string()).collect();
        assert_eq!(kinds, vec!["全部", "纯PPT", "框架图", "交互式HTML", "纯文档"]);

        let categories: Vec<String> = facets.categories.iter().map(|f| f.to_string()).collect();
        assert_eq!(
            categories,
            vec!["全部", "商业", "管理", "产品", "报告", "技术", "营销"]
        );
    }

    #[test]
    fn test_facets_empty_catalog() {
        let facets = Facets::from_catalog(&Catalog::default());
        assert_eq!(facets.kinds, vec![Facet::All]);
        assert_eq!(facets.categories, vec![Facet::All]);
    }

    #[test]
    fn test_cycle_kinds() {
        let catalog = Catalog::builtin().unwrap();
        let facets = Facets::from_catalog(&catalog);

        let first = facets.next_kind(None);
        assert_eq!(first, Some(TemplateType::DeckOnly));
        assert_eq!(
            facets.next_kind(Some(TemplateType::DocumentOnly)),
            None,
            "wraps back to All"
        );
        assert_eq!(facets.prev_kind(None), Some(TemplateType::DocumentOnly));
    }

    #[test]
    fn test_cycle_categories() {
        let catalog = Catalog::builtin().unwrap();
        let facets = Facets::from_catalog(&catalog);

        assert_eq!(facets.next_category(None).as_deref(), Some("商业"));
        assert_eq!(facets.next_category(Some("商业")).as_deref(), Some("管理"));
        assert_eq!(facets.next_category(Some("营销")), None);
        assert_eq!(facets.prev_category(Some("商业")), None);
        assert_eq!(facets.next_category(Some("不存在")), None);
    }

    #[test]
    fn test_facets_json() {
        let catalog = Catalog::builtin().unwrap();
        let facets = Facets::from_catalog(&catalog);
        let json = serde_json::to_string(&facets.kinds).unwrap();
        insta::assert_snapshot!(json, @r#"["全部","纯PPT","框架图","交互式HTML","纯文档"]"#);
    }
}
