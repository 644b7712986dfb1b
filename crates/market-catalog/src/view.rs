//! View state: catalog/detail navigation, presentation mode, and filter inputs
//!
//! The state object is plain data. [`update`] applies one [`Intent`] to it and
//! reports what changed as an [`Effect`], so the presentation layer decides how
//! to react (re-render, toast, log) without owning any of the logic.

use crate::catalog::Catalog;
use crate::facets::Facets;
use crate::filter::{FilterCache, FilterQuery};
use crate::record::{TemplateRecord, TemplateType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Number of preview slots in the detail carousel
pub const PREVIEW_SLOTS: usize = 3;

/// How the catalog screen lays out records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Grid,
    List,
}

impl PresentationMode {
    pub fn toggled(self) -> Self {
        match self {
            PresentationMode::Grid => PresentationMode::List,
            PresentationMode::List => PresentationMode::Grid,
        }
    }

    /// Number of tags previewed on a card in this mode
    pub fn tag_preview_len(self) -> usize {
        match self {
            PresentationMode::Grid => 2,
            PresentationMode::List => 3,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            PresentationMode::Grid => "grid",
            PresentationMode::List => "list",
        })
    }
}

impl FromStr for PresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(PresentationMode::Grid),
            "list" => Ok(PresentationMode::List),
            other => Err(format!("unknown presentation mode '{other}'")),
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Catalog,
    Detail,
}

/// Tabs of the detail screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DetailTab {
    #[default]
    Description,
    Specs,
    Reviews,
}

impl DetailTab {
    pub const ALL: &'static [DetailTab] =
        &[DetailTab::Description, DetailTab::Specs, DetailTab::Reviews];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Description => "详细介绍",
            DetailTab::Specs => "技术规格",
            DetailTab::Reviews => "用户评价",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DetailTab::Description => DetailTab::Specs,
            DetailTab::Specs => DetailTab::Reviews,
            DetailTab::Reviews => DetailTab::Description,
        }
    }
}

/// Per-visit state of the detail screen. Rebuilt every time a record is opened.
#[derive(Debug, Clone)]
pub struct DetailState {
    record: Arc<TemplateRecord>,
    pub preview_index: usize,
    pub liked: bool,
    pub tab: DetailTab,
}

impl DetailState {
    fn open(record: Arc<TemplateRecord>) -> Self {
        Self {
            record,
            preview_index: 0,
            liked: false,
            tab: DetailTab::default(),
        }
    }

    pub fn record(&self) -> &Arc<TemplateRecord> {
        &self.record
    }
}

/// A discrete user action reported by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetSearch(String),
    SetKind(Option<TemplateType>),
    SetCategory(Option<String>),
    SetMode(PresentationMode),
    ToggleMode,
    ClearFilters,
    /// Open the record with this id
    Select(String),
    Back,
    NextPreview,
    PrevPreview,
    ShowPreview(usize),
    ToggleLike,
    ShowTab(DetailTab),
    Download,
    Edit,
}

/// What an intent changed
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FilterChanged,
    ModeChanged(PresentationMode),
    Opened(Arc<TemplateRecord>),
    Closed,
    DetailChanged,
    Liked(bool),
    Download(Arc<TemplateRecord>),
    Edit(Arc<TemplateRecord>),
}

/// Mutable state owned by the top-level controller
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search_term: String,
    pub kind_filter: Option<TemplateType>,
    pub category_filter: Option<String>,
    pub mode: PresentationMode,
    detail: Option<DetailState>,
}

impl ViewState {
    pub fn new(mode: PresentationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        if self.detail.is_some() {
            Screen::Detail
        } else {
            Screen::Catalog
        }
    }

    pub fn selected_record(&self) -> Option<&Arc<TemplateRecord>> {
        self.detail.as_ref().map(DetailState::record)
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    /// Filter inputs as a query
    pub fn query(&self) -> FilterQuery {
        FilterQuery {
            search: self.search_term.clone(),
            kind: self.kind_filter,
            category: self.category_filter.clone(),
        }
    }
}

/// Apply one intent to the state
pub fn update(state: &mut ViewState, catalog: &Catalog, intent: Intent) -> Effect {
    match intent {
        Intent::SetSearch(search) => {
            if state.search_term == search {
                return Effect::None;
            }
            state.search_term = search;
            Effect::FilterChanged
        }
        Intent::SetKind(kind) => {
            if state.kind_filter == kind {
                return Effect::None;
            }
            state.kind_filter = kind;
            Effect::FilterChanged
        }
        Intent::SetCategory(category) => {
            if state.category_filter == category {
                return Effect::None;
            }
            state.category_filter = category;
            Effect::FilterChanged
        }
        Intent::ClearFilters => {
            let was_restricted = !state.query().is_unrestricted();
            state.search_term.clear();
            state.kind_filter = None;
            state.category_filter = None;
            if was_restricted {
                Effect::FilterChanged
            } else {
                Effect::None
            }
        }
        Intent::SetMode(mode) => {
            if state.mode == mode {
                return Effect::None;
            }
            state.mode = mode;
            Effect::ModeChanged(mode)
        }
        Intent::ToggleMode => {
            state.mode = state.mode.toggled();
            Effect::ModeChanged(state.mode)
        }
        Intent::Select(id) => match catalog.get(&id) {
            Some(record) => {
                log::debug!("Opening template {}", record.id);
                state.detail = Some(DetailState::open(Arc::clone(record)));
                Effect::Opened(Arc::clone(record))
            }
            None => {
                log::warn!("Ignoring selection of unknown template '{}'", id);
                Effect::None
            }
        },
        Intent::Back => {
            if state.detail.take().is_some() {
                Effect::Closed
            } else {
                Effect::None
            }
        }
        detail_intent => match state.detail.as_mut() {
            Some(detail) => update_detail(detail, detail_intent),
            None => Effect::None,
        },
    }
}

fn update_detail(detail: &mut DetailState, intent: Intent) -> Effect {
    match intent {
        Intent::NextPreview => {
            detail.preview_index = (detail.preview_index + 1) % PREVIEW_SLOTS;
            Effect::DetailChanged
        }
        Intent::PrevPreview => {
            detail.preview_index = (detail.preview_index + PREVIEW_SLOTS - 1) % PREVIEW_SLOTS;
            Effect::DetailChanged
        }
        Intent::ShowPreview(index) if index < PREVIEW_SLOTS => {
            detail.preview_index = index;
            Effect::DetailChanged
        }
        Intent::ToggleLike => {
            detail.liked = !detail.liked;
            Effect::Liked(detail.liked)
        }
        Intent::ShowTab(tab) => {
            detail.tab = tab;
            Effect::DetailChanged
        }
        Intent::Download => {
            log::info!("Download requested for template {}", detail.record.id);
            Effect::Download(Arc::clone(&detail.record))
        }
        Intent::Edit => {
            log::info!("Edit requested for template {}", detail.record.id);
            Effect::Edit(Arc::clone(&detail.record))
        }
        _ => Effect::None,
    }
}

/// Owns the catalog, its facets, the view state, and the filter cache
pub struct Controller {
    catalog: Catalog,
    facets: Facets,
    state: ViewState,
    cache: FilterCache,
}

impl Controller {
    pub fn new(catalog: Catalog, mode: PresentationMode) -> Self {
        let facets = Facets::from_catalog(&catalog);
        Self {
            catalog,
            facets,
            state: ViewState::new(mode),
            cache: FilterCache::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn mode(&self) -> PresentationMode {
        self.state.mode
    }

    pub fn selected_record(&self) -> Option<&Arc<TemplateRecord>> {
        self.state.selected_record()
    }

    pub fn dispatch(&mut self, intent: Intent) -> Effect {
        update(&mut self.state, &self.catalog, intent)
    }

    /// Records visible under the current filter inputs, in catalog order
    pub fn visible(&mut self) -> Vec<Arc<TemplateRecord>> {
        let query = self.state.query();
        let positions = self.cache.positions(&self.catalog, &query);
        let records = self.catalog.records();
        positions.iter().map(|&i| Arc::clone(&records[i])).collect()
    }

    /// Cycle the type selector forward or backward
    pub fn cycle_kind(&mut self, forward: bool) -> Effect {
        let current = self.state.kind_filter;
        let next = if forward {
            self.facets.next_kind(current)
        } else {
            self.facets.prev_kind(current)
        };
        self.dispatch(Intent::SetKind(next))
    }

    /// Cycle the category selector forward or backward
    pub fn cycle_category(&mut self, forward: bool) -> Effect {
        let current = self.state.category_filter.as_deref();
        let next = if forward {
            self.facets.next_category(current)
        } else {
            self.facets.prev_category(current)
        };
        self.dispatch(Intent::SetCategory(next))
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.hits(), self.cache.misses())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::new(Catalog::builtin().unwrap(), PresentationMode::Grid)
    }

    #[test]
    fn test_initial_state() {
        let mut c = controller();
        assert_eq!(c.screen(), Screen::Catalog);
        assert_eq!(c.mode(), PresentationMode::Grid);
        assert!(c.selected_record().is_none());
        assert!(c.state().query().is_unrestricted());
        assert_eq!(c.visible().len(), 6);
    }

    #[test]
    fn test_select_and_back() {
        let mut c = controller();
        let effect = c.dispatch(Intent::Select("5".to_string()));

        let expected = Arc::clone(c.catalog().get("5").unwrap());
        assert_eq!(effect, Effect::Opened(Arc::clone(&expected)));
        assert_eq!(c.screen(), Screen::Detail);
        assert!(Arc::ptr_eq(c.selected_record().unwrap(), &expected));

        assert_eq!(c.dispatch(Intent::Back), Effect::Closed);
        assert_eq!(c.screen(), Screen::Catalog);
        assert!(c.selected_record().is_none());

        // Back on the catalog screen does nothing
        assert_eq!(c.dispatch(Intent::Back), Effect::None);
        assert_eq!(c.screen(), Screen::Catalog);
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut c = controller();
        assert_eq!(c.dispatch(Intent::Select("nope".into())), Effect::None);
        assert_eq!(c.screen(), Screen::Catalog);
    }

    #[test]
    fn test_no_match_stays_on_catalog() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(Intent::SetSearch("zzz_no_match".into())),
            Effect::FilterChanged
        );
        assert!(c.visible().is_empty());
        assert_eq!(c.screen(), Screen::Catalog);
    }

    #[test]
    fn test_mode_toggle_does_not_change_screen() {
        let mut c = controller();
        assert_eq!(
            c.dispatch(Intent::ToggleMode),
            Effect::ModeChanged(PresentationMode::List)
        );
        assert_eq!(c.screen(), Screen::Catalog);
        assert_eq!(
            c.dispatch(Intent::SetMode(PresentationMode::List)),
            Effect::None
        );

        c.dispatch(Intent::Select("1".into()));
        c.dispatch(Intent::ToggleMode);
        assert_eq!(c.screen(), Screen::Detail);
        assert_eq!(c.mode(), PresentationMode::Grid);
    }

    #[test]
    fn test_filters_are_independent() {
        let mut c = controller();
        c.dispatch(Intent::SetKind(Some(TemplateType::DiagramFramework)));
        assert_eq!(c.visible().len(), 2);

        c.dispatch(Intent::SetCategory(Some("技术".into())));
        let visible = c.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "系统架构设计图");

        c.dispatch(Intent::SetKind(None));
        assert_eq!(c.visible().len(), 1);
        assert_eq!(c.state().category_filter.as_deref(), Some("技术"));

        assert_eq!(c.dispatch(Intent::ClearFilters), Effect::FilterChanged);
        assert_eq!(c.visible().len(), 6);
        assert_eq!(c.dispatch(Intent::ClearFilters), Effect::None);
    }

    #[test]
    fn test_unchanged_inputs_hit_cache() {
        let mut c = controller();
        c.visible();
        c.visible();
        assert_eq!(c.dispatch(Intent::SetSearch(String::new())), Effect::None);
        c.visible();
        assert_eq!(c.cache_stats(), (2, 1));
    }

    #[test]
    fn test_cycle_selectors() {
        let mut c = controller();
        c.cycle_kind(true);
        assert_eq!(c.state().kind_filter, Some(TemplateType::DeckOnly));
        c.cycle_kind(false);
        assert_eq!(c.state().kind_filter, None);

        c.cycle_category(false);
        assert_eq!(c.state().category_filter.as_deref(), Some("营销"));
    }

    #[test]
    fn test_detail_state_resets_on_open() {
        let mut c = controller();
        c.dispatch(Intent::Select("3".into()));
        c.dispatch(Intent::NextPreview);
        c.dispatch(Intent::ShowTab(DetailTab::Reviews));
        assert_eq!(c.dispatch(Intent::ToggleLike), Effect::Liked(true));

        let detail = c.state().detail().unwrap();
        assert_eq!(detail.preview_index, 1);
        assert_eq!(detail.tab, DetailTab::Reviews);
        assert!(detail.liked);

        c.dispatch(Intent::Back);
        c.dispatch(Intent::Select("3".into()));
        let detail = c.state().detail().unwrap();
        assert_eq!(detail.preview_index, 0);
        assert_eq!(detail.tab, DetailTab::Description);
        assert!(!detail.liked);
    }

    #[test]
    fn test_preview_carousel_wraps() {
        let mut c = controller();
        c.dispatch(Intent::Select("1".into()));
        c.dispatch(Intent::PrevPreview);
        assert_eq!(c.state().detail().unwrap().preview_index, PREVIEW_SLOTS - 1);
        c.dispatch(Intent::NextPreview);
        assert_eq!(c.state().detail().unwrap().preview_index, 0);

        assert_eq!(c.dispatch(Intent::ShowPreview(2)), Effect::DetailChanged);
        assert_eq!(c.dispatch(Intent::ShowPreview(7)), Effect::None);
        assert_eq!(c.state().detail().unwrap().preview_index, 2);
    }

    #[test]
    fn test_detail_intents_ignored_on_catalog() {
        let mut c = controller();
        assert_eq!(c.dispatch(Intent::ToggleLike), Effect::None);
        assert_eq!(c.dispatch(Intent::Download), Effect::None);
        assert_eq!(c.dispatch(Intent::NextPreview), Effect::None);
    }

    #[test]
    fn test_download_and_edit_carry_record() {
        let mut c = controller();
        c.dispatch(Intent::Select("2".into()));
        match c.dispatch(Intent::Download) {
            Effect::Download(record) => {
                assert_eq!(record.id, "2");
                assert_eq!(record.primary_action_label(), "免费下载");
            }
            other => panic!("unexpected effect {other:?}"),
        }
        assert!(matches!(c.dispatch(Intent::Edit), Effect::Edit(r) if r.id == "2"));
    }

    #[test]
    fn test_presentation_mode_parse() {
        assert_eq!("grid".parse(), Ok(PresentationMode::Grid));
        assert_eq!("LIST".parse(), Ok(PresentationMode::List));
        assert!("table".parse::<PresentationMode>().is_err());
        assert_eq!(PresentationMode::Grid.tag_preview_len(), 2);
        assert_eq!(PresentationMode::List.tag_preview_len(), 3);
    }
}
