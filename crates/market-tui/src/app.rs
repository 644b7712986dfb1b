//! Application state and event loop

use super::input::TextInput;
use super::ui;
use anyhow::Result;
use arboard::Clipboard;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use market_catalog::{
    Controller, DetailTab, Effect, Intent, PREVIEW_SLOTS, PresentationMode, Screen, TemplateRecord,
};
use ratatui::{Terminal, backend::CrosstermBackend, widgets::ListState};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(2);
const ERROR_TOAST_TTL: Duration = Duration::from_secs(4);

/// Transient message shown under the status bar
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
    pub is_error: bool,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + ERROR_TOAST_TTL,
            is_error: true,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Command palette entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleViewMode,
    ClearFilters,
    OpenSelected,
    CopyTemplateId,
    OpenThumbnail,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::ToggleViewMode,
        Command::ClearFilters,
        Command::OpenSelected,
        Command::CopyTemplateId,
        Command::OpenThumbnail,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::ToggleViewMode => "toggle-view-mode",
            Command::ClearFilters => "clear-filters",
            Command::OpenSelected => "open-selected",
            Command::CopyTemplateId => "copy-template-id",
            Command::OpenThumbnail => "open-thumbnail",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::ToggleViewMode => "Switch between grid and list layout",
            Command::ClearFilters => "Reset search, type, and category filters",
            Command::OpenSelected => "Open the highlighted template",
            Command::CopyTemplateId => "Copy the selected template's id to clipboard",
            Command::OpenThumbnail => "Open the selected template's preview image in a browser",
        }
    }

    /// Whether the command acts on a highlighted template
    pub fn needs_selection(&self) -> bool {
        matches!(
            self,
            Command::OpenSelected | Command::CopyTemplateId | Command::OpenThumbnail
        )
    }

    /// Fuzzy score against the palette query; name matches rank above description matches
    pub fn match_score(&self, query: &str) -> Option<i64> {
        use fuzzy_matcher::FuzzyMatcher;
        use fuzzy_matcher::skim::SkimMatcherV2;

        if query.is_empty() {
            return Some(0);
        }

        let matcher = SkimMatcherV2::default();
        matcher
            .fuzzy_match(self.name(), query)
            .map(|score| score + 1000)
            .or_else(|| matcher.fuzzy_match(self.description(), query))
    }
}

pub struct App {
    pub controller: Controller,
    pub search_input: TextInput,
    /// Records passing the current filters, in catalog order
    pub visible: Vec<Arc<TemplateRecord>>,
    /// Highlighted card on the catalog screen
    pub list_state: ListState,
    /// Cards per grid row, updated on every render
    pub grid_columns: usize,
    pub should_quit: bool,
    pub toast: Option<Toast>,
    clipboard: Option<Clipboard>,
    pub show_command_palette: bool,
    pub command_palette_index: usize,
    pub command_palette_input: TextInput,
    pub command_palette_filtered: Vec<Command>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let mut app = Self {
            controller,
            search_input: TextInput::new(),
            visible: Vec::new(),
            list_state: ListState::default(),
            grid_columns: 1,
            should_quit: false,
            toast: None,
            clipboard: None,
            show_command_palette: false,
            command_palette_index: 0,
            command_palette_input: TextInput::new(),
            command_palette_filtered: Command::ALL.to_vec(),
        };
        app.refresh_results();
        app
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn mode(&self) -> PresentationMode {
        self.controller.mode()
    }

    /// Record the user is looking at: the open record on the detail screen,
    /// the highlighted card otherwise
    pub fn highlighted(&self) -> Option<&Arc<TemplateRecord>> {
        match self.screen() {
            Screen::Detail => self.controller.selected_record(),
            Screen::Catalog => self
                .list_state
                .selected()
                .and_then(|i| self.visible.get(i)),
        }
    }

    fn refresh_results(&mut self) {
        self.visible = self.controller.visible();
        self.list_state = ListState::default();
        if !self.visible.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn dispatch(&mut self, intent: Intent) {
        let effect = self.controller.dispatch(intent);
        self.handle_effect(effect);
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FilterChanged => self.refresh_results(),
            Effect::ModeChanged(mode) => {
                self.toast = Some(Toast::info(format!("{}视图", ui::mode_label(mode))));
            }
            Effect::Liked(liked) => {
                let message = if liked { "已收藏" } else { "已取消收藏" };
                self.toast = Some(Toast::info(message));
            }
            Effect::Download(record) => {
                self.toast = Some(Toast::info(format!(
                    "{}: {}",
                    record.primary_action_label(),
                    record.title
                )));
            }
            Effect::Edit(record) => {
                self.toast = Some(Toast::info(format!("编辑模板: {}", record.title)));
            }
            Effect::None | Effect::Opened(_) | Effect::Closed | Effect::DetailChanged => {}
        }
    }

    fn sync_search(&mut self) {
        let text = self.search_input.text.clone();
        self.dispatch(Intent::SetSearch(text));
    }

    /// Rows move by a full grid row, list rows by one
    fn row_step(&self) -> isize {
        match self.mode() {
            PresentationMode::Grid => self.grid_columns.max(1) as isize,
            PresentationMode::List => 1,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let max = self.visible.len() as isize - 1;
        self.list_state.select(Some((current + delta).clamp(0, max) as usize));
    }

    fn open_highlighted(&mut self) {
        match self.highlighted().map(|r| r.id.clone()) {
            Some(id) => self.dispatch(Intent::Select(id)),
            None => self.toast = Some(Toast::error("未选择模板")),
        }
    }

    fn clear_filters(&mut self) {
        self.search_input.clear();
        self.dispatch(Intent::ClearFilters);
    }

    fn copy_selected_id(&mut self) {
        let Some(id) = self.highlighted().map(|r| r.id.clone()) else {
            self.toast = Some(Toast::error("未选择模板"));
            return;
        };

        if self.clipboard.is_none() {
            self.clipboard = Clipboard::new().ok();
        }
        self.toast = Some(match self.clipboard.as_mut() {
            Some(clipboard) => match clipboard.set_text(id.as_str()) {
                Ok(()) => Toast::info(format!("Copied: {id}")),
                Err(e) => {
                    log::warn!("Clipboard write failed: {e}");
                    Toast::error("Failed to copy to clipboard")
                }
            },
            None => Toast::error("Clipboard not available"),
        });
    }

    fn open_thumbnail(&mut self) {
        let Some(record) = self.highlighted() else {
            self.toast = Some(Toast::error("未选择模板"));
            return;
        };
        let Some(url) = record.thumbnail.clone() else {
            self.toast = Some(Toast::error("该模板没有预览图"));
            return;
        };

        self.toast = Some(match open::that(&url) {
            Ok(()) => Toast::info("Opened in browser"),
            Err(e) => {
                log::warn!("Failed to open {url}: {e}");
                Toast::error("Failed to open browser")
            }
        });
    }

    fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    fn execute_command(&mut self, cmd: Command) {
        log::debug!("Executing command {}", cmd.name());
        match cmd {
            Command::ToggleViewMode => self.dispatch(Intent::ToggleMode),
            Command::ClearFilters => {
                self.clear_filters();
                self.toast = Some(Toast::info("已清除筛选"));
            }
            Command::OpenSelected => self.open_highlighted(),
            Command::CopyTemplateId => self.copy_selected_id(),
            Command::OpenThumbnail => self.open_thumbnail(),
        }
    }

    fn update_command_filter(&mut self) {
        let query = &self.command_palette_input.text;
        let mut scored: Vec<_> = Command::ALL
            .iter()
            .copied()
            .filter_map(|cmd| cmd.match_score(query).map(|score| (cmd, score)))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        self.command_palette_filtered = scored.into_iter().map(|(cmd, _)| cmd).collect();
        self.command_palette_index = 0;
    }

    fn open_command_palette(&mut self) {
        self.show_command_palette = true;
        self.command_palette_index = 0;
        self.command_palette_input.clear();
        self.command_palette_filtered = Command::ALL.to_vec();
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.command_palette_input.clear();
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.show_command_palette {
            self.handle_palette_key(key);
        } else {
            match self.screen() {
                Screen::Catalog => self.handle_catalog_key(key),
                Screen::Detail => self.handle_detail_key(key),
            }
        }
    }

    fn handle_palette_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _)
            | (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.close_command_palette(),
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.command_palette_index = self.command_palette_index.saturating_sub(1);
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                let max = self.command_palette_filtered.len().saturating_sub(1);
                self.command_palette_index = (self.command_palette_index + 1).min(max);
            }
            (KeyCode::Enter, _) => {
                if let Some(&cmd) = self
                    .command_palette_filtered
                    .get(self.command_palette_index)
                {
                    self.close_command_palette();
                    self.execute_command(cmd);
                }
            }
            _ => {
                if self
                    .command_palette_input
                    .handle_key(key.code, key.modifiers)
                {
                    self.update_command_filter();
                }
            }
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        let page = self.row_step() * 5;
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.open_command_palette(),
            (KeyCode::Char('/'), _) if self.search_input.is_empty() => {
                self.open_command_palette()
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::CONTROL) => {
                self.move_selection(-self.row_step())
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::CONTROL) => {
                self.move_selection(self.row_step())
            }
            (KeyCode::Tab, _) => self.move_selection(1),
            (KeyCode::BackTab, _) => self.move_selection(-1),
            (KeyCode::PageUp, _) => self.move_selection(-page),
            (KeyCode::PageDown, _) => self.move_selection(page),
            (KeyCode::Enter, _) => self.open_highlighted(),
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                let effect = self.controller.cycle_kind(true);
                self.handle_effect(effect);
            }
            (KeyCode::Char('t'), KeyModifiers::ALT) => {
                let effect = self.controller.cycle_kind(false);
                self.handle_effect(effect);
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
                let effect = self.controller.cycle_category(true);
                self.handle_effect(effect);
            }
            (KeyCode::Char('r'), KeyModifiers::ALT) => {
                let effect = self.controller.cycle_category(false);
                self.handle_effect(effect);
            }
            (KeyCode::Char('g'), KeyModifiers::CONTROL) => self.dispatch(Intent::ToggleMode),
            (KeyCode::Char('x'), KeyModifiers::CONTROL) => self.clear_filters(),
            _ => {
                if self.search_input.handle_key(key.code, key.modifiers) {
                    self.sync_search();
                }
            }
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.should_quit = true,
            (KeyCode::Esc, _) | (KeyCode::Backspace, _) => self.dispatch(Intent::Back),
            (KeyCode::Char('o'), KeyModifiers::CONTROL) => self.open_command_palette(),
            (KeyCode::Left, _) => self.dispatch(Intent::PrevPreview),
            (KeyCode::Right, _) => self.dispatch(Intent::NextPreview),
            (KeyCode::Char(c @ '1'..='9'), _) => {
                let slot = c as usize - '1' as usize;
                if slot < PREVIEW_SLOTS {
                    self.dispatch(Intent::ShowPreview(slot));
                }
            }
            (KeyCode::Tab, _) => {
                let tab = self
                    .controller
                    .state()
                    .detail()
                    .map_or(DetailTab::default(), |d| d.tab.next());
                self.dispatch(Intent::ShowTab(tab));
            }
            (KeyCode::Char('f'), _) => self.dispatch(Intent::ToggleLike),
            (KeyCode::Enter, _) | (KeyCode::Char('d'), _) => self.dispatch(Intent::Download),
            (KeyCode::Char('e'), _) => self.dispatch(Intent::Edit),
            (KeyCode::Char('y'), _) => self.copy_selected_id(),
            (KeyCode::Char('o'), _) => self.open_thumbnail(),
            _ => {}
        }
    }
}

/// Take over the terminal and browse the catalog until the user quits
pub fn run(controller: Controller) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~60Hz is plenty, filtering is synchronous and cached
    const FRAME_TIME: Duration = Duration::from_micros(16_667);

    loop {
        let frame_start = Instant::now();

        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            app.handle_event(event::read()?);
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        app.update_toast();
        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}
