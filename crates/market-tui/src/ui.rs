//! UI rendering

use market_catalog::{
    DetailState, DetailTab, PREVIEW_SLOTS, PresentationMode, Screen, TemplateRecord, TemplateType,
    format_number,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::App;
use super::input::TextInput;

const SELECTION_BG: Color = Color::Rgb(38, 38, 38);
const CARD_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 7;
/// Columns reserved for detail labels
const LABEL_WIDTH: usize = 10;

pub(crate) fn mode_label(mode: PresentationMode) -> &'static str {
    match mode {
        PresentationMode::Grid => "网格",
        PresentationMode::List => "列表",
    }
}

fn kind_color(kind: TemplateType) -> Color {
    match kind {
        TemplateType::DeckOnly => Color::Blue,
        TemplateType::DocumentOnly => Color::Green,
        TemplateType::InteractiveHtml => Color::Magenta,
        TemplateType::DiagramFramework => Color::Yellow,
    }
}

fn badge(kind: TemplateType) -> Span<'static> {
    Span::styled(
        format!("[{}]", kind.label()),
        Style::default().fg(kind_color(kind)),
    )
}

fn price_span(record: &TemplateRecord) -> Span<'static> {
    let color = if record.is_free() {
        Color::Green
    } else {
        Color::Yellow
    };
    Span::styled(
        record.price_label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.screen() {
        Screen::Catalog => render_catalog(frame, app),
        Screen::Detail => render_detail(frame, app),
    }

    if app.show_command_palette {
        render_command_palette(frame, app);
    }
}

fn render_catalog(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filters + count
            Constraint::Min(3),    // Cards
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Toast
            Constraint::Length(1), // Search input
        ])
        .split(frame.area());

    render_filter_bar(frame, app, chunks[0]);
    if app.visible.is_empty() {
        render_empty_state(frame, chunks[1]);
    } else {
        match app.mode() {
            PresentationMode::Grid => render_grid(frame, app, chunks[1]),
            PresentationMode::List => render_list(frame, app, chunks[1]),
        }
    }
    render_status_bar(frame, app, chunks[2]);
    render_toast_line(frame, app, chunks[3]);
    render_search_input(frame, &app.search_input, "搜索模板...", chunks[4]);
}

fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let state = app.controller.state();

    let kind = state
        .kind_filter
        .map_or(market_catalog::ALL_LABEL, |k| k.label());
    let category = state
        .category_filter
        .as_deref()
        .unwrap_or(market_catalog::ALL_LABEL);

    let line = Line::from(vec![
        Span::styled("  类型 ", label),
        Span::styled(kind, value),
        Span::styled("  分类 ", label),
        Span::styled(category, value),
        Span::styled(
            format!("  {} 个模板", app.visible.len()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_empty_state(frame: &mut Frame, area: Rect) {
    let top = area.y + area.height.saturating_sub(2) / 2;
    let lines = vec![
        Line::from(Span::styled(
            "未找到匹配的模板",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            "尝试调整搜索条件或筛选器",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let centered = Rect {
        y: top,
        height: area.height.min(2),
        ..area
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered,
    );
}

/// Cards laid out in rows, scrolled so the highlighted card stays visible
fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    app.grid_columns = columns;

    let card_width = area.width / columns as u16;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected = app.list_state.selected();
    let selected_row = selected.unwrap_or(0) / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    let tag_count = PresentationMode::Grid.tag_preview_len();
    for (i, record) in app.visible.iter().enumerate().skip(first_row * columns) {
        let row = i / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let col = i % columns;
        let card = Rect {
            x: area.x + col as u16 * card_width,
            y: area.y + row as u16 * CARD_HEIGHT,
            width: card_width,
            height: CARD_HEIGHT.min(area.height - row as u16 * CARD_HEIGHT),
        };
        render_card(frame, record, selected == Some(i), tag_count, card);
    }
}

fn render_card(
    frame: &mut Frame,
    record: &TemplateRecord,
    is_selected: bool,
    tag_count: usize,
    area: Rect,
) {
    let border_style = if is_selected {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width.saturating_sub(1) as usize;
    let dim = Style::default().fg(Color::DarkGray);
    let title_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    let mut badge_line = vec![badge(record.kind), Span::raw(" "), price_span(record)];
    if record.is_premium {
        badge_line.push(Span::styled(" ★高级", Style::default().fg(Color::Magenta)));
    }

    let lines = vec![
        Line::from(Span::styled(truncate(&record.title, width), title_style)),
        Line::from(badge_line),
        Line::from(Span::styled(
            truncate(&format!("{} · {}", record.category, record.author), width),
            dim,
        )),
        Line::from(vec![
            Span::styled(
                format!("★ {}", format_number(record.rating)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(format!("  ↓ {}", record.downloads_label()), dim),
        ]),
        Line::from(Span::styled(
            truncate(&hashtags(record.tag_preview(tag_count)), width),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// One two-line row per record
fn render_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let selected = app.list_state.selected();
    let tag_count = PresentationMode::List.tag_preview_len();
    let dim = Style::default().fg(Color::DarkGray);

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let is_selected = selected == Some(i);
            let (prefix, base) = if is_selected {
                (
                    Span::styled("▌ ", Style::default().fg(Color::LightRed).bg(SELECTION_BG)),
                    Style::default().bg(SELECTION_BG),
                )
            } else {
                (Span::raw("  "), Style::default())
            };

            let mut first = vec![
                prefix.clone(),
                Span::styled(
                    record.title.clone(),
                    base.fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                badge(record.kind),
                Span::raw("  "),
                price_span(record),
            ];
            if record.is_premium {
                first.push(Span::styled(" ★高级", Style::default().fg(Color::Magenta)));
            }

            let second = vec![
                prefix,
                Span::styled(
                    format!(
                        "{} · {} · ★ {} · ↓ {}  {}",
                        record.category,
                        record.author,
                        format_number(record.rating),
                        record.downloads_label(),
                        hashtags(record.tag_preview(tag_count)),
                    ),
                    dim,
                ),
            ];

            let item = ListItem::new(vec![Line::from(first), Line::from(second)]);
            if is_selected {
                item.style(Style::default().bg(SELECTION_BG))
            } else {
                item
            }
        })
        .collect();

    frame.render_stateful_widget(List::new(items), area, &mut app.list_state);
}

fn render_detail(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Toast
        ])
        .split(frame.area());

    let Some(detail) = app.controller.state().detail() else {
        return;
    };
    let record = detail.record();

    let header = Line::from(vec![
        Span::styled("  ← Esc 返回  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            record.title.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        badge(record.kind),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Preview carousel
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Tab body
        ])
        .split(columns[0]);
    render_preview(frame, detail, left[0]);
    render_tabs(frame, detail.tab, left[1]);
    render_tab_body(frame, detail, left[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(columns[1]);
    render_price_panel(frame, detail, right[0]);
    render_info_panel(frame, record, right[1]);

    render_status_bar(frame, app, chunks[2]);
    render_toast_line(frame, app, chunks[3]);
}

fn render_preview(frame: &mut Frame, detail: &DetailState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .title(format!(
            " 预览 {}/{} ",
            detail.preview_index + 1,
            PREVIEW_SLOTS
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let image = match &detail.record().thumbnail {
        Some(url) => Span::styled(url.clone(), Style::default().fg(Color::Blue)),
        None => Span::styled("暂无预览图", Style::default().fg(Color::DarkGray)),
    };
    let dots: Vec<Span> = (0..PREVIEW_SLOTS)
        .map(|i| {
            if i == detail.preview_index {
                Span::styled("● ", Style::default().fg(Color::LightRed))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let lines = vec![
        Line::from(""),
        Line::from(image),
        Line::from(""),
        Line::from(dots),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_tabs(frame: &mut Frame, active: DetailTab, area: Rect) {
    let mut spans = vec![Span::raw("  ")];
    for (i, tab) in DetailTab::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        let style = if *tab == active {
            Style::default()
                .fg(Color::LightRed)
                .bg(SELECTION_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", tab.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tab_body(frame: &mut Frame, detail: &DetailState, area: Rect) {
    let record = detail.record();
    let value = Style::default().fg(Color::White);
    let width = area.width.saturating_sub(4) as usize;

    let mut lines: Vec<Line> = vec![Line::from("")];
    match detail.tab {
        DetailTab::Description => {
            for chunk in wrap_text(&record.description, width) {
                lines.push(Line::from(Span::styled(chunk, value)));
            }
            lines.push(Line::from(""));
            for chunk in wrap_text(&record.summary(), width) {
                lines.push(Line::from(Span::styled(
                    chunk,
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        DetailTab::Specs => {
            lines.push(labeled("格式", record.kind.label().to_string()));
            lines.push(labeled("分类", record.category.clone()));
            lines.push(labeled("模板 ID", record.id.clone()));
            lines.push(labeled("标签数", record.tags.len().to_string()));
        }
        DetailTab::Reviews => {
            lines.push(labeled(
                "评分",
                format!("★ {} / 5", format_number(record.rating)),
            ));
            lines.push(labeled("下载量", record.downloads_label()));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "暂无用户评价",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }
    }

    let padded = Rect {
        x: area.x + 2,
        width: area.width.saturating_sub(2),
        ..area
    };
    frame.render_widget(Paragraph::new(lines), padded);
}

fn render_price_panel(frame: &mut Frame, detail: &DetailState, area: Rect) {
    let record = detail.record();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .title(" 价格 ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key = Style::default().fg(Color::DarkGray);
    let action = Style::default().fg(Color::White);

    let mut lines = vec![Line::from(vec![Span::raw(" "), price_span(record)])];
    if record.is_premium {
        lines.push(Line::from(Span::styled(
            " ★ 高级模板",
            Style::default().fg(Color::Magenta),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [d] ", key),
        Span::styled(
            record.primary_action_label(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" [e] ", key),
        Span::styled("编辑模板", action),
    ]));
    let like = if detail.liked {
        Span::styled("已收藏 ♥", Style::default().fg(Color::LightRed))
    } else {
        Span::styled("收藏 ♡", action)
    };
    lines.push(Line::from(vec![Span::styled(" [f] ", key), like]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info_panel(frame: &mut Frame, record: &TemplateRecord, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Gray).add_modifier(Modifier::DIM))
        .title(" 模板信息 ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![label_span("类型"), badge(record.kind)]),
        labeled("分类", record.category.clone()),
        labeled("作者", record.author.clone()),
        labeled("创建时间", record.created_at.clone()),
        labeled("下载量", record.downloads_label()),
        labeled("评分", format!("★ {}", format_number(record.rating))),
    ];

    if !record.tags.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "─── 标签 ───",
            Style::default().fg(Color::DarkGray),
        )));
        for chunk in wrap_text(&hashtags(&record.tags), inner.width.saturating_sub(2) as usize) {
            lines.push(Line::from(Span::styled(chunk, Style::default().fg(Color::Cyan))));
        }
    }

    let padded = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(1),
        ..inner
    };
    frame.render_widget(Paragraph::new(lines), padded);
}

/// Label padded to a fixed column so values line up
fn label_span(label: &str) -> Span<'static> {
    let pad = LABEL_WIDTH.saturating_sub(label.width());
    Span::styled(
        format!("{label}{}", " ".repeat(pad)),
        Style::default().fg(Color::DarkGray),
    )
}

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        label_span(label),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `text` to `max_width` columns, marking the cut with an ellipsis
fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Wrap on whitespace by display width; words wider than a line are split
/// per character, which is also how unspaced CJK text wraps
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let sep = usize::from(!current.is_empty());
        let word_width = word.width();
        if current_width + sep + word_width <= max_width {
            if sep == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += sep + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(c);
            current_width += w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Width of the `▌ ` prefix in front of the input text
const INPUT_PREFIX_WIDTH: u16 = 2;

/// Search input with a thick bar on the left and a block cursor. The terminal
/// cursor follows it so IME candidate windows open in the right place.
fn render_search_input(frame: &mut Frame, input: &TextInput, placeholder: &str, area: Rect) {
    let cursor_style = Style::default().fg(Color::White).bg(Color::DarkGray);
    let text_style = Style::default().fg(Color::White);
    let (before, at_cursor, after) = input.split_at_cursor();

    let mut spans = vec![Span::styled("▌ ", Style::default().fg(Color::Yellow))];
    if !before.is_empty() {
        spans.push(Span::styled(before, text_style));
    }
    match at_cursor {
        Some(c) => spans.push(Span::styled(c.to_string(), cursor_style)),
        None => spans.push(Span::styled("█", Style::default().fg(Color::White))),
    }
    if !after.is_empty() {
        spans.push(Span::styled(after, text_style));
    }
    if input.is_empty() && !placeholder.is_empty() {
        spans.push(Span::styled(
            format!(" {placeholder}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let column = u16::try_from(input.cursor_column()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(INPUT_PREFIX_WIDTH)
        .saturating_add(column)
        .min(area.right().saturating_sub(1));
    frame.set_cursor_position(Position::new(x, area.y));
}

/// Status bar: view mode plus the shortcuts that apply to the current screen
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let bracket = Style::default().fg(Color::DarkGray);
    let mode_color = match app.mode() {
        PresentationMode::Grid => Color::Magenta,
        PresentationMode::List => Color::Green,
    };

    let mut spans = vec![
        Span::styled("  view:", dim),
        Span::styled(
            format!("{:<5}", app.mode()),
            Style::default().fg(mode_color).add_modifier(Modifier::BOLD),
        ),
    ];

    let hints: &[&str] = match app.screen() {
        Screen::Catalog => &[
            "↑↓ select",
            "Enter open",
            "^t type",
            "^r category",
            "^g view",
            "^o cmds",
            "Esc quit",
        ],
        Screen::Detail => &[
            "Esc back",
            "←→ preview",
            "Tab tab",
            "f like",
            "d download",
            "e edit",
            "^o cmds",
        ],
    };
    for hint in hints {
        spans.extend([
            Span::styled(" [", bracket),
            Span::styled(*hint, dim),
            Span::styled("]", bracket),
        ]);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast_line(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref toast) = app.toast {
        let bracket = Style::default().fg(Color::DarkGray);
        let toast_style = if toast.is_error {
            Style::default().fg(Color::Red).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
        };

        let spans = vec![
            Span::styled("  [", bracket),
            Span::styled(toast.message.as_str(), toast_style),
            Span::styled("]", bracket),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn render_command_palette(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let width = (area.width * 40 / 100)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = 16.min(area.height.saturating_sub(4));
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height / 5;
    let palette_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, palette_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(" Commands ");
    let inner = block.inner(palette_area);
    frame.render_widget(block, palette_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Query
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Commands
        ])
        .split(inner);

    render_search_input(frame, &app.command_palette_input, "", chunks[0]);

    let inner_width = chunks[2].width as usize;
    let has_selection = app.highlighted().is_some();

    let items: Vec<ListItem> = app
        .command_palette_filtered
        .iter()
        .enumerate()
        .map(|(i, cmd)| {
            let is_selected = i == app.command_palette_index;
            let is_enabled = has_selection || !cmd.needs_selection();

            let (name_style, desc_style) = match (is_selected, is_enabled) {
                (true, true) => (
                    Style::default()
                        .bg(SELECTION_BG)
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(SELECTION_BG).fg(Color::DarkGray),
                ),
                (true, false) => (
                    Style::default()
                        .bg(SELECTION_BG)
                        .fg(Color::Gray)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(SELECTION_BG).fg(Color::DarkGray),
                ),
                (false, true) => (
                    Style::default().fg(Color::White),
                    Style::default().fg(Color::DarkGray),
                ),
                (false, false) => (
                    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::DIM),
                ),
            };

            if !is_selected {
                return ListItem::new(vec![
                    Line::from(vec![Span::raw("  "), Span::styled(cmd.name(), name_style)]),
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(cmd.description(), desc_style),
                    ]),
                ]);
            }

            let prefix_color = if is_enabled {
                Color::LightRed
            } else {
                Color::DarkGray
            };
            let prefix = Span::styled("▌ ", Style::default().fg(prefix_color).bg(SELECTION_BG));
            let fill = |text: &str| {
                Span::styled(
                    " ".repeat(inner_width.saturating_sub(2 + text.width())),
                    Style::default().bg(SELECTION_BG),
                )
            };

            ListItem::new(vec![
                Line::from(vec![
                    prefix.clone(),
                    Span::styled(cmd.name(), name_style),
                    fill(cmd.name()),
                ]),
                Line::from(vec![
                    prefix,
                    Span::styled(cmd.description(), desc_style),
                    fill(cmd.description()),
                ]),
            ])
        })
        .collect();

    frame.render_widget(List::new(items), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_app;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use market_catalog::Intent;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(Event::Key(KeyEvent::new(code, modifiers)));
    }

    #[test]
    fn test_grid_renders_cards_in_columns() {
        let mut app = sample_app(PresentationMode::Grid);
        let screen = draw(&mut app, 100, 24);

        assert_eq!(app.grid_columns, 3);
        for title in ["Alpha Deck", "Beta Diagram", "Gamma Report"] {
            assert!(screen.contains(title), "missing {title}:\n{screen}");
        }
        let first_row = screen
            .lines()
            .find(|l| l.contains("Alpha Deck"))
            .unwrap();
        assert!(first_row.contains("Beta Diagram"));
        assert!(screen.contains("#pitch #finance"));
        assert!(!screen.contains("#seed"));
        assert!(screen.contains("view:grid"));
    }

    #[test]
    fn test_list_renders_selection_and_three_tags() {
        let mut app = sample_app(PresentationMode::List);
        let screen = draw(&mut app, 100, 20);

        assert!(screen.contains("▌ Alpha Deck"));
        assert!(screen.contains("  Beta Diagram"));
        assert!(screen.contains("#pitch #finance #seed"));
        assert!(screen.contains("1,234"));
        assert!(screen.contains("view:list"));
    }

    #[test]
    fn test_terminal_cursor_follows_wide_search_text() {
        let mut app = sample_app(PresentationMode::List);
        for c in "ab架构".chars() {
            key(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(2 + 6, 11)
        );

        key(&mut app, KeyCode::Left, KeyModifiers::NONE);
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert_eq!(
            terminal.get_cursor_position().unwrap(),
            Position::new(2 + 4, 11)
        );
    }

    #[test]
    fn test_grid_scrolls_to_selection() {
        let mut app = sample_app(PresentationMode::Grid);
        // One column, one card row visible
        draw(&mut app, 40, 11);
        assert_eq!(app.grid_columns, 1);

        key(&mut app, KeyCode::Down, KeyModifiers::NONE);
        key(&mut app, KeyCode::Down, KeyModifiers::NONE);
        let screen = draw(&mut app, 40, 11);
        assert!(screen.contains("Gamma Report"));
        assert!(!screen.contains("Alpha Deck"));
    }

    #[test]
    fn test_empty_state_hides_cards() {
        let mut app = sample_app(PresentationMode::Grid);
        for c in "zzz".chars() {
            key(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        let screen = draw(&mut app, 80, 20);
        assert!(!screen.contains("Alpha Deck"));
        assert!(screen.contains("zzz"));
    }

    #[test]
    fn test_detail_screen() {
        let mut app = sample_app(PresentationMode::Grid);
        app.controller.dispatch(Intent::Select("b".into()));
        let screen = draw(&mut app, 100, 30);

        assert!(screen.contains("Beta Diagram"));
        assert!(screen.contains("Service topology overview"));
        assert!(screen.contains("https://example.com/b.png"));
        assert!(screen.contains("1/3"));
        assert!(screen.contains("#architecture"));
        assert!(screen.contains("[Esc back]"));

        app.controller.dispatch(Intent::NextPreview);
        app.controller.dispatch(Intent::ShowTab(DetailTab::Specs));
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains("2/3"));
        assert!(!screen.contains("Service topology overview"));
    }

    #[test]
    fn test_command_palette_overlay() {
        let mut app = sample_app(PresentationMode::Grid);
        key(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);
        let screen = draw(&mut app, 100, 30);
        assert!(screen.contains(" Commands "));
        assert!(screen.contains("▌ toggle-view-mode"));
        assert!(screen.contains("open-thumbnail"));
    }

    #[test]
    fn test_toast_line() {
        let mut app = sample_app(PresentationMode::Grid);
        app.toast = Some(crate::Toast::error("Clipboard not available"));
        let screen = draw(&mut app, 100, 24);
        assert!(screen.contains("[Clipboard not available]"));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("abc def ghi", 7), vec!["abc def", "ghi"]);
        assert_eq!(wrap_text("这是一个专业", 4), vec!["这是", "一个", "专业"]);
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Alpha", 10), "Alpha");
        assert_eq!(truncate("Alpha Deck", 6), "Alpha…");
        assert_eq!(truncate("系统架构设计图", 7), "系统架…");
    }

    #[test]
    fn test_label_alignment() {
        let line = labeled("作者", "Ada".to_string());
        insta::assert_snapshot!(line.to_string(), @"作者      Ada");
    }
}
