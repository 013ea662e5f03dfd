use crate::backend::ResultItem;
use crate::controller::SearchStatus;
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

const SEARCH_PREFIX: &str = " \u{1F50D} ";
const PLACEHOLDER: &str = "Search...";
const MAX_COLUMNS: usize = 6;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_results(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    if app.search.focused {
        frame.set_cursor_position(cursor_position(chunks[0], app.search.cursor_column()));
    }
}

/// Cursor cell inside the search box, pinned to the last inner column when
/// the query is wider than the box
fn cursor_position(area: Rect, column: u16) -> Position {
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(SEARCH_PREFIX.width() as u16)
        .saturating_add(column);
    let last_inner = area.right().saturating_sub(2).max(area.x);
    Position::new(x.min(last_inner), area.y.saturating_add(1))
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.search.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search ");

    let line = if app.search.query.is_empty() {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::raw(SEARCH_PREFIX),
            Span::styled(app.search.query.as_str(), Style::default().fg(Color::White)),
        ])
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    let results = app.controller.results();

    let mut title = format!(" Results: {} ", app.backend_label);
    if results.status == SearchStatus::Loading {
        title.push_str("(searching...) ");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    let message = match results.status {
        SearchStatus::Idle => Some(Text::styled(
            "Type to search the organizer.",
            Style::default().fg(Color::DarkGray),
        )),
        SearchStatus::Failed => {
            let cause = results.error.clone().unwrap_or_default();
            Some(Text::from(vec![
                Line::styled(cause, Style::default().fg(Color::LightRed)),
                Line::styled(
                    "Keep typing, or press F5 to retry.",
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        }
        SearchStatus::Loading if results.is_empty() => Some(Text::styled(
            format!("Searching for '{}'...", results.query),
            Style::default().fg(Color::Yellow),
        )),
        SearchStatus::Ready if results.is_empty() => Some(Text::styled(
            format!("No results for '{}'.", results.query),
            Style::default().fg(Color::Gray),
        )),
        _ => None,
    };

    if let Some(text) = message {
        let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    // Borders (2) + header (1)
    let table_inner_height = area.height.saturating_sub(3) as usize;
    app.table.visible_rows = table_inner_height;

    let results = app.controller.results();
    let columns = result_columns(&results.items, MAX_COLUMNS);

    let header = Row::new(columns.iter().map(|name| {
        Cell::from(name.clone()).style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0, 95, 135))
                .add_modifier(Modifier::BOLD),
        )
    }))
    .height(1);

    // Build visible rows only
    let start = app.table.scroll_offset;
    let end = (start + table_inner_height).min(results.items.len());

    let rows: Vec<Row> = (start..end)
        .enumerate()
        .map(|(visual_idx, logical_idx)| {
            let item = &results.items[logical_idx];
            let is_selected = app.table.selected == Some(logical_idx);

            // Alternating row background
            let bg = if is_selected {
                Color::Rgb(60, 60, 80)
            } else if visual_idx % 2 == 1 {
                Color::Rgb(25, 25, 35)
            } else {
                Color::Reset
            };

            let fg_modifier = if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };

            let cells = columns.iter().enumerate().map(|(col, key)| {
                let text = item.get(key).map(|v| cell_text(key, v)).unwrap_or_default();
                let fg = if col == 0 {
                    colors::color_for_extension(&colors::extension_of(&text))
                } else {
                    Color::Gray
                };
                Cell::from(text).style(Style::default().fg(fg).bg(bg).add_modifier(fg_modifier))
            });

            Row::new(cells)
        })
        .collect();

    let widths: Vec<Constraint> = (0..columns.len())
        .map(|i| Constraint::Fill(if i == 0 { 2 } else { 1 }))
        .collect();

    let table = Table::new(rows, widths).header(header).block(block);

    frame.render_widget(table, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let results = app.controller.results();
    let bar_bg = Color::Rgb(0, 95, 135);

    let mut left_text = format!(
        " {} {} | {} items",
        colors::icon_for_status(results.status),
        results.status.label(),
        results.len()
    );
    if let Some(updated_at) = results.updated_at {
        left_text.push_str(&format!(" | updated {}", updated_at.format("%H:%M:%S")));
    }

    let right_text = " Enter:Search  F5:Retry  Tab:Focus  Esc:Clear  Ctrl+Q:Quit ";

    // Left-aligned status + padding + right-aligned key hints
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let mut spans = vec![Span::styled(
        left_text,
        Style::default()
            .fg(colors::color_for_status(results.status))
            .bg(bar_bg)
            .add_modifier(Modifier::BOLD),
    )];
    if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bar_bg)));
        spans.push(Span::styled(
            right_text,
            Style::default().fg(Color::White).bg(bar_bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bar_bg)),
        area,
    );
}

/// Column names for a result list: keys in first-seen order, capped at `max`
pub fn result_columns(items: &[ResultItem], max: usize) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        for key in item.keys() {
            if columns.len() >= max {
                return columns;
            }
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Render one field value for a table cell
pub fn cell_text(key: &str, value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) if is_size_field(key) => match n.as_u64() {
            Some(bytes) => crate::format_size(bytes),
            None => n.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn is_size_field(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "size" || key == "bytes" || key.ends_with("_size") || key.ends_with("size_bytes")
}
