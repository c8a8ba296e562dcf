use crate::app::state::DashboardFocus;
use crate::app::App;
use crate::domain::{series_color, CategoryFilter, Country, YearSlot};
use crate::scorecard::SeriesKey;
use crate::ui::widgets::popup::render_tooltip;
use crate::ui::widgets::radar::render_scorecard_radar;
use crate::ui::widgets::tables::{diverging_color, diverging_text_color};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};
use ratatui::Frame;
use std::time::Instant;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_category_tabs(app, f, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(30)])
        .split(chunks[1]);

    render_selector(app, f, main[0]);
    render_scorecard_radar(app, f, main[1], Instant::now());
    render_ranking_table(app, f, chunks[2]);
    render_status(app, f, chunks[3]);
    render_tooltip(app, f);
}

fn render_category_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles: Vec<TextLine> = CategoryFilter::TABS
        .iter()
        .map(|filter| TextLine::from(filter.label()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.category_index)
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().title("Categories").borders(Borders::ALL));
    f.render_widget(tabs, area);
}

fn render_selector(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = matches!(
        app.focus,
        DashboardFocus::Countries | DashboardFocus::Slots
    );
    let block = Block::default()
        .title("Countries")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    for (index, country) in Country::ALL.iter().enumerate() {
        let is_cursor =
            index == app.country_cursor && app.focus == DashboardFocus::Countries;
        let selected = app.selection.is_country_selected(*country);
        let marker = if selected { "[x]" } else { "[ ]" };
        let pointer = if is_cursor { "▸ " } else { "  " };
        let style = if is_cursor {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(country.color())
        };
        lines.push(TextLine::from(vec![
            Span::raw(pointer.to_string()),
            Span::raw(format!("{marker} ")),
            Span::styled(country.label().to_string(), style),
        ]));
    }

    lines.push(TextLine::from(""));
    let cursor_country = app.cursor_country();
    lines.push(TextLine::from(Span::styled(
        format!("Slots — {}", cursor_country.label()),
        Style::default().fg(Color::Yellow),
    )));
    for (index, slot) in YearSlot::ALL.iter().enumerate() {
        let is_cursor = index == app.slot_cursor && app.focus == DashboardFocus::Slots;
        let selected = app.selection.is_slot_selected(cursor_country, *slot);
        let marker = if selected { "[x]" } else { "[ ]" };
        let pointer = if is_cursor { "▸ " } else { "  " };
        let style = if is_cursor {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(TextLine::from(vec![
            Span::raw(pointer.to_string()),
            Span::raw(format!("{marker} ")),
            Span::styled(slot.label().to_string(), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_ranking_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == DashboardFocus::Table;
    let block = Block::default()
        .title(format!("Rankings ({})", app.sort_mode.label()))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if app.view.is_empty() {
        let paragraph = Paragraph::new("No selection")
            .block(block)
            .alignment(ratatui::layout::Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let columns = app.view.columns(app.sort_mode);
    let mut header_cells = vec![Cell::from("Indicator").style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    for key in &columns {
        header_cells.push(
            Cell::from(column_title(*key)).style(
                Style::default()
                    .fg(series_color(key.series, key.slot))
                    .add_modifier(Modifier::BOLD),
            ),
        );
    }

    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let rows = app
        .view
        .indicators
        .iter()
        .skip(app.table_scroll_offset)
        .take(max_visible_rows)
        .map(|indicator| {
            let mut cells = vec![Cell::from(indicator.clone())];
            for key in &columns {
                cells.push(ranking_cell(app, indicator, *key));
            }
            Row::new(cells)
        });

    let mut widths = vec![Constraint::Min(24)];
    widths.extend(columns.iter().map(|_| Constraint::Length(14)));

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn column_title(key: SeriesKey) -> String {
    key.series.country().map_or_else(
        || key.series.label().to_string(),
        |country| format!("{} {}", country.code(), key.slot.label()),
    )
}

fn ranking_cell(app: &App, indicator: &str, key: SeriesKey) -> Cell<'static> {
    let record = app
        .view
        .series_for(key)
        .and_then(|data| data.record_for(indicator));
    let Some(record) = record else {
        return Cell::from("-");
    };

    let rank = key.series.country().and_then(|country| {
        app.view.rankings.get(indicator, country, key.slot)
    });
    let text = rank.map_or_else(
        || format!("{:.0}", record.standardized),
        |entry| {
            format!(
                "{:.0} ({}/{})",
                record.standardized, entry.rank, entry.group_size
            )
        },
    );

    record.table_standardized.map_or_else(
        || Cell::from(text.clone()),
        |value| {
            Cell::from(text.clone()).style(
                Style::default()
                    .bg(diverging_color(value))
                    .fg(diverging_text_color(value)),
            )
        },
    )
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let bold = |text: &str| {
        Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let mut spans = vec![
        bold("←/→"),
        Span::raw(": Category  "),
        bold("Tab"),
        Span::raw(": Focus  "),
        bold("Enter"),
        Span::raw(": Toggle  "),
        bold("./,"),
        Span::raw(": Highlight  "),
        bold("a"),
        Span::raw(": Labels  "),
        bold("s"),
        Span::raw(": Sort  "),
        bold("o"),
        Span::raw(": Data  "),
        bold("F1"),
        Span::raw(": Help  "),
        bold("q"),
        Span::raw(": Quit"),
    ];
    if !app.status_message.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    let paragraph = Paragraph::new(TextLine::from(spans))
        .block(Block::default().borders(Borders::TOP))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
