use crate::app::App;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_observations(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(area);

    let visible = app.visible_record_indices();
    if visible.is_empty() {
        let message = if app.search_input.is_empty() {
            "No observations loaded."
        } else {
            "No observations match the search."
        };
        let paragraph = Paragraph::new(message)
            .block(
                Block::default()
                    .title("Observations")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, chunks[0]);
    } else {
        render_table(app, f, chunks[0], &visible);
    }

    render_search_bar(app, f, chunks[1]);
    render_help_bar(app, f, chunks[2]);
}

fn render_table(
    app: &App,
    f: &mut Frame<'_>,
    area: ratatui::layout::Rect,
    visible: &[usize],
) {
    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Category"),
        Cell::from("Indicator"),
        Cell::from("Country"),
        Cell::from("Slot"),
        Cell::from("Year"),
        Cell::from("Value"),
        Cell::from("Std"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = visible.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.selected_record_index);

    let rows = visible
        .iter()
        .skip(offset)
        .take(max_visible_rows)
        .enumerate()
        .filter_map(|(i, &record_index)| {
            let record = app.records.get(record_index)?;
            let is_selected = i + offset == app.selected_record_index;
            let style = if is_selected {
                Style::default()
                    .bg(Color::Rgb(0, 60, 90))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(record.series.base_color())
            };
            Some(
                Row::new(vec![
                    Cell::from(record.secondary_id.to_string()),
                    Cell::from(record.category.label()),
                    Cell::from(record.indicator.clone()),
                    Cell::from(record.series.label()),
                    Cell::from(record.slot.label()),
                    Cell::from(record.year.clone().unwrap_or_default()),
                    Cell::from(record.display_value().to_string()),
                    Cell::from(format!("{:.1}", record.standardized)),
                ])
                .style(style),
            )
        });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Min(24),
        Constraint::Length(14),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "Observations ({} of {})",
                    app.selected_record_index + 1,
                    total_rows
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_search_bar(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let style = if app.search_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let content = if app.search_input.is_empty() && !app.search_active {
        "Press / to search".to_string()
    } else {
        format!("/{}", app.search_input)
    };
    let paragraph = Paragraph::new(content).style(style).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(style),
    );
    f.render_widget(paragraph, area);
}

fn render_help_bar(app: &App, f: &mut Frame<'_>, area: ratatui::layout::Rect) {
    let bold = |text: &str| {
        Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let mut spans = vec![
        bold("Enter"),
        Span::raw(": Edit  "),
        bold("n"),
        Span::raw(": New  "),
        bold("i"),
        Span::raw(": Indicators  "),
        bold("/"),
        Span::raw(": Search  "),
        bold("ESC"),
        Span::raw(": Back  "),
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
