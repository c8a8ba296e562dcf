use crate::app::App;
use crate::ui::widgets::tables::scroll_offset;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_indicators(app: &App, f: &mut Frame<'_>) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    if app.indicator_rows.is_empty() {
        let paragraph = Paragraph::new("No indicators loaded.")
            .block(
                Block::default()
                    .title("Indicators")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("ID"),
            Cell::from("Name"),
            Cell::from("Code"),
            Cell::from("Category"),
            Cell::from("Source"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let total_rows = app.indicator_rows.len();
        let max_visible_rows = chunks[0].height.saturating_sub(3) as usize;
        let offset = scroll_offset(total_rows, max_visible_rows, app.indicator_cursor);

        let rows = app
            .indicator_rows
            .iter()
            .skip(offset)
            .take(max_visible_rows)
            .enumerate()
            .map(|(i, row)| {
                let style = if i + offset == app.indicator_cursor {
                    Style::default()
                        .bg(Color::Rgb(0, 60, 90))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(row.id.to_string()),
                    Cell::from(row.indicator_name.clone()),
                    Cell::from(row.indicator_code.clone().unwrap_or_default()),
                    Cell::from(row.category.clone().unwrap_or_default()),
                    Cell::from(row.source.clone().unwrap_or_default()),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(6),
            Constraint::Min(28),
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(18),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!(
                        "Indicators ({} of {})",
                        app.indicator_cursor + 1,
                        total_rows
                    ))
                    .borders(Borders::ALL),
            )
            .column_spacing(1);
        f.render_widget(table, chunks[0]);
    }

    let bold = |text: &str| {
        Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let help = Paragraph::new(TextLine::from(vec![
        bold("Enter"),
        Span::raw(": Edit  "),
        bold("↑/↓"),
        Span::raw(": Navigate  "),
        bold("ESC"),
        Span::raw(": Back  "),
        bold("q"),
        Span::raw(": Quit"),
    ]))
    .block(Block::default().borders(Borders::TOP))
    .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(help, chunks[1]);
}
