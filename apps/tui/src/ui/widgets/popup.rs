use crate::app::App;
use crate::domain::series_color;
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
            ratatui::layout::Constraint::Percentage(percent_y),
            ratatui::layout::Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
            ratatui::layout::Constraint::Percentage(percent_x),
            ratatui::layout::Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

/// Detail popup for the highlighted data point.
pub fn render_tooltip(app: &App, f: &mut Frame<'_>) {
    let Some(highlight) = &app.highlight else {
        return;
    };
    let Some(record) = app.highlighted_record() else {
        return;
    };

    let area = centered_rect(44, 40, f.area());
    f.render_widget(ClearWidget, area);

    let accent = series_color(highlight.key.series, highlight.key.slot);
    // Aggregates never rank, so the rank line simply goes missing.
    let rank_line = highlight
        .key
        .series
        .country()
        .and_then(|country| {
            app.view
                .rankings
                .get(&record.indicator, country, highlight.key.slot)
        })
        .map(|entry| format!("{} of {}", entry.rank, entry.group_size));

    render_tooltip_body(f, area, accent, record, rank_line);
}

fn render_tooltip_body(
    f: &mut Frame<'_>,
    area: Rect,
    accent: Color,
    record: &crate::scorecard::Record,
    rank: Option<String>,
) {
    let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(Color::Yellow));
    let mut lines = vec![
        TextLine::from(vec![
            label("Indicator: "),
            Span::raw(record.indicator.clone()),
        ]),
        TextLine::from(vec![
            label("Series: "),
            Span::styled(
                format!("{} ({})", record.series.label(), record.slot.label()),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(vec![
            label("Year: "),
            Span::raw(record.year.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        TextLine::from(vec![
            label("Value: "),
            Span::raw(record.display_value().to_string()),
        ]),
        TextLine::from(vec![
            label("Standardized: "),
            Span::raw(format!("{:.1}", record.standardized)),
        ]),
    ];
    if let Some(rank) = rank {
        lines.push(TextLine::from(vec![label("Rank: "), Span::raw(rank)]));
    }
    if let Some(proxy) = &record.proxy {
        lines.push(TextLine::from(vec![
            label("Proxy: "),
            Span::raw(proxy.clone()),
        ]));
    }
    if let Some(source) = &record.source {
        lines.push(TextLine::from(vec![
            label("Source: "),
            Span::raw(source.clone()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Data Point")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        );
    f.render_widget(paragraph, area);
}
