use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_help(f: &mut Frame<'_>) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(ClearWidget, area);

    let key = |text: &str| {
        Span::styled(
            format!("{text:<12}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };
    let lines = vec![
        TextLine::from(Span::styled(
            "Dashboard",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        TextLine::from(vec![key("←/→"), Span::raw("Switch category tab")]),
        TextLine::from(vec![key("Tab"), Span::raw("Move focus (countries / slots / table)")]),
        TextLine::from(vec![key("↑/↓"), Span::raw("Move cursor in focused pane")]),
        TextLine::from(vec![key("Enter/Space"), Span::raw("Toggle country or year slot")]),
        TextLine::from(vec![key("./,"), Span::raw("Cycle highlighted data point")]),
        TextLine::from(vec![key("Esc"), Span::raw("Clear highlight")]),
        TextLine::from(vec![key("a"), Span::raw("Toggle all value labels")]),
        TextLine::from(vec![key("s"), Span::raw("Toggle ranking sort mode")]),
        TextLine::from(vec![key("r"), Span::raw("Reload data from the backend")]),
        TextLine::from(vec![key("o"), Span::raw("Open the observations list")]),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Observations",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        TextLine::from(vec![key("/"), Span::raw("Fuzzy search")]),
        TextLine::from(vec![key("Enter"), Span::raw("Edit selected row")]),
        TextLine::from(vec![key("n"), Span::raw("New observation")]),
        TextLine::from(vec![key("i"), Span::raw("Indicator definitions")]),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Forms",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )),
        TextLine::from(vec![key("↑/↓"), Span::raw("Move between fields")]),
        TextLine::from(vec![key("Enter"), Span::raw("Start/stop editing a text field")]),
        TextLine::from(vec![key("←/→"), Span::raw("Cycle a choice field")]),
        TextLine::from(vec![key("s"), Span::raw("Save")]),
        TextLine::from(""),
        TextLine::from(vec![key("F1/Esc"), Span::raw("Close this help")]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}
