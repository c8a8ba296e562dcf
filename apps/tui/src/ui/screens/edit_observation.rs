use crate::app::state::{EditObservationState, ObservationField};
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_edit_observation(app: &App, f: &mut Frame<'_>) {
    let Some(state) = &app.edit_observation else {
        return;
    };

    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let title = if state.secondary_id.is_some() {
        "Edit Observation"
    } else {
        "New Observation"
    };

    let lines: Vec<TextLine> = ObservationField::ALL
        .iter()
        .enumerate()
        .map(|(index, field)| field_line(state, index, *field))
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, chunks[0]);

    render_help_bar(app, f, chunks[1]);
}

fn field_line(
    state: &EditObservationState,
    index: usize,
    field: ObservationField,
) -> TextLine<'static> {
    let is_current = index == state.field_index;
    let value = field_value(state, field);

    let label_style = if is_current {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let pointer = if is_current { "▸ " } else { "  " };

    let mut spans = vec![
        Span::raw(pointer.to_string()),
        Span::styled(format!("{:<22}", field.label()), label_style),
        Span::raw(value),
    ];
    if is_current && state.editing {
        spans.push(Span::styled(
            "▏",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    if is_current && field.cycles() {
        spans.push(Span::styled(
            "  ←/→",
            Style::default().fg(Color::DarkGray),
        ));
    }
    TextLine::from(spans)
}

fn field_value(state: &EditObservationState, field: ObservationField) -> String {
    match field {
        ObservationField::Category => state.category().label().to_string(),
        ObservationField::Country => state.series().label().to_string(),
        ObservationField::Slot => state.slot().label().to_string(),
        ObservationField::Positive => if state.positive { "Yes" } else { "No" }.to_string(),
        ObservationField::Indicator => state.indicator.clone(),
        ObservationField::Proxy => state.proxy.clone(),
        ObservationField::Year => state.year.clone(),
        ObservationField::Source => state.source.clone(),
        ObservationField::Value => state.value.clone(),
        ObservationField::ValueN => state.value_n.clone(),
        ObservationField::ValueMap => state.value_map.clone(),
        ObservationField::ValueStandardized => state.value_standardized.clone(),
        ObservationField::TableStandardized => state.table_standardized.clone(),
    }
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
        bold("↑/↓"),
        Span::raw(": Field  "),
        bold("Enter"),
        Span::raw(": Edit field  "),
        bold("s"),
        Span::raw(": Save  "),
        bold("ESC"),
        Span::raw(": Back"),
    ];
    if !app.status_message.is_empty() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Red),
        ));
    }
    let paragraph = Paragraph::new(TextLine::from(spans))
        .block(Block::default().borders(Borders::TOP))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
