use crate::app::state::{EditIndicatorState, IndicatorField};
use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_edit_indicator(app: &App, f: &mut Frame<'_>) {
    let Some(state) = &app.edit_indicator else {
        return;
    };

    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let fields = IndicatorField::all();
    // The year table is long; keep the current field in view.
    let max_visible = chunks[0].height.saturating_sub(2) as usize;
    let offset = crate::ui::widgets::tables::scroll_offset(
        fields.len(),
        max_visible,
        state.field_index,
    );

    let lines: Vec<TextLine> = fields
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible)
        .map(|(index, field)| field_line(state, index, *field))
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(format!("Edit Indicator — {}", state.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, chunks[0]);

    render_help_bar(app, f, chunks[1]);
}

fn field_line(
    state: &EditIndicatorState,
    index: usize,
    field: IndicatorField,
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

fn field_value(state: &EditIndicatorState, field: IndicatorField) -> String {
    match field {
        IndicatorField::Category => state.category().label().to_string(),
        IndicatorField::Positive => if state.positive { "Yes" } else { "No" }.to_string(),
        IndicatorField::NumberPercent => {
            if state.number_percent { "Yes" } else { "No" }.to_string()
        }
        IndicatorField::Name => state.name.clone(),
        IndicatorField::Code => state.code.clone(),
        IndicatorField::ApiUrl => state.api_url.clone(),
        IndicatorField::Dataset => state.dataset.clone(),
        IndicatorField::Proxy => state.proxy.clone(),
        IndicatorField::Source => state.source.clone(),
        IndicatorField::Notes => state.notes.clone(),
        IndicatorField::Year(country) => {
            state.years.get(&country).cloned().unwrap_or_default()
        }
        IndicatorField::Slot(country) => state
            .slots
            .get(&country)
            .copied()
            .flatten()
            .map_or_else(|| "-".to_string(), |slot| slot.label().to_string()),
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
