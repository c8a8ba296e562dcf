use crate::app::App;
use crate::domain::dimmed_color;
use crate::scorecard::layout::{place_labels, BlockedBox, Bounds, GridSpec, Marker, Placement};
use crate::scorecard::radar::{
    axis_angle, build_polygons, wrap_label, RadarFrame, SeriesPolygon, AXIS_OVERSHOOT,
    LABEL_ANCHOR, RING_LEVELS,
};
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::time::Instant;

const AXIS_LABEL_WIDTH: usize = 14;

pub fn render_scorecard_radar(app: &App, f: &mut Frame<'_>, area: Rect, now: Instant) {
    let block = Block::default()
        .title(format!("Scorecard — {}", app.category_filter().label()))
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 20 || inner.height < 10 {
        return;
    }

    if app.view.is_empty() {
        let paragraph = Paragraph::new("Select a country and a year slot to draw the chart")
            .alignment(ratatui::layout::Alignment::Center)
            .style(ratatui::style::Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    let width = f64::from(inner.width);
    // Terminal cells are roughly twice as tall as wide; stretching the
    // vertical bounds keeps the chart visually round.
    let height = f64::from(inner.height) * 2.0;
    let frame = RadarFrame::new(width / 2.0, height / 2.0, width.min(height) / 2.0 * 0.72);
    let polygons = build_polygons(&app.view, &frame);
    let axis_count = app.view.indicators.len();
    let labels = data_point_labels(app, &frame, &polygons, width, height);

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                for level in 1..=RING_LEVELS {
                    ctx.draw(&Circle {
                        x: frame.center_x,
                        y: frame.center_y,
                        radius: frame.ring_radius(level),
                        color: Color::DarkGray,
                    });
                }

                for index in 0..axis_count {
                    let angle = axis_angle(index, axis_count);
                    let (x, y) = frame.rim_point(angle, AXIS_OVERSHOOT);
                    ctx.draw(&CanvasLine {
                        x1: frame.center_x,
                        y1: frame.center_y,
                        x2: x,
                        y2: y,
                        color: Color::DarkGray,
                    });
                }

                for (index, indicator) in app.view.indicators.iter().enumerate() {
                    let angle = axis_angle(index, axis_count);
                    let (x, y) = frame.rim_point(angle, LABEL_ANCHOR);
                    for (line_index, line) in
                        wrap_label(indicator, AXIS_LABEL_WIDTH).into_iter().enumerate()
                    {
                        let offset = line_index as f64 * 2.0;
                        let text_x = if angle.cos() < -0.1 {
                            x - line.chars().count() as f64
                        } else {
                            x
                        };
                        ctx.print(
                            text_x,
                            y - offset,
                            TextLine::styled(
                                line,
                                ratatui::style::Style::default().fg(Color::Gray),
                            ),
                        );
                    }
                }

                for polygon in &polygons {
                    let color = series_render_color(app, polygon);
                    let animation = app.animations.get(polygon.key);

                    let fill = animation.fill_opacity(now);
                    if fill > 0.0 {
                        // No alpha on a terminal canvas; a faded spoke fan
                        // stands in for the polygon fill.
                        let fill_color = faded(color, fill / crate::app::animation::FILL_OPACITY);
                        for vertex in &polygon.vertices {
                            ctx.draw(&CanvasLine {
                                x1: frame.center_x,
                                y1: frame.center_y,
                                x2: vertex.x,
                                y2: vertex.y,
                                color: fill_color,
                            });
                        }
                    }

                    for (from, to) in polygon.partial_outline(animation.reveal_progress(now)) {
                        ctx.draw(&CanvasLine {
                            x1: from.0,
                            y1: from.1,
                            x2: to.0,
                            y2: to.1,
                            color,
                        });
                    }

                    for vertex in &polygon.vertices {
                        ctx.draw(&Circle {
                            x: vertex.x,
                            y: vertex.y,
                            radius: 0.6,
                            color,
                        });
                    }
                }

                for (text, placement, color) in &labels {
                    ctx.draw(&CanvasLine {
                        x1: placement.leader.0 .0,
                        y1: placement.leader.0 .1,
                        x2: placement.leader.1 .0,
                        y2: placement.leader.1 .1,
                        color: Color::DarkGray,
                    });
                    ctx.print(
                        placement.x,
                        placement.y,
                        TextLine::styled(
                            text.clone(),
                            ratatui::style::Style::default().fg(*color),
                        ),
                    );
                }
            })
            .x_bounds([0.0, width])
            .y_bounds([0.0, height]),
        inner,
    );
}

fn series_render_color(app: &App, polygon: &SeriesPolygon) -> Color {
    match &app.highlight {
        Some(highlight) if highlight.key != polygon.key => dimmed_color(polygon.color),
        _ => polygon.color,
    }
}

fn faded(color: Color, amount: f64) -> Color {
    let Color::Rgb(r, g, b) = color else {
        return Color::DarkGray;
    };
    let scale = |channel: u8| -> u8 {
        let scaled = f64::from(channel) * amount.clamp(0.0, 1.0) * 0.5;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            scaled.round().clamp(0.0, 255.0) as u8
        }
    };
    Color::Rgb(scale(r), scale(g), scale(b))
}

type PlacedLabel = (String, Placement, Color);

/// Value labels for every visible data point, collision-free. Labels are
/// shown for the whole chart when toggled on, or for the highlighted
/// series alone.
fn data_point_labels(
    app: &App,
    frame: &RadarFrame,
    polygons: &[SeriesPolygon],
    width: f64,
    height: f64,
) -> Vec<PlacedLabel> {
    if !app.show_all_labels && app.highlight.is_none() {
        return Vec::new();
    }

    let center = (frame.center_x, frame.center_y);
    let axis_count = app.view.indicators.len();
    let mut markers = Vec::new();
    let mut texts = Vec::new();

    for polygon in polygons {
        if !app.show_all_labels {
            match &app.highlight {
                Some(highlight) if highlight.key == polygon.key => {}
                _ => continue,
            }
        }
        let color = series_render_color(app, polygon);
        for vertex in &polygon.vertices {
            let text = format!("{:.0}", vertex.standardized);
            markers.push(Marker {
                x: vertex.x,
                y: vertex.y,
                angle: (vertex.y - center.1).atan2(vertex.x - center.0),
                label_width: text.chars().count() as f64 + 1.0,
                label_height: 2.0,
            });
            texts.push((text, color));
        }
    }

    // Axis titles already own their corner of the canvas.
    let blocked: Vec<BlockedBox> = (0..axis_count)
        .map(|index| {
            let angle = axis_angle(index, axis_count);
            let (x, y) = frame.rim_point(angle, LABEL_ANCHOR);
            BlockedBox {
                x: x - AXIS_LABEL_WIDTH as f64 / 2.0,
                y: y - 2.0,
                width: AXIS_LABEL_WIDTH as f64,
                height: 4.0,
            }
        })
        .collect();

    let bounds = Bounds::new(0.0, 0.0, width, height);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let spec = GridSpec::new((width / 2.0) as usize, (height / 2.0) as usize);
    let placements = place_labels(&markers, bounds, spec, center, &blocked);

    texts
        .into_iter()
        .zip(markers.iter().zip(placements))
        .map(|((text, color), (marker, placement))| {
            // A label the engine could not fit stays beside its marker.
            let placement = placement.unwrap_or(Placement {
                x: marker.x + 1.5,
                y: marker.y + 1.5,
                leader: ((marker.x, marker.y), (marker.x + 1.5, marker.y + 1.5)),
            });
            (text, placement, color)
        })
        .collect()
}
