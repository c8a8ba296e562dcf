use super::filter::{FilteredView, SeriesKey};
use crate::domain::series_color;
use ratatui::style::Color;
use std::f64::consts::PI;

/// Standardized values live on a fixed 0–100 scale; the radar never
/// rescales to the data.
pub const DOMAIN_MAX: f64 = 100.0;
/// Concentric reference rings.
pub const RING_LEVELS: usize = 10;
/// Axis spokes extend past the outermost ring.
pub const AXIS_OVERSHOOT: f64 = 1.1;
/// Axis titles anchor a little further out than the spokes.
pub const LABEL_ANCHOR: f64 = 1.2;

/// Angle of axis `index` out of `count`, radians, measured so the first
/// axis points straight up and the rest proceed clockwise.
pub fn axis_angle(index: usize, count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let fraction = index as f64 / count as f64;
    2.0 * PI * fraction - PI / 2.0
}

/// The radar's frame in canvas coordinates (y grows upward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarFrame {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl RadarFrame {
    pub const fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Maps a standardized value along an axis angle onto the canvas.
    /// Values are clamped into the domain so bad data cannot escape the
    /// frame.
    pub fn point(&self, angle: f64, standardized: f64) -> (f64, f64) {
        let rr = self.radius * (standardized.clamp(0.0, DOMAIN_MAX) / DOMAIN_MAX);
        (
            self.center_x + angle.cos() * rr,
            self.center_y - angle.sin() * rr,
        )
    }

    /// A point at `scale` times the full radius along an axis.
    pub fn rim_point(&self, angle: f64, scale: f64) -> (f64, f64) {
        (
            self.center_x + angle.cos() * self.radius * scale,
            self.center_y - angle.sin() * self.radius * scale,
        )
    }

    /// Radius of reference ring `level` (1-based).
    pub fn ring_radius(&self, level: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let fraction = level as f64 / RING_LEVELS as f64;
        self.radius * fraction
    }
}

/// One plotted data point: an axis position plus the record behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub axis_index: usize,
    pub indicator: String,
    pub standardized: f64,
    pub x: f64,
    pub y: f64,
}

/// A series' polygon: vertices in axis order, with gaps where the series
/// has no record for an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPolygon {
    pub key: SeriesKey,
    pub color: Color,
    pub vertices: Vec<Vertex>,
}

impl SeriesPolygon {
    /// Outline segments for the closed polygon. A single vertex yields no
    /// segments; two vertices yield one (not a degenerate loop).
    pub fn outline_segments(&self) -> Vec<((f64, f64), (f64, f64))> {
        match self.vertices.len() {
            0 | 1 => Vec::new(),
            2 => vec![(
                (self.vertices[0].x, self.vertices[0].y),
                (self.vertices[1].x, self.vertices[1].y),
            )],
            n => (0..n)
                .map(|i| {
                    let a = &self.vertices[i];
                    let b = &self.vertices[(i + 1) % n];
                    ((a.x, a.y), (b.x, b.y))
                })
                .collect(),
        }
    }

    /// The outline truncated to `progress` (0..=1) of its total perimeter,
    /// drawing the stroke-reveal animation. The final partial segment is
    /// interpolated rather than dropped.
    pub fn partial_outline(&self, progress: f64) -> Vec<((f64, f64), (f64, f64))> {
        let segments = self.outline_segments();
        let progress = progress.clamp(0.0, 1.0);
        if progress >= 1.0 {
            return segments;
        }
        let total: f64 = segments.iter().map(|(a, b)| distance(*a, *b)).sum();
        if total <= f64::EPSILON {
            return Vec::new();
        }

        let mut budget = total * progress;
        let mut drawn = Vec::new();
        for (a, b) in segments {
            let length = distance(a, b);
            if length <= budget {
                drawn.push((a, b));
                budget -= length;
            } else {
                if budget > f64::EPSILON {
                    let t = budget / length;
                    let end = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
                    drawn.push((a, end));
                }
                break;
            }
        }
        drawn
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Builds one polygon per visible series. Axis order follows the view's
/// indicator list; a missing record leaves a gap, never a zero vertex.
pub fn build_polygons(view: &FilteredView, frame: &RadarFrame) -> Vec<SeriesPolygon> {
    let axis_count = view.indicators.len();
    view.series
        .iter()
        .map(|data| {
            let vertices = view
                .indicators
                .iter()
                .enumerate()
                .filter_map(|(axis_index, indicator)| {
                    let record = data.record_for(indicator)?;
                    let angle = axis_angle(axis_index, axis_count);
                    let (x, y) = frame.point(angle, record.standardized);
                    Some(Vertex {
                        axis_index,
                        indicator: indicator.clone(),
                        standardized: record.standardized,
                        x,
                        y,
                    })
                })
                .collect();
            SeriesPolygon {
                key: data.key,
                color: series_color(data.key.series, data.key.slot),
                vertices,
            }
        })
        .collect()
}

/// Word-wraps an axis title to `width` columns. Words longer than the
/// width get a line of their own, unbroken.
pub fn wrap_label(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, CategoryFilter, Country, YearSlot};
    use crate::scorecard::filter::{filter_view, Selection, SortMode};
    use crate::scorecard::store::{fixtures::row, Dataset};

    const EPS: f64 = 1e-9;

    fn frame() -> RadarFrame {
        RadarFrame::new(0.0, 0.0, 100.0)
    }

    fn view_with(rows: Vec<crate::api::models::ObservationRow>) -> FilteredView {
        let (dataset, _) = Dataset::from_rows(rows);
        let mut selection = Selection::new();
        selection.toggle_country(Country::India);
        selection.toggle_slot(Country::India, YearSlot::First);
        filter_view(
            &dataset,
            &selection,
            CategoryFilter::Single(Category::Vision),
            SortMode::ByYearSlot,
        )
    }

    #[test]
    fn axes_divide_the_circle_evenly_starting_at_top() {
        assert!((axis_angle(0, 4) - (-PI / 2.0)).abs() < EPS);
        let step = axis_angle(1, 4) - axis_angle(0, 4);
        for i in 1..4 {
            let gap = axis_angle(i, 4) - axis_angle(i - 1, 4);
            assert!((gap - step).abs() < EPS);
        }
        assert!((step - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn point_radius_is_proportional_to_value() {
        let frame = frame();
        let (x, y) = frame.point(-PI / 2.0, 50.0);
        // Straight up at half radius: canvas y rises.
        assert!(x.abs() < EPS);
        assert!((y - 50.0).abs() < EPS);

        let (x, y) = frame.point(0.0, 100.0);
        assert!((x - 100.0).abs() < EPS);
        assert!(y.abs() < EPS);

        // Out-of-domain values clamp instead of escaping the frame.
        let (x, _) = frame.point(0.0, 250.0);
        assert!((x - 100.0).abs() < EPS);
    }

    #[test]
    fn rings_and_rim_scale_from_the_same_radius() {
        let frame = frame();
        assert!((frame.ring_radius(RING_LEVELS) - frame.radius).abs() < EPS);
        assert!((frame.ring_radius(1) - 10.0).abs() < EPS);
        let (x, _) = frame.rim_point(0.0, AXIS_OVERSHOOT);
        assert!((x - 110.0).abs() < EPS);
    }

    #[test]
    fn missing_axis_leaves_a_gap_not_a_zero() {
        let view = view_with(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "Nepal", 1, "Literacy", Some(40.0)),
        ]);
        // Nepal is not selected, but its indicator still shapes the axes
        // only when its series is included; here axes come from India plus
        // the aggregate union, so only GDP.
        assert_eq!(view.indicators, vec!["GDP".to_string()]);

        let view = view_with(vec![
            row(1, "Vision", "India", 1, "GDP", Some(80.0)),
            row(2, "Vision", "South Asia Region", 1, "Literacy", Some(40.0)),
        ]);
        assert_eq!(view.indicators.len(), 2);
        let polygons = build_polygons(&view, &frame());
        let india = polygons
            .iter()
            .find(|polygon| !polygon.key.series.is_aggregate())
            .expect("india polygon");
        // One vertex only: no synthetic zero on the Literacy axis.
        assert_eq!(india.vertices.len(), 1);
        assert_eq!(india.vertices[0].indicator, "GDP");
    }

    #[test]
    fn outline_closes_and_partial_truncates_by_length() {
        let polygon = SeriesPolygon {
            key: SeriesKey::new(
                crate::domain::Series::Country(Country::India),
                YearSlot::First,
            ),
            color: Color::Red,
            vertices: vec![
                Vertex {
                    axis_index: 0,
                    indicator: "a".to_string(),
                    standardized: 0.0,
                    x: 0.0,
                    y: 0.0,
                },
                Vertex {
                    axis_index: 1,
                    indicator: "b".to_string(),
                    standardized: 0.0,
                    x: 10.0,
                    y: 0.0,
                },
                Vertex {
                    axis_index: 2,
                    indicator: "c".to_string(),
                    standardized: 0.0,
                    x: 10.0,
                    y: 10.0,
                },
            ],
        };
        let full = polygon.outline_segments();
        assert_eq!(full.len(), 3);
        assert_eq!(full[2].1, (0.0, 0.0));

        let half = polygon.partial_outline(0.5);
        // Perimeter is 10 + 10 + sqrt(200); half the length ends partway
        // through the second segment.
        let total = 20.0 + 200.0_f64.sqrt();
        let drawn: f64 = half.iter().map(|(a, b)| distance(*a, *b)).sum();
        assert!((drawn - total / 2.0).abs() < 1e-6);
        assert_eq!(half.len(), 2);

        assert!(polygon.partial_outline(0.0).is_empty());
        assert_eq!(polygon.partial_outline(1.0).len(), 3);

        let pair = SeriesPolygon {
            vertices: polygon.vertices[..2].to_vec(),
            ..polygon.clone()
        };
        assert_eq!(pair.outline_segments().len(), 1);
        let lone = SeriesPolygon {
            vertices: polygon.vertices[..1].to_vec(),
            ..polygon
        };
        assert!(lone.outline_segments().is_empty());
    }

    #[test]
    fn wrap_label_respects_width() {
        assert_eq!(
            wrap_label("GDP per capita growth", 10),
            vec!["GDP per".to_string(), "capita".to_string(), "growth".to_string()]
        );
        assert_eq!(wrap_label("Electrification", 8), vec!["Electrification".to_string()]);
        assert_eq!(wrap_label("", 10), vec![String::new()]);
    }
}
