use ratatui::style::Color;

pub const fn scroll_offset(
    total_rows: usize,
    max_visible_rows: usize,
    selected_index: usize,
) -> usize {
    if total_rows <= max_visible_rows {
        return 0;
    }

    if selected_index >= max_visible_rows {
        return selected_index.saturating_sub(max_visible_rows) + 1;
    }

    selected_index
}

// Red-white-blue diverging scale anchors.
const RED: (f64, f64, f64) = (178.0, 24.0, 43.0);
const WHITE: (f64, f64, f64) = (247.0, 247.0, 247.0);
const BLUE: (f64, f64, f64) = (33.0, 102.0, 172.0);

/// Background color for a table cell holding a diverging standardized
/// value in [-100, 100]: deep red at -100, neutral at 0, deep blue at 100.
pub fn diverging_color(value: f64) -> Color {
    let t = ((value + 100.0) / 200.0).clamp(0.0, 1.0);
    let (from, to, local) = if t < 0.5 {
        (RED, WHITE, t * 2.0)
    } else {
        (BLUE, WHITE, (1.0 - t) * 2.0)
    };
    let mix = |a: f64, b: f64| -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (a + (b - a) * local).round().clamp(0.0, 255.0) as u8
        }
    };
    Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Readable text color against a diverging background: light text on the
/// saturated ends, dark text near the neutral middle.
pub fn diverging_text_color(value: f64) -> Color {
    if value.abs() > 55.0 {
        Color::White
    } else {
        Color::Black
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_offset_tracks_selection() {
        assert_eq!(scroll_offset(3, 10, 2), 0);
        assert_eq!(scroll_offset(20, 10, 4), 4);
        assert_eq!(scroll_offset(20, 10, 15), 6);
    }

    #[test]
    fn diverging_scale_hits_its_anchors() {
        assert_eq!(diverging_color(-100.0), Color::Rgb(178, 24, 43));
        assert_eq!(diverging_color(0.0), Color::Rgb(247, 247, 247));
        assert_eq!(diverging_color(100.0), Color::Rgb(33, 102, 172));
        // Out-of-range values clamp to the ends.
        assert_eq!(diverging_color(-250.0), diverging_color(-100.0));
    }

    #[test]
    fn text_color_flips_on_saturated_cells() {
        assert_eq!(diverging_text_color(-90.0), Color::White);
        assert_eq!(diverging_text_color(10.0), Color::Black);
        assert_eq!(diverging_text_color(90.0), Color::White);
    }
}
