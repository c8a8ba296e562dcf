//! Collision-free placement for data-point labels around the radar.
//!
//! The canvas is divided into a uniform grid; labels claim rectangular
//! blocks of cells. Markers furthest from the center place first, since
//! outer labels have the fewest usable cells near them.

/// How far beyond a marker's own radius its ideal label anchor sits,
/// along the marker's axis angle.
const IDEAL_OVERSHOOT: f64 = 1.2;
/// Weight of the ideal-anchor term relative to the marker term.
const IDEAL_WEIGHT: f64 = 0.5;

/// The drawable region, in the same coordinates as the markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A data point that wants a label, with the label's box size in the same
/// units as the bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    /// Axis angle of the marker, radians; directs the ideal anchor.
    pub angle: f64,
    pub label_width: f64,
    pub label_height: f64,
}

/// Grid resolution. Cell size derives from the bounds, scaled
/// independently per axis, so wide-and-short regions keep usable rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub cols: usize,
    pub rows: usize,
}

impl GridSpec {
    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }
}

/// A placed label: top-left corner plus the leader line from the marker
/// to the label's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub leader: ((f64, f64), (f64, f64)),
}

/// An axis-aligned box already taken by other chrome (axis titles and the
/// like); its cells are pre-occupied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockedBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

struct Grid {
    cols: usize,
    rows: usize,
    cell_w: f64,
    cell_h: f64,
    origin_x: f64,
    origin_y: f64,
    occupied: Vec<bool>,
}

impl Grid {
    fn new(bounds: Bounds, spec: GridSpec) -> Option<Self> {
        if spec.cols == 0 || spec.rows == 0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        Some(Self {
            cols: spec.cols,
            rows: spec.rows,
            cell_w: bounds.width / spec.cols as f64,
            cell_h: bounds.height / spec.rows as f64,
            origin_x: bounds.x,
            origin_y: bounds.y,
            occupied: vec![false; spec.cols * spec.rows],
        })
    }

    fn is_free(&self, col: usize, row: usize, span_cols: usize, span_rows: usize) -> bool {
        for r in row..row + span_rows {
            for c in col..col + span_cols {
                if self.occupied[r * self.cols + c] {
                    return false;
                }
            }
        }
        true
    }

    fn claim(&mut self, col: usize, row: usize, span_cols: usize, span_rows: usize) {
        for r in row..row + span_rows {
            for c in col..col + span_cols {
                self.occupied[r * self.cols + c] = true;
            }
        }
    }

    /// Cells a label of the given size spans, rounding up.
    fn span(&self, width: f64, height: f64) -> (usize, usize) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cols = ((width / self.cell_w).ceil() as usize).max(1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rows = ((height / self.cell_h).ceil() as usize).max(1);
        (cols, rows)
    }

    fn cell_origin(&self, col: usize, row: usize) -> (f64, f64) {
        #[allow(clippy::cast_precision_loss)]
        (
            self.origin_x + col as f64 * self.cell_w,
            self.origin_y + row as f64 * self.cell_h,
        )
    }

    fn block(&mut self, boxed: BlockedBox) {
        let col_lo = self.col_of(boxed.x);
        let col_hi = self.col_of(boxed.x + boxed.width);
        let row_lo = self.row_of(boxed.y);
        let row_hi = self.row_of(boxed.y + boxed.height);
        for row in row_lo..=row_hi.min(self.rows - 1) {
            for col in col_lo..=col_hi.min(self.cols - 1) {
                self.occupied[row * self.cols + col] = true;
            }
        }
    }

    fn col_of(&self, x: f64) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let col = (((x - self.origin_x) / self.cell_w).floor().max(0.0)) as usize;
        col.min(self.cols - 1)
    }

    fn row_of(&self, y: f64) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = (((y - self.origin_y) / self.cell_h).floor().max(0.0)) as usize;
        row.min(self.rows - 1)
    }
}

fn dist2(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)
}

/// Places one label per marker, or `None` where no free block remains.
///
/// Results line up with the input markers. Processing order is by
/// descending distance from `center`; each label takes the free block
/// minimizing
/// `d²(candidate, marker) + 0.5·d²(candidate, ideal)`, where the ideal
/// point sits 20% further out than the marker along its axis.
pub fn place_labels(
    markers: &[Marker],
    bounds: Bounds,
    spec: GridSpec,
    center: (f64, f64),
    blocked: &[BlockedBox],
) -> Vec<Option<Placement>> {
    let Some(mut grid) = Grid::new(bounds, spec) else {
        return vec![None; markers.len()];
    };
    for boxed in blocked {
        grid.block(*boxed);
    }

    let mut order: Vec<usize> = (0..markers.len()).collect();
    order.sort_by(|&a, &b| {
        let da = dist2((markers[a].x, markers[a].y), center);
        let db = dist2((markers[b].x, markers[b].y), center);
        db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut placements = vec![None; markers.len()];
    for index in order {
        let marker = &markers[index];
        let (span_cols, span_rows) = grid.span(marker.label_width, marker.label_height);
        if span_cols > grid.cols || span_rows > grid.rows {
            continue;
        }

        let marker_radius = dist2((marker.x, marker.y), center).sqrt();
        let ideal_radius = marker_radius * IDEAL_OVERSHOOT;
        let ideal = (
            center.0 + marker.angle.cos() * ideal_radius,
            center.1 + marker.angle.sin() * ideal_radius,
        );

        let mut best: Option<(f64, usize, usize)> = None;
        for row in 0..=grid.rows - span_rows {
            for col in 0..=grid.cols - span_cols {
                if !grid.is_free(col, row, span_cols, span_rows) {
                    continue;
                }
                let (x, y) = grid.cell_origin(col, row);
                let candidate = (
                    x + marker.label_width / 2.0,
                    y + marker.label_height / 2.0,
                );
                let score = dist2(candidate, (marker.x, marker.y))
                    + IDEAL_WEIGHT * dist2(candidate, ideal);
                if best.is_none_or(|(s, ..)| score < s) {
                    best = Some((score, col, row));
                }
            }
        }

        if let Some((_, col, row)) = best {
            grid.claim(col, row, span_cols, span_rows);
            let (x, y) = grid.cell_origin(col, row);
            let label_center = (
                x + marker.label_width / 2.0,
                y + marker.label_height / 2.0,
            );
            placements[index] = Some(Placement {
                x,
                y,
                leader: ((marker.x, marker.y), label_center),
            });
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: (&Placement, &Marker), b: (&Placement, &Marker)) -> bool {
        let (pa, ma) = a;
        let (pb, mb) = b;
        pa.x < pb.x + mb.label_width
            && pb.x < pa.x + ma.label_width
            && pa.y < pb.y + mb.label_height
            && pb.y < pa.y + ma.label_height
    }

    fn bounds() -> Bounds {
        Bounds::new(0.0, 0.0, 120.0, 60.0)
    }

    // Small multiplicative congruential generator, enough to scatter
    // deterministic marker clouds for the density sweep.
    struct Lcg(u64);

    impl Lcg {
        fn next_unit(&mut self) -> f64 {
            self.0 = self.0.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            #[allow(clippy::cast_precision_loss)]
            let mantissa = (self.0 >> 11) as f64;
            mantissa / (1u64 << 53) as f64
        }
    }

    fn scattered_markers(count: usize, seed: u64) -> Vec<Marker> {
        let mut rng = Lcg(seed);
        (0..count)
            .map(|_| {
                let x = 10.0 + rng.next_unit() * 100.0;
                let y = 5.0 + rng.next_unit() * 50.0;
                Marker {
                    x,
                    y,
                    angle: (y - 30.0).atan2(x - 60.0),
                    label_width: 12.0,
                    label_height: 2.0,
                }
            })
            .collect()
    }

    #[test]
    fn placed_labels_never_overlap_across_densities() {
        for &count in &[3usize, 8, 16, 32] {
            for seed in 1..=4u64 {
                let markers = scattered_markers(count, seed * 977);
                let placements = place_labels(
                    &markers,
                    bounds(),
                    GridSpec::new(40, 20),
                    (60.0, 30.0),
                    &[],
                );
                assert_eq!(placements.len(), markers.len());

                let placed: Vec<(&Placement, &Marker)> = placements
                    .iter()
                    .zip(&markers)
                    .filter_map(|(placement, marker)| {
                        placement.as_ref().map(|p| (p, marker))
                    })
                    .collect();
                for i in 0..placed.len() {
                    for j in i + 1..placed.len() {
                        assert!(
                            !overlaps(placed[i], placed[j]),
                            "labels {i} and {j} overlap (count {count}, seed {seed})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn lone_marker_gets_a_nearby_label_with_leader() {
        let marker = Marker {
            x: 90.0,
            y: 15.0,
            angle: 0.5,
            label_width: 10.0,
            label_height: 2.0,
        };
        let placements = place_labels(
            std::slice::from_ref(&marker),
            bounds(),
            GridSpec::new(40, 20),
            (60.0, 30.0),
            &[],
        );
        let placement = placements[0].expect("placed");
        let center = (
            placement.x + marker.label_width / 2.0,
            placement.y + marker.label_height / 2.0,
        );
        assert!(dist2(center, (marker.x, marker.y)).sqrt() < 20.0);
        assert_eq!(placement.leader.0, (marker.x, marker.y));
        assert_eq!(placement.leader.1, center);
    }

    #[test]
    fn outer_markers_place_before_inner_ones() {
        // Two markers wanting the same corner; the grid only fits one
        // label there, and the outer marker must win it.
        let outer = Marker {
            x: 118.0,
            y: 2.0,
            angle: 0.0,
            label_width: 120.0,
            label_height: 60.0,
        };
        let inner = Marker {
            x: 62.0,
            y: 31.0,
            angle: 0.0,
            label_width: 120.0,
            label_height: 60.0,
        };
        let placements = place_labels(
            &[inner.clone(), outer],
            bounds(),
            GridSpec::new(10, 10),
            (60.0, 30.0),
            &[],
        );
        // Both labels span the whole grid, so only one can place.
        assert!(placements[0].is_none());
        assert!(placements[1].is_some());
    }

    #[test]
    fn full_grid_yields_none() {
        let markers = scattered_markers(3, 7);
        let blocked = [BlockedBox {
            x: 0.0,
            y: 0.0,
            width: 120.0,
            height: 60.0,
        }];
        let placements = place_labels(
            &markers,
            bounds(),
            GridSpec::new(20, 10),
            (60.0, 30.0),
            &blocked,
        );
        assert!(placements.iter().all(Option::is_none));
    }

    #[test]
    fn blocked_boxes_push_labels_aside() {
        let marker = Marker {
            x: 20.0,
            y: 10.0,
            angle: std::f64::consts::PI,
            label_width: 12.0,
            label_height: 2.0,
        };
        let blocked = [BlockedBox {
            x: 0.0,
            y: 0.0,
            width: 60.0,
            height: 60.0,
        }];
        let placements = place_labels(
            std::slice::from_ref(&marker),
            bounds(),
            GridSpec::new(40, 20),
            (60.0, 30.0),
            &blocked,
        );
        let placement = placements[0].expect("placed");
        // The whole left half is taken; the label lands on the right.
        assert!(placement.x >= 60.0);
    }

    #[test]
    fn oversized_label_is_skipped() {
        let marker = Marker {
            x: 60.0,
            y: 30.0,
            angle: 0.0,
            label_width: 500.0,
            label_height: 2.0,
        };
        let placements = place_labels(
            std::slice::from_ref(&marker),
            bounds(),
            GridSpec::new(10, 10),
            (60.0, 30.0),
            &[],
        );
        assert!(placements[0].is_none());
    }
}
