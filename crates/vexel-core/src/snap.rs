//! Edge/center snapping and neighbor gap measurements for move gestures.

use kurbo::{Point, Rect, Vec2};

/// Snap radius in pixels; divide by zoom for scene units.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Orientation of an alignment guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideAxis {
    /// A vertical line at a constant x.
    Vertical,
    /// A horizontal line at a constant y.
    Horizontal,
}

/// An alignment guide produced by a snap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGuide {
    pub axis: GuideAxis,
    pub position: f64,
}

/// Result of snapping a moving box against its neighbors.
#[derive(Debug, Clone, Default)]
pub struct SnapOutcome {
    /// Correction to add to the proposed position. Zero when nothing snapped.
    pub correction: Vec2,
    /// Guides to draw, at most one per axis.
    pub guides: Vec<SnapGuide>,
}

/// Snap the moving bounds against the edges and centers of other elements.
///
/// Each axis considers left/center/right (or top/middle/bottom) of the
/// moving box against the same three of every neighbor; when several
/// candidates fall inside the threshold the one encountered last wins.
pub fn snap_moving_bounds(moving: Rect, others: &[Rect], zoom: f64) -> SnapOutcome {
    let threshold = SNAP_THRESHOLD / zoom;
    let moving_xs = [moving.x0, moving.center().x, moving.x1];
    let moving_ys = [moving.y0, moving.center().y, moving.y1];

    let mut snap_x: Option<(f64, f64)> = None;
    let mut snap_y: Option<(f64, f64)> = None;

    for other in others {
        let other_xs = [other.x0, other.center().x, other.x1];
        let other_ys = [other.y0, other.center().y, other.y1];

        for &mx in &moving_xs {
            for &ox in &other_xs {
                if (mx - ox).abs() <= threshold {
                    snap_x = Some((ox - mx, ox));
                }
            }
        }
        for &my in &moving_ys {
            for &oy in &other_ys {
                if (my - oy).abs() <= threshold {
                    snap_y = Some((oy - my, oy));
                }
            }
        }
    }

    let mut outcome = SnapOutcome::default();
    if let Some((dx, guide_x)) = snap_x {
        outcome.correction.x = dx;
        outcome.guides.push(SnapGuide {
            axis: GuideAxis::Vertical,
            position: guide_x,
        });
    }
    if let Some((dy, guide_y)) = snap_y {
        outcome.correction.y = dy;
        outcome.guides.push(SnapGuide {
            axis: GuideAxis::Horizontal,
            position: guide_y,
        });
    }
    outcome
}

/// A measured gap between the moving selection and a neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapMeasurement {
    pub from: Point,
    pub to: Point,
    pub distance: f64,
}

/// Measure the gap to the nearest neighbor on each side of the moving
/// bounds. Only neighbors whose extent overlaps the moving box on the
/// perpendicular axis count; the measured segment sits at the middle of
/// the shared band.
pub fn gap_measurements(moving: Rect, others: &[Rect]) -> Vec<GapMeasurement> {
    let mut left: Option<GapMeasurement> = None;
    let mut right: Option<GapMeasurement> = None;
    let mut top: Option<GapMeasurement> = None;
    let mut bottom: Option<GapMeasurement> = None;

    for other in others {
        let band_y0 = moving.y0.max(other.y0);
        let band_y1 = moving.y1.min(other.y1);
        if band_y1 > band_y0 {
            let mid = (band_y0 + band_y1) / 2.0;
            if other.x1 <= moving.x0 {
                let gap = GapMeasurement {
                    from: Point::new(other.x1, mid),
                    to: Point::new(moving.x0, mid),
                    distance: moving.x0 - other.x1,
                };
                if left.is_none_or(|g| gap.distance < g.distance) {
                    left = Some(gap);
                }
            } else if other.x0 >= moving.x1 {
                let gap = GapMeasurement {
                    from: Point::new(moving.x1, mid),
                    to: Point::new(other.x0, mid),
                    distance: other.x0 - moving.x1,
                };
                if right.is_none_or(|g| gap.distance < g.distance) {
                    right = Some(gap);
                }
            }
        }

        let band_x0 = moving.x0.max(other.x0);
        let band_x1 = moving.x1.min(other.x1);
        if band_x1 > band_x0 {
            let mid = (band_x0 + band_x1) / 2.0;
            if other.y1 <= moving.y0 {
                let gap = GapMeasurement {
                    from: Point::new(mid, other.y1),
                    to: Point::new(mid, moving.y0),
                    distance: moving.y0 - other.y1,
                };
                if top.is_none_or(|g| gap.distance < g.distance) {
                    top = Some(gap);
                }
            } else if other.y0 >= moving.y1 {
                let gap = GapMeasurement {
                    from: Point::new(mid, moving.y1),
                    to: Point::new(mid, other.y0),
                    distance: other.y0 - moving.y1,
                };
                if bottom.is_none_or(|g| gap.distance < g.distance) {
                    bottom = Some(gap);
                }
            }
        }
    }

    [left, right, top, bottom].into_iter().flatten().collect()
}
