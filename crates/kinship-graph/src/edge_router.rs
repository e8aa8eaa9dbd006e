use crate::Vec2;
use crate::scene::{Rect, SceneEdgeKind};
use std::fmt::Write as _;

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// A degenerate curve that renders as a straight segment.
    pub fn line(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            control1: start,
            control2: end,
            end,
        }
    }

    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = self.start.x * mt3
            + 3.0 * self.control1.x * mt2 * t
            + 3.0 * self.control2.x * mt * t2
            + self.end.x * t3;
        let y = self.start.y * mt3
            + 3.0 * self.control1.y * mt2 * t
            + 3.0 * self.control2.y * mt * t2
            + self.end.y * t3;

        Vec2::new(x, y)
    }

    /// Minimum distance from `point` to the curve, by uniform sampling.
    ///
    /// `num_samples` trades accuracy for speed; 20-50 is plenty for hit testing.
    pub fn point_distance(&self, point: Vec2, num_samples: usize) -> f32 {
        let mut min_dist_sq = f32::INFINITY;
        let samples = num_samples.max(2);

        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let curve_point = self.sample(t);
            let dx = curve_point.x - point.x;
            let dy = curve_point.y - point.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < min_dist_sq {
                min_dist_sq = dist_sq;
            }
        }

        min_dist_sq.sqrt()
    }

    /// SVG path data (`M .. C ..`) for this curve.
    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        let _ = write!(
            path,
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        );
        path
    }
}

/// Computes link geometry between two node centers.
///
/// Parent-child links leave the parent frame on the side facing the child and
/// bend as a vertical S-curve through the midpoint between generations.
/// Couple links are straight segments between the facing frame borders.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRouter {
    /// Node frame size, centered on each position.
    pub frame: Vec2,
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self {
            frame: Vec2::new(160.0, 120.0),
        }
    }
}

impl EdgeRouter {
    pub fn new(frame: Vec2) -> Self {
        Self { frame }
    }

    /// Route a link of `kind` from `source` to `target` (both frame centers).
    /// Parent-child links must be passed as parent to child.
    pub fn route(&self, kind: SceneEdgeKind, source: Vec2, target: Vec2) -> CubicBezier {
        match kind {
            SceneEdgeKind::ParentChild => self.route_parent_child(source, target),
            SceneEdgeKind::Spouse | SceneEdgeKind::Sibling => self.route_straight(source, target),
        }
    }

    fn route_parent_child(&self, parent: Vec2, child: Vec2) -> CubicBezier {
        let half_h = self.frame.y / 2.0;
        let dir = if child.y >= parent.y { 1.0 } else { -1.0 };
        let start = Vec2::new(parent.x, parent.y + half_h * dir);
        let end = Vec2::new(child.x, child.y - half_h * dir);

        // Frames overlap vertically; fall back to a straight link.
        if (end.y - start.y) * dir <= 0.0 {
            return CubicBezier::line(parent, child);
        }

        let mid_y = (start.y + end.y) / 2.0;
        CubicBezier {
            start,
            control1: Vec2::new(start.x, mid_y),
            control2: Vec2::new(end.x, mid_y),
            end,
        }
    }

    fn route_straight(&self, source: Vec2, target: Vec2) -> CubicBezier {
        let start = self.calculate_anchor(self.frame_at(source), target);
        let end = self.calculate_anchor(self.frame_at(target), source);
        CubicBezier::line(start, end)
    }

    fn frame_at(&self, center: Vec2) -> Rect {
        Rect::from_center_size(center, self.frame)
    }

    /// Point where the ray from `rect`'s center toward `target_center` leaves `rect`.
    pub fn calculate_anchor(&self, rect: Rect, target_center: Vec2) -> Vec2 {
        let center = rect.center();
        let vec = Vec2::new(target_center.x - center.x, target_center.y - center.y);

        if vec.x * vec.x + vec.y * vec.y < 1.0 {
            return center;
        }

        let check_t = |t: f32, start: f32, dir: f32, min: f32, max: f32| -> Option<f32> {
            if t > 0.0 {
                let pos = start + t * dir;
                if pos >= min && pos <= max {
                    return Some(t);
                }
            }
            None
        };

        let mut t_min = f32::INFINITY;

        if vec.x.abs() > 0.001 {
            for side in [rect.min.x, rect.max.x] {
                let t = (side - center.x) / vec.x;
                if let Some(t) = check_t(t, center.y, vec.y, rect.min.y, rect.max.y) {
                    t_min = t_min.min(t);
                }
            }
        }

        if vec.y.abs() > 0.001 {
            for side in [rect.min.y, rect.max.y] {
                let t = (side - center.y) / vec.y;
                if let Some(t) = check_t(t, center.x, vec.x, rect.min.x, rect.max.x) {
                    t_min = t_min.min(t);
                }
            }
        }

        if t_min.is_infinite() {
            return center;
        }

        Vec2::new(center.x + vec.x * t_min, center.y + vec.y * t_min)
    }
}
