//! Plot plane points, the visible viewport and the intersection test used to cull isopleths.
use itertools::Itertools;

/// A point on the tephigram plot plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct XYCoords {
    /// Horizontal plot plane coordinate.
    pub x: f64,
    /// Vertical plot plane coordinate.
    pub y: f64,
}

impl XYCoords {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        XYCoords { x, y }
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: XYCoords) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// The visible extent of the plot plane.
///
/// The limits are kept as given by the drawing surface, so `x0` is the left edge and `x1` the
/// right edge of what is on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
    /// Bottom edge.
    pub y0: f64,
    /// Top edge.
    pub y1: f64,
}

impl Viewport {
    /// Create a viewport from its x and y limits.
    pub fn new(xlim: (f64, f64), ylim: (f64, f64)) -> Self {
        Viewport {
            x0: xlim.0,
            x1: xlim.1,
            y0: ylim.0,
            y1: ylim.1,
        }
    }

    /// Width of the viewport.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the viewport.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The middle of the viewport.
    #[inline]
    pub fn center(&self) -> XYCoords {
        XYCoords::new(
            self.x0 + self.width() * 0.5,
            self.y0 + self.height() * 0.5,
        )
    }

    /// The x position of a vertical line inset from the right edge by a fraction of the width.
    #[inline]
    pub fn gutter_x(&self, gutter: f64) -> f64 {
        self.x1 - self.width() * gutter
    }

    /// Is the point inside or on the edge of the viewport?
    pub fn contains(&self, pnt: XYCoords) -> bool {
        let (xmin, xmax, ymin, ymax) = self.ordered();
        pnt.x >= xmin && pnt.x <= xmax && pnt.y >= ymin && pnt.y <= ymax
    }

    fn ordered(&self) -> (f64, f64, f64, f64) {
        (
            self.x0.min(self.x1),
            self.x0.max(self.x1),
            self.y0.min(self.y1),
            self.y0.max(self.y1),
        )
    }
}

/// Does the segment from `p0` to `p1` touch the viewport?
///
/// Liang-Barsky clipping, the segment parameter range is narrowed against each edge in turn.
pub fn segment_intersects_rect(p0: XYCoords, p1: XYCoords, rect: &Viewport) -> bool {
    let (xmin, xmax, ymin, ymax) = rect.ordered();
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;

    for &(p, q) in &[
        (-dx, p0.x - xmin),
        (dx, xmax - p0.x),
        (-dy, p0.y - ymin),
        (dy, ymax - p0.y),
    ] {
        if p == 0.0 {
            // Parallel to this edge and outside of it.
            if q < 0.0 {
                return false;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return false;
                } else if r > t0 {
                    t0 = r;
                }
            } else if r < t0 {
                return false;
            } else if r < t1 {
                t1 = r;
            }
        }
    }

    true
}

/// Does any part of the polyline fall inside the viewport?
pub fn polyline_intersects_rect(points: &[XYCoords], rect: &Viewport) -> bool {
    match points.len() {
        0 => false,
        1 => rect.contains(points[0]),
        _ => points
            .iter()
            .tuple_windows::<(_, _)>()
            .any(|(p0, p1)| segment_intersects_rect(*p0, *p1, rect)),
    }
}
