use kurbo::{Affine, Point, Rect};

use crate::core::Canvas;

/// Fraction of each axis range added as margin when fitting the trail.
const MARGIN_FRAC: f64 = 0.1;
/// Fixed pad added on top of the fractional margin, in world units.
const MARGIN_PAD: f64 = 10.0;

/// Visible world-coordinate window. Refitted every frame from the trail
/// extents; always encloses the full trail with margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Viewport {
    /// Initial window shown before the first frame.
    pub const DEFAULT: Self = Self {
        x_min: -10.0,
        x_max: 70.0,
        y_min: -10.0,
        y_max: 70.0,
    };

    /// Enclose `bounds` with a per-axis margin of
    /// `MARGIN_FRAC * range + MARGIN_PAD`. A degenerate range (single point)
    /// leaves the fixed pad, a 2*MARGIN_PAD wide window centered on it.
    pub fn fit(bounds: Rect) -> Self {
        let x_margin = MARGIN_FRAC * (bounds.x1 - bounds.x0) + MARGIN_PAD;
        let y_margin = MARGIN_FRAC * (bounds.y1 - bounds.y0) + MARGIN_PAD;
        Self {
            x_min: bounds.x0 - x_margin,
            x_max: bounds.x1 + x_margin,
            y_min: bounds.y0 - y_margin,
            y_max: bounds.y1 + y_margin,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// World → pixel transform for `canvas`. Axes scale independently; y is
    /// flipped so world +y points up on screen.
    pub fn to_canvas(&self, canvas: Canvas) -> Affine {
        let sx = f64::from(canvas.width) / self.width();
        let sy = f64::from(canvas.height) / self.height();
        Affine::new([sx, 0.0, 0.0, -sy, -self.x_min * sx, self.y_max * sy])
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_window_is_20_units_centered() {
        let vp = Viewport::fit(Rect::new(5.0, 3.0, 5.0, 3.0));
        assert_eq!(vp.width(), 20.0);
        assert_eq!(vp.height(), 20.0);
        assert_eq!((vp.x_min + vp.x_max) / 2.0, 5.0);
        assert_eq!((vp.y_min + vp.y_max) / 2.0, 3.0);
    }

    #[test]
    fn margin_is_tenth_of_range_plus_pad() {
        // 10-unit range on both axes -> margin 0.1*10 + 10 = 11.
        let vp = Viewport::fit(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!((vp.x_min, vp.x_max), (-11.0, 21.0));
        assert_eq!((vp.y_min, vp.y_max), (-11.0, 21.0));
    }

    #[test]
    fn fit_always_encloses_bounds() {
        let bounds = Rect::new(-3.0, 2.0, 40.0, 17.0);
        let vp = Viewport::fit(bounds);
        assert!(vp.contains(Point::new(bounds.x0, bounds.y0)));
        assert!(vp.contains(Point::new(bounds.x1, bounds.y1)));
    }

    #[test]
    fn default_matches_initial_window() {
        let vp = Viewport::default();
        assert_eq!((vp.x_min, vp.x_max), (-10.0, 70.0));
        assert_eq!((vp.y_min, vp.y_max), (-10.0, 70.0));
    }

    #[test]
    fn to_canvas_maps_corners() {
        let vp = Viewport {
            x_min: 0.0,
            x_max: 10.0,
            y_min: 0.0,
            y_max: 10.0,
        };
        let canvas = Canvas {
            width: 100,
            height: 100,
        };
        let t = vp.to_canvas(canvas);
        // World origin lands at the bottom-left pixel corner.
        let p = t * Point::new(0.0, 0.0);
        assert!((p.x - 0.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
        let q = t * Point::new(10.0, 10.0);
        assert!((q.x - 100.0).abs() < 1e-9);
        assert!((q.y - 0.0).abs() < 1e-9);
    }
}
