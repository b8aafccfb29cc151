use kurbo::{Point, Rect};

/// Cumulative history of replayed positions, one point per processed frame.
/// Append-only; the full history is kept for the run so the viewport fit
/// always covers everything drawn so far.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: Vec<Point>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Min/max extents over every point so far. None while empty.
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.points.first()?;
        let mut r = Rect::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            r.x0 = r.x0.min(p.x);
            r.x1 = r.x1.max(p.x);
            r.y0 = r.y0.min(p.y);
            r.y1 = r.y1.max(p.y);
        }
        Some(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_one_point_per_push() {
        let mut trail = Trail::new();
        for i in 0..5 {
            trail.push(Point::new(i as f64, 0.0));
            assert_eq!(trail.len(), i + 1);
        }
    }

    #[test]
    fn bounds_cover_all_points() {
        let mut trail = Trail::new();
        trail.push(Point::new(0.0, 0.0));
        trail.push(Point::new(10.0, 0.0));
        trail.push(Point::new(10.0, 10.0));
        let b = trail.bounds().unwrap();
        assert_eq!((b.x0, b.x1, b.y0, b.y1), (0.0, 10.0, 0.0, 10.0));
    }

    #[test]
    fn single_point_bounds_are_degenerate() {
        let mut trail = Trail::new();
        trail.push(Point::new(3.0, -4.0));
        let b = trail.bounds().unwrap();
        assert_eq!((b.x0, b.x1, b.y0, b.y1), (3.0, 3.0, -4.0, -4.0));
    }

    #[test]
    fn empty_has_no_bounds() {
        assert!(Trail::new().bounds().is_none());
    }
}
