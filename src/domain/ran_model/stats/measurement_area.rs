use serde::Serialize;

use crate::domain::ran_model::geometry::Point;

/// Axis-aligned sub-region of the service area in which clients are measured.
/// Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementArea {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl MeasurementArea {
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        MeasurementArea { x, y }
    }

    pub fn contains(&self, point: Point) -> bool {
        self.x.0 <= point.x && point.x <= self.x.1 && self.y.0 <= point.y && point.y <= self.y.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let area = MeasurementArea::new((0.0, 10.0), (-5.0, 5.0));

        assert!(area.contains(Point::new(0.0, -5.0)));
        assert!(area.contains(Point::new(10.0, 5.0)));
        assert!(!area.contains(Point::new(10.01, 0.0)));
        assert!(!area.contains(Point::new(3.0, -5.5)));
    }
}
