use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Point {
        Point { x: self.x + dx, y: self.y + dy }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Geometric region in which a base station is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub center: Point,
    pub radius: f64,
}

impl Coverage {
    pub fn new(center: Point, radius: f64) -> Self {
        Coverage { center, radius }
    }

    pub fn distance_to(&self, point: Point) -> f64 {
        self.center.distance_to(point)
    }

    /// The boundary belongs to the coverage.
    pub fn contains(&self, point: Point) -> bool {
        self.distance_to(point) <= self.radius
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[c=({:<4}, {:>4}), r={:>4}]", self.center.x, self.center.y, self.radius)
    }
}
