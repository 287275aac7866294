use serde::{Deserialize, Serialize};

/// A drawing-space coordinate. Y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn with_x(self, x: f64) -> Self {
        Point::new(x, self.y)
    }

    pub fn with_y(self, y: f64) -> Self {
        Point::new(self.x, y)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}
