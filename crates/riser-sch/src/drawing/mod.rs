//! Abstract drawing operations.
//!
//! The emitter produces a flat, ordered list of [`DrawOp`]s. Renderers for a
//! concrete CAD dialect translate them one by one; the list serializes to
//! JSON without loss so it can be stored and re-rendered later.

mod emit;
mod icons;

use serde::{Deserialize, Serialize};

use crate::position::Point;

pub use emit::emit;
pub use icons::IconTemplate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Start of a named group of operations.
    Section {
        title: String,
    },
    CreateLayer {
        name: String,
        color: u16,
    },
    /// Make `name` the active layer and `color` the active colour.
    SelectLayer {
        name: String,
        color: u16,
    },
    Line {
        from: Point,
        to: Point,
    },
    Rectangle {
        corner: Point,
        opposite: Point,
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    Fill {
        region: FillRegion,
    },
    EllipseArc {
        center: Point,
        axis_x: Point,
        axis_y: Point,
        start_angle: f64,
        end_angle: f64,
    },
    /// Text carries its own layer; it leaves that layer active.
    Text {
        at: Point,
        height: f64,
        text: String,
        justification: Justification,
        layer: String,
        color: u16,
    },
    /// End of the drawing.
    Finalize,
}

impl DrawOp {
    pub fn line(from: Point, to: Point) -> Self {
        DrawOp::Line { from, to }
    }

    pub fn rectangle(corner: Point, opposite: Point) -> Self {
        DrawOp::Rectangle { corner, opposite }
    }

    pub fn polyline(points: impl Into<Vec<Point>>, closed: bool) -> Self {
        DrawOp::Polyline {
            points: points.into(),
            closed,
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        DrawOp::Circle { center, radius }
    }

    /// Whether the op draws geometry on the active layer.
    pub fn uses_active_layer(&self) -> bool {
        matches!(
            self,
            DrawOp::Line { .. }
                | DrawOp::Rectangle { .. }
                | DrawOp::Polyline { .. }
                | DrawOp::Circle { .. }
                | DrawOp::Fill { .. }
                | DrawOp::EllipseArc { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillRegion {
    /// The most recently drawn closed object.
    LastObject,
    Boundary { points: Vec<Point> },
    Seed { point: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justification {
    Center,
    Left,
    MiddleLeft,
    MiddleRight,
}

impl Justification {
    /// Justification option as accepted by the TEXT command.
    pub fn code(self) -> &'static str {
        match self {
            Justification::Center => "C",
            Justification::Left => "L",
            Justification::MiddleLeft => "ML",
            Justification::MiddleRight => "MR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_serialize_with_tag() {
        let ops = vec![
            DrawOp::SelectLayer {
                name: "APs".into(),
                color: 4,
            },
            DrawOp::Fill {
                region: FillRegion::LastObject,
            },
            DrawOp::Finalize,
        ];
        let json = serde_json::to_string(&ops).unwrap();
        assert_eq!(
            json,
            r#"[{"op":"select_layer","name":"APs","color":4},{"op":"fill","region":{"kind":"last_object"}},{"op":"finalize"}]"#
        );
        let back: Vec<DrawOp> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ops);
    }

    #[test]
    fn geometry_ops_use_active_layer() {
        assert!(DrawOp::circle(Point::default(), 1.0).uses_active_layer());
        assert!(!DrawOp::Finalize.uses_active_layer());
        assert_eq!(Justification::MiddleRight.code(), "MR");
    }
}
