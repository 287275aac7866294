//! Device icon templates. Every template is anchored at the bottom centre
//! of the icon and draws on whatever layer is active.

use super::{DrawOp, FillRegion};
use crate::position::Point;
use crate::settings::IconKind;

pub type IconTemplate = fn(Point) -> Vec<DrawOp>;

impl IconKind {
    pub fn template(self) -> IconTemplate {
        match self {
            IconKind::AccessPoint => access_point,
            IconKind::Phone => phone,
            IconKind::Television => television,
            IconKind::Camera => camera,
            IconKind::DataOutlet => data_outlet,
        }
    }

    pub fn draw(self, anchor: Point) -> Vec<DrawOp> {
        (self.template())(anchor)
    }
}

/// Triangle mast with three concentric radiation rings at its tip.
fn access_point(at: Point) -> Vec<DrawOp> {
    let tip = at.offset(0.0, 25.0);
    let base = at.offset(-10.0, 0.0);
    let mut ops = vec![DrawOp::polyline(
        [base, at.offset(10.0, 0.0), tip, base],
        false,
    )];
    ops.extend([10.0, 21.25, 30.0].map(|radius| DrawOp::circle(tip, radius)));
    ops
}

fn phone(at: Point) -> Vec<DrawOp> {
    vec![
        DrawOp::rectangle(at.offset(-10.0, 0.0), at.offset(10.0, 30.0)),
        DrawOp::circle(at.offset(0.0, 37.0), 5.0),
    ]
}

/// Screen on a triangular stand.
fn television(at: Point) -> Vec<DrawOp> {
    let left = at.offset(-10.0, 0.0);
    vec![
        DrawOp::rectangle(at.offset(-20.0, 0.0), at.offset(20.0, 25.0)),
        DrawOp::polyline([left, at.offset(10.0, 0.0), at.offset(0.0, -10.0), left], false),
    ]
}

/// Housing, lens and a half-ellipse hood over the top edge.
fn camera(at: Point) -> Vec<DrawOp> {
    let top = at.offset(0.0, 15.0);
    vec![
        DrawOp::rectangle(at.offset(-10.0, 0.0), at.offset(10.0, 15.0)),
        DrawOp::circle(at.offset(0.0, 7.5), 3.0),
        DrawOp::EllipseArc {
            center: top,
            axis_x: top.offset(10.0, 0.0),
            axis_y: top.offset(0.0, 5.0),
            start_angle: 0.0,
            end_angle: 180.0,
        },
    ]
}

/// Solid triangle.
fn data_outlet(at: Point) -> Vec<DrawOp> {
    vec![
        DrawOp::polyline(
            [at.offset(-10.0, 0.0), at.offset(10.0, 0.0), at.offset(0.0, 20.0)],
            true,
        ),
        DrawOp::Fill {
            region: FillRegion::LastObject,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [IconKind; 5] = [
        IconKind::AccessPoint,
        IconKind::Phone,
        IconKind::Television,
        IconKind::Camera,
        IconKind::DataOutlet,
    ];

    #[test]
    fn templates_are_geometry_only() {
        for kind in ALL {
            let ops = kind.draw(Point::new(100.0, 200.0));
            assert!(!ops.is_empty(), "{kind:?}");
            assert!(ops.iter().all(DrawOp::uses_active_layer), "{kind:?}");
        }
    }

    #[test]
    fn access_point_rings_share_tip() {
        let ops = IconKind::AccessPoint.draw(Point::new(0.0, 0.0));
        let radii: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { center, radius } => {
                    assert_eq!(*center, Point::new(0.0, 25.0));
                    Some(*radius)
                }
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![10.0, 21.25, 30.0]);
    }

    #[test]
    fn data_outlet_is_filled() {
        let ops = IconKind::DataOutlet.draw(Point::new(5.0, 5.0));
        assert_eq!(
            ops.last(),
            Some(&DrawOp::Fill {
                region: FillRegion::LastObject
            })
        );
        assert!(matches!(ops[0], DrawOp::Polyline { closed: true, .. }));
    }
}
