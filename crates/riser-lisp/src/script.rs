use riser_sch::Point;
use riser_sch::drawing::{DrawOp, FillRegion};

use crate::Expr;

/// An AutoLISP drawing script under construction.
///
/// The script opens with an error handler and an `UNDO BEGIN` mark so the
/// whole drawing can be undone in one step. Every [`DrawOp::Section`] gets a
/// comment header and a progress message; the `DONE.` marker for a section
/// is written when the next section starts or the script is finalized.
pub struct Script {
    out: String,
    section_open: bool,
    finalized: bool,
}

impl Script {
    pub fn new(project: &str) -> Self {
        let mut script = Script {
            out: String::new(),
            section_open: false,
            finalized: false,
        };
        script.preamble(project);
        script
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn expr(&mut self, expr: Expr) {
        self.line(expr.to_string());
    }

    fn command<const N: usize>(&mut self, args: [Expr; N]) {
        self.expr(Expr::command(args));
    }

    fn preamble(&mut self, project: &str) {
        self.line(r#"(setq *error* (lambda (msg) (if msg (princ (strcat "\nError: " msg)))))"#);
        self.expr(Expr::list(vec![
            Expr::symbol("setvar"),
            Expr::string("OSMODE"),
            Expr::number(0.0),
        ]));
        self.command(["_.-PURGE".into(), "ALL".into(), "*".into(), "N".into()]);
        self.command(["_.REGEN".into()]);
        self.command(["VISUALSTYLE".into(), "Wireframe".into()]);
        self.command(["_.UNDO".into(), "BEGIN".into()]);
        self.expr(Expr::princ(format!(
            "--- {} AUTOMATED DRAWING START ---",
            project.to_uppercase()
        )));
    }

    fn close_section(&mut self) {
        if self.section_open {
            self.expr(Expr::princ("DONE."));
            self.section_open = false;
        }
    }

    fn select_layer(&mut self, name: &str, color: u16) {
        self.command(["-LAYER".into(), "S".into(), name.into(), Expr::enter()]);
        self.command(["-COLOR".into(), Expr::string(color.to_string())]);
    }

    fn polyline(&mut self, points: &[Point], closed: bool) {
        let mut args = vec![Expr::from("_.PLINE")];
        args.extend(points.iter().copied().map(Expr::point));
        args.push(if closed { "C".into() } else { Expr::enter() });
        self.expr(Expr::command(args));
    }

    fn hatch_last(&mut self) {
        self.command([
            "-HATCH".into(),
            "S".into(),
            "L".into(),
            Expr::enter(),
            Expr::enter(),
        ]);
    }

    /// Append one drawing operation.
    pub fn push(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Section { title } => {
                self.close_section();
                self.line("");
                self.line(format!("; === {} ===", title.to_uppercase()));
                self.expr(Expr::princ(format!("\n{title}...")));
                self.section_open = true;
            }
            DrawOp::CreateLayer { name, color } => {
                self.command([
                    "-LAYER".into(),
                    "N".into(),
                    name.as_str().into(),
                    "C".into(),
                    Expr::string(color.to_string()),
                    Expr::enter(),
                    Expr::enter(),
                ]);
            }
            DrawOp::SelectLayer { name, color } => self.select_layer(name, *color),
            DrawOp::Line { from, to } => {
                self.command(["_.LINE".into(), (*from).into(), (*to).into(), Expr::enter()]);
            }
            DrawOp::Rectangle { corner, opposite } => {
                let corners = [
                    *corner,
                    Point::new(opposite.x, corner.y),
                    *opposite,
                    Point::new(corner.x, opposite.y),
                ];
                self.polyline(&corners, true);
            }
            DrawOp::Polyline { points, closed } => self.polyline(points, *closed),
            DrawOp::Circle { center, radius } => {
                self.command(["_.CIRCLE".into(), (*center).into(), (*radius).into()]);
            }
            DrawOp::Fill { region } => match region {
                FillRegion::LastObject => self.hatch_last(),
                FillRegion::Boundary { points } => {
                    self.polyline(points, true);
                    self.hatch_last();
                }
                FillRegion::Seed { point } => {
                    self.command(["-HATCH".into(), (*point).into(), Expr::enter()]);
                }
            },
            DrawOp::EllipseArc {
                center,
                axis_x,
                axis_y,
                start_angle,
                end_angle,
            } => {
                self.command([
                    "_.ELLIPSE".into(),
                    "A".into(),
                    (*center).into(),
                    (*axis_x).into(),
                    (*axis_y).into(),
                    (*start_angle).into(),
                    (*end_angle).into(),
                ]);
            }
            DrawOp::Text {
                at,
                height,
                text,
                justification,
                layer,
                color,
            } => {
                self.select_layer(layer, *color);
                self.command([
                    "-TEXT".into(),
                    "S".into(),
                    "Standard".into(),
                    "J".into(),
                    justification.code().into(),
                    (*at).into(),
                    (*height).into(),
                    Expr::number(0.0),
                    text.as_str().into(),
                ]);
            }
            DrawOp::Finalize => self.finalize(),
        }
    }

    fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.close_section();
        self.line("");
        self.line("; === FINALIZE DRAWING ===");
        self.expr(Expr::princ("\nFinalizing and zooming..."));
        self.command(["_.ZOOM".into(), "E".into()]);
        self.command(["_.UNDO".into(), "END".into()]);
        self.expr(Expr::princ("\n--- DRAWING COMPLETE ---"));
        self.finalized = true;
    }

    /// Finish the script, finalizing it if no [`DrawOp::Finalize`] was seen.
    pub fn finish(mut self) -> String {
        self.finalize();
        self.out
    }
}

/// Render a full drawing script for `ops`.
pub fn render(project: &str, ops: &[DrawOp]) -> String {
    let mut script = Script::new(project);
    for op in ops {
        script.push(op);
    }
    log::info!("Rendered {} drawing operations to AutoLISP", ops.len());
    script.finish()
}

#[cfg(test)]
mod tests {
    use riser_sch::Point;
    use riser_sch::drawing::{DrawOp, FillRegion, Justification};

    use super::*;

    fn body(script: &str) -> String {
        // Preamble is seven lines, then the blank line opening the first section.
        script.lines().skip(8).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn preamble_sets_up_undo_and_handler() {
        let script = render("harbor", &[]);
        insta::assert_snapshot!(script, @r#"
        (setq *error* (lambda (msg) (if msg (princ (strcat "\nError: " msg)))))
        (setvar "OSMODE" 0)
        (command "_.-PURGE" "ALL" "*" "N")
        (command "_.REGEN")
        (command "VISUALSTYLE" "Wireframe")
        (command "_.UNDO" "BEGIN")
        (princ "--- HARBOR AUTOMATED DRAWING START ---")

        ; === FINALIZE DRAWING ===
        (princ "\nFinalizing and zooming...")
        (command "_.ZOOM" "E")
        (command "_.UNDO" "END")
        (princ "\n--- DRAWING COMPLETE ---")
        "#);
    }

    #[test]
    fn sections_and_primitives() {
        let ops = [
            DrawOp::Section {
                title: "Layers".into(),
            },
            DrawOp::CreateLayer {
                name: "APs".into(),
                color: 4,
            },
            DrawOp::Section {
                title: "Tower MDF".into(),
            },
            DrawOp::SelectLayer {
                name: "Switches".into(),
                color: 5,
            },
            DrawOp::Rectangle {
                corner: Point::new(50.0, -120.0),
                opposite: Point::new(200.0, -90.0),
            },
            DrawOp::Text {
                at: Point::new(125.0, -105.0),
                height: 8.0,
                text: "SW-CORE (X1)".into(),
                justification: Justification::Center,
                layer: "Text".into(),
                color: 7,
            },
            DrawOp::Polyline {
                points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 20.0)],
                closed: true,
            },
            DrawOp::Fill {
                region: FillRegion::LastObject,
            },
            DrawOp::Circle {
                center: Point::new(0.0, 25.0),
                radius: 21.25,
            },
            DrawOp::EllipseArc {
                center: Point::new(0.0, 15.0),
                axis_x: Point::new(10.0, 15.0),
                axis_y: Point::new(0.0, 20.0),
                start_angle: 0.0,
                end_angle: 180.0,
            },
            DrawOp::Line {
                from: Point::new(0.0, 0.0),
                to: Point::new(1540.0, 0.0),
            },
            DrawOp::Finalize,
        ];

        insta::assert_snapshot!(body(&render("harbor", &ops)), @r#"
        ; === LAYERS ===
        (princ "\nLayers...")
        (command "-LAYER" "N" "APs" "C" "4" "" "")
        (princ "DONE.")

        ; === TOWER MDF ===
        (princ "\nTower MDF...")
        (command "-LAYER" "S" "Switches" "")
        (command "-COLOR" "5")
        (command "_.PLINE" (list 50 -120) (list 200 -120) (list 200 -90) (list 50 -90) "C")
        (command "-LAYER" "S" "Text" "")
        (command "-COLOR" "7")
        (command "-TEXT" "S" "Standard" "J" "C" (list 125 -105) 8 0 "SW-CORE (X1)")
        (command "_.PLINE" (list 0 0) (list 10 0) (list 5 20) "C")
        (command "-HATCH" "S" "L" "" "")
        (command "_.CIRCLE" (list 0 25) 21.25)
        (command "_.ELLIPSE" "A" (list 0 15) (list 10 15) (list 0 20) 0 180)
        (command "_.LINE" (list 0 0) (list 1540 0) "")
        (princ "DONE.")

        ; === FINALIZE DRAWING ===
        (princ "\nFinalizing and zooming...")
        (command "_.ZOOM" "E")
        (command "_.UNDO" "END")
        (princ "\n--- DRAWING COMPLETE ---")
        "#);
    }

    #[test]
    fn finalize_is_written_once() {
        let script = render("x", &[DrawOp::Finalize, DrawOp::Finalize]);
        assert_eq!(script.matches("_.ZOOM").count(), 1);
    }

    #[test]
    fn text_is_escaped() {
        let ops = [DrawOp::Text {
            at: Point::new(0.0, 0.0),
            height: 10.0,
            text: "2x\"AP\"".into(),
            justification: Justification::MiddleRight,
            layer: "Text".into(),
            color: 7,
        }];
        let script = render("x", &ops);
        assert!(script.contains(
            r#"(command "-TEXT" "S" "Standard" "J" "MR" (list 0 0) 10 0 "2x\"AP\"")"#
        ));
    }
}
