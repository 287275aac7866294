//! AutoLISP rendering for riser drawings.
//!
//! Drawing operations are lowered to small AutoLISP expressions (mostly
//! `(command ...)` calls) and written one per line into a script that can be
//! loaded into AutoCAD with `APPLOAD`.
//!
//! - [`Expr`] - the expression tree
//! - [`formatter`] - compact serialization of expressions and numbers
//! - [`Script`] / [`render`] - the script layout around the drawing ops

pub mod formatter;
mod script;

use std::fmt;

use riser_sch::Point;

pub use script::{Script, render};

/// An AutoLISP expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Unquoted atom, e.g. `command` or `*error*`
    Symbol(String),
    /// Quoted string
    String(String),
    Number(f64),
    List(Vec<Expr>),
}

impl Expr {
    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::Symbol(s.into())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::String(s.into())
    }

    pub fn number(n: f64) -> Self {
        Expr::Number(n)
    }

    pub fn list(items: Vec<Expr>) -> Self {
        Expr::List(items)
    }

    /// `(list x y)`
    pub fn point(p: Point) -> Self {
        Expr::list(vec![
            Expr::symbol("list"),
            Expr::number(p.x),
            Expr::number(p.y),
        ])
    }

    /// `(command arg...)`
    pub fn command(args: impl IntoIterator<Item = Expr>) -> Self {
        let mut items = vec![Expr::symbol("command")];
        items.extend(args);
        Expr::List(items)
    }

    /// `(princ "message")`
    pub fn princ(message: impl Into<String>) -> Self {
        Expr::list(vec![Expr::symbol("princ"), Expr::string(message)])
    }

    /// Empty string, used to terminate interactive prompts.
    pub fn enter() -> Self {
        Expr::string("")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&formatter::format_expr(self))
    }
}

impl From<Point> for Expr {
    fn from(p: Point) -> Self {
        Expr::point(p)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::string(s)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::number(n)
    }
}
