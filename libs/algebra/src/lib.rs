//! Small symbolic algebra engine.
//!
//! Text goes in through [`parse`], comes back as a canonical [`Expr`] tree,
//! and [`solve`] finds the roots of `expr = 0` for one variable. Rendering
//! with `Display` uses `^` for powers.
//!
//! ```
//! let expr = algebra::parse("x^2 - 4").unwrap();
//! let roots = algebra::solve(&expr, "x").unwrap();
//! let rendered: Vec<String> = roots.iter().map(ToString::to_string).collect();
//! assert_eq!(rendered, ["-2", "2"]);
//! ```

mod canonical;
mod error;
mod expand;
mod expr;
mod format;
mod lexer;
mod numeric;
mod ops;
mod parser;
mod poly;
mod solver;

pub use error::{ParseError, SolveError};
pub use expr::{Constant, Expr, Func};
pub use numeric::Rational;
pub use parser::parse;
pub use solver::solve;
