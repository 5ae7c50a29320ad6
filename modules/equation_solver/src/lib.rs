//! Equation Solver Module
//!
//! Accepts an equation as text, normalizes it to `<expression> = 0` and
//! returns the roots for every free variable. Symbolic work is delegated to
//! the `algebra` engine; this crate owns the domain rules and the REST surface.

pub use config::{CorsConfig, EquationSolverConfig};
pub use domain::error::DomainError;
pub use domain::service::{Service, Solution};

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
