//! REST API layer for the Equation Solver module.

pub mod cors;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
