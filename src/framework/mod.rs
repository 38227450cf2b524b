//! The slice of the configuration engine this crate talks to.
//!
//! The engine itself (schema, planning, persistence) lives elsewhere.
//! This module holds the value, diagnostic, and document types that cross
//! the boundary.

mod diag;
mod state;
mod value;

pub use diag::*;
pub use state::*;
pub use value::*;
