//! Conversions shared by several resources.
//!
//! Every function here is pure: configuration goes in, API records come out
//! (or the reverse), and problems are reported as diagnostics.

mod actions;
mod conditions;
mod field_ref;
mod form_conditions;
mod schedule;

pub use actions::*;
pub use conditions::*;
pub use field_ref::*;
pub use form_conditions::*;
pub use schedule::*;
