//! Track catalog: the ordered, immutable set of selectable relaxation tracks.
//!
//! Order matters: next/previous navigation and shuffle sampling follow the
//! order tracks were declared in.

mod model;

pub use model::*;
