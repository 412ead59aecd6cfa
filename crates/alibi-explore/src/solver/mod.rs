//! Solvability search and the bounded retry loop around it.

pub mod batch;
pub mod pipeline;
pub mod validate;
