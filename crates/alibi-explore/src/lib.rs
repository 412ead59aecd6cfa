//! Puzzle generation and the solvability search.
//!
//! `generate` turns a seeded stream into a candidate puzzle; `solver` proves
//! candidates fair and drives the bounded retry loop.

pub mod generate;
pub mod solver;
