//! Scoring of suspect claims against revealed world facts.

pub mod eval;
pub mod invariant;
pub mod knowledge;
