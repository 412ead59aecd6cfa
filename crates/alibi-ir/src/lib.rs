//! Shared data model for the alibi puzzle engine.
//!
//! Everything a host consumes lives here: the world, suspects and their
//! claims, evidence cards, evaluator output, and the solvability proof.
//! Label pools are kept separate in [`theme`] so that structure never
//! depends on display strings.

pub mod parse;
pub mod theme;
pub mod types;
