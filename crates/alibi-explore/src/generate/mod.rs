//! Candidate puzzle generation.
//!
//! Each stage reads from the same [`rng::SeededRng`] in a fixed order:
//! world, honest claims, liar claim, suspect seating, deck.

pub mod claims;
pub mod deck;
pub mod rng;
pub mod suspects;
pub mod world;
