//! Batch generation on the rayon pool.

use rayon::prelude::*;

use alibi_ir::theme::ThemePack;

use super::pipeline::{generate_puzzle, GenerationError, GenerationOutcome, PipelineConfig};

/// `count` consecutive daily seeds starting at `from`, wrapping at `u32::MAX`.
pub fn daily_seeds(from: u32, count: u32) -> Vec<u32> {
    (0..count).map(|i| from.wrapping_add(i)).collect()
}

/// Generate one puzzle per seed. Results are returned in seed order; the
/// first error (in seed order) wins.
pub fn generate_batch(
    seeds: &[u32],
    theme: &ThemePack,
    config: &PipelineConfig,
) -> Result<Vec<GenerationOutcome>, GenerationError> {
    theme.validate()?;
    let results: Vec<Result<GenerationOutcome, GenerationError>> = seeds
        .par_iter()
        .map(|&seed| generate_puzzle(seed, theme, config))
        .collect();
    results.into_iter().collect()
}
