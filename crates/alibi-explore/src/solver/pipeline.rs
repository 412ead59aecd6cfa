//! Generation orchestrator.
//!
//! Attempt `i` reseeds from `base_seed + i` and builds a complete candidate:
//! 1. World (locations, costs, anchor, scents, relic)
//! 2. Five honest claims, then the liar's
//! 3. Suspect seating and relic holder
//! 4. Evidence deck
//! 5. Solvability proof over all card pairs
//!
//! The first proven candidate wins. If none is found the caller gets attempt
//! 0 unproven and a degraded log, or an error in strict mode.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use alibi_ir::theme::{ThemeError, ThemePack};
use alibi_ir::types::{ContradictionType, Puzzle};

use crate::generate::claims::{generate_honest_claims, generate_liar_claim, TimingViolation};
use crate::generate::deck::build_deck;
use crate::generate::rng::SeededRng;
use crate::generate::suspects::assemble_suspects;
use crate::generate::world::build_world;

use super::validate::{analyze_pairs, prove};

/// Retry and acceptance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Attempts before giving up. Treated as at least 1.
    pub max_attempts: u32,
    /// Strikes the liar must lead the runner-up by. Treated as at least 1.
    pub min_separation: u32,
    /// Fail instead of falling back to an unproven puzzle.
    pub require_proof: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            min_separation: 1,
            require_proof: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("invalid theme: {0}")]
    Theme(#[from] ThemeError),

    #[error("no solvable puzzle for seed {base_seed} after {attempts} attempt(s)")]
    Unsolvable { base_seed: u32, attempts: u32 },
}

/// Why an attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptFailure {
    pub attempt: u32,
    pub seed: u32,
    /// Contradiction types that fired but never separated the liar.
    pub present_types: BTreeSet<ContradictionType>,
    /// Best margin seen over all pairs, if the deck had any pair.
    pub best_margin: Option<i32>,
    /// How the liar's timing was broken.
    pub timing: TimingViolation,
    /// Rule families the liar's claim was built to break.
    pub injected: BTreeSet<ContradictionType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationLog {
    /// Attempts actually run.
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
    /// Set when the returned puzzle carries no proof.
    pub degraded: bool,
    pub accepted_attempt: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub puzzle: Puzzle,
    pub log: GenerationLog,
}

/// An assembled, not yet validated puzzle.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub puzzle: Puzzle,
    pub timing: TimingViolation,
    pub injected: BTreeSet<ContradictionType>,
}

/// Build the candidate for one attempt. `proof` is left empty.
pub fn build_candidate(base_seed: u32, attempt: u32, theme: &ThemePack) -> Candidate {
    let seed = base_seed.wrapping_add(attempt);
    let mut rng = SeededRng::for_attempt(base_seed, attempt);

    let mut world = build_world(&mut rng);
    let honest = generate_honest_claims(&mut rng, &world);
    let liar = generate_liar_claim(&mut rng, &world);
    let assembly = assemble_suspects(&mut rng, honest, liar.claim, &mut world);
    let deck = build_deck(&mut rng, &world, &assembly.suspects, assembly.liar_id, theme);

    debug!(seed, draws = rng.draws(), timing = ?liar.timing, "candidate built");

    Candidate {
        puzzle: Puzzle {
            base_seed,
            seed,
            attempt,
            world,
            suspects: assembly.suspects,
            liar_id: assembly.liar_id,
            deck,
            proof: None,
        },
        timing: liar.timing,
        injected: liar.injected,
    }
}

/// Generate the puzzle for `base_seed`.
pub fn generate_puzzle(
    base_seed: u32,
    theme: &ThemePack,
    config: &PipelineConfig,
) -> Result<GenerationOutcome, GenerationError> {
    theme.validate()?;

    let max_attempts = config.max_attempts.max(1);
    let mut log = GenerationLog::default();
    let mut fallback: Option<Puzzle> = None;

    for attempt in 0..max_attempts {
        let Candidate {
            mut puzzle,
            timing,
            injected,
        } = build_candidate(base_seed, attempt, theme);
        log.attempts = attempt + 1;

        let claims = puzzle.claims();
        let analyses = analyze_pairs(&puzzle.world, &claims, &puzzle.deck, puzzle.liar_id);
        let present_types: BTreeSet<ContradictionType> = analyses
            .iter()
            .flat_map(|a| a.explanation.triggered_types.iter().copied())
            .collect();
        let best_margin = analyses
            .iter()
            .map(|a| a.explanation.separation_margin)
            .max();

        match prove(analyses, config.min_separation) {
            Some(proof) => {
                info!(
                    base_seed,
                    attempt,
                    best_pair = %proof.best_pair,
                    margin = best_margin.unwrap_or(0),
                    "puzzle accepted"
                );
                puzzle.proof = Some(proof);
                log.accepted_attempt = Some(attempt);
                return Ok(GenerationOutcome { puzzle, log });
            }
            None => {
                debug!(
                    base_seed,
                    attempt,
                    seed = puzzle.seed,
                    ?best_margin,
                    ?timing,
                    "attempt rejected"
                );
                log.failures.push(AttemptFailure {
                    attempt,
                    seed: puzzle.seed,
                    present_types,
                    best_margin,
                    timing,
                    injected,
                });
                if fallback.is_none() {
                    fallback = Some(puzzle);
                }
            }
        }
    }

    if config.require_proof {
        return Err(GenerationError::Unsolvable {
            base_seed,
            attempts: max_attempts,
        });
    }

    let puzzle = match fallback {
        Some(puzzle) => puzzle,
        None => build_candidate(base_seed, 0, theme).puzzle,
    };
    warn!(base_seed, attempts = max_attempts, "no proven puzzle; serving attempt 0 unproven");
    log.degraded = true;
    Ok(GenerationOutcome { puzzle, log })
}

/// Generate with the built-in theme and default settings.
pub fn generate_default(base_seed: u32) -> Result<GenerationOutcome, GenerationError> {
    generate_puzzle(base_seed, &ThemePack::default(), &PipelineConfig::default())
}
