//! Generation quality survey.
//!
//! Runs the generator over a range of daily seeds and aggregates how often
//! puzzles were proven, how many retries they took, and which card pairs
//! ended up carrying the proof.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use alibi_explore::solver::batch::{daily_seeds, generate_batch};
use alibi_explore::solver::pipeline::{GenerationError, GenerationOutcome, PipelineConfig};
use alibi_ir::theme::ThemePack;
use alibi_ir::types::Archetype;

/// Separation margin statistics over proven puzzles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginStats {
    pub min: i32,
    pub max: i32,
    pub mean: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub from_seed: u32,
    pub count: u32,
    /// Puzzles carrying a proof.
    pub solved: u32,
    /// Puzzles served unproven after exhausting attempts.
    pub degraded: u32,
    /// Attempts run across all seeds.
    pub total_attempts: u64,
    /// Puzzles that needed more than one attempt.
    pub retried: u32,
    pub margins: Option<MarginStats>,
    /// How often each archetype appears in the best pair.
    pub best_pair_archetypes: BTreeMap<Archetype, u32>,
    /// Mean number of tied best pairs per proven puzzle.
    pub mean_ties: f64,
}

impl SurveyReport {
    /// Share of surveyed seeds that produced a proven puzzle.
    pub fn solve_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            f64::from(self.solved) / f64::from(self.count)
        }
    }

    fn record(&mut self, outcome: &GenerationOutcome, margins: &mut Vec<i32>, ties: &mut u64) {
        self.total_attempts += u64::from(outcome.log.attempts);
        if outcome.log.attempts > 1 {
            self.retried += 1;
        }
        if outcome.log.degraded {
            self.degraded += 1;
        }

        let puzzle = &outcome.puzzle;
        let Some(proof) = &puzzle.proof else {
            return;
        };
        self.solved += 1;
        *ties += proof.tie_pairs.len() as u64;
        if let Some(best) = proof.best_explanation() {
            margins.push(best.separation_margin);
        }
        for index in [proof.best_pair.0, proof.best_pair.1] {
            if let Some(card) = puzzle.deck.get(index) {
                *self.best_pair_archetypes.entry(card.archetype).or_insert(0) += 1;
            }
        }
    }
}

/// Survey `count` consecutive seeds starting at `from`.
pub fn survey(
    from: u32,
    count: u32,
    theme: &ThemePack,
    config: &PipelineConfig,
) -> Result<SurveyReport, GenerationError> {
    let seeds = daily_seeds(from, count);
    let outcomes = generate_batch(&seeds, theme, config)?;
    Ok(summarize(from, &outcomes))
}

/// Aggregate already-generated outcomes.
pub fn summarize(from: u32, outcomes: &[GenerationOutcome]) -> SurveyReport {
    let mut report = SurveyReport {
        from_seed: from,
        count: outcomes.len() as u32,
        ..SurveyReport::default()
    };
    let mut margins = Vec::new();
    let mut ties = 0u64;
    for outcome in outcomes {
        report.record(outcome, &mut margins, &mut ties);
    }

    if let (Some(&min), Some(&max)) = (margins.iter().min(), margins.iter().max()) {
        let sum: i64 = margins.iter().map(|&m| i64::from(m)).sum();
        report.margins = Some(MarginStats {
            min,
            max,
            mean: sum as f64 / margins.len() as f64,
        });
    }
    if report.solved > 0 {
        report.mean_ties = ties as f64 / f64::from(report.solved);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_survey() {
        let report = summarize(0, &[]);
        assert_eq!(report.count, 0);
        assert_eq!(report.solve_rate(), 0.0);
        assert!(report.margins.is_none());
    }
}
