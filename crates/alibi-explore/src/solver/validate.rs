//! Solvability validator.
//!
//! A puzzle is fair when some pair of evidence cards, evaluated with full
//! information, leaves the liar strictly ahead of every honest suspect.
//! All pairs are scored on the rayon pool and collected in pair order, so the
//! outcome matches a sequential scan exactly.

use std::collections::BTreeSet;

use rayon::prelude::*;

use alibi_ir::types::{
    CardPair, ClaimVector, EvidenceCard, PairExplanation, PairRanking, SolvabilityProof,
    SuspectId, World, WorldReveal,
};
use alibi_model::eval::{evaluate_all, EvalContext};

/// Scores for one card pair.
#[derive(Debug, Clone)]
pub struct PairAnalysis {
    pub ranking: PairRanking,
    pub explanation: PairExplanation,
}

/// Pool the pair's four facts and score every claim against them.
pub fn analyze_pair(
    world: &World,
    claims: &[ClaimVector],
    deck: &[EvidenceCard],
    liar_id: SuspectId,
    pair: CardPair,
) -> PairAnalysis {
    let facts: Vec<WorldReveal> = [pair.0, pair.1]
        .iter()
        .filter_map(|&i| deck.get(i))
        .flat_map(|card| card.facts().map(|f| f.clone()))
        .collect();

    let ctx = EvalContext::new(world, claims, &facts);
    let deltas = evaluate_all(&ctx, None);

    let liar_strikes = deltas
        .iter()
        .find(|d| d.suspect_id == liar_id)
        .map_or(0, |d| d.strike_count);
    let runner_up_strikes = deltas
        .iter()
        .filter(|d| d.suspect_id != liar_id)
        .map(|d| d.strike_count)
        .max()
        .unwrap_or(0);
    let triggered_types: BTreeSet<_> = deltas
        .iter()
        .flat_map(|d| d.evidence.iter().map(|e| e.contradiction_type))
        .collect();

    PairAnalysis {
        explanation: PairExplanation {
            pair,
            liar_strikes,
            runner_up_strikes,
            separation_margin: liar_strikes as i32 - runner_up_strikes as i32,
            triggered_types,
        },
        ranking: PairRanking { pair, deltas },
    }
}

/// Analyze every pair over the deck, in stable pair order.
pub fn analyze_pairs(
    world: &World,
    claims: &[ClaimVector],
    deck: &[EvidenceCard],
    liar_id: SuspectId,
) -> Vec<PairAnalysis> {
    CardPair::over(deck.len())
        .par_iter()
        .map(|&pair| analyze_pair(world, claims, deck, liar_id, pair))
        .collect()
}

/// Pick the best separating pair, if any pair separates by at least
/// `min_separation` (never less than 1).
pub fn prove(analyses: Vec<PairAnalysis>, min_separation: u32) -> Option<SolvabilityProof> {
    let threshold = i32::try_from(min_separation.max(1)).unwrap_or(i32::MAX);

    let mut best: Option<&PairExplanation> = None;
    for analysis in &analyses {
        let e = &analysis.explanation;
        if e.separation_margin < threshold {
            continue;
        }
        if best.map_or(true, |b| e.separation_margin > b.separation_margin) {
            best = Some(e);
        }
    }
    let best = best?;
    let best_pair = best.pair;
    let best_margin = best.separation_margin;

    let tie_pairs = analyses
        .iter()
        .map(|a| &a.explanation)
        .filter(|e| e.pair != best_pair && e.separation_margin == best_margin)
        .map(|e| e.pair)
        .collect();

    let (pair_rankings, pair_explanations) = analyses
        .into_iter()
        .map(|a| (a.ranking, a.explanation))
        .unzip();

    Some(SolvabilityProof {
        best_pair,
        pair_rankings,
        pair_explanations,
        tie_pairs,
    })
}

/// Full-information solvability check for an assembled candidate.
pub fn validate(
    world: &World,
    claims: &[ClaimVector],
    deck: &[EvidenceCard],
    liar_id: SuspectId,
    min_separation: u32,
) -> Option<SolvabilityProof> {
    prove(analyze_pairs(world, claims, deck, liar_id), min_separation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn analysis(pair: CardPair, margin: i32) -> PairAnalysis {
        PairAnalysis {
            ranking: PairRanking {
                pair,
                deltas: Vec::new(),
            },
            explanation: PairExplanation {
                pair,
                liar_strikes: margin.max(0) as u32,
                runner_up_strikes: 0,
                separation_margin: margin,
                triggered_types: BTreeSet::new(),
            },
        }
    }

    #[test]
    fn test_best_pair_prefers_largest_margin() {
        let pairs = CardPair::all();
        let margins = [1, 3, 0, 3, -1, 2];
        let analyses = pairs
            .iter()
            .zip(margins)
            .map(|(&p, m)| analysis(p, m))
            .collect();
        let proof = prove(analyses, 1).unwrap();
        assert_eq!(proof.best_pair, CardPair(0, 2));
        assert_eq!(proof.tie_pairs, vec![CardPair(1, 2)]);
        assert_eq!(proof.pair_explanations.len(), 6);
    }

    #[test]
    fn test_no_separating_pair_means_no_proof() {
        let analyses = CardPair::all()
            .into_iter()
            .map(|p| analysis(p, 0))
            .collect();
        assert!(prove(analyses, 1).is_none());
    }

    #[test]
    fn test_min_separation_is_at_least_one() {
        let analyses = vec![analysis(CardPair(0, 1), 0)];
        assert!(prove(analyses, 0).is_none());
    }

    #[test]
    fn test_threshold_filters_pairs() {
        let analyses = vec![analysis(CardPair(0, 1), 2), analysis(CardPair(0, 2), 3)];
        let proof = prove(analyses.clone(), 3).unwrap();
        assert_eq!(proof.best_pair, CardPair(0, 2));
        assert!(prove(analyses, 4).is_none());
    }
}
