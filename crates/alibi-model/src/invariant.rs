//! Structural invariants every generated puzzle must satisfy.

use std::collections::BTreeSet;

use alibi_ir::types::{CardPair, FactId, Puzzle, StrikeDelta, SuspectId};

/// A violated puzzle invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub invariant: &'static str,
    pub message: String,
}

impl Violation {
    fn new(invariant: &'static str, message: impl Into<String>) -> Self {
        Self {
            invariant,
            message: message.into(),
        }
    }
}

/// Check all puzzle invariants.
///
/// Returns a list of violations (empty if the puzzle is well formed).
pub fn check_puzzle(puzzle: &Puzzle) -> Vec<Violation> {
    let mut violations = Vec::new();

    let liars: Vec<SuspectId> = puzzle
        .suspects
        .iter()
        .filter(|s| s.is_liar)
        .map(|s| s.id)
        .collect();
    if liars.len() != 1 {
        violations.push(Violation::new(
            "single_liar",
            format!("expected exactly one liar, found {liars:?}"),
        ));
    }
    if !liars.contains(&puzzle.liar_id) {
        violations.push(Violation::new(
            "liar_id_matches",
            format!("{} is not flagged as the liar", puzzle.liar_id),
        ));
    }

    for (slot, suspect) in puzzle.suspects.iter().enumerate() {
        if usize::from(suspect.id.0) != slot || suspect.claim.suspect_id != Some(suspect.id) {
            violations.push(Violation::new(
                "slot_ids",
                format!("suspect in slot {slot} is stamped {:?}", suspect.claim.suspect_id),
            ));
        }
    }

    let relic = &puzzle.world.relic;
    if let Some(holder) = relic.holder {
        match puzzle.suspect(holder) {
            Some(s) if s.is_liar => violations.push(Violation::new(
                "holder_is_honest",
                format!("relic holder {holder} is the liar"),
            )),
            Some(s) if s.claim.carried_relic != Some(relic.relic) => {
                violations.push(Violation::new(
                    "holder_is_honest",
                    format!("relic holder {holder} does not claim the relic"),
                ))
            }
            Some(_) => {}
            None => violations.push(Violation::new(
                "holder_is_honest",
                format!("relic holder {holder} is not seated"),
            )),
        }
    }

    for edge in &puzzle.world.edges {
        let symmetric = puzzle
            .world
            .edge(edge.to, edge.from)
            .is_some_and(|back| {
                back.minutes == edge.minutes && back.bells_required == edge.bells_required
            });
        if !symmetric {
            violations.push(Violation::new(
                "edge_symmetry",
                format!("edge {} -> {} has no matching reverse", edge.from, edge.to),
            ));
        }
    }

    let mut seen_ids = BTreeSet::new();
    for card in &puzzle.deck {
        let expected = card.archetype.contradiction_type();
        for fact in card.facts() {
            if fact.contradiction_type != expected {
                violations.push(Violation::new(
                    "archetype_mapping",
                    format!("fact {} is typed {}", fact.id, fact.contradiction_type),
                ));
            }
            if !seen_ids.insert(fact.id.clone()) {
                violations.push(Violation::new(
                    "unique_fact_ids",
                    format!("fact id {} appears twice", fact.id),
                ));
            }
        }
        if card.headline.targets != vec![puzzle.liar_id] {
            violations.push(Violation::new(
                "headline_targets_liar",
                format!("headline {} targets {:?}", card.headline.id, card.headline.targets),
            ));
        }
        if !card.secondary.targets.is_empty() {
            violations.push(Violation::new(
                "secondary_is_neutral",
                format!("secondary {} targets {:?}", card.secondary.id, card.secondary.targets),
            ));
        }
    }

    if let Some(proof) = &puzzle.proof {
        match proof.best_explanation() {
            Some(best) if best.separation_margin > 0 => {}
            Some(best) => violations.push(Violation::new(
                "proof_separates",
                format!(
                    "best pair {} has margin {}",
                    proof.best_pair, best.separation_margin
                ),
            )),
            None => violations.push(Violation::new(
                "proof_separates",
                format!("best pair {} has no explanation", proof.best_pair),
            )),
        }
        if proof.ranking(proof.best_pair).is_none() {
            violations.push(Violation::new(
                "proof_separates",
                format!("best pair {} has no ranking", proof.best_pair),
            ));
        }
        for ranking in &proof.pair_rankings {
            let supplied = pair_fact_ids(puzzle, ranking.pair);
            violations.extend(provenance_violations(&ranking.deltas, &supplied));
        }
    }

    violations
}

/// Evidence citing facts that were never supplied.
pub fn provenance_violations(deltas: &[StrikeDelta], supplied: &[FactId]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for delta in deltas {
        for evidence in &delta.evidence {
            for id in &evidence.source_fact_ids {
                if !supplied.contains(id) {
                    violations.push(Violation::new(
                        "evidence_provenance",
                        format!("{} cites unsupplied fact {id}", delta.suspect_id),
                    ));
                }
            }
        }
    }
    violations
}

fn pair_fact_ids(puzzle: &Puzzle, pair: CardPair) -> Vec<FactId> {
    [pair.0, pair.1]
        .iter()
        .filter_map(|&i| puzzle.deck.get(i))
        .flat_map(|card| card.facts().map(|f| f.id.clone()))
        .collect()
}
