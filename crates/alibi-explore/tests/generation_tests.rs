use alibi_explore::generate::claims::TimingViolation;
use alibi_explore::solver::batch::{daily_seeds, generate_batch};
use alibi_explore::solver::pipeline::{
    generate_default, generate_puzzle, GenerationError, PipelineConfig,
};
use alibi_explore::solver::validate::validate;
use alibi_ir::parse::parse_theme;
use alibi_ir::theme::ThemePack;
use alibi_ir::types::{ContradictionType, FactId, Puzzle, WorldReveal};
use alibi_model::eval::{evaluate_all, EvalContext};
use alibi_model::invariant::{check_puzzle, provenance_violations};
use alibi_model::knowledge::{ClaimDetail, Endpoint, KnowledgeMask};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LANTERN: &str = include_str!("../../alibi-ir/tests/fixtures/lantern_theme.json");

fn seed_corpus(count: usize) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    (0..count).map(|_| rng.gen()).collect()
}

fn puzzle(seed: u32) -> Puzzle {
    generate_default(seed).unwrap().puzzle
}

fn all_facts(puzzle: &Puzzle) -> Vec<WorldReveal> {
    puzzle
        .deck
        .iter()
        .flat_map(|card| card.facts().map(|f| f.clone()))
        .collect()
}

// ── Determinism ──────────────────────────────────────────────────────

#[test]
fn test_same_seed_same_puzzle() {
    for seed in seed_corpus(10) {
        let a = generate_default(seed).unwrap();
        let b = generate_default(seed).unwrap();
        assert_eq!(a.puzzle, b.puzzle);
        assert_eq!(a.log, b.log);
        assert_eq!(
            serde_json::to_string(&a.puzzle).unwrap(),
            serde_json::to_string(&b.puzzle).unwrap()
        );
    }
}

#[test]
fn test_different_seeds_differ() {
    assert_ne!(puzzle(1).world, puzzle(2).world);
}

// ── Label independence ───────────────────────────────────────────────

#[test]
fn test_theme_changes_text_only() {
    let lantern = parse_theme(LANTERN).unwrap();
    let config = PipelineConfig::default();
    for seed in seed_corpus(10) {
        let harbor = generate_puzzle(seed, &ThemePack::default(), &config)
            .unwrap()
            .puzzle;
        let themed = generate_puzzle(seed, &lantern, &config).unwrap().puzzle;

        assert_eq!(harbor.world, themed.world);
        assert_eq!(harbor.suspects, themed.suspects);
        assert_eq!(harbor.liar_id, themed.liar_id);
        assert_eq!(harbor.proof, themed.proof);
        for (a, b) in harbor.deck.iter().zip(&themed.deck) {
            assert_eq!(a.archetype, b.archetype);
            for (fa, fb) in a.facts().iter().zip(b.facts().iter()) {
                assert_eq!(fa.id, fb.id);
                assert_eq!(fa.subject, fb.subject);
                assert_eq!(fa.targets, fb.targets);
            }
        }
        let tower = themed
            .deck
            .iter()
            .find(|c| c.headline.text.contains("foghorn"));
        assert!(tower.is_some());
    }
}

// ── Fairness ─────────────────────────────────────────────────────────

#[test]
fn test_generated_puzzles_are_fair() {
    for seed in seed_corpus(60) {
        let outcome = generate_default(seed).unwrap();
        assert!(!outcome.log.degraded, "seed {seed} degraded");
        assert!(outcome.puzzle.is_proven());
        let proof = outcome.puzzle.proof.as_ref().unwrap();
        let best = proof.best_explanation().unwrap();
        assert!(best.separation_margin > 0, "seed {seed}");
        assert!(best.liar_strikes > best.runner_up_strikes);
        assert_eq!(proof.pair_rankings.len(), 6);
        assert!(!proof.tie_pairs.contains(&proof.best_pair));
        let ranking = proof.ranking(proof.best_pair).unwrap();
        assert_eq!(ranking.pair, proof.best_pair);
    }
}

#[test]
fn test_generated_puzzles_pass_invariants() {
    for seed in seed_corpus(40) {
        let puzzle = puzzle(seed);
        let violations = check_puzzle(&puzzle);
        assert!(violations.is_empty(), "seed {seed}: {violations:?}");
    }
}

#[test]
fn test_validator_is_reproducible() {
    let puzzle = puzzle(777);
    let claims = puzzle.claims();
    let again = validate(&puzzle.world, &claims, &puzzle.deck, puzzle.liar_id, 1);
    assert_eq!(again, puzzle.proof);
}

// ── Knowledge gating ─────────────────────────────────────────────────

#[test]
fn test_zero_knowledge_zero_strikes() {
    for seed in seed_corpus(20) {
        let puzzle = puzzle(seed);
        let claims = puzzle.claims();
        let facts = all_facts(&puzzle);
        let ctx = EvalContext::new(&puzzle.world, &claims, &facts);
        let deltas = evaluate_all(&ctx, Some(&KnowledgeMask::new()));
        assert!(deltas.iter().all(|d| d.strike_count == 0));
    }
}

#[test]
fn test_revealing_more_never_removes_strikes() {
    for seed in seed_corpus(20) {
        let puzzle = puzzle(seed);
        let claims = puzzle.claims();
        let facts = all_facts(&puzzle);
        let ctx = EvalContext::new(&puzzle.world, &claims, &facts);

        let mut steps = Vec::new();
        for suspect in &puzzle.suspects {
            for segment in 0..suspect.claim.segments.len() {
                steps.push((suspect.id, ClaimDetail::Bell { segment, endpoint: Endpoint::Depart }));
                steps.push((suspect.id, ClaimDetail::Bell { segment, endpoint: Endpoint::Arrive }));
            }
            steps.push((suspect.id, ClaimDetail::Horn));
            steps.push((suspect.id, ClaimDetail::Relic));
            steps.push((suspect.id, ClaimDetail::Scent));
        }

        let mut mask = KnowledgeMask::new();
        let mut previous = vec![0; claims.len()];
        for (suspect, detail) in steps {
            mask.reveal(suspect, detail);
            let counts: Vec<u32> = evaluate_all(&ctx, Some(&mask))
                .iter()
                .map(|d| d.strike_count)
                .collect();
            for (before, after) in previous.iter().zip(&counts) {
                assert!(after >= before, "seed {seed}: strikes dropped");
            }
            previous = counts;
        }

        let full: Vec<u32> = evaluate_all(&ctx, None)
            .iter()
            .map(|d| d.strike_count)
            .collect();
        assert_eq!(previous, full);
    }
}

#[test]
fn test_single_endpoint_never_unlocks_travel() {
    for seed in seed_corpus(20) {
        let puzzle = puzzle(seed);
        let claims = puzzle.claims();
        let facts = all_facts(&puzzle);
        let ctx = EvalContext::new(&puzzle.world, &claims, &facts);
        let liar = puzzle.liar().unwrap();

        for endpoint in [Endpoint::Depart, Endpoint::Arrive] {
            let mut mask = KnowledgeMask::new();
            mask.reveal(liar.id, ClaimDetail::Bell { segment: 0, endpoint });
            let deltas = evaluate_all(&ctx, Some(&mask));
            assert!(deltas.iter().all(|d| d.strike_count == 0), "seed {seed}");
        }
    }
}

// ── Provenance ───────────────────────────────────────────────────────

#[test]
fn test_evidence_cites_only_supplied_ids() {
    for seed in seed_corpus(20) {
        let puzzle = puzzle(seed);
        let claims = puzzle.claims();
        let facts = all_facts(&puzzle);

        let supplied: Vec<FactId> = facts
            .iter()
            .take(5)
            .map(|f| FactId::new(format!("supplied-{}", f.id)))
            .collect();
        let ctx = EvalContext::new(&puzzle.world, &claims, &facts).with_fact_ids(&supplied);
        let deltas = evaluate_all(&ctx, None);
        assert!(provenance_violations(&deltas, &supplied).is_empty());
    }
}

// ── Retry loop ───────────────────────────────────────────────────────

#[test]
fn test_unreachable_margin_falls_back_to_attempt_zero() {
    let config = PipelineConfig {
        max_attempts: 3,
        min_separation: 100,
        require_proof: false,
    };
    let outcome = generate_puzzle(9, &ThemePack::default(), &config).unwrap();
    assert!(outcome.log.degraded);
    assert_eq!(outcome.log.attempts, 3);
    assert_eq!(outcome.log.failures.len(), 3);
    assert_eq!(outcome.log.accepted_attempt, None);
    assert_eq!(outcome.puzzle.attempt, 0);
    assert_eq!(outcome.puzzle.seed, 9);
    assert!(!outcome.puzzle.is_proven());
    for (i, failure) in outcome.log.failures.iter().enumerate() {
        assert_eq!(failure.attempt, i as u32);
        assert_eq!(failure.seed, 9 + i as u32);
        assert!(!failure.present_types.is_empty());
        assert_ne!(failure.timing, TimingViolation::None);
        assert!(failure.injected.contains(&ContradictionType::Time));
        assert!(failure.injected.contains(&ContradictionType::Environment));
    }
}

#[test]
fn test_strict_mode_reports_unsolvable() {
    let config = PipelineConfig {
        max_attempts: 2,
        min_separation: 100,
        require_proof: true,
    };
    let err = generate_puzzle(9, &ThemePack::default(), &config).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Unsolvable {
            base_seed: 9,
            attempts: 2
        }
    ));
}

#[test]
fn test_zero_attempts_still_runs_once() {
    let config = PipelineConfig {
        max_attempts: 0,
        ..PipelineConfig::default()
    };
    let outcome = generate_puzzle(4, &ThemePack::default(), &config).unwrap();
    assert_eq!(outcome.log.attempts, 1);
}

#[test]
fn test_first_attempt_usually_accepted() {
    let outcome = generate_default(20_240_601).unwrap();
    assert_eq!(outcome.log.accepted_attempt, Some(outcome.puzzle.attempt));
    assert_eq!(outcome.log.failures.len() as u32, outcome.puzzle.attempt);
}

#[test]
fn test_batch_preserves_seed_order() {
    let seeds = daily_seeds(500, 6);
    let outcomes = generate_batch(&seeds, &ThemePack::default(), &PipelineConfig::default())
        .unwrap();
    let base: Vec<u32> = outcomes.iter().map(|o| o.puzzle.base_seed).collect();
    assert_eq!(base, seeds);
}

// ── Invariant checks catch tampering ─────────────────────────────────

#[test]
fn test_invariants_flag_second_liar() {
    let mut puzzle = puzzle(31);
    let honest = puzzle.suspects.iter().position(|s| !s.is_liar).unwrap();
    puzzle.suspects[honest].is_liar = true;
    let violations = check_puzzle(&puzzle);
    assert!(violations.iter().any(|v| v.invariant == "single_liar"));
}

#[test]
fn test_invariants_flag_targeted_secondary_and_duplicate_ids() {
    let mut puzzle = puzzle(32);
    let liar_id = puzzle.liar_id;
    puzzle.deck[0].secondary.targets = vec![liar_id];
    puzzle.deck[1].secondary.id = puzzle.deck[0].headline.id.clone();
    let violations = check_puzzle(&puzzle);
    assert!(violations.iter().any(|v| v.invariant == "secondary_is_neutral"));
    assert!(violations.iter().any(|v| v.invariant == "unique_fact_ids"));
}

#[test]
fn test_invariants_flag_unranked_best_pair() {
    let mut puzzle = puzzle(34);
    let proof = puzzle.proof.as_mut().unwrap();
    let best = proof.best_pair;
    proof.pair_rankings.retain(|r| r.pair != best);
    assert!(proof.ranking(best).is_none());
    let violations = check_puzzle(&puzzle);
    assert!(violations
        .iter()
        .any(|v| v.invariant == "proof_separates" && v.message.contains("no ranking")));
}

#[test]
fn test_invariants_flag_liar_holding_relic() {
    let mut puzzle = puzzle(33);
    puzzle.world.relic.holder = Some(puzzle.liar_id);
    let violations = check_puzzle(&puzzle);
    assert!(violations.iter().any(|v| v.invariant == "holder_is_honest"));
}
