//! Contradiction evaluator.
//!
//! Scores a claim against a set of revealed facts. Five independent checkers
//! run over the claim; each produced [`Evidence`] cites exactly the supplied
//! fact IDs that enabled it. Strike count is the number of evidence items.
//!
//! Without knowledge every check runs (full-information analysis). With
//! knowledge, a check whose claim detail is still hidden is skipped outright.

use alibi_ir::types::{
    ClaimVector, ContradictionType, Evidence, FactId, RevealSubject, StrikeDelta, SuspectId,
    World, WorldReveal,
};

use crate::knowledge::{ClaimKnowledge, KnowledgeMask};

/// Everything the checkers may read besides the claim itself.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub world: &'a World,
    /// Every suspect's claim, for cross-suspect comparisons.
    pub claims: &'a [ClaimVector],
    pub facts: &'a [WorldReveal],
    /// Caller-supplied IDs, positional over `facts`. When present they replace
    /// the facts' own IDs; facts past the end of the list cannot be cited and
    /// are ignored.
    pub fact_ids: Option<&'a [FactId]>,
}

impl<'a> EvalContext<'a> {
    pub fn new(world: &'a World, claims: &'a [ClaimVector], facts: &'a [WorldReveal]) -> Self {
        Self {
            world,
            claims,
            facts,
            fact_ids: None,
        }
    }

    pub fn with_fact_ids(mut self, fact_ids: &'a [FactId]) -> Self {
        self.fact_ids = Some(fact_ids);
        self
    }

    /// Facts paired with the ID they may be cited under.
    fn citable(&self) -> Vec<(&'a FactId, &'a WorldReveal)> {
        match self.fact_ids {
            Some(ids) => ids.iter().zip(self.facts.iter()).collect(),
            None => self.facts.iter().map(|f| (&f.id, f)).collect(),
        }
    }
}

/// Citable facts, filtered per checker.
struct Facts<'a> {
    entries: Vec<(&'a FactId, &'a WorldReveal)>,
}

impl<'a> Facts<'a> {
    fn ids_where(&self, pred: impl Fn(&WorldReveal) -> bool) -> Vec<FactId> {
        let mut ids: Vec<FactId> = Vec::new();
        for (id, fact) in &self.entries {
            if pred(*fact) && !ids.contains(*id) {
                ids.push((*id).clone());
            }
        }
        ids
    }

    fn of_type(&self, kinds: &[ContradictionType]) -> Vec<FactId> {
        self.ids_where(|f| kinds.contains(&f.contradiction_type))
    }
}

/// Score every claim in the context.
///
/// Claims that have not been stamped with a suspect ID are reported under
/// their position in `ctx.claims`, saturating at `u8::MAX`.
pub fn evaluate_all(ctx: &EvalContext<'_>, mask: Option<&KnowledgeMask>) -> Vec<StrikeDelta> {
    let empty = ClaimKnowledge::default();
    ctx.claims
        .iter()
        .enumerate()
        .map(|(index, claim)| {
            let suspect_id = claim
                .suspect_id
                .unwrap_or_else(|| SuspectId(u8::try_from(index).unwrap_or(u8::MAX)));
            let knowledge = mask.map(|m| m.for_suspect(suspect_id).unwrap_or(&empty));
            let evidence = collect_evidence(ctx, claim, knowledge);
            StrikeDelta::new(suspect_id, evidence)
        })
        .collect()
}

/// Score a single claim. An unstamped claim is reported as suspect 0.
pub fn evaluate_claim(
    ctx: &EvalContext<'_>,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
) -> StrikeDelta {
    let suspect_id = claim.suspect_id.unwrap_or(SuspectId(0));
    StrikeDelta::new(suspect_id, collect_evidence(ctx, claim, knowledge))
}

fn collect_evidence(
    ctx: &EvalContext<'_>,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
) -> Vec<Evidence> {
    if knowledge.is_some_and(ClaimKnowledge::is_empty) {
        return Vec::new();
    }
    let facts = Facts {
        entries: ctx.citable(),
    };

    let mut evidence = Vec::new();
    check_travel_time(ctx.world, claim, knowledge, &facts, &mut evidence);
    check_instant_travel(claim, knowledge, &facts, &mut evidence);
    check_horn(ctx.world, claim, knowledge, &facts, &mut evidence);
    check_relic(ctx, claim, knowledge, &facts, &mut evidence);
    check_scent(ctx.world, claim, knowledge, &facts, &mut evidence);
    evidence
}

fn segment_unlocked(knowledge: Option<&ClaimKnowledge>, segment: usize) -> bool {
    knowledge.map_or(true, |k| k.segment_known(segment))
}

/// Travel claimed in fewer bells than the route requires.
fn check_travel_time(
    world: &World,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
    facts: &Facts<'_>,
    out: &mut Vec<Evidence>,
) {
    let sources = facts.of_type(&[ContradictionType::Time, ContradictionType::Movement]);
    if sources.is_empty() {
        return;
    }

    for (index, segment) in claim.segments.iter().enumerate() {
        if !segment.is_travel() || !segment_unlocked(knowledge, index) {
            continue;
        }
        let Some(edge) = world.edge(segment.from, segment.to) else {
            continue;
        };
        if segment.duration() < edge.bells_required {
            out.push(Evidence {
                contradiction_type: ContradictionType::Time,
                description: format!(
                    "claims {} -> {} in {} bell(s) (bells {}..{}), but the route needs {}",
                    segment.from,
                    segment.to,
                    segment.duration(),
                    segment.depart_bell,
                    segment.arrive_bell,
                    edge.bells_required
                ),
                related_segment: Some(index),
                source_fact_ids: sources.clone(),
            });
        }
    }
}

/// Travel between two different places without any bell passing.
fn check_instant_travel(
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
    facts: &Facts<'_>,
    out: &mut Vec<Evidence>,
) {
    let sources = facts.of_type(&[ContradictionType::Movement]);
    if sources.is_empty() {
        return;
    }

    for (index, segment) in claim.segments.iter().enumerate() {
        if !segment.is_travel() || !segment_unlocked(knowledge, index) {
            continue;
        }
        if segment.depart_bell == segment.arrive_bell {
            out.push(Evidence {
                contradiction_type: ContradictionType::Movement,
                description: format!(
                    "claims to leave {} and reach {} within bell {}",
                    segment.from, segment.to, segment.depart_bell
                ),
                related_segment: Some(index),
                source_fact_ids: sources.clone(),
            });
        }
    }
}

/// Horn heard from somewhere other than where it actually sounded.
fn check_horn(
    world: &World,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
    facts: &Facts<'_>,
    out: &mut Vec<Evidence>,
) {
    let Some(horn) = claim.heard_horn else {
        return;
    };
    if !knowledge.map_or(true, |k| k.horn) {
        return;
    }

    let anchor = world.anchor;
    let sources = facts.ids_where(|f| {
        f.contradiction_type == ContradictionType::Time
            && f.subject
                == RevealSubject::Anchor {
                    bell: anchor.bell,
                    location: anchor.location,
                }
    });
    if sources.is_empty() {
        return;
    }

    if horn.heard_from != anchor.location {
        out.push(Evidence {
            contradiction_type: ContradictionType::Time,
            description: format!(
                "says the horn at bell {} came from {}, but it sounded from {}",
                horn.bell, horn.heard_from, anchor.location
            ),
            related_segment: None,
            source_fact_ids: sources,
        });
    }
}

/// Relic claimed by more than one suspect, or by someone other than its holder.
fn check_relic(
    ctx: &EvalContext<'_>,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
    facts: &Facts<'_>,
    out: &mut Vec<Evidence>,
) {
    let Some(relic) = claim.carried_relic else {
        return;
    };
    if !knowledge.map_or(true, |k| k.relic) {
        return;
    }
    let sources = facts.of_type(&[ContradictionType::Object]);
    if sources.is_empty() {
        return;
    }

    let rivals: Vec<String> = ctx
        .claims
        .iter()
        .filter(|other| !same_claimant(claim, other) && other.carried_relic == Some(relic))
        .map(|other| match other.suspect_id {
            Some(id) => id.to_string(),
            None => "another suspect".to_string(),
        })
        .collect();
    if !rivals.is_empty() {
        out.push(Evidence {
            contradiction_type: ContradictionType::Object,
            description: format!(
                "claims relic #{relic}, which {} also claims to carry",
                rivals.join(", ")
            ),
            related_segment: None,
            source_fact_ids: sources.clone(),
        });
    }

    let truth = &ctx.world.relic;
    if relic == truth.relic {
        if let Some(holder) = truth.holder {
            if claim.suspect_id != Some(holder) {
                out.push(Evidence {
                    contradiction_type: ContradictionType::Object,
                    description: format!(
                        "claims relic #{relic}, but it was in the keeping of {holder}"
                    ),
                    related_segment: None,
                    source_fact_ids: sources,
                });
            }
        }
    }
}

/// Scent reading that disagrees with the ambient record.
fn check_scent(
    world: &World,
    claim: &ClaimVector,
    knowledge: Option<&ClaimKnowledge>,
    facts: &Facts<'_>,
    out: &mut Vec<Evidence>,
) {
    let Some(sensed) = claim.sensed else {
        return;
    };
    if !knowledge.map_or(true, |k| k.scent) {
        return;
    }
    let sources = facts.of_type(&[ContradictionType::Environment]);
    if sources.is_empty() {
        return;
    }
    let Some(truth) = world.environment_at(sensed.location) else {
        return;
    };

    if sensed.scent != truth.scent {
        out.push(Evidence {
            contradiction_type: ContradictionType::Environment,
            description: format!(
                "reports scent #{} at {}, but the air there carried scent #{}",
                sensed.scent, sensed.location, truth.scent
            ),
            related_segment: None,
            source_fact_ids: sources,
        });
    }
}

fn same_claimant(a: &ClaimVector, b: &ClaimVector) -> bool {
    match (a.suspect_id, b.suspect_id) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
