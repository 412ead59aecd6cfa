//! Claim generator.
//!
//! Five honest claims are random walks that respect every travel cost and
//! only ever state ground truth. The liar's claim is built around a timing
//! violation and then layered with independent false horn, relic and scent
//! assertions.

use std::collections::BTreeSet;

use alibi_ir::types::{
    Bell, ClaimVector, ContradictionType, HornClaim, LocationId, ScentClaim, Segment, TravelEdge,
    World, LAST_BELL, POOL_SIZE, SUSPECT_COUNT,
};
use serde::{Deserialize, Serialize};

use super::rng::SeededRng;

pub const HONEST_COUNT: usize = SUSPECT_COUNT - 1;
pub const TRAVEL_CHANCE: f64 = 0.7;
pub const HORN_CHANCE: f64 = 0.6;
pub const SCENT_CHANCE: f64 = 0.5;
pub const LIAR_RELIC_CHANCE: f64 = 0.7;

/// How the liar's timing violation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingViolation {
    /// A slow edge travelled in fewer bells than it needs.
    UnderAllocated,
    /// No slow edge: the longest edge, one bell short.
    LongestEdge,
    /// Departure and arrival in the same bell.
    Instant,
    /// Degenerate single-location world; no violation possible.
    None,
}

#[derive(Debug, Clone)]
pub struct LiarClaim {
    pub claim: ClaimVector,
    pub timing: TimingViolation,
    /// Rule families the claim was built to break.
    pub injected: BTreeSet<ContradictionType>,
}

/// Generate the honest claims, in generation order.
pub fn generate_honest_claims(rng: &mut SeededRng, world: &World) -> Vec<ClaimVector> {
    let locations = world.location_ids();
    let mut used_starts: Vec<LocationId> = Vec::new();
    let mut claims = Vec::with_capacity(HONEST_COUNT);

    for index in 0..HONEST_COUNT {
        let mut available: Vec<LocationId> = locations
            .iter()
            .copied()
            .filter(|l| !used_starts.contains(l))
            .collect();
        if available.is_empty() {
            used_starts.clear();
            available = locations.clone();
        }
        let Some(start) = rng.pick(&available) else {
            break;
        };
        used_starts.push(start);
        let start_bell = rng.int_between(0, 2) as Bell;

        let mut claim = ClaimVector::new(random_walk(rng, world, start, start_bell));

        if rng.uniform_float() < HORN_CHANCE {
            let anchor = world.anchor;
            if let Some(listener_at) = claim.location_at(anchor.bell) {
                claim.heard_horn = Some(HornClaim {
                    bell: anchor.bell,
                    heard_from: anchor.location,
                    listener_at,
                });
            }
        }

        if index == 0 {
            claim.carried_relic = Some(world.relic.relic);
        }

        if rng.uniform_float() < SCENT_CHANCE {
            claim.sensed = claim
                .final_location()
                .and_then(|at| world.environment_at(at))
                .map(|env| ScentClaim {
                    scent: env.scent,
                    location: env.location,
                });
        }

        claims.push(claim);
    }

    claims
}

/// One or two legs, never overrunning the last bell.
fn random_walk(
    rng: &mut SeededRng,
    world: &World,
    start: LocationId,
    start_bell: Bell,
) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = start;
    let mut bell = start_bell;
    let legs = rng.int_between(1, 2);

    for _ in 0..legs {
        let budget = LAST_BELL.saturating_sub(bell);
        if budget == 0 {
            break;
        }

        if rng.uniform_float() < TRAVEL_CHANCE {
            let reachable: Vec<&TravelEdge> = world
                .edges_from(current)
                .filter(|e| e.bells_required <= budget)
                .collect();
            if !reachable.is_empty() {
                let edge = reachable[rng.pick_index(reachable.len())];
                segments.push(Segment {
                    from: current,
                    to: edge.to,
                    depart_bell: bell,
                    arrive_bell: bell + edge.bells_required,
                });
                current = edge.to;
                bell += edge.bells_required;
                continue;
            }
        }

        let stay = (rng.int_between(1, 2) as Bell).min(budget);
        segments.push(Segment {
            from: current,
            to: current,
            depart_bell: bell,
            arrive_bell: bell + stay,
        });
        bell += stay;
    }

    if segments.is_empty() {
        segments.push(Segment {
            from: current,
            to: current,
            depart_bell: bell,
            arrive_bell: bell,
        });
    }
    segments
}

/// Generate the single inconsistent claim.
pub fn generate_liar_claim(rng: &mut SeededRng, world: &World) -> LiarClaim {
    let locations = world.location_ids();
    let start = match rng.pick(&locations) {
        Some(start) => start,
        None => LocationId(0),
    };
    let start_bell = rng.int_between(0, 2) as Bell;
    let mut injected = BTreeSet::new();

    let (segment, timing) = timing_violation(rng, world, &locations, start, start_bell);
    if timing != TimingViolation::None {
        injected.insert(ContradictionType::Time);
        if segment.depart_bell == segment.arrive_bell {
            injected.insert(ContradictionType::Movement);
        }
    }
    let mut claim = ClaimVector::new(vec![segment]);

    let anchor = world.anchor;
    let decoys: Vec<LocationId> = locations
        .iter()
        .copied()
        .filter(|l| *l != anchor.location)
        .collect();
    if let Some(heard_from) = rng.pick(&decoys) {
        claim.heard_horn = Some(HornClaim {
            bell: anchor.bell,
            heard_from,
            listener_at: claim.location_at(anchor.bell).unwrap_or(start),
        });
        injected.insert(ContradictionType::Time);
    }

    if rng.uniform_float() < LIAR_RELIC_CHANCE {
        claim.carried_relic = Some(world.relic.relic);
        injected.insert(ContradictionType::Object);
    }

    if let Some(env) = world.environment_at(segment.to) {
        let wrong: Vec<usize> = (0..POOL_SIZE).filter(|s| *s != env.scent).collect();
        if let Some(scent) = rng.pick(&wrong) {
            claim.sensed = Some(ScentClaim {
                scent,
                location: env.location,
            });
            injected.insert(ContradictionType::Environment);
        }
    }

    LiarClaim {
        claim,
        timing,
        injected,
    }
}

fn timing_violation(
    rng: &mut SeededRng,
    world: &World,
    locations: &[LocationId],
    start: LocationId,
    start_bell: Bell,
) -> (Segment, TimingViolation) {
    let qualifying: Vec<&TravelEdge> = world
        .edges_from(start)
        .filter(|e| e.bells_required >= 2 && start_bell < LAST_BELL)
        .collect();
    if !qualifying.is_empty() {
        let edge = qualifying[rng.pick_index(qualifying.len())];
        let max_bells = u32::from(edge.bells_required - 1).min(u32::from(LAST_BELL - start_bell));
        let bells = rng.int_between(1, max_bells) as Bell;
        return (
            Segment {
                from: start,
                to: edge.to,
                depart_bell: start_bell,
                arrive_bell: start_bell + bells,
            },
            TimingViolation::UnderAllocated,
        );
    }

    let longest = world.edges_from(start).fold(None::<&TravelEdge>, |best, e| {
        match best {
            Some(b) if b.minutes >= e.minutes => Some(b),
            _ => Some(e),
        }
    });
    if let Some(edge) = longest {
        let bells = edge.bells_required - 1;
        if start_bell + bells <= LAST_BELL {
            return (
                Segment {
                    from: start,
                    to: edge.to,
                    depart_bell: start_bell,
                    arrive_bell: start_bell + bells,
                },
                TimingViolation::LongestEdge,
            );
        }
    }

    match locations.iter().copied().find(|l| *l != start) {
        Some(to) => (
            Segment {
                from: start,
                to,
                depart_bell: start_bell,
                arrive_bell: start_bell,
            },
            TimingViolation::Instant,
        ),
        None => (
            Segment {
                from: start,
                to: start,
                depart_bell: start_bell,
                arrive_bell: LAST_BELL,
            },
            TimingViolation::None,
        ),
    }
}
