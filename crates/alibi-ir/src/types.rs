use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of discrete bells in the daily clock.
pub const BELL_COUNT: u8 = 6;
/// Index of the final bell of the day.
pub const LAST_BELL: Bell = BELL_COUNT - 1;
/// Size of every theme label pool.
pub const POOL_SIZE: usize = 6;
/// Locations chosen from the pool for a single puzzle.
pub const LOCATIONS_PER_PUZZLE: usize = 4;
/// Suspects seated in every puzzle.
pub const SUSPECT_COUNT: usize = 6;
/// Evidence cards dealt per puzzle.
pub const CARD_COUNT: usize = 4;

/// A bell index in `0..BELL_COUNT`.
pub type Bell = u8;

// ── Identifiers ──────────────────────────────────────────────────────

/// Index of a location in the theme's location pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub u8);

/// Slot index of a suspect (0..SUSPECT_COUNT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuspectId(pub u8);

/// Stable identifier of a revealed fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(pub String);

impl FactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loc-{}", self.0)
    }
}

impl fmt::Display for SuspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "suspect-{}", self.0)
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── World ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    pub fn distance(&self, other: &Coords) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Position in the puzzle's chosen-location list.
    pub display_index: usize,
    pub coords: Coords,
}

/// Directed travel cost between two chosen locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEdge {
    pub from: LocationId,
    pub to: LocationId,
    pub minutes: u32,
    pub bells_required: u8,
}

/// The single globally-true timestamped event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnchor {
    pub bell: Bell,
    pub location: LocationId,
}

/// Ambient scent reading at one location, independent of any suspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentFact {
    pub location: LocationId,
    /// Index into the theme's scent pool.
    pub scent: usize,
    pub from_bell: Bell,
    pub to_bell: Bell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelicTruth {
    /// Index into the theme's relic pool.
    pub relic: usize,
    pub location: LocationId,
    /// Resolved during suspect assembly; always an honest suspect.
    pub holder: Option<SuspectId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub locations: Vec<Location>,
    pub edges: Vec<TravelEdge>,
    pub anchor: TimeAnchor,
    pub environment: Vec<EnvironmentFact>,
    pub relic: RelicTruth,
}

impl World {
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn location_ids(&self) -> Vec<LocationId> {
        self.locations.iter().map(|l| l.id).collect()
    }

    pub fn edge(&self, from: LocationId, to: LocationId) -> Option<&TravelEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// Outgoing edges from a location, in generation order.
    pub fn edges_from(&self, from: LocationId) -> impl Iterator<Item = &TravelEdge> {
        self.edges.iter().filter(move |e| e.from == from)
    }

    pub fn environment_at(&self, location: LocationId) -> Option<&EnvironmentFact> {
        self.environment.iter().find(|f| f.location == location)
    }
}

// ── Claims ───────────────────────────────────────────────────────────

/// One leg of a suspect's testimony. `from == to` means the suspect stayed put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub from: LocationId,
    pub to: LocationId,
    pub depart_bell: Bell,
    pub arrive_bell: Bell,
}

impl Segment {
    pub fn is_travel(&self) -> bool {
        self.from != self.to
    }

    /// Claimed duration in bells. Saturates for malformed segments.
    pub fn duration(&self) -> u8 {
        self.arrive_bell.saturating_sub(self.depart_bell)
    }
}

/// "I heard the horn at bell `bell`, from the direction of `heard_from`,
/// while standing at `listener_at`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HornClaim {
    pub bell: Bell,
    pub heard_from: LocationId,
    pub listener_at: LocationId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScentClaim {
    /// Index into the theme's scent pool.
    pub scent: usize,
    pub location: LocationId,
}

/// A suspect's full testimony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimVector {
    /// Stamped once the claim is seated in a suspect slot.
    pub suspect_id: Option<SuspectId>,
    pub segments: Vec<Segment>,
    pub heard_horn: Option<HornClaim>,
    /// Index into the theme's relic pool.
    pub carried_relic: Option<usize>,
    pub sensed: Option<ScentClaim>,
}

impl ClaimVector {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            suspect_id: None,
            segments,
            heard_horn: None,
            carried_relic: None,
            sensed: None,
        }
    }

    pub fn start_location(&self) -> Option<LocationId> {
        self.segments.first().map(|s| s.from)
    }

    pub fn final_location(&self) -> Option<LocationId> {
        self.segments.last().map(|s| s.to)
    }

    /// Where the claimant says they were at `bell`, or `None` while in transit.
    ///
    /// Before the first segment the claimant is at its origin; after the last
    /// segment they remain at its destination.
    pub fn location_at(&self, bell: Bell) -> Option<LocationId> {
        let first = self.segments.first()?;
        if bell <= first.depart_bell {
            return Some(first.from);
        }
        let mut current = first.from;
        for segment in &self.segments {
            if bell < segment.depart_bell {
                return Some(current);
            }
            if bell < segment.arrive_bell {
                return if segment.is_travel() {
                    None
                } else {
                    Some(segment.from)
                };
            }
            current = segment.to;
        }
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suspect {
    pub id: SuspectId,
    /// Index into the shuffled persona pool. Cosmetic only.
    pub persona: usize,
    pub claim: ClaimVector,
    pub is_liar: bool,
}

// ── Evidence ─────────────────────────────────────────────────────────

/// Rule family a contradiction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    Time,
    Movement,
    Object,
    Environment,
}

impl ContradictionType {
    pub const ALL: [ContradictionType; 4] = [
        ContradictionType::Time,
        ContradictionType::Movement,
        ContradictionType::Object,
        ContradictionType::Environment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionType::Time => "time",
            ContradictionType::Movement => "movement",
            ContradictionType::Object => "object",
            ContradictionType::Environment => "environment",
        }
    }
}

impl fmt::Display for ContradictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence card family. Each archetype is bound to exactly one contradiction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    BellTower,
    FerryLog,
    Reliquary,
    Herbarium,
}

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::BellTower,
        Archetype::FerryLog,
        Archetype::Reliquary,
        Archetype::Herbarium,
    ];

    pub fn contradiction_type(&self) -> ContradictionType {
        match self {
            Archetype::BellTower => ContradictionType::Time,
            Archetype::FerryLog => ContradictionType::Movement,
            Archetype::Reliquary => ContradictionType::Object,
            Archetype::Herbarium => ContradictionType::Environment,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Archetype::BellTower => "bell_tower",
            Archetype::FerryLog => "ferry_log",
            Archetype::Reliquary => "reliquary",
            Archetype::Herbarium => "herbarium",
        }
    }
}

/// Structured payload behind a fact's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealSubject {
    Anchor {
        bell: Bell,
        location: LocationId,
    },
    Edge {
        from: LocationId,
        to: LocationId,
        bells_required: u8,
    },
    RelicTruth {
        relic: usize,
        location: LocationId,
        holder: Option<SuspectId>,
    },
    RelicDecoy {
        relic: usize,
        location: LocationId,
    },
    Environment {
        location: LocationId,
        scent: usize,
        from_bell: Bell,
        to_bell: Bell,
    },
    Ambient {
        location: LocationId,
        bell: Bell,
    },
}

/// A world fact revealed by an evidence card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldReveal {
    pub id: FactId,
    pub contradiction_type: ContradictionType,
    pub text: String,
    /// Suspects this fact is built to catch. Empty for neutral facts.
    pub targets: Vec<SuspectId>,
    pub subject: RevealSubject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceCard {
    pub archetype: Archetype,
    pub headline: WorldReveal,
    pub secondary: WorldReveal,
}

impl EvidenceCard {
    pub fn facts(&self) -> [&WorldReveal; 2] {
        [&self.headline, &self.secondary]
    }
}

/// A single detected contradiction, with the facts that justified it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub contradiction_type: ContradictionType,
    pub description: String,
    pub related_segment: Option<usize>,
    pub source_fact_ids: Vec<FactId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeDelta {
    pub suspect_id: SuspectId,
    pub strike_count: u32,
    pub evidence: Vec<Evidence>,
}

impl StrikeDelta {
    pub fn new(suspect_id: SuspectId, evidence: Vec<Evidence>) -> Self {
        Self {
            suspect_id,
            strike_count: evidence.len() as u32,
            evidence,
        }
    }
}

// ── Solvability ──────────────────────────────────────────────────────

/// Unordered pair of deck indices, stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardPair(pub usize, pub usize);

impl CardPair {
    /// All pairs over a full deck, in stable order.
    pub fn all() -> Vec<CardPair> {
        Self::over(CARD_COUNT)
    }

    /// All pairs over `count` cards: `(0,1), (0,2), .., (count-2, count-1)`.
    pub fn over(count: usize) -> Vec<CardPair> {
        let mut pairs = Vec::new();
        for i in 0..count {
            for j in (i + 1)..count {
                pairs.push(CardPair(i, j));
            }
        }
        pairs
    }
}

impl fmt::Display for CardPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRanking {
    pub pair: CardPair,
    pub deltas: Vec<StrikeDelta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairExplanation {
    pub pair: CardPair,
    pub liar_strikes: u32,
    pub runner_up_strikes: u32,
    pub separation_margin: i32,
    pub triggered_types: BTreeSet<ContradictionType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvabilityProof {
    pub best_pair: CardPair,
    pub pair_rankings: Vec<PairRanking>,
    pub pair_explanations: Vec<PairExplanation>,
    /// Other pairs sharing the best pair's margin.
    pub tie_pairs: Vec<CardPair>,
}

impl SolvabilityProof {
    pub fn explanation(&self, pair: CardPair) -> Option<&PairExplanation> {
        self.pair_explanations.iter().find(|e| e.pair == pair)
    }

    pub fn best_explanation(&self) -> Option<&PairExplanation> {
        self.explanation(self.best_pair)
    }

    pub fn ranking(&self, pair: CardPair) -> Option<&PairRanking> {
        self.pair_rankings.iter().find(|r| r.pair == pair)
    }
}

// ── Puzzle ───────────────────────────────────────────────────────────

/// A fully generated puzzle, owned by whoever requested it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub base_seed: u32,
    /// Seed of the attempt whose artifacts were kept.
    pub seed: u32,
    pub attempt: u32,
    pub world: World,
    pub suspects: Vec<Suspect>,
    pub liar_id: SuspectId,
    pub deck: Vec<EvidenceCard>,
    /// `None` when generation fell back to an unproven puzzle.
    pub proof: Option<SolvabilityProof>,
}

impl Puzzle {
    pub fn suspect(&self, id: SuspectId) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == id)
    }

    pub fn liar(&self) -> Option<&Suspect> {
        self.suspect(self.liar_id)
    }

    pub fn claims(&self) -> Vec<ClaimVector> {
        self.suspects.iter().map(|s| s.claim.clone()).collect()
    }

    pub fn is_proven(&self) -> bool {
        self.proof.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(from: u8, to: u8, depart: Bell, arrive: Bell) -> Segment {
        Segment {
            from: LocationId(from),
            to: LocationId(to),
            depart_bell: depart,
            arrive_bell: arrive,
        }
    }

    #[test]
    fn test_location_at_follows_segments() {
        let claim = ClaimVector::new(vec![seg(0, 1, 1, 3), seg(1, 1, 3, 5)]);
        assert_eq!(claim.location_at(0), Some(LocationId(0)));
        assert_eq!(claim.location_at(1), Some(LocationId(0)));
        assert_eq!(claim.location_at(2), None);
        assert_eq!(claim.location_at(3), Some(LocationId(1)));
        assert_eq!(claim.location_at(5), Some(LocationId(1)));
    }

    #[test]
    fn test_instant_travel_has_no_transit_window() {
        let claim = ClaimVector::new(vec![seg(2, 3, 2, 2)]);
        assert_eq!(claim.location_at(2), Some(LocationId(2)));
        assert_eq!(claim.location_at(3), Some(LocationId(3)));
    }

    #[test]
    fn test_archetypes_cover_every_contradiction_type() {
        let types: BTreeSet<_> = Archetype::ALL
            .iter()
            .map(|a| a.contradiction_type())
            .collect();
        assert_eq!(types.len(), ContradictionType::ALL.len());
    }

    #[test]
    fn test_card_pairs_are_stable() {
        let pairs = CardPair::all();
        assert_eq!(
            pairs,
            vec![
                CardPair(0, 1),
                CardPair(0, 2),
                CardPair(0, 3),
                CardPair(1, 2),
                CardPair(1, 3),
                CardPair(2, 3),
            ]
        );
    }
}
