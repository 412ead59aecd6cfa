//! Knowledge masks: which claim details the player has actually unlocked.
//!
//! A mask gates the evaluator. A check only runs once every claim detail it
//! reads is known; a segment's timing needs *both* of its bells (or the
//! route override), never just one.

use std::collections::{BTreeMap, BTreeSet};

use alibi_ir::types::SuspectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Depart,
    Arrive,
}

/// A single unlockable claim detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum ClaimDetail {
    Bell { segment: usize, endpoint: Endpoint },
    /// Every segment's timing at once.
    Route,
    Horn,
    Relic,
    Scent,
}

/// What the player knows about one suspect's claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimKnowledge {
    pub known_bells: BTreeSet<(usize, Endpoint)>,
    pub route_fully_known: bool,
    pub horn: bool,
    pub relic: bool,
    pub scent: bool,
}

impl ClaimKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&mut self, detail: ClaimDetail) {
        match detail {
            ClaimDetail::Bell { segment, endpoint } => {
                self.known_bells.insert((segment, endpoint));
            }
            ClaimDetail::Route => self.route_fully_known = true,
            ClaimDetail::Horn => self.horn = true,
            ClaimDetail::Relic => self.relic = true,
            ClaimDetail::Scent => self.scent = true,
        }
    }

    pub fn with(mut self, detail: ClaimDetail) -> Self {
        self.reveal(detail);
        self
    }

    /// Both endpoint bells of `segment` are known.
    pub fn segment_known(&self, segment: usize) -> bool {
        self.route_fully_known
            || (self.known_bells.contains(&(segment, Endpoint::Depart))
                && self.known_bells.contains(&(segment, Endpoint::Arrive)))
    }

    /// Nothing revealed yet; every check would be skipped.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-suspect knowledge. Suspects without an entry are completely unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeMask {
    pub per_suspect: BTreeMap<SuspectId, ClaimKnowledge>,
}

impl KnowledgeMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reveal(&mut self, suspect: SuspectId, detail: ClaimDetail) {
        self.per_suspect.entry(suspect).or_default().reveal(detail);
    }

    pub fn for_suspect(&self, suspect: SuspectId) -> Option<&ClaimKnowledge> {
        self.per_suspect.get(&suspect)
    }
}
