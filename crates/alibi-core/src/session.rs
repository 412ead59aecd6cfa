//! Play session over one generated puzzle.
//!
//! The session owns its puzzle. Players draw evidence cards and reveal claim
//! details; standings are always computed from exactly what has been drawn
//! and revealed so far.

use alibi_ir::types::{CardPair, EvidenceCard, Puzzle, StrikeDelta, SuspectId, WorldReveal};
use alibi_model::eval::{evaluate_all, EvalContext};
use alibi_model::knowledge::{ClaimDetail, KnowledgeMask};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no evidence card at index {0}")]
    UnknownCard(usize),

    #[error("evidence card {0} has already been drawn")]
    CardAlreadyDrawn(usize),

    #[error("no suspect {0} in this puzzle")]
    UnknownSuspect(SuspectId),

    #[error("{suspect} has no segment {segment}")]
    UnknownSegment { suspect: SuspectId, segment: usize },

    #[error("an accusation has already been made")]
    AlreadyAccused,
}

/// Result of naming a suspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationOutcome {
    pub accused: SuspectId,
    pub liar_id: SuspectId,
    pub correct: bool,
    /// The drawn evidence alone singled out the accused.
    pub supported: bool,
    /// Standings at the moment of accusation.
    pub gated: Vec<StrikeDelta>,
    /// Every fact, every claim detail.
    pub retrospective: Vec<StrikeDelta>,
    /// Pair of cards that would have cracked the case, when proven.
    pub best_pair: Option<CardPair>,
}

#[derive(Debug, Clone)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    drawn: Vec<usize>,
    knowledge: KnowledgeMask,
    accusation: Option<AccusationOutcome>,
}

impl PuzzleSession {
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            drawn: Vec::new(),
            knowledge: KnowledgeMask::new(),
            accusation: None,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn knowledge(&self) -> &KnowledgeMask {
        &self.knowledge
    }

    pub fn accusation(&self) -> Option<&AccusationOutcome> {
        self.accusation.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.accusation.is_some()
    }

    /// Deck indices in the order they were drawn.
    pub fn drawn(&self) -> &[usize] {
        &self.drawn
    }

    pub fn drawn_cards(&self) -> Vec<&EvidenceCard> {
        self.drawn
            .iter()
            .filter_map(|&i| self.puzzle.deck.get(i))
            .collect()
    }

    /// Facts on every drawn card, headline before secondary.
    pub fn revealed_facts(&self) -> Vec<WorldReveal> {
        self.drawn_cards()
            .into_iter()
            .flat_map(|card| card.facts().map(|f| f.clone()))
            .collect()
    }

    pub fn draw_card(&mut self, index: usize) -> Result<&EvidenceCard, SessionError> {
        self.ensure_open()?;
        if index >= self.puzzle.deck.len() {
            return Err(SessionError::UnknownCard(index));
        }
        if self.drawn.contains(&index) {
            return Err(SessionError::CardAlreadyDrawn(index));
        }
        self.drawn.push(index);
        debug!(index, drawn = self.drawn.len(), "card drawn");
        self.puzzle
            .deck
            .get(index)
            .ok_or(SessionError::UnknownCard(index))
    }

    /// Reveal one detail of a suspect's testimony. Revealing twice is a no-op.
    pub fn reveal(&mut self, suspect: SuspectId, detail: ClaimDetail) -> Result<(), SessionError> {
        self.ensure_open()?;
        let claim = &self
            .puzzle
            .suspect(suspect)
            .ok_or(SessionError::UnknownSuspect(suspect))?
            .claim;
        if let ClaimDetail::Bell { segment, .. } = detail {
            if segment >= claim.segments.len() {
                return Err(SessionError::UnknownSegment { suspect, segment });
            }
        }
        self.knowledge.reveal(suspect, detail);
        debug!(%suspect, ?detail, "claim detail revealed");
        Ok(())
    }

    /// Strikes from drawn facts against revealed details only.
    pub fn standings(&self) -> Vec<StrikeDelta> {
        let facts = self.revealed_facts();
        let claims = self.puzzle.claims();
        let ctx = EvalContext::new(&self.puzzle.world, &claims, &facts);
        evaluate_all(&ctx, Some(&self.knowledge))
    }

    /// Full-information standings over the whole deck.
    pub fn retrospective(&self) -> Vec<StrikeDelta> {
        let facts: Vec<WorldReveal> = self
            .puzzle
            .deck
            .iter()
            .flat_map(|card| card.facts().map(|f| f.clone()))
            .collect();
        let claims = self.puzzle.claims();
        let ctx = EvalContext::new(&self.puzzle.world, &claims, &facts);
        evaluate_all(&ctx, None)
    }

    /// Name the liar. Closes the session.
    pub fn accuse(&mut self, accused: SuspectId) -> Result<&AccusationOutcome, SessionError> {
        self.ensure_open()?;
        if self.puzzle.suspect(accused).is_none() {
            return Err(SessionError::UnknownSuspect(accused));
        }

        let gated = self.standings();
        let accused_strikes = strikes_of(&gated, accused);
        let supported = accused_strikes > 0
            && gated
                .iter()
                .filter(|d| d.suspect_id != accused)
                .all(|d| d.strike_count < accused_strikes);

        let outcome = AccusationOutcome {
            accused,
            liar_id: self.puzzle.liar_id,
            correct: accused == self.puzzle.liar_id,
            supported,
            gated,
            retrospective: self.retrospective(),
            best_pair: self.puzzle.proof.as_ref().map(|p| p.best_pair),
        };
        info!(
            seed = self.puzzle.base_seed,
            %accused,
            correct = outcome.correct,
            supported,
            cards = self.drawn.len(),
            "accusation made"
        );
        Ok(self.accusation.insert(outcome))
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.accusation.is_some() {
            return Err(SessionError::AlreadyAccused);
        }
        Ok(())
    }
}

fn strikes_of(deltas: &[StrikeDelta], suspect: SuspectId) -> u32 {
    deltas
        .iter()
        .find(|d| d.suspect_id == suspect)
        .map_or(0, |d| d.strike_count)
}
