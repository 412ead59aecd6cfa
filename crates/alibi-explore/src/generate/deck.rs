//! Evidence deck builder.
//!
//! One card per archetype. Each card carries a headline fact aimed at the
//! liar and a neutral secondary fact drawn from the same rule family.

use alibi_ir::theme::{interpolate, ThemePack};
use alibi_ir::types::{
    Archetype, Bell, EvidenceCard, FactId, LocationId, RevealSubject, Segment, Suspect,
    SuspectId, TravelEdge, World, WorldReveal, LAST_BELL, POOL_SIZE,
};

use super::rng::SeededRng;

const FERRY_TEMPLATE: &str =
    "The ferry log records the crossing from the {from} to the {to} as taking {count} bell(s).";
const RELIC_TEMPLATE: &str = "The {relic} was kept at the {location} by {holder}.";
const RELIC_UNATTENDED_TEMPLATE: &str = "The {relic} lay unattended at the {location}.";
const DECOY_TEMPLATE: &str = "A {relic} was catalogued at the {location}.";
const HERBARIUM_TEMPLATE: &str =
    "The herbarium notes {scent} hanging over the {location} from {from} until {to}.";

/// Build the four cards, archetypes in shuffled order.
pub fn build_deck(
    rng: &mut SeededRng,
    world: &World,
    suspects: &[Suspect],
    liar_id: SuspectId,
    theme: &ThemePack,
) -> Vec<EvidenceCard> {
    let mut order = Archetype::ALL;
    rng.shuffle(&mut order);

    let builder = DeckBuilder {
        world,
        suspects,
        liar_id,
        theme,
    };
    order
        .iter()
        .map(|&archetype| builder.card(rng, archetype))
        .collect()
}

struct DeckBuilder<'a> {
    world: &'a World,
    suspects: &'a [Suspect],
    liar_id: SuspectId,
    theme: &'a ThemePack,
}

impl<'a> DeckBuilder<'a> {
    fn card(&self, rng: &mut SeededRng, archetype: Archetype) -> EvidenceCard {
        let ((headline_text, headline), (secondary_text, secondary)) = match archetype {
            Archetype::BellTower => (self.anchor(), self.ambient(rng)),
            Archetype::FerryLog => {
                let liar_edge = self.liar_edge();
                (self.ferry(liar_edge), self.ferry(self.other_edge(rng, liar_edge)))
            }
            Archetype::Reliquary => (self.relic_truth(), self.relic_decoy(rng)),
            Archetype::Herbarium => {
                let at = self.liar_scent_location();
                (self.environment(at), self.environment(self.other_location(rng, at)))
            }
        };

        let kind = archetype.contradiction_type();
        EvidenceCard {
            archetype,
            headline: WorldReveal {
                id: FactId::new(format!("{}.headline", archetype.slug())),
                contradiction_type: kind,
                text: headline_text,
                targets: vec![self.liar_id],
                subject: headline,
            },
            secondary: WorldReveal {
                id: FactId::new(format!("{}.secondary", archetype.slug())),
                contradiction_type: kind,
                text: secondary_text,
                targets: Vec::new(),
                subject: secondary,
            },
        }
    }

    fn liar_segments(&self) -> &'a [Segment] {
        self.suspects
            .iter()
            .find(|s| s.id == self.liar_id)
            .map(|s| s.claim.segments.as_slice())
            .unwrap_or(&[])
    }

    // ── Time ─────────────────────────────────────────────────────────

    fn anchor(&self) -> (String, RevealSubject) {
        let anchor = self.world.anchor;
        let text = interpolate(
            &self.theme.anchor_template,
            &[
                ("location", self.theme.location_label(anchor.location)),
                ("bell", self.theme.bell_label(anchor.bell)),
            ],
        );
        (
            text,
            RevealSubject::Anchor {
                bell: anchor.bell,
                location: anchor.location,
            },
        )
    }

    fn ambient(&self, rng: &mut SeededRng) -> (String, RevealSubject) {
        let locations = self.world.location_ids();
        let location = rng.pick(&locations).unwrap_or(self.world.anchor.location);
        let bell = rng.int_between(0, u32::from(LAST_BELL)) as Bell;
        let template = self
            .theme
            .ambient_templates
            .get(rng.pick_index(self.theme.ambient_templates.len()))
            .map(String::as_str)
            .unwrap_or("All was quiet at the {location} at {bell}.");
        let text = interpolate(
            template,
            &[
                ("location", self.theme.location_label(location)),
                ("bell", self.theme.bell_label(bell)),
            ],
        );
        (text, RevealSubject::Ambient { location, bell })
    }

    // ── Movement ─────────────────────────────────────────────────────

    /// Edge behind the liar's first travel segment.
    fn liar_edge(&self) -> Option<&'a TravelEdge> {
        self.liar_segments()
            .iter()
            .filter(|s| s.is_travel())
            .find_map(|s| self.world.edge(s.from, s.to))
            .or_else(|| self.world.edges.first())
    }

    /// Any edge other than `edge` and its reverse.
    fn other_edge(
        &self,
        rng: &mut SeededRng,
        edge: Option<&'a TravelEdge>,
    ) -> Option<&'a TravelEdge> {
        let candidates: Vec<&'a TravelEdge> = self
            .world
            .edges
            .iter()
            .filter(|e| {
                edge.map_or(true, |x| {
                    !(e.from == x.from && e.to == x.to) && !(e.from == x.to && e.to == x.from)
                })
            })
            .collect();
        if candidates.is_empty() {
            return edge;
        }
        Some(candidates[rng.pick_index(candidates.len())])
    }

    fn ferry(&self, edge: Option<&TravelEdge>) -> (String, RevealSubject) {
        let Some(edge) = edge else {
            let at = self.world.anchor.location;
            return (
                "The ferry log is blank for the day.".to_string(),
                RevealSubject::Edge {
                    from: at,
                    to: at,
                    bells_required: 0,
                },
            );
        };
        let count = edge.bells_required.to_string();
        let text = interpolate(
            FERRY_TEMPLATE,
            &[
                ("from", self.theme.location_label(edge.from)),
                ("to", self.theme.location_label(edge.to)),
                ("count", &count),
            ],
        );
        (
            text,
            RevealSubject::Edge {
                from: edge.from,
                to: edge.to,
                bells_required: edge.bells_required,
            },
        )
    }

    // ── Object ───────────────────────────────────────────────────────

    fn relic_truth(&self) -> (String, RevealSubject) {
        let truth = &self.world.relic;
        let relic = self.theme.relic_label(truth.relic);
        let location = self.theme.location_label(truth.location);
        let holder_name = truth
            .holder
            .and_then(|id| self.suspects.iter().find(|s| s.id == id))
            .and_then(|s| self.theme.persona(s.persona))
            .map(|p| p.name.as_str());
        let text = match holder_name {
            Some(holder) => interpolate(
                RELIC_TEMPLATE,
                &[("relic", relic), ("location", location), ("holder", holder)],
            ),
            None => interpolate(
                RELIC_UNATTENDED_TEMPLATE,
                &[("relic", relic), ("location", location)],
            ),
        };
        (
            text,
            RevealSubject::RelicTruth {
                relic: truth.relic,
                location: truth.location,
                holder: truth.holder,
            },
        )
    }

    fn relic_decoy(&self, rng: &mut SeededRng) -> (String, RevealSubject) {
        let decoys: Vec<usize> = (0..POOL_SIZE)
            .filter(|r| *r != self.world.relic.relic)
            .collect();
        let relic = rng.pick(&decoys).unwrap_or(self.world.relic.relic);
        let locations = self.world.location_ids();
        let location = rng.pick(&locations).unwrap_or(self.world.relic.location);
        let text = interpolate(
            DECOY_TEMPLATE,
            &[
                ("relic", self.theme.relic_label(relic)),
                ("location", self.theme.location_label(location)),
            ],
        );
        (text, RevealSubject::RelicDecoy { relic, location })
    }

    // ── Environment ──────────────────────────────────────────────────

    /// Where the liar claims to have sensed something, else where they ended.
    fn liar_scent_location(&self) -> LocationId {
        let liar = self.suspects.iter().find(|s| s.id == self.liar_id);
        liar.and_then(|s| s.claim.sensed.map(|c| c.location))
            .or_else(|| liar.and_then(|s| s.claim.final_location()))
            .unwrap_or(self.world.anchor.location)
    }

    fn other_location(&self, rng: &mut SeededRng, not: LocationId) -> LocationId {
        let others: Vec<LocationId> = self
            .world
            .location_ids()
            .into_iter()
            .filter(|l| *l != not)
            .collect();
        rng.pick(&others).unwrap_or(not)
    }

    fn environment(&self, location: LocationId) -> (String, RevealSubject) {
        match self.world.environment_at(location) {
            Some(env) => {
                let text = interpolate(
                    HERBARIUM_TEMPLATE,
                    &[
                        ("scent", self.theme.scent_label(env.scent)),
                        ("location", self.theme.location_label(env.location)),
                        ("from", self.theme.bell_label(env.from_bell)),
                        ("to", self.theme.bell_label(env.to_bell)),
                    ],
                );
                (
                    text,
                    RevealSubject::Environment {
                        location: env.location,
                        scent: env.scent,
                        from_bell: env.from_bell,
                        to_bell: env.to_bell,
                    },
                )
            }
            None => (
                format!(
                    "The herbarium has no entry for the {}.",
                    self.theme.location_label(location)
                ),
                RevealSubject::Ambient { location, bell: 0 },
            ),
        }
    }
}
