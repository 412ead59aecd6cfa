//! Suspect assembler: seats the six claims and resolves the relic holder.

use alibi_ir::types::{ClaimVector, Suspect, SuspectId, World, POOL_SIZE, SUSPECT_COUNT};

use super::rng::SeededRng;

#[derive(Debug, Clone)]
pub struct Assembly {
    pub suspects: Vec<Suspect>,
    pub liar_id: SuspectId,
}

/// Seat honest claims (in generation order) around a randomly slotted liar.
///
/// Personas are shuffled first; they are cosmetic and never read by the
/// evaluator. The world's relic holder is set to the honest suspect carrying
/// the true relic.
pub fn assemble_suspects(
    rng: &mut SeededRng,
    honest: Vec<ClaimVector>,
    liar: ClaimVector,
    world: &mut World,
) -> Assembly {
    let mut personas: Vec<usize> = (0..POOL_SIZE).collect();
    rng.shuffle(&mut personas);

    let liar_slot = rng.int_between(0, SUSPECT_COUNT as u32 - 1) as usize;
    let liar_slot = liar_slot.min(honest.len());

    let mut ordered: Vec<(ClaimVector, bool)> = honest.into_iter().map(|c| (c, false)).collect();
    ordered.insert(liar_slot, (liar, true));

    let suspects: Vec<Suspect> = ordered
        .into_iter()
        .enumerate()
        .map(|(slot, (mut claim, is_liar))| {
            let id = SuspectId(slot as u8);
            claim.suspect_id = Some(id);
            Suspect {
                id,
                persona: personas.get(slot).copied().unwrap_or(slot),
                claim,
                is_liar,
            }
        })
        .collect();

    let relic = world.relic.relic;
    world.relic.holder = suspects
        .iter()
        .find(|s| !s.is_liar && s.claim.carried_relic == Some(relic))
        .map(|s| s.id);

    Assembly {
        liar_id: SuspectId(liar_slot as u8),
        suspects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::claims::{generate_honest_claims, generate_liar_claim};
    use crate::generate::world::build_world;

    fn assemble(seed: u32) -> (World, Assembly) {
        let mut rng = SeededRng::new(seed);
        let mut world = build_world(&mut rng);
        let honest = generate_honest_claims(&mut rng, &world);
        let liar = generate_liar_claim(&mut rng, &world);
        let assembly = assemble_suspects(&mut rng, honest, liar.claim, &mut world);
        (world, assembly)
    }

    #[test]
    fn test_slots_are_stamped_in_order() {
        let (_, assembly) = assemble(12);
        assert_eq!(assembly.suspects.len(), SUSPECT_COUNT);
        for (slot, suspect) in assembly.suspects.iter().enumerate() {
            assert_eq!(usize::from(suspect.id.0), slot);
            assert_eq!(suspect.claim.suspect_id, Some(suspect.id));
        }
    }

    #[test]
    fn test_exactly_one_liar_at_reported_slot() {
        for seed in 0..40 {
            let (_, assembly) = assemble(seed);
            let liars: Vec<_> = assembly.suspects.iter().filter(|s| s.is_liar).collect();
            assert_eq!(liars.len(), 1);
            assert_eq!(liars[0].id, assembly.liar_id);
        }
    }

    #[test]
    fn test_holder_is_honest_relic_carrier() {
        for seed in 0..40 {
            let (world, assembly) = assemble(seed);
            let holder = world.relic.holder.unwrap();
            let suspect = &assembly.suspects[usize::from(holder.0)];
            assert!(!suspect.is_liar);
            assert_eq!(suspect.claim.carried_relic, Some(world.relic.relic));
        }
    }

    #[test]
    fn test_personas_are_a_permutation() {
        let (_, assembly) = assemble(3);
        let mut personas: Vec<usize> = assembly.suspects.iter().map(|s| s.persona).collect();
        personas.sort();
        assert_eq!(personas, (0..POOL_SIZE).collect::<Vec<_>>());
    }
}
