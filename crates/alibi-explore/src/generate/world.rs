//! World builder: locations, travel costs, the horn anchor, ambient scents
//! and the relic.
//!
//! Works purely on pool indices. No label is read here, so the structure of
//! a world depends on the seed alone.

use alibi_ir::types::{
    Bell, Coords, EnvironmentFact, Location, LocationId, RelicTruth, TimeAnchor, TravelEdge,
    World, LAST_BELL, LOCATIONS_PER_PUZZLE, POOL_SIZE,
};

use super::rng::SeededRng;

/// Side of the square locations are scattered over.
pub const COORD_MAX: u32 = 100;
/// Travel time for two locations on top of each other.
pub const MIN_MINUTES: f64 = 15.0;
/// Travel time across the full diagonal of the square.
pub const MAX_MINUTES: f64 = 150.0;

/// Linear interpolation of distance onto `MIN_MINUTES..=MAX_MINUTES`.
pub fn minutes_for_distance(distance: f64) -> u32 {
    let max_distance = f64::from(COORD_MAX) * std::f64::consts::SQRT_2;
    let t = (distance / max_distance).clamp(0.0, 1.0);
    (MIN_MINUTES + t * (MAX_MINUTES - MIN_MINUTES)).round() as u32
}

/// Discretize minutes into whole bells. Monotonic; never below 1.
pub fn bells_for_minutes(minutes: u32) -> u8 {
    match minutes {
        0..=49 => 1,
        50..=99 => 2,
        _ => 3,
    }
}

/// Build a world from the stream. Draw order:
/// location choice, coordinates, anchor, scents, relic.
pub fn build_world(rng: &mut SeededRng) -> World {
    let pool: Vec<LocationId> = (0..POOL_SIZE as u8).map(LocationId).collect();
    let chosen = rng.pick_n(&pool, LOCATIONS_PER_PUZZLE);

    let locations: Vec<Location> = chosen
        .iter()
        .enumerate()
        .map(|(display_index, &id)| {
            let x = rng.int_between(0, COORD_MAX) as i32;
            let y = rng.int_between(0, COORD_MAX) as i32;
            Location {
                id,
                display_index,
                coords: Coords { x, y },
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(locations.len() * locations.len().saturating_sub(1));
    for from in &locations {
        for to in &locations {
            if from.id == to.id {
                continue;
            }
            let minutes = minutes_for_distance(from.coords.distance(&to.coords));
            edges.push(TravelEdge {
                from: from.id,
                to: to.id,
                minutes,
                bells_required: bells_for_minutes(minutes),
            });
        }
    }

    let anchor = TimeAnchor {
        bell: rng.int_between(1, 4) as Bell,
        location: chosen[rng.pick_index(chosen.len())],
    };

    let environment = chosen
        .iter()
        .map(|&location| {
            let scent = rng.int_between(0, POOL_SIZE as u32 - 1) as usize;
            let from_bell = rng.int_between(0, 2) as Bell;
            let to_bell = rng.int_between(3, u32::from(LAST_BELL)) as Bell;
            EnvironmentFact {
                location,
                scent,
                from_bell,
                to_bell,
            }
        })
        .collect();

    let relic = RelicTruth {
        relic: rng.int_between(0, POOL_SIZE as u32 - 1) as usize,
        location: chosen[rng.pick_index(chosen.len())],
        holder: None,
    };

    World {
        locations,
        edges,
        anchor,
        environment,
        relic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_interpolate_between_bounds() {
        assert_eq!(minutes_for_distance(0.0), 15);
        assert_eq!(minutes_for_distance(100.0 * std::f64::consts::SQRT_2), 150);
        assert_eq!(minutes_for_distance(1_000.0), 150);
    }

    #[test]
    fn test_bells_are_monotonic() {
        let mut last = 0;
        for minutes in 0..=150 {
            let bells = bells_for_minutes(minutes);
            assert!(bells >= last);
            assert!((1..=3).contains(&bells));
            last = bells;
        }
    }

    #[test]
    fn test_world_shape() {
        let world = build_world(&mut SeededRng::new(2024));
        assert_eq!(world.locations.len(), LOCATIONS_PER_PUZZLE);
        assert_eq!(world.edges.len(), 12);
        assert_eq!(world.environment.len(), LOCATIONS_PER_PUZZLE);
        assert!((1..=4).contains(&world.anchor.bell));
        assert!(world.location(world.anchor.location).is_some());
        assert!(world.location(world.relic.location).is_some());
        assert!(world.relic.holder.is_none());
        for fact in &world.environment {
            assert!(fact.from_bell <= 2 && (3..=5).contains(&fact.to_bell));
        }
    }

    #[test]
    fn test_edges_are_symmetric() {
        let world = build_world(&mut SeededRng::new(77));
        for edge in &world.edges {
            let back = world.edge(edge.to, edge.from).unwrap();
            assert_eq!(back.minutes, edge.minutes);
            assert_eq!(back.bells_required, edge.bells_required);
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = build_world(&mut SeededRng::new(31337));
        let b = build_world(&mut SeededRng::new(31337));
        assert_eq!(a, b);
    }
}
