use std::f64::consts::PI;

use orbis_core::{ActorId, ElevationFunction, Entity, EntityKind, Point, State, Terrain};
use rand::Rng;

use crate::error::SimResult;

/// ID of the player-controlled pirate in generated worlds.
pub const HERO_ID: ActorId = ActorId(100);

/// First and one-past-last IDs of the generated spruce forest.
const FOREST_IDS: std::ops::Range<u64> = 7..100;

/// Builds initial world states.
#[derive(Debug, Default)]
pub struct WorldGenerator;

impl WorldGenerator {
    /// Create a generator.
    pub fn new() -> Self {
        Self
    }

    /// A flat, empty world.
    pub fn generate_basic(&self, radius: f64) -> SimResult<State> {
        Ok(State::new(ElevationFunction::new(radius), Vec::new())?)
    }

    /// A world with terrain, a handful of items and warriors near the
    /// equator, the hero, and a forest of spruces scattered around them.
    pub fn generate(&self, radius: f64, rng: &mut impl Rng) -> SimResult<State> {
        let origin = Point::new(0.0, 0.0);
        let mut elevation = ElevationFunction::new(radius);
        elevation.add(Terrain::Hills { origin });
        elevation.add(Terrain::Ranges { origin });
        elevation.add(Terrain::Continents { origin });

        let placed = |id: u64, kind: EntityKind, theta: f64, phi: f64| {
            Entity::new(ActorId(id), kind, Some(Point::new(theta * PI, phi * PI)))
        };

        let mut entities = vec![
            placed(1, EntityKind::Axe, 0.501, -0.001),
            placed(2, EntityKind::Warrior, 0.499, 0.001),
            placed(3, EntityKind::Warrior, 0.498, 0.002),
            placed(4, EntityKind::Rocks, 0.497, 0.003),
            placed(5, EntityKind::Rocks, 0.495, 0.005),
            placed(6, EntityKind::Gold, 0.496, 0.004),
        ];
        for id in FOREST_IDS {
            let theta = rng.random_range(0.45..0.55);
            let phi = rng.random_range(-0.05..0.05);
            entities.push(placed(id, EntityKind::Spruce, theta, phi));
        }
        entities.push(placed(HERO_ID.0, EntityKind::Pirate, 0.5, 0.0));

        Ok(State::new(elevation, entities)?)
    }
}
