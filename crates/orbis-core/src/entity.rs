use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::craft::Essence;
use crate::error::CoreError;
use crate::feature::{DamageVariant, FeatureSet};
use crate::geometry::Point;
use crate::inventory::InventoryEntry;

/// Identifier of an entity (and of its on-screen actor).
///
/// Unique among live entities and never reused by the [`State`] that
/// assigned it.
///
/// [`State`]: crate::state::State
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The closed set of entity kinds. Each kind fixes an essence, a default
/// feature set, and (in the simulation) a reaction to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A pile of stones.
    Rocks,
    /// Gold nuggets.
    Gold,
    /// A felled trunk.
    Log,
    /// A tool for chopping.
    Axe,
    /// A tree.
    Spruce,
    /// Wanders about on its own.
    Warrior,
    /// The player character.
    Pirate,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 7] = [
        Self::Rocks,
        Self::Gold,
        Self::Log,
        Self::Axe,
        Self::Spruce,
        Self::Warrior,
        Self::Pirate,
    ];

    /// Lowercase name used in snapshots and recipes.
    pub fn codename(&self) -> &'static str {
        match self {
            Self::Rocks => "rocks",
            Self::Gold => "gold",
            Self::Log => "log",
            Self::Axe => "axe",
            Self::Spruce => "spruce",
            Self::Warrior => "warrior",
            Self::Pirate => "pirate",
        }
    }

    /// Crafting material this kind counts as.
    pub fn essence(&self) -> Essence {
        match self {
            Self::Rocks => Essence::Rocks,
            Self::Gold => Essence::Gold,
            Self::Log => Essence::Logs,
            Self::Axe => Essence::Tool,
            Self::Spruce => Essence::Plant,
            Self::Warrior | Self::Pirate => Essence::Hero,
        }
    }

    /// The features every fresh entity of this kind starts with.
    pub fn default_features(&self) -> FeatureSet {
        let mut features = FeatureSet::default();
        match self {
            Self::Rocks | Self::Gold => {
                features.set_inventorable();
                features.set_stackable(1);
            }
            Self::Log => features.set_inventorable(),
            Self::Axe => {
                features.set_inventorable();
                features.set_tool_or_weapon(10, 100, 20, 50);
            }
            Self::Spruce => features.set_damageable(200, 400, DamageVariant::Chop),
            Self::Warrior => features.set_performer(),
            Self::Pirate => {
                features.set_inventory();
                features.set_eater(100.0, 50.0);
            }
        }
        features
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.codename())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.codename() == s)
            .ok_or_else(|| CoreError::UnknownCodename(s.to_string()))
    }
}

/// Every world object is an Entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Registry key.
    pub id: ActorId,
    /// What the entity is.
    pub kind: EntityKind,
    /// `None` while the entity is not physically present (e.g. carried).
    pub position: Option<Point>,
    /// Capabilities, seeded from the kind.
    pub features: FeatureSet,
}

impl Entity {
    /// Create an entity of `kind` with that kind's default features.
    pub fn new(id: ActorId, kind: EntityKind, position: Option<Point>) -> Self {
        Self {
            id,
            kind,
            position,
            features: kind.default_features(),
        }
    }

    /// Codename of the entity's kind.
    pub fn codename(&self) -> &'static str {
        self.kind.codename()
    }

    /// Essence of the entity's kind.
    pub fn essence(&self) -> Essence {
        self.kind.essence()
    }

    /// Stack size for stackables, 1 for everything else.
    pub fn quantity(&self) -> u32 {
        self.features
            .stackable
            .as_ref()
            .map_or(1, |s| s.get_size())
    }

    /// Advance along a great circle. Entities without a position stay put.
    pub fn move_by(&mut self, distance: f64, bearing: f64, radius: f64) {
        if let Some(position) = self.position {
            self.position = Some(position.moved_by(distance, bearing, radius));
        }
    }

    /// Great-circle distance to `other`, if both are physically present.
    pub fn distance_to(&self, other: &Entity, radius: f64) -> Option<f64> {
        let a = self.position?;
        let b = other.position?;
        Some(a.great_circle_distance_to(&b, radius))
    }

    /// The record an inventory keeps about this entity.
    pub fn as_entry(&self) -> InventoryEntry {
        InventoryEntry::new(self.id, self.essence(), self.quantity(), self.codename())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn actor_id_display() {
        assert_eq!(ActorId(42).to_string(), "#42");
    }

    #[test]
    fn codename_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.codename().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("dragon".parse::<EntityKind>().is_err());
    }

    #[test]
    fn kinds_install_their_features() {
        let rocks = Entity::new(ActorId(1), EntityKind::Rocks, None);
        assert!(rocks.features.inventorable.is_some());
        assert_eq!(rocks.quantity(), 1);

        let spruce = Entity::new(ActorId(2), EntityKind::Spruce, None);
        let damageable = spruce.features.damageable.as_ref().unwrap();
        assert_eq!(damageable.health(), 200);
        assert_eq!(damageable.variant(), DamageVariant::Chop);
        assert!(spruce.features.inventorable.is_none());

        let pirate = Entity::new(ActorId(3), EntityKind::Pirate, None);
        assert!(pirate.features.inventory.is_some());
        assert!(pirate.features.eater.is_some());

        let warrior = Entity::new(ActorId(4), EntityKind::Warrior, None);
        assert!(warrior.features.performer.is_some());
    }

    #[test]
    fn move_by_ignores_unplaced_entity() {
        let mut log = Entity::new(ActorId(1), EntityKind::Log, None);
        log.move_by(5.0, 0.0, 100.0);
        assert!(log.position.is_none());
    }

    #[test]
    fn distance_requires_both_positions() {
        let a = Entity::new(ActorId(1), EntityKind::Gold, Some(Point::new(0.5 * PI, 0.0)));
        let b = Entity::new(ActorId(2), EntityKind::Gold, Some(Point::new(0.5 * PI, 0.1)));
        let c = Entity::new(ActorId(3), EntityKind::Gold, None);
        let d = a.distance_to(&b, 10.0).unwrap();
        assert!((d - 1.0).abs() < 1e-9);
        assert!(a.distance_to(&c, 10.0).is_none());
    }

    #[test]
    fn as_entry_carries_quantity_and_codename() {
        let mut gold = Entity::new(ActorId(5), EntityKind::Gold, None);
        if let Some(stack) = gold.features.stackable.as_mut() {
            stack.set_size(4);
        }
        let entry = gold.as_entry();
        assert_eq!(entry.id, ActorId(5));
        assert_eq!(entry.quantity, 4);
        assert_eq!(entry.codename, "gold");
        assert_eq!(entry.essence, Essence::Gold);
    }
}
