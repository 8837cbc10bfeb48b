use serde::{Deserialize, Serialize};

use crate::entity::ActorId;
use crate::inventory::Inventory;

/// Default capacity of a stack of identical items.
pub const DEFAULT_STACK_CAPACITY: u32 = 20;

/// An interaction capability a feature can deliver or absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Claim {
    /// Dealing or receiving damage.
    Pain,
    /// Being eaten or eating.
    Food,
    /// Being carried or carrying.
    Cargo,
}

/// The kind of damage a tool deals or a damageable entity accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageVariant {
    /// Blunt blows.
    Hit,
    /// Felling trees.
    Chop,
    /// Breaking rock.
    Smash,
    /// Fighting.
    Attack,
}

// ---------------------------------------------------------------------------
// Individual features
// ---------------------------------------------------------------------------

/// The entity can be picked up and stored in an inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventorable {
    stored_by: Option<ActorId>,
}

impl Inventorable {
    /// The inventory owner holding this entity, if any.
    pub fn stored_by(&self) -> Option<ActorId> {
        self.stored_by
    }

    /// Record who holds this entity.
    pub fn set_stored_by(&mut self, owner: Option<ActorId>) {
        self.stored_by = owner;
    }
}

/// The entity represents a quantity of identical items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stackable {
    size: u32,
    capacity: u32,
}

impl Stackable {
    /// A stack of `size` with the default capacity.
    pub fn new(size: u32) -> Self {
        Self::with_capacity(size, DEFAULT_STACK_CAPACITY)
    }

    /// A stack of `size` holding at most `capacity`.
    pub fn with_capacity(size: u32, capacity: u32) -> Self {
        Self { size, capacity }
    }

    /// Items currently in the stack.
    pub fn get_size(&self) -> u32 {
        self.size
    }

    /// Overwrite the number of items.
    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    /// Most items the stack can hold.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}

/// The entity has health and can be destroyed by the right kind of damage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damageable {
    health: u32,
    max_health: u32,
    variant: DamageVariant,
}

impl Damageable {
    /// Start at `health` out of `max_health`, taking only `variant` damage.
    pub fn new(health: u32, max_health: u32, variant: DamageVariant) -> Self {
        Self {
            health,
            max_health,
            variant,
        }
    }

    /// Remaining health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Health when undamaged.
    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    /// The damage variant this entity accepts.
    pub fn variant(&self) -> DamageVariant {
        self.variant
    }

    /// Subtract `amount` from health. Returns whether the entity stays alive.
    pub fn handle_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health > 0
    }
}

/// Damage values a tool or weapon deals, per purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOrWeapon {
    /// Damage from a blunt blow.
    pub hit_damage: u32,
    /// Damage against trees.
    pub chop_damage: u32,
    /// Damage against rock.
    pub smash_damage: u32,
    /// Damage in combat.
    pub attack_damage: u32,
}

impl ToolOrWeapon {
    /// Damage this tool deals against `variant`.
    pub fn damage_for(&self, variant: DamageVariant) -> u32 {
        match variant {
            DamageVariant::Hit => self.hit_damage,
            DamageVariant::Chop => self.chop_damage,
            DamageVariant::Smash => self.smash_damage,
            DamageVariant::Attack => self.attack_damage,
        }
    }
}

/// The entity gets hungry and can eat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eater {
    /// How much the eater can hold.
    pub max_capacity: f64,
    /// How hungry the eater currently is.
    pub hunger_value: f64,
}

/// The entity keeps itself busy when nothing else tells it what to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer;

// ---------------------------------------------------------------------------
// Feature set
// ---------------------------------------------------------------------------

/// The optional capabilities attached to an entity.
///
/// Every feature is independently present or absent; callers check for
/// presence before consulting one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Can be carried.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventorable: Option<Inventorable>,
    /// Is a quantity of identical items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stackable: Option<Stackable>,
    /// Has health.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damageable: Option<Damageable>,
    /// Deals damage when used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_or_weapon: Option<ToolOrWeapon>,
    /// Carries other entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Inventory>,
    /// Gets hungry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eater: Option<Eater>,
    /// Acts on its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Performer>,
}

impl FeatureSet {
    /// Attach an empty [`Inventorable`].
    pub fn set_inventorable(&mut self) {
        self.inventorable = Some(Inventorable::default());
    }

    /// Attach a [`Stackable`] of `size`.
    pub fn set_stackable(&mut self, size: u32) {
        self.stackable = Some(Stackable::new(size));
    }

    /// Attach a [`Damageable`].
    pub fn set_damageable(&mut self, health: u32, max_health: u32, variant: DamageVariant) {
        self.damageable = Some(Damageable::new(health, max_health, variant));
    }

    /// Attach a [`ToolOrWeapon`] with the given damage values.
    pub fn set_tool_or_weapon(&mut self, hit: u32, chop: u32, smash: u32, attack: u32) {
        self.tool_or_weapon = Some(ToolOrWeapon {
            hit_damage: hit,
            chop_damage: chop,
            smash_damage: smash,
            attack_damage: attack,
        });
    }

    /// Attach an empty [`Inventory`].
    pub fn set_inventory(&mut self) {
        self.inventory = Some(Inventory::default());
    }

    /// Attach an [`Eater`].
    pub fn set_eater(&mut self, max_capacity: f64, hunger_value: f64) {
        self.eater = Some(Eater {
            max_capacity,
            hunger_value,
        });
    }

    /// Attach a [`Performer`].
    pub fn set_performer(&mut self) {
        self.performer = Some(Performer);
    }

    /// Claims this entity can deliver to others, in priority order.
    pub fn delivery_claims(&self) -> Vec<Claim> {
        let mut claims = Vec::new();
        if self.tool_or_weapon.is_some() {
            claims.push(Claim::Pain);
        }
        if self.inventorable.is_some() {
            claims.push(Claim::Cargo);
        }
        claims
    }

    /// Claims this entity can absorb from others.
    pub fn absorption_claims(&self) -> Vec<Claim> {
        let mut claims = Vec::new();
        if self.damageable.is_some() {
            claims.push(Claim::Pain);
        }
        if self.eater.is_some() {
            claims.push(Claim::Food);
        }
        if self.inventory.is_some() {
            claims.push(Claim::Cargo);
        }
        claims
    }

    /// Whether this entity can deliver `claim` to another.
    pub fn delivers(&self, claim: Claim) -> bool {
        match claim {
            Claim::Pain => self.tool_or_weapon.is_some(),
            Claim::Food => false,
            Claim::Cargo => self.inventorable.is_some(),
        }
    }

    /// Whether this entity can receive `claim` from another.
    pub fn absorbs(&self, claim: Claim) -> bool {
        match claim {
            Claim::Pain => self.damageable.is_some(),
            Claim::Food => self.eater.is_some(),
            Claim::Cargo => self.inventory.is_some(),
        }
    }

    /// The first of `claims` this entity absorbs, honoring the given order.
    pub fn first_absorbed(&self, claims: &[Claim]) -> Option<Claim> {
        claims.iter().copied().find(|c| self.absorbs(*c))
    }
}
