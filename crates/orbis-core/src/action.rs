//! Actions: the ordered, replayable results the kernel hands to rendering.

use std::collections::BTreeMap;

use crate::entity::{ActorId, Entity};
use crate::feature::DamageVariant;
use crate::geometry::{ElevationFunction, Point};
use crate::inventory::{Hand, Inventory};

/// What the rendering side needs to know to show an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// The entity shown.
    pub id: ActorId,
    /// Kind codename, which selects the model.
    pub codename: String,
    /// Where to show it; `None` while carried.
    pub position: Option<Point>,
}

impl Actor {
    /// Snapshot an entity for rendering.
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            codename: entity.codename().to_string(),
            position: entity.position,
        }
    }
}

/// Vital statistics reported for an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    /// Current health, if reported.
    pub health: Option<u32>,
    /// Health when undamaged, if reported.
    pub max_health: Option<u32>,
}

/// Named animation clips the rendering side plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationName {
    /// Standing still.
    Idle,
    /// Moving.
    Walk,
    /// Bending to pick something up.
    Pick,
    /// Taking a hit.
    Damaged,
    /// Striking with the left hand.
    SwingLeft,
    /// Striking with the right hand.
    SwingRight,
}

/// A world-mutating result emitted by a task.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sets up the scene around the hero.
    Configuration {
        /// The player-controlled entity.
        hero: ActorId,
        /// Shape of the world's surface.
        elevation: ElevationFunction,
    },
    /// A crafter began crafting.
    CraftStart {
        /// Who is crafting.
        crafter: ActorId,
    },
    /// A crafter stopped crafting, successfully or not.
    CraftEnd {
        /// Who was crafting.
        crafter: ActorId,
    },
    /// New entities to show.
    CreateActors {
        /// Snapshots of the new entities.
        actors: Vec<Actor>,
    },
    /// Entities to stop showing.
    DeleteActors {
        /// IDs of the removed entities.
        ids: Vec<ActorId>,
    },
    /// Continuous movement the renderer extrapolates for `duration` seconds.
    Movement {
        /// The moving entity.
        actor: ActorId,
        /// Surface speed, distance units per second.
        speed: f64,
        /// Direction of travel, radians from north.
        bearing: f64,
        /// How long to keep moving.
        duration: f64,
    },
    /// Authoritative position, ends any running movement.
    Localize {
        /// The entity being placed.
        actor: ActorId,
        /// Where it is.
        position: Point,
    },
    /// New vital statistics for an entity.
    StatUpdate {
        /// Whose statistics changed.
        actor: ActorId,
        /// The new values.
        stats: Stats,
    },
    /// An entity started picking something up.
    PickStart {
        /// The picker.
        who: ActorId,
        /// The item being picked up.
        what: ActorId,
    },
    /// An entity finished picking something up.
    PickEnd {
        /// The picker.
        who: ActorId,
    },
    /// The full contents of an inventory after a change.
    UpdateInventory {
        /// Whose inventory changed.
        owner: ActorId,
        /// The inventory as it is now.
        inventory: Inventory,
    },
    /// A blow was struck.
    Damage {
        /// Who struck.
        dealer: ActorId,
        /// Who was struck.
        receiver: ActorId,
        /// Kind of damage dealt.
        variant: DamageVariant,
        /// Hand holding the tool.
        hand: Hand,
    },
}

impl Action {
    /// The actor whose running animation this action replaces, if any.
    pub fn actor_id(&self) -> Option<ActorId> {
        match self {
            Self::Movement { actor, .. } | Self::Localize { actor, .. } => Some(*actor),
            Self::Configuration { .. }
            | Self::CraftStart { .. }
            | Self::CraftEnd { .. }
            | Self::CreateActors { .. }
            | Self::DeleteActors { .. }
            | Self::StatUpdate { .. }
            | Self::PickStart { .. }
            | Self::PickEnd { .. }
            | Self::UpdateInventory { .. }
            | Self::Damage { .. } => None,
        }
    }

    /// The clip the acting entity should play, if this action calls for one.
    pub fn animation(&self) -> Option<(ActorId, AnimationName)> {
        match self {
            Self::Movement { actor, .. } => Some((*actor, AnimationName::Walk)),
            Self::Localize { actor, .. } => Some((*actor, AnimationName::Idle)),
            Self::PickStart { who, .. } => Some((*who, AnimationName::Pick)),
            Self::PickEnd { who } => Some((*who, AnimationName::Idle)),
            Self::Damage { dealer, hand, .. } => Some(match hand {
                Hand::Left => (*dealer, AnimationName::SwingLeft),
                Hand::Right => (*dealer, AnimationName::SwingRight),
            }),
            Self::Configuration { .. }
            | Self::CraftStart { .. }
            | Self::CraftEnd { .. }
            | Self::CreateActors { .. }
            | Self::DeleteActors { .. }
            | Self::StatUpdate { .. }
            | Self::UpdateInventory { .. } => None,
        }
    }

    /// Clip played by the receiving side of the action, if any.
    pub fn reaction_animation(&self) -> Option<(ActorId, AnimationName)> {
        match self {
            Self::Damage { receiver, .. } => Some((*receiver, AnimationName::Damaged)),
            Self::Configuration { .. }
            | Self::CraftStart { .. }
            | Self::CraftEnd { .. }
            | Self::CreateActors { .. }
            | Self::DeleteActors { .. }
            | Self::Movement { .. }
            | Self::Localize { .. }
            | Self::StatUpdate { .. }
            | Self::PickStart { .. }
            | Self::PickEnd { .. }
            | Self::UpdateInventory { .. } => None,
        }
    }
}

/// The rendering boundary: consumes actions in order, never answers back.
pub trait ActionSink {
    /// Consume the next action.
    fn apply(&mut self, action: &Action);
}

/// An in-memory sink retaining the most recent actions and the clip each
/// actor is currently playing.
#[derive(Debug, Default)]
pub struct ActionLog {
    actions: Vec<Action>,
    max_actions: usize,
    playing: BTreeMap<ActorId, AnimationName>,
}

impl ActionLog {
    /// Create a log keeping at most `max_actions` (0 = unlimited).
    pub fn new(max_actions: usize) -> Self {
        Self {
            actions: Vec::new(),
            max_actions,
            playing: BTreeMap::new(),
        }
    }

    /// Append an action, dropping the oldest ones beyond capacity.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
        if self.max_actions > 0 && self.actions.len() > self.max_actions {
            let drain_count = self.actions.len() - self.max_actions;
            self.actions.drain(..drain_count);
        }
    }

    /// Retained actions, oldest first.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The clip `id` is playing after every action applied so far.
    pub fn animation_of(&self, id: ActorId) -> Option<AnimationName> {
        self.playing.get(&id).copied()
    }

    /// Number of retained actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is retained.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn track_animation(&mut self, action: &Action) {
        if let Some(actor) = action.actor_id() {
            self.playing.remove(&actor);
        }
        if let Action::DeleteActors { ids } = action {
            for id in ids {
                self.playing.remove(id);
            }
        }
        for (actor, clip) in action.animation().into_iter().chain(action.reaction_animation()) {
            self.playing.insert(actor, clip);
        }
    }
}

impl ActionSink for ActionLog {
    fn apply(&mut self, action: &Action) {
        self.track_animation(action);
        self.push(action.clone());
    }
}
