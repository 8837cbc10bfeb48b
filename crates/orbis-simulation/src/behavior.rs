//! How each entity kind reacts to the events addressed to it.

use std::f64::consts::PI;

use orbis_core::{Entity, EntityKind, Event};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::task::movement::{WALK_DURATION, WALK_SPEED};
use crate::task::{
    CraftTask, DieAndDropTask, IdleTask, InventoryUpdateTask, MovementTask, PickItemTask, Task,
    UseItemTask,
};

/// Number of logs a felled spruce leaves behind.
pub const SPRUCE_LOG_DROPS: usize = 3;

/// What the simulation should do with an entity's current task.
#[derive(Debug)]
pub enum Reaction {
    /// Leave the current task alone.
    Keep,
    /// Install a new task, discarding the current one.
    Replace(Box<dyn Task>),
    /// Wrap up the current task's job now.
    Conclude,
}

impl Reaction {
    fn replace(task: impl Task + 'static) -> Self {
        Self::Replace(Box::new(task))
    }
}

/// The kinds an entity leaves behind when it dies.
pub fn drops_for(kind: EntityKind) -> Vec<EntityKind> {
    match kind {
        EntityKind::Spruce => vec![EntityKind::Log; SPRUCE_LOG_DROPS],
        EntityKind::Rocks
        | EntityKind::Gold
        | EntityKind::Log
        | EntityKind::Axe
        | EntityKind::Warrior
        | EntityKind::Pirate => Vec::new(),
    }
}

/// React to `event`. May mutate the entity's own features (damage) but
/// never touches other entities; effects on the world go through tasks.
pub fn handle_event(entity: &mut Entity, event: &Event, rng: &mut StdRng) -> Reaction {
    match event {
        Event::Conclude { .. } => return Reaction::Conclude,
        Event::Damage { amount, .. } => {
            let alive = entity
                .features
                .damageable
                .as_mut()
                .is_none_or(|damageable| damageable.handle_damage(*amount));
            if alive {
                return Reaction::Keep;
            }
            debug!(entity = %entity.id, kind = %entity.kind, "entity died");
            return Reaction::replace(DieAndDropTask::new(entity.id, drops_for(entity.kind)));
        }
        Event::Resume { .. }
        | Event::Stop { .. }
        | Event::Finished { .. }
        | Event::StartMoving { .. }
        | Event::HandActivation { .. }
        | Event::InventorySwap { .. }
        | Event::Craft { .. } => {}
    }

    match entity.kind {
        EntityKind::Warrior => warrior(entity, event, rng),
        EntityKind::Pirate => pirate(entity, event),
        EntityKind::Rocks
        | EntityKind::Gold
        | EntityKind::Log
        | EntityKind::Axe
        | EntityKind::Spruce => Reaction::Keep,
    }
}

/// Wanders: every time it is resumed or done walking, it walks again in a
/// random direction.
fn warrior(entity: &Entity, event: &Event, rng: &mut StdRng) -> Reaction {
    match event {
        Event::Resume { .. } | Event::Finished { .. } => {
            let bearing = rng.random_range(-PI..PI);
            Reaction::replace(MovementTask::walk(
                entity.id,
                WALK_SPEED,
                bearing,
                WALK_DURATION,
            ))
        }
        Event::Stop { .. } => Reaction::replace(IdleTask),
        Event::Conclude { .. }
        | Event::StartMoving { .. }
        | Event::HandActivation { .. }
        | Event::InventorySwap { .. }
        | Event::Craft { .. }
        | Event::Damage { .. } => Reaction::Keep,
    }
}

/// Does what the player tells it to.
fn pirate(entity: &Entity, event: &Event) -> Reaction {
    let id = entity.id;
    match event {
        Event::Stop { .. } | Event::Finished { .. } | Event::Resume { .. } => {
            Reaction::replace(IdleTask)
        }
        Event::StartMoving { bearing, .. } => {
            Reaction::replace(MovementTask::new(id, WALK_SPEED, *bearing))
        }
        Event::HandActivation { hand, object, .. } => {
            let held = entity
                .features
                .inventory
                .as_ref()
                .and_then(|inv| inv.get_hand(*hand));
            match held {
                Some(item) => Reaction::replace(UseItemTask::new(id, item, *object, *hand)),
                None => Reaction::replace(PickItemTask::new(id, *object, *hand)),
            }
        }
        Event::InventorySwap {
            hand,
            inventory_index,
            variant,
            ..
        } => Reaction::replace(InventoryUpdateTask::new(
            id,
            *hand,
            *inventory_index,
            *variant,
        )),
        Event::Craft { assembly, .. } => Reaction::replace(CraftTask::new(id, assembly.clone())),
        Event::Conclude { .. } | Event::Damage { .. } => Reaction::Keep,
    }
}
