//! Per-entity activities and their lifecycle.
//!
//! A task runs `start` once when installed. If that yields a [`Job`], the
//! scheduler owns the timing and `finish` runs when the job completes;
//! otherwise `finish` runs right away. Tasks fail soft: an unmet
//! precondition produces no actions and no job.

/// Turning inventory items into new items.
pub mod craft;
/// Death and the drops left behind.
pub mod die;
/// Doing nothing.
pub mod idle;
/// Rearranging hands and pockets.
pub mod inventory_update;
/// Moving across the surface.
pub mod movement;
/// Picking items up from the ground.
pub mod pick;
/// Using a held item on another entity.
pub mod use_item;

pub use craft::CraftTask;
pub use die::DieAndDropTask;
pub use idle::IdleTask;
pub use inventory_update::InventoryUpdateTask;
pub use movement::MovementTask;
pub use pick::PickItemTask;
pub use use_item::UseItemTask;

use orbis_core::{Action, State};

use crate::job::Job;

/// An activity an entity carries out, possibly over several ticks.
pub trait Task: std::fmt::Debug {
    /// Short name for logs and inspection.
    fn name(&self) -> &'static str;

    /// Check preconditions and begin. An empty result means nothing
    /// happened and no job may follow.
    fn start(&mut self, state: &mut State) -> Vec<Action>;

    /// Hand over the job built by `start`, if any.
    fn take_job(&mut self) -> Option<Job>;

    /// Complete the activity. Conditions are checked again since the world
    /// may have changed while the job ran.
    fn finish(&mut self, state: &mut State) -> Vec<Action>;

    /// Called when a started task is replaced before finishing.
    fn conclude(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }
}

/// Where a task is in its lifecycle. A started task that gets replaced is
/// concluded and dropped rather than finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    /// Installed but `start` has not run.
    NotStarted,
    /// Waiting on its job.
    Started,
    /// Done, or never needed a job.
    Finished,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::f64::consts::PI;

    use orbis_core::{ActorId, ElevationFunction, Entity, EntityKind, InventoryEntry, Point, State};

    /// A point on the equator of a radius-10 world, `phi` radians east.
    pub fn at(phi: f64) -> Option<Point> {
        Some(Point::new(0.5 * PI, phi))
    }

    pub fn world(entities: Vec<Entity>) -> State {
        State::new(ElevationFunction::new(10.0), entities).unwrap()
    }

    pub fn entity(id: u64, kind: EntityKind, position: Option<Point>) -> Entity {
        Entity::new(ActorId(id), kind, position)
    }

    /// Register `item` as carried by `owner`: in the given pocket, or in the
    /// first free hand.
    pub fn carry(state: &mut State, owner: ActorId, item: ActorId, pocket: Option<usize>) {
        let entry: InventoryEntry = state.get_entity(item).unwrap().as_entry();
        if let Some(e) = state.get_entity_mut(item) {
            e.position = None;
            if let Some(inv) = e.features.inventorable.as_mut() {
                inv.set_stored_by(Some(owner));
            }
        }
        let inventory = state
            .get_entity_mut(owner)
            .unwrap()
            .features
            .inventory
            .as_mut()
            .unwrap();
        match pocket {
            Some(index) => assert!(inventory.insert(index, entry)),
            None => {
                let hand = inventory.free_hand().unwrap();
                inventory.store(hand, entry);
            }
        }
    }
}
