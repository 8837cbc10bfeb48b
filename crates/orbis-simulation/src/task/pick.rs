use orbis_core::{Action, ActorId, Claim, Event, Hand, State};
use tracing::debug;

use super::Task;
use crate::job::Job;

/// How far away an item may be and still be picked up.
pub const PICK_DISTANCE: f64 = 1.0;
/// How long picking something up takes.
pub const PICK_DURATION: f64 = 1.0;

/// Picks an item off the ground into an empty hand.
#[derive(Debug)]
pub struct PickItemTask {
    who: ActorId,
    what: Option<ActorId>,
    hand: Hand,
    job: Option<Job>,
}

impl PickItemTask {
    /// Pick `what`, or the closest pickable item when `None`.
    pub fn new(who: ActorId, what: Option<ActorId>, hand: Hand) -> Self {
        Self {
            who,
            what,
            hand,
            job: None,
        }
    }

    /// The item being picked, once resolved.
    pub fn target(&self) -> Option<ActorId> {
        self.what
    }

    fn reachable(&self, state: &State, what: ActorId) -> bool {
        let hand_free = state
            .get_entity(self.who)
            .and_then(|e| e.features.inventory.as_ref())
            .is_some_and(|inv| inv.get_hand_entry(self.hand).is_none());
        let pickable = state
            .get_entity(what)
            .is_some_and(|e| e.features.inventorable.is_some());
        let near = state
            .calculate_distance(self.who, what)
            .is_some_and(|d| d <= PICK_DISTANCE);
        hand_free && pickable && near
    }
}

impl Task for PickItemTask {
    fn name(&self) -> &'static str {
        "pick_item"
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        if self.what.is_none() {
            self.what = state.find_closest_delivering_within(self.who, &[Claim::Cargo], PICK_DISTANCE);
        }
        let Some(what) = self.what else {
            debug!(entity = %self.who, "nothing to pick within reach");
            return Vec::new();
        };
        if !self.reachable(state, what) {
            debug!(entity = %self.who, item = %what, "cannot pick item");
            return Vec::new();
        }

        self.job = Some(Job::wait(
            PICK_DURATION,
            vec![Event::Finished { entity: self.who }],
        ));
        vec![Action::PickStart {
            who: self.who,
            what,
        }]
    }

    fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    fn finish(&mut self, state: &mut State) -> Vec<Action> {
        let Some(what) = self.what else {
            return Vec::new();
        };
        if !self.reachable(state, what) {
            debug!(entity = %self.who, item = %what, "item no longer pickable");
            return Vec::new();
        }

        let Some(item) = state.get_entity_mut(what) else {
            return Vec::new();
        };
        item.position = None;
        if let Some(inventorable) = item.features.inventorable.as_mut() {
            inventorable.set_stored_by(Some(self.who));
        }
        let entry = item.as_entry();

        let Some(inventory) = state
            .get_entity_mut(self.who)
            .and_then(|e| e.features.inventory.as_mut())
        else {
            return Vec::new();
        };
        inventory.store(self.hand, entry);

        vec![
            Action::PickEnd { who: self.who },
            Action::UpdateInventory {
                owner: self.who,
                inventory: inventory.clone(),
            },
        ]
    }
}
