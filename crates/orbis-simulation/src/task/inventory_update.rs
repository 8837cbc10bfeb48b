use orbis_core::{Action, ActorId, Hand, MergeOutcome, State, UpdateVariant};
use tracing::debug;

use super::Task;
use crate::job::Job;

/// Rearranges a hand slot against a pocket slot. Takes effect immediately.
#[derive(Debug)]
pub struct InventoryUpdateTask {
    owner: ActorId,
    hand: Hand,
    pocket: usize,
    variant: UpdateVariant,
}

impl InventoryUpdateTask {
    /// Swap or merge `hand` with pocket `pocket` of the owner's inventory.
    pub fn new(owner: ActorId, hand: Hand, pocket: usize, variant: UpdateVariant) -> Self {
        Self {
            owner,
            hand,
            pocket,
            variant,
        }
    }
}

impl Task for InventoryUpdateTask {
    fn name(&self) -> &'static str {
        "inventory_update"
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        let Some(mut inventory) = state
            .get_entity_mut(self.owner)
            .and_then(|e| e.features.inventory.take())
        else {
            return Vec::new();
        };

        let changed = match self.variant {
            UpdateVariant::Swap => inventory.swap(self.hand, self.pocket),
            UpdateVariant::Merge => {
                state.merge_entities(&mut inventory, self.hand, self.pocket) != MergeOutcome::Skipped
            }
        };

        let snapshot = changed.then(|| inventory.clone());
        if let Some(owner) = state.get_entity_mut(self.owner) {
            owner.features.inventory = Some(inventory);
        }

        match snapshot {
            Some(inventory) => vec![Action::UpdateInventory {
                owner: self.owner,
                inventory,
            }],
            None => {
                debug!(entity = %self.owner, pocket = self.pocket, "inventory left unchanged");
                Vec::new()
            }
        }
    }

    fn take_job(&mut self) -> Option<Job> {
        None
    }

    fn finish(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use orbis_core::EntityKind;

    use super::*;
    use crate::task::testing::{at, carry, entity, world};

    fn stack(id: u64, kind: EntityKind, size: u32) -> orbis_core::Entity {
        let mut e = entity(id, kind, at(0.0));
        if let Some(s) = e.features.stackable.as_mut() {
            s.set_size(size);
        }
        e
    }

    fn inventory_of(state: &State, id: u64) -> &orbis_core::Inventory {
        state
            .get_entity(ActorId(id))
            .unwrap()
            .features
            .inventory
            .as_ref()
            .unwrap()
    }

    #[test]
    fn swap_moves_hand_item_to_pocket() {
        let mut state = world(vec![
            entity(1, EntityKind::Pirate, at(0.0)),
            entity(2, EntityKind::Axe, at(0.0)),
        ]);
        carry(&mut state, ActorId(1), ActorId(2), None);

        let mut task = InventoryUpdateTask::new(ActorId(1), Hand::Left, 4, UpdateVariant::Swap);
        let actions = task.start(&mut state);
        assert_eq!(actions.len(), 1);
        assert!(task.take_job().is_none());

        let inventory = inventory_of(&state, 1);
        assert!(inventory.get_hand_entry(Hand::Left).is_none());
        assert_eq!(inventory.get_pocket_entry(4).map(|e| e.id), Some(ActorId(2)));
        assert_eq!(
            actions[0],
            Action::UpdateInventory {
                owner: ActorId(1),
                inventory: inventory.clone(),
            }
        );
    }

    #[test]
    fn merge_combines_stacks() {
        let mut state = world(vec![
            entity(1, EntityKind::Pirate, at(0.0)),
            stack(2, EntityKind::Rocks, 3),
            stack(3, EntityKind::Rocks, 4),
        ]);
        carry(&mut state, ActorId(1), ActorId(2), None);
        carry(&mut state, ActorId(1), ActorId(3), Some(0));

        let mut task = InventoryUpdateTask::new(ActorId(1), Hand::Left, 0, UpdateVariant::Merge);
        assert_eq!(task.start(&mut state).len(), 1);
        assert!(state.get_entity(ActorId(2)).is_none());
        assert_eq!(inventory_of(&state, 1).get_pocket_entry(0).unwrap().quantity, 7);
    }

    #[test]
    fn merge_of_different_kinds_changes_nothing() {
        let mut state = world(vec![
            entity(1, EntityKind::Pirate, at(0.0)),
            stack(2, EntityKind::Rocks, 3),
            stack(3, EntityKind::Gold, 4),
        ]);
        carry(&mut state, ActorId(1), ActorId(2), None);
        carry(&mut state, ActorId(1), ActorId(3), Some(0));

        let mut task = InventoryUpdateTask::new(ActorId(1), Hand::Left, 0, UpdateVariant::Merge);
        assert!(task.start(&mut state).is_empty());
        assert!(inventory_of(&state, 1).get_hand_entry(Hand::Left).is_some());
    }

    #[test]
    fn owner_without_inventory_is_noop() {
        let mut state = world(vec![entity(1, EntityKind::Warrior, at(0.0))]);
        let mut task = InventoryUpdateTask::new(ActorId(1), Hand::Left, 0, UpdateVariant::Swap);
        assert!(task.start(&mut state).is_empty());
        assert!(state.get_entity(ActorId(1)).unwrap().features.inventory.is_none());
    }
}
