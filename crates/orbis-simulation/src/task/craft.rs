use orbis_core::{Action, Actor, ActorId, Assembly, Event, State};
use tracing::debug;

use super::Task;
use crate::job::Job;

/// How long crafting takes.
pub const CRAFT_DURATION: f64 = 1.0;

/// Turns inventory items into a new item following a recipe.
#[derive(Debug)]
pub struct CraftTask {
    crafter: ActorId,
    assembly: Assembly,
    job: Option<Job>,
}

impl CraftTask {
    /// Craft `assembly` from the crafter's inventory.
    pub fn new(crafter: ActorId, assembly: Assembly) -> Self {
        Self {
            crafter,
            assembly,
            job: None,
        }
    }
}

impl Task for CraftTask {
    fn name(&self) -> &'static str {
        "craft"
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        let Some(inventory) = state
            .get_entity(self.crafter)
            .and_then(|e| e.features.inventory.as_ref())
        else {
            return Vec::new();
        };
        if inventory.free_hand().is_none() {
            debug!(entity = %self.crafter, "no free hand to craft with");
            return Vec::new();
        }
        if !state.validate_assembly(&self.assembly, inventory) {
            debug!(entity = %self.crafter, recipe = %self.assembly.recipe_codename, "invalid assembly");
            return Vec::new();
        }

        self.job = Some(Job::wait(
            CRAFT_DURATION,
            vec![Event::Finished {
                entity: self.crafter,
            }],
        ));
        vec![Action::CraftStart {
            crafter: self.crafter,
        }]
    }

    fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    fn finish(&mut self, state: &mut State) -> Vec<Action> {
        let Some(mut inventory) = state
            .get_entity_mut(self.crafter)
            .and_then(|e| e.features.inventory.take())
        else {
            return Vec::new();
        };

        let result = state.craft_entity(&self.assembly, &mut inventory);
        let snapshot = inventory.clone();
        if let Some(crafter) = state.get_entity_mut(self.crafter) {
            crafter.features.inventory = Some(inventory);
        }
        if result.is_empty() {
            debug!(entity = %self.crafter, recipe = %self.assembly.recipe_codename, "craft failed");
            return vec![Action::CraftEnd {
                crafter: self.crafter,
            }];
        }

        for created in &result.created {
            if let Some(inventorable) = state
                .get_entity_mut(created.id)
                .and_then(|e| e.features.inventorable.as_mut())
            {
                inventorable.set_stored_by(Some(self.crafter));
            }
        }

        vec![
            Action::CreateActors {
                actors: result.created.iter().map(Actor::of).collect(),
            },
            Action::DeleteActors {
                ids: result.deleted,
            },
            Action::UpdateInventory {
                owner: self.crafter,
                inventory: snapshot,
            },
            Action::CraftEnd {
                crafter: self.crafter,
            },
        ]
    }
}
