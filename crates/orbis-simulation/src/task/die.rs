use orbis_core::{Action, Actor, ActorId, EntityKind, Event, State};

use super::Task;
use crate::job::Job;

/// Time between dying and the follow-up `Finished`.
pub const DIE_DURATION: f64 = 0.01;

/// Removes a dead entity and leaves its drops where it stood.
#[derive(Debug)]
pub struct DieAndDropTask {
    dier: ActorId,
    drops: Vec<EntityKind>,
    job: Option<Job>,
}

impl DieAndDropTask {
    /// `dier` dies, leaving one entity of each kind in `drops`.
    pub fn new(dier: ActorId, drops: Vec<EntityKind>) -> Self {
        Self {
            dier,
            drops,
            job: None,
        }
    }
}

impl Task for DieAndDropTask {
    fn name(&self) -> &'static str {
        "die_and_drop"
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        let Some(dier) = state.remove_entity(self.dier) else {
            return Vec::new();
        };

        let actors: Vec<Actor> = self
            .drops
            .iter()
            .filter_map(|kind| {
                let id = state.spawn(*kind, dier.position);
                state.get_entity(id).map(Actor::of)
            })
            .collect();

        // The dier is gone by the time this fires, so it is dropped on
        // delivery.
        self.job = Some(Job::wait(
            DIE_DURATION,
            vec![Event::Finished { entity: self.dier }],
        ));

        let mut actions = Vec::with_capacity(2);
        if !actors.is_empty() {
            actions.push(Action::CreateActors { actors });
        }
        actions.push(Action::DeleteActors {
            ids: vec![self.dier],
        });
        actions
    }

    fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    fn finish(&mut self, _state: &mut State) -> Vec<Action> {
        Vec::new()
    }
}
