use orbis_core::{Action, ActorId, Event, State};

use super::Task;
use crate::job::Job;

/// How long an open-ended movement lasts before it stops by itself.
pub const MOVEMENT_TIMEOUT: f64 = 20.0;
/// Speed used by walking and player movement.
pub const WALK_SPEED: f64 = 1.0;
/// Length of one autonomous walk.
pub const WALK_DURATION: f64 = 1.0;

/// Moves an entity along a bearing for a fixed time.
///
/// Open-ended movement runs until [`MOVEMENT_TIMEOUT`] or until replaced and
/// reports nothing on completion. A walk runs for its own duration and then
/// reports `Finished` so the walker can decide what to do next.
#[derive(Debug)]
pub struct MovementTask {
    entity: ActorId,
    speed: f64,
    bearing: f64,
    duration: f64,
    walk: bool,
    job: Option<Job>,
}

impl MovementTask {
    /// Open-ended movement, as commanded by the player.
    pub fn new(entity: ActorId, speed: f64, bearing: f64) -> Self {
        Self {
            entity,
            speed,
            bearing,
            duration: MOVEMENT_TIMEOUT,
            walk: false,
            job: None,
        }
    }

    /// A walk of `duration` seconds that reports `Finished`.
    pub fn walk(entity: ActorId, speed: f64, bearing: f64, duration: f64) -> Self {
        Self {
            entity,
            speed,
            bearing,
            duration,
            walk: true,
            job: None,
        }
    }

    /// Direction of travel, radians from north.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    fn localize(&self, state: &State) -> Vec<Action> {
        state
            .get_entity(self.entity)
            .and_then(|e| e.position)
            .map(|position| Action::Localize {
                actor: self.entity,
                position,
            })
            .into_iter()
            .collect()
    }
}

impl Task for MovementTask {
    fn name(&self) -> &'static str {
        if self.walk { "walk" } else { "movement" }
    }

    fn start(&mut self, state: &mut State) -> Vec<Action> {
        if state
            .get_entity(self.entity)
            .and_then(|e| e.position)
            .is_none()
        {
            return Vec::new();
        }

        let events = if self.walk {
            vec![Event::Finished {
                entity: self.entity,
            }]
        } else {
            Vec::new()
        };
        self.job = Some(Job::movement(
            self.entity,
            self.speed,
            self.bearing,
            self.duration,
            events,
        ));
        vec![Action::Movement {
            actor: self.entity,
            speed: self.speed,
            bearing: self.bearing,
            duration: self.duration,
        }]
    }

    fn take_job(&mut self) -> Option<Job> {
        self.job.take()
    }

    fn finish(&mut self, state: &mut State) -> Vec<Action> {
        self.localize(state)
    }

    fn conclude(&mut self, state: &mut State) -> Vec<Action> {
        self.localize(state)
    }
}
