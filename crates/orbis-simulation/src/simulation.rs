use std::collections::{BTreeMap, VecDeque};

use orbis_core::{Action, ActionLog, ActionSink, ActorId, Event, State, Stats};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::behavior::{self, Reaction};
use crate::clock::SimClock;
use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::scheduler::JobScheduler;
use crate::task::{IdleTask, Task, TaskPhase};

/// The task an entity is currently running.
#[derive(Debug)]
struct TaskSlot {
    task: Box<dyn Task>,
    phase: TaskPhase,
    generation: u64,
}

/// The top-level simulation orchestrator.
///
/// Owns the world state, clock, RNG, job scheduler, and each entity's
/// current task. Every tick applies queued events first, then advances
/// jobs, then delivers the events completed jobs emit. Entities without a
/// task slot are idle.
pub struct Simulation {
    state: State,
    config: SimConfig,
    clock: SimClock,
    rng: StdRng,
    scheduler: JobScheduler,
    tasks: BTreeMap<ActorId, TaskSlot>,
    inbox: VecDeque<Event>,
    pending: Vec<Action>,
    log: ActionLog,
    generation: u64,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("entities", &self.state.entity_count())
            .field("jobs", &self.scheduler.len())
            .field("queued_events", &self.inbox.len())
            .finish()
    }
}

impl Simulation {
    /// Create a new simulation from an initial state and configuration.
    pub fn new(state: State, config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let log = ActionLog::new(config.max_actions);
        Self {
            state,
            config,
            clock: SimClock::new(),
            rng,
            scheduler: JobScheduler::new(),
            tasks: BTreeMap::new(),
            inbox: VecDeque::new(),
            pending: Vec::new(),
            log,
            generation: 0,
        }
    }

    /// Create a simulation from a JSON world snapshot.
    pub fn from_json(json: &str, config: SimConfig) -> SimResult<Self> {
        Ok(Self::new(State::from_json(json)?, config))
    }

    /// Queue an event for delivery at the start of the next tick.
    pub fn post(&mut self, event: Event) {
        self.inbox.push_back(event);
    }

    /// Queue a `Resume` for every entity, in registry order.
    pub fn resume_all(&mut self) {
        for id in self.state.ids() {
            self.inbox.push_back(Event::Resume { entity: id });
        }
    }

    /// Queue the scene setup for `hero`, delivered first on the next tick.
    pub fn configure(&mut self, hero: ActorId) -> SimResult<()> {
        if !self.state.contains(hero) {
            return Err(SimError::EntityNotFound(hero));
        }
        self.pending.push(Action::Configuration {
            hero,
            elevation: self.state.elevation().clone(),
        });
        Ok(())
    }

    /// Advance the simulation by `interval` seconds and return the actions
    /// emitted during the tick, in order.
    pub fn tick(&mut self, interval: f64) -> SimResult<Vec<Action>> {
        if !interval.is_finite() || interval < 0.0 {
            return Err(SimError::InvalidInterval(interval));
        }
        let interval = self.config.clamp_interval(interval);
        let tick = self.clock.advance(interval);
        let now = self.clock.now();

        let mut actions = std::mem::take(&mut self.pending);

        while let Some(event) = self.inbox.pop_front() {
            self.dispatch(event, now, &mut actions);
        }

        for done in self.scheduler.advance(now, &mut self.state) {
            let current = self
                .tasks
                .get_mut(&done.owner)
                .filter(|slot| slot.generation == done.generation);
            let Some(slot) = current else {
                debug!(entity = %done.owner, "dropping completion of replaced task");
                continue;
            };
            if slot.phase == TaskPhase::Started {
                actions.extend(slot.task.finish(&mut self.state));
                slot.phase = TaskPhase::Finished;
            }
            for event in done.events {
                self.dispatch(event, now, &mut actions);
            }
        }

        let state = &self.state;
        self.tasks.retain(|id, _| state.contains(*id));

        for action in &actions {
            self.log.apply(action);
        }
        trace!(tick, now, actions = actions.len(), jobs = self.scheduler.len(), "tick");
        Ok(actions)
    }

    /// Advance by `n` ticks of `interval` seconds each.
    pub fn run(&mut self, n: u64, interval: f64) -> SimResult<()> {
        for _ in 0..n {
            self.tick(interval)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, event: Event, now: f64, actions: &mut Vec<Action>) {
        let target = event.target();
        let Some(entity) = self.state.get_entity_mut(target) else {
            debug!(entity = %target, event = event.name(), "event for absent entity dropped");
            return;
        };
        let reaction = behavior::handle_event(entity, &event, &mut self.rng);

        if matches!(event, Event::Damage { .. }) {
            if let Some(damageable) = entity.features.damageable.as_ref() {
                actions.push(Action::StatUpdate {
                    actor: target,
                    stats: Stats {
                        health: Some(damageable.health()),
                        max_health: Some(damageable.max_health()),
                    },
                });
            }
        }

        match reaction {
            Reaction::Keep => {}
            Reaction::Conclude => {
                self.scheduler.expire(target);
            }
            Reaction::Replace(task) => self.install(target, task, now, actions),
        }
    }

    /// Make `task` the owner's current task. The previous task's job is
    /// settled up to `now` and cancelled before the new task starts. A task
    /// whose start does nothing leaves the owner idle.
    fn install(&mut self, owner: ActorId, task: Box<dyn Task>, now: f64, actions: &mut Vec<Action>) {
        if let Some(mut job) = self.scheduler.cancel(owner) {
            job.settle(now, &mut self.state);
        }
        if let Some(mut previous) = self.tasks.remove(&owner) {
            if previous.phase == TaskPhase::Started {
                trace!(entity = %owner, task = previous.task.name(), "concluding replaced task");
                actions.extend(previous.task.conclude(&mut self.state));
            }
        }

        self.generation += 1;
        let mut slot = TaskSlot {
            task,
            phase: TaskPhase::NotStarted,
            generation: self.generation,
        };
        trace!(entity = %owner, task = slot.task.name(), "installing task");

        let started = slot.task.start(&mut self.state);
        let job = slot.task.take_job();
        let did_something = !started.is_empty();
        actions.extend(started);

        match job {
            Some(job) => {
                self.scheduler.insert(owner, slot.generation, job, now);
                slot.phase = TaskPhase::Started;
            }
            None if did_something => {
                actions.extend(slot.task.finish(&mut self.state));
                slot.phase = TaskPhase::Finished;
            }
            None => {
                debug!(entity = %owner, task = slot.task.name(), "task did not start");
                slot.task = Box::new(IdleTask);
                slot.phase = TaskPhase::Finished;
            }
        }
        self.tasks.insert(owner, slot);
    }

    /// The world state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Mutable access to the world state, for setting up scenarios.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The configuration the simulation was created with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Every action emitted so far (bounded by `max_actions`).
    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    /// Name of the entity's current task, `None` if the entity is absent.
    pub fn task_name(&self, id: ActorId) -> Option<&'static str> {
        if !self.state.contains(id) {
            return None;
        }
        Some(self.tasks.get(&id).map_or("idle", |slot| slot.task.name()))
    }

    /// Lifecycle phase of the entity's current task, `None` if it never had one.
    pub fn task_phase(&self, id: ActorId) -> Option<TaskPhase> {
        self.tasks.get(&id).map(|slot| slot.phase)
    }

    /// Whether the entity has a live job.
    pub fn has_job(&self, id: ActorId) -> bool {
        self.scheduler.contains(id)
    }

    /// The job scheduler.
    pub fn scheduler(&self) -> &JobScheduler {
        &self.scheduler
    }

    /// Number of ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Extract the world state, consuming the simulation.
    pub fn into_state(self) -> State {
        self.state
    }
}
