use orbis_core::{ActorId, Event, Hand, State};
use tracing::trace;

/// Slack when comparing a job's elapsed time against its timeout.
pub const EXPIRY_EPSILON: f64 = 1e-9;

/// What a job does while it runs.
#[derive(Debug, Clone, PartialEq)]
pub enum JobKind {
    /// Moves `entity` along a great circle each tick.
    Movement {
        /// The entity being moved.
        entity: ActorId,
        /// Surface speed in distance units per second.
        speed: f64,
        /// Direction of travel, radians from north.
        bearing: f64,
    },
    /// Pure timer.
    Wait,
    /// Resolves a blow struck with `item` immediately.
    Damage {
        /// Who struck.
        dealer: ActorId,
        /// Who was struck.
        receiver: ActorId,
        /// The tool or weapon used.
        item: ActorId,
        /// The hand holding `item`.
        hand: Hand,
    },
}

/// Result of advancing a job by one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Still running.
    Pending,
    /// Ran to its deadline (or was force-expired). The events are delivered
    /// exactly once.
    Completed(Vec<Event>),
}

/// A time-driven unit of work owned by one entity's task.
///
/// Jobs reference entities by ID only; an entity that disappears while its
/// job runs is treated as "nothing to do", never as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    kind: JobKind,
    timeout: f64,
    events: Vec<Event>,
    started_at: f64,
    prev: f64,
    expired: bool,
}

impl Job {
    /// A job of `kind` that completes `timeout` seconds after it begins and
    /// then delivers `events`.
    pub fn new(kind: JobKind, timeout: f64, events: Vec<Event>) -> Self {
        Self {
            kind,
            timeout,
            events,
            started_at: 0.0,
            prev: 0.0,
            expired: false,
        }
    }

    /// Move `entity` at `speed` along `bearing` until `timeout`.
    pub fn movement(
        entity: ActorId,
        speed: f64,
        bearing: f64,
        timeout: f64,
        events: Vec<Event>,
    ) -> Self {
        Self::new(
            JobKind::Movement {
                entity,
                speed,
                bearing,
            },
            timeout,
            events,
        )
    }

    /// Do nothing for `duration` seconds.
    pub fn wait(duration: f64, events: Vec<Event>) -> Self {
        Self::new(JobKind::Wait, duration, events)
    }

    /// A damage job completes on its first advancement.
    pub fn damage(
        dealer: ActorId,
        receiver: ActorId,
        item: ActorId,
        hand: Hand,
        events: Vec<Event>,
    ) -> Self {
        Self::new(
            JobKind::Damage {
                dealer,
                receiver,
                item,
                hand,
            },
            0.0,
            events,
        )
    }

    /// What this job does.
    pub fn kind(&self) -> &JobKind {
        &self.kind
    }

    /// Seconds from the start until the job completes.
    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    /// Events still to be delivered on completion.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Time of the last advancement (or of the start).
    pub fn prev_call_time(&self) -> f64 {
        self.prev
    }

    /// Anchor the job's deadline at `now`.
    pub fn begin(&mut self, now: f64) {
        self.started_at = now;
        self.prev = now;
    }

    /// Make the job complete on its next advancement.
    pub fn expire(&mut self) {
        self.expired = true;
    }

    /// Simulated time at which the job completes.
    pub fn deadline(&self) -> f64 {
        self.started_at + self.timeout
    }

    /// Apply this job's effect from the last advancement up to `now`
    /// (capped at the deadline) without completing it. Settling again at the
    /// same `now` has no effect.
    pub fn settle(&mut self, now: f64, state: &mut State) {
        match &self.kind {
            JobKind::Movement {
                entity,
                speed,
                bearing,
            } => {
                let until = now.min(self.deadline()).max(self.prev);
                let radius = state.get_radius();
                match state.get_entity_mut(*entity) {
                    Some(mover) => mover.move_by(speed * (until - self.prev), *bearing, radius),
                    None => trace!(entity = %entity, "moving entity vanished"),
                }
                self.prev = until;
            }
            JobKind::Wait | JobKind::Damage { .. } => self.prev = self.prev.max(now),
        }
    }

    /// Advance to `now`, applying this job's effect for the elapsed span.
    pub fn advance(&mut self, now: f64, state: &mut State) -> JobStatus {
        let done = self.expired || now + EXPIRY_EPSILON >= self.deadline();
        self.settle(now, state);

        if !done {
            return JobStatus::Pending;
        }

        let mut events: Vec<Event> = match &self.kind {
            JobKind::Damage {
                dealer,
                receiver,
                item,
                ..
            } => resolve_damage(state, *dealer, *receiver, *item)
                .into_iter()
                .collect(),
            JobKind::Movement { .. } | JobKind::Wait => Vec::new(),
        };
        events.append(&mut self.events);
        JobStatus::Completed(events)
    }
}

/// The damage event a blow produces, if the item is a tool and the receiver
/// can be damaged.
fn resolve_damage(
    state: &State,
    dealer: ActorId,
    receiver: ActorId,
    item: ActorId,
) -> Option<Event> {
    let tool = state.get_entity(item)?.features.tool_or_weapon.as_ref()?;
    let variant = state
        .get_entity(receiver)?
        .features
        .damageable
        .as_ref()?
        .variant();
    Some(Event::Damage {
        entity: receiver,
        dealer,
        variant,
        amount: tool.damage_for(variant),
    })
}
