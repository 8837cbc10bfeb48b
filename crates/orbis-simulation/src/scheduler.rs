use std::collections::BTreeMap;

use orbis_core::{ActorId, Event, State};
use tracing::trace;

use crate::job::{Job, JobStatus};

/// A job that ran out during [`JobScheduler::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    /// The entity whose task registered the job.
    pub owner: ActorId,
    /// Generation of the task that registered the job.
    pub generation: u64,
    /// Events to deliver, in order.
    pub events: Vec<Event>,
}

#[derive(Debug)]
struct ScheduledJob {
    generation: u64,
    job: Job,
}

/// Holds at most one live job per entity and polls them once per tick.
#[derive(Debug, Default)]
pub struct JobScheduler {
    jobs: BTreeMap<ActorId, ScheduledJob>,
}

impl JobScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `job` for `owner`, anchored at `now`. Any job the owner
    /// already had is dropped without emitting its events.
    pub fn insert(&mut self, owner: ActorId, generation: u64, mut job: Job, now: f64) {
        job.begin(now);
        if self
            .jobs
            .insert(owner, ScheduledJob { generation, job })
            .is_some()
        {
            trace!(entity = %owner, "replaced live job");
        }
    }

    /// Remove the owner's job without emitting its events and hand it back,
    /// so the caller can settle the span it already ran.
    pub fn cancel(&mut self, owner: ActorId) -> Option<Job> {
        let scheduled = self.jobs.remove(&owner)?;
        trace!(entity = %owner, "job cancelled");
        Some(scheduled.job)
    }

    /// Make the owner's job complete on the next advancement.
    pub fn expire(&mut self, owner: ActorId) -> bool {
        match self.jobs.get_mut(&owner) {
            Some(scheduled) => {
                scheduled.job.expire();
                trace!(entity = %owner, "job expired early");
                true
            }
            None => false,
        }
    }

    /// The owner's live job.
    pub fn get(&self, owner: ActorId) -> Option<&Job> {
        self.jobs.get(&owner).map(|s| &s.job)
    }

    /// Whether the owner has a live job.
    pub fn contains(&self, owner: ActorId) -> bool {
        self.jobs.contains_key(&owner)
    }

    /// Number of live jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no job is live.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Advance every live job to `now` in owner order. Completed jobs are
    /// removed and returned.
    pub fn advance(&mut self, now: f64, state: &mut State) -> Vec<CompletedJob> {
        let mut completed = Vec::new();
        self.jobs.retain(|owner, scheduled| {
            match scheduled.job.advance(now, state) {
                JobStatus::Pending => true,
                JobStatus::Completed(events) => {
                    completed.push(CompletedJob {
                        owner: *owner,
                        generation: scheduled.generation,
                        events,
                    });
                    false
                }
            }
        });
        completed
    }
}

#[cfg(test)]
mod tests {
    use orbis_core::ElevationFunction;

    use super::*;

    fn finished(id: u64) -> Vec<Event> {
        vec![Event::Finished {
            entity: ActorId(id),
        }]
    }

    fn empty_state() -> State {
        State::new(ElevationFunction::new(10.0), Vec::new()).unwrap()
    }

    #[test]
    fn one_job_per_owner() {
        let mut scheduler = JobScheduler::new();
        scheduler.insert(ActorId(1), 1, Job::wait(1.0, finished(1)), 0.0);
        scheduler.insert(ActorId(1), 2, Job::wait(5.0, Vec::new()), 0.0);
        assert_eq!(scheduler.len(), 1);
        assert!((scheduler.get(ActorId(1)).unwrap().timeout() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cancelled_job_never_completes() {
        let mut state = empty_state();
        let mut scheduler = JobScheduler::new();
        scheduler.insert(ActorId(1), 1, Job::wait(1.0, finished(1)), 0.0);
        assert_eq!(scheduler.cancel(ActorId(1)).map(|job| job.timeout()), Some(1.0));
        assert!(scheduler.cancel(ActorId(1)).is_none());
        assert!(scheduler.advance(10.0, &mut state).is_empty());
    }

    #[test]
    fn completion_reported_once_in_owner_order() {
        let mut state = empty_state();
        let mut scheduler = JobScheduler::new();
        scheduler.insert(ActorId(5), 3, Job::wait(1.0, finished(5)), 0.0);
        scheduler.insert(ActorId(2), 4, Job::wait(0.5, finished(2)), 0.0);

        let done = scheduler.advance(1.0, &mut state);
        assert_eq!(
            done.iter().map(|c| c.owner).collect::<Vec<_>>(),
            vec![ActorId(2), ActorId(5)]
        );
        assert_eq!(done[1].generation, 3);
        assert_eq!(done[1].events, finished(5));
        assert!(scheduler.is_empty());
        assert!(scheduler.advance(2.0, &mut state).is_empty());
    }

    #[test]
    fn deadline_counts_from_registration() {
        let mut state = empty_state();
        let mut scheduler = JobScheduler::new();
        scheduler.insert(ActorId(1), 1, Job::wait(1.0, finished(1)), 4.0);
        assert!(scheduler.advance(4.5, &mut state).is_empty());
        assert_eq!(scheduler.advance(5.0, &mut state).len(), 1);
    }

    #[test]
    fn expired_job_completes_next_advance() {
        let mut state = empty_state();
        let mut scheduler = JobScheduler::new();
        scheduler.insert(ActorId(1), 1, Job::wait(30.0, finished(1)), 0.0);
        assert!(scheduler.expire(ActorId(1)));
        assert!(!scheduler.expire(ActorId(2)));
        let done = scheduler.advance(0.1, &mut state);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].events, finished(1));
    }
}
