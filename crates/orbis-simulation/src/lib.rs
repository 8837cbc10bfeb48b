//! Tick-based simulation for Orbis.
//!
//! Drives an [`orbis_core::State`]: events addressed to entities pick new
//! tasks, tasks start jobs, and the job scheduler finishes them against a
//! simulated clock. Everything runs on one thread in a fixed order, so a
//! run is reproducible from its seed and tick intervals.

/// Per-kind reactions to events.
pub mod behavior;
/// Simulation clock for tracking ticks and simulated seconds.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Error types for the simulation crate.
pub mod error;
/// Initial world construction.
pub mod generator;
/// Time-driven units of work.
pub mod job;
/// Per-entity job bookkeeping.
pub mod scheduler;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Per-entity activities.
pub mod task;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-export of [`generator::WorldGenerator`].
pub use generator::WorldGenerator;
/// Re-exports of [`job::Job`] and [`job::JobStatus`].
pub use job::{Job, JobKind, JobStatus};
/// Re-export of [`scheduler::JobScheduler`].
pub use scheduler::JobScheduler;
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-exports of [`task::Task`] and [`task::TaskPhase`].
pub use task::{Task, TaskPhase};
