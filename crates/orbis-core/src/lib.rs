//! Core types for Orbis: a small world on the surface of a sphere.
//!
//! This crate holds the passive data model: entities and their features,
//! inventories, recipes, the events addressed to entities and the actions
//! handed to rendering. It owns no clock and runs no behaviour; the
//! `orbis-simulation` crate drives it.

/// Actions emitted for rendering and the sink they flow into.
pub mod action;
/// Essences, recipes, and crafting assemblies.
pub mod craft;
/// Entity identifiers, kinds, and the entity record.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Events addressed to entities.
pub mod event;
/// Optional entity capabilities and the claims they deliver or absorb.
pub mod feature;
/// Spherical geometry and the elevation function.
pub mod geometry;
/// Hand and pocket slots holding carried items.
pub mod inventory;
/// The authoritative entity registry and world queries.
pub mod state;

/// Re-export action types.
pub use action::{Action, ActionLog, ActionSink, Actor, AnimationName, Stats};
/// Re-export crafting types.
pub use craft::{Assembly, Essence, Ingredient, Item, Recipe, RecipeBook};
/// Re-export entity types.
pub use entity::{ActorId, Entity, EntityKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export event types.
pub use event::{Event, UpdateVariant};
/// Re-export feature types.
pub use feature::{Claim, DamageVariant, FeatureSet};
/// Re-export geometry types.
pub use geometry::{ElevationFunction, Point, Terrain};
/// Re-export inventory types.
pub use inventory::{Hand, Inventory, InventoryEntry, Slot};
/// Re-export state types.
pub use state::{CraftResult, MergeOutcome, State};
