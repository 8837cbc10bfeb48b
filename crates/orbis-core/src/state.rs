use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::craft::{Assembly, RecipeBook};
use crate::entity::{ActorId, Entity, EntityKind};
use crate::error::{CoreError, CoreResult};
use crate::feature::Claim;
use crate::geometry::{ElevationFunction, Point};
use crate::inventory::{Hand, Inventory, Slot};

/// Outcome of [`State::craft_entity`]. Both lists are empty when nothing
/// was crafted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CraftResult {
    /// Newly registered entities (already stored in the inventory).
    pub created: Vec<Entity>,
    /// IDs of source entities consumed entirely.
    pub deleted: Vec<ActorId>,
}

impl CraftResult {
    /// Whether nothing was crafted.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }
}

/// Outcome of [`State::merge_entities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing changed: a slot was empty, essences differed, or an entity
    /// was not stackable.
    Skipped,
    /// Everything fit into the target; the source stack was removed.
    Combined {
        /// The source entity that no longer exists.
        removed: ActorId,
    },
    /// The target was filled to capacity; the rest stayed in the source.
    Overflowed,
}

/// The authoritative registry of entities plus the world's shape.
#[derive(Debug, Clone)]
pub struct State {
    elevation: ElevationFunction,
    entities: BTreeMap<ActorId, Entity>,
    recipes: RecipeBook,
    next_id: u64,
}

impl State {
    /// Build a state from an elevation function and initial entities.
    /// Fails if two entities share an ID.
    pub fn new(elevation: ElevationFunction, entities: Vec<Entity>) -> CoreResult<Self> {
        let mut state = Self {
            elevation,
            entities: BTreeMap::new(),
            recipes: RecipeBook::default(),
            next_id: 1,
        };
        for entity in entities {
            state.add_entity(entity)?;
        }
        Ok(state)
    }

    /// Replace the recipe book.
    pub fn with_recipes(mut self, recipes: RecipeBook) -> Self {
        self.recipes = recipes;
        self
    }

    /// The world's shape.
    pub fn elevation(&self) -> &ElevationFunction {
        &self.elevation
    }

    /// Base radius of the world sphere.
    pub fn get_radius(&self) -> f64 {
        self.elevation.radius()
    }

    /// Recipes crafting can follow.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Register an entity under its own ID.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<ActorId> {
        let id = entity.id;
        if self.entities.contains_key(&id) {
            return Err(CoreError::DuplicateId(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Hand out an ID no entity of this state has used.
    pub fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create and register a fresh entity of `kind`.
    pub fn spawn(&mut self, kind: EntityKind, position: Option<Point>) -> ActorId {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::new(id, kind, position));
        id
    }

    /// The entity with `id`, if registered.
    pub fn get_entity(&self, id: ActorId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable access to the entity with `id`.
    pub fn get_entity_mut(&mut self, id: ActorId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Unregister an entity, returning it.
    pub fn remove_entity(&mut self, id: ActorId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: ActorId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All entities in registry (ID) order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Registered IDs in order.
    pub fn ids(&self) -> Vec<ActorId> {
        self.entities.keys().copied().collect()
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// Great-circle distance between two entities, or `None` if either is
    /// missing or not physically present.
    pub fn calculate_distance(&self, a: ActorId, b: ActorId) -> Option<f64> {
        let a = self.entities.get(&a)?;
        let b = self.entities.get(&b)?;
        a.distance_to(b, self.get_radius())
    }

    /// Closest entity within `max_distance` that delivers any of `claims`.
    pub fn find_closest_delivering_within(
        &self,
        origin: ActorId,
        claims: &[Claim],
        max_distance: f64,
    ) -> Option<ActorId> {
        self.find_closest_within(origin, max_distance, |e| {
            claims.iter().any(|c| e.features.delivers(*c))
        })
    }

    /// Closest entity within `max_distance` that absorbs any of `claims`.
    pub fn find_closest_absorbing_within(
        &self,
        origin: ActorId,
        claims: &[Claim],
        max_distance: f64,
    ) -> Option<ActorId> {
        self.find_closest_within(origin, max_distance, |e| {
            claims.iter().any(|c| e.features.absorbs(*c))
        })
    }

    fn find_closest_within(
        &self,
        origin: ActorId,
        max_distance: f64,
        accept: impl Fn(&Entity) -> bool,
    ) -> Option<ActorId> {
        let origin_entity = self.entities.get(&origin)?;
        let radius = self.get_radius();

        let mut best: Option<(ActorId, f64)> = None;
        for candidate in self.entities.values() {
            if candidate.id == origin || !accept(candidate) {
                continue;
            }
            let Some(distance) = origin_entity.distance_to(candidate, radius) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            // Strict comparison keeps the first candidate on ties.
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate.id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Crafting
    // -----------------------------------------------------------------------

    /// Check that `assembly` follows a known recipe and that `inventory`
    /// holds every referenced item with enough quantity.
    pub fn validate_assembly(&self, assembly: &Assembly, inventory: &Inventory) -> bool {
        self.plan_consumption(assembly, inventory).is_some()
    }

    /// Per-entry demand of a valid assembly, in order of first appearance.
    /// Demand that overflows makes the assembly unsatisfiable.
    fn plan_consumption(
        &self,
        assembly: &Assembly,
        inventory: &Inventory,
    ) -> Option<Vec<(ActorId, Slot, u32)>> {
        let recipe = self.recipes.find(&assembly.recipe_codename)?;
        if !recipe.matches(assembly) {
            return None;
        }

        let mut plan: Vec<(ActorId, Slot, u32)> = Vec::new();
        for item in assembly.sources.iter().flatten() {
            let slot = inventory.find(item.actor_id)?;
            let entry = inventory.entry(slot)?;
            if entry.essence != item.essence || !self.entities.contains_key(&item.actor_id) {
                return None;
            }
            match plan.iter_mut().find(|(id, _, _)| *id == item.actor_id) {
                Some((_, _, demand)) => *demand = demand.checked_add(item.quantity)?,
                None => plan.push((item.actor_id, slot, item.quantity)),
            }
        }

        let satisfied = plan.iter().all(|(_, slot, demand)| {
            inventory
                .entry(*slot)
                .is_some_and(|entry| entry.quantity >= *demand)
        });
        satisfied.then_some(plan)
    }

    /// Consume the assembly's sources from `inventory` and create the
    /// recipe's output in it. All-or-nothing: on any failed precondition
    /// neither the inventory nor the registry changes.
    pub fn craft_entity(&mut self, assembly: &Assembly, inventory: &mut Inventory) -> CraftResult {
        let Some(plan) = self.plan_consumption(assembly, inventory) else {
            debug!(recipe = %assembly.recipe_codename, "assembly rejected");
            return CraftResult::default();
        };
        let Some(output) = self.recipes.find(&assembly.recipe_codename).map(|r| r.output) else {
            return CraftResult::default();
        };

        let depleted_slot = plan.iter().find_map(|(_, slot, demand)| {
            inventory
                .entry(*slot)
                .is_some_and(|entry| entry.quantity == *demand)
                .then_some(*slot)
        });
        let Some(output_slot) = inventory.free_slot().or(depleted_slot) else {
            debug!(recipe = %assembly.recipe_codename, "no room for crafted item");
            return CraftResult::default();
        };

        let mut result = CraftResult::default();
        for (id, slot, demand) in plan {
            let Some(entry) = inventory.entry_mut(slot) else {
                continue;
            };
            if entry.quantity == demand {
                inventory.take(slot);
                self.entities.remove(&id);
                result.deleted.push(id);
            } else {
                entry.quantity -= demand;
                let remaining = entry.quantity;
                if let Some(stack) = self
                    .entities
                    .get_mut(&id)
                    .and_then(|e| e.features.stackable.as_mut())
                {
                    stack.set_size(remaining);
                }
            }
        }

        let id = self.allocate_id();
        let entity = Entity::new(id, output, None);
        inventory.put(output_slot, entity.as_entry());
        self.entities.insert(id, entity.clone());
        result.created.push(entity);

        debug!(
            recipe = %assembly.recipe_codename,
            created = %id,
            consumed = result.deleted.len(),
            "crafted"
        );
        result
    }

    // -----------------------------------------------------------------------
    // Stacks
    // -----------------------------------------------------------------------

    /// Pour the stack held in `hand` into the stack in pocket `pocket_index`.
    ///
    /// If everything fits, the hand slot is emptied and its entity removed.
    /// Otherwise the pocket stack is filled to capacity and the remainder
    /// stays in the hand. Stacks of different essence are left alone.
    pub fn merge_entities(
        &mut self,
        inventory: &mut Inventory,
        hand: Hand,
        pocket_index: usize,
    ) -> MergeOutcome {
        let source_slot = Slot::Hand(hand);
        let target_slot = Slot::Pocket(pocket_index);
        let (Some(source), Some(target)) = (
            inventory.entry(source_slot).cloned(),
            inventory.entry(target_slot).cloned(),
        ) else {
            return MergeOutcome::Skipped;
        };
        if source.id == target.id || source.essence != target.essence {
            return MergeOutcome::Skipped;
        }

        let source_stackable = self
            .entities
            .get(&source.id)
            .is_some_and(|e| e.features.stackable.is_some());
        let Some(capacity) = self
            .entities
            .get(&target.id)
            .and_then(|e| e.features.stackable.as_ref())
            .map(|s| s.capacity())
        else {
            return MergeOutcome::Skipped;
        };
        if !source_stackable {
            return MergeOutcome::Skipped;
        }

        let total = source.quantity + target.quantity;
        if total <= capacity {
            self.set_stack_size(target.id, total);
            if let Some(entry) = inventory.entry_mut(target_slot) {
                entry.quantity = total;
            }
            inventory.take(source_slot);
            self.entities.remove(&source.id);
            debug!(source = %source.id, target = %target.id, total, "stacks combined");
            MergeOutcome::Combined { removed: source.id }
        } else {
            let remainder = total - capacity;
            self.set_stack_size(target.id, capacity);
            self.set_stack_size(source.id, remainder);
            if let Some(entry) = inventory.entry_mut(target_slot) {
                entry.quantity = capacity;
            }
            if let Some(entry) = inventory.entry_mut(source_slot) {
                entry.quantity = remainder;
            }
            debug!(source = %source.id, target = %target.id, remainder, "stack overflowed");
            MergeOutcome::Overflowed
        }
    }

    fn set_stack_size(&mut self, id: ActorId, size: u32) {
        if let Some(stack) = self
            .entities
            .get_mut(&id)
            .and_then(|e| e.features.stackable.as_mut())
        {
            stack.set_size(size);
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Build an initial state from a JSON world snapshot.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let snapshot: WorldSnapshot = serde_json::from_str(json)?;
        let mut entities = Vec::with_capacity(snapshot.entities.len());
        for record in snapshot.entities {
            let kind: EntityKind = record.codename.parse()?;
            let mut entity = Entity::new(record.id, kind, record.position);
            if let (Some(quantity), Some(stack)) =
                (record.quantity, entity.features.stackable.as_mut())
            {
                stack.set_size(quantity);
            }
            entities.push(entity);
        }
        Self::new(snapshot.elevation, entities)
    }
}

#[derive(Debug, Deserialize)]
struct WorldSnapshot {
    elevation: ElevationFunction,
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
struct EntityRecord {
    id: ActorId,
    codename: String,
    #[serde(default)]
    position: Option<Point>,
    #[serde(default)]
    quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use proptest::prelude::*;

    use super::*;
    use crate::craft::{Essence, Ingredient, Item, Recipe};
    use crate::inventory::InventoryEntry;

    fn stack(id: u64, kind: EntityKind, size: u32) -> Entity {
        let mut entity = Entity::new(ActorId(id), kind, None);
        if let Some(s) = entity.features.stackable.as_mut() {
            s.set_size(size);
        }
        entity
    }

    fn placed(id: u64, kind: EntityKind, phi: f64) -> Entity {
        Entity::new(ActorId(id), kind, Some(Point::new(0.5 * PI, phi)))
    }

    fn entry_of(entity: &Entity) -> InventoryEntry {
        entity.as_entry()
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = State::new(
            ElevationFunction::new(10.0),
            vec![placed(1, EntityKind::Gold, 0.0), placed(1, EntityKind::Rocks, 0.1)],
        );
        assert!(matches!(result, Err(CoreError::DuplicateId(ActorId(1)))));
    }

    #[test]
    fn allocated_ids_never_collide() {
        let mut state = State::new(
            ElevationFunction::new(10.0),
            vec![placed(41, EntityKind::Gold, 0.0)],
        )
        .unwrap();
        let a = state.spawn(EntityKind::Log, None);
        state.remove_entity(a);
        let b = state.spawn(EntityKind::Log, None);
        assert_eq!(a, ActorId(42));
        assert_eq!(b, ActorId(43));
    }

    #[test]
    fn distance_none_without_position() {
        let state = State::new(
            ElevationFunction::new(10.0),
            vec![
                placed(1, EntityKind::Gold, 0.0),
                placed(2, EntityKind::Gold, 0.3),
                stack(3, EntityKind::Rocks, 1),
            ],
        )
        .unwrap();
        let d = state.calculate_distance(ActorId(1), ActorId(2)).unwrap();
        assert!((d - 3.0).abs() < 1e-9);
        assert!(state.calculate_distance(ActorId(1), ActorId(3)).is_none());
        assert!(state.calculate_distance(ActorId(1), ActorId(99)).is_none());
    }

    #[test]
    fn closest_delivering_picks_nearest_within_range() {
        let state = State::new(
            ElevationFunction::new(10.0),
            vec![
                placed(1, EntityKind::Pirate, 0.0),
                placed(2, EntityKind::Gold, 0.09),
                placed(3, EntityKind::Rocks, 0.05),
                placed(4, EntityKind::Spruce, 0.01),
                placed(5, EntityKind::Log, 0.5),
            ],
        )
        .unwrap();
        let found = state.find_closest_delivering_within(ActorId(1), &[Claim::Cargo], 1.0);
        assert_eq!(found, Some(ActorId(3)));
        assert_eq!(
            state.find_closest_delivering_within(ActorId(1), &[Claim::Cargo], 0.1),
            None
        );
    }

    #[test]
    fn closest_ties_go_to_registry_order() {
        let state = State::new(
            ElevationFunction::new(10.0),
            vec![
                placed(1, EntityKind::Pirate, 0.0),
                placed(7, EntityKind::Spruce, 0.05),
                placed(3, EntityKind::Spruce, -0.05),
            ],
        )
        .unwrap();
        let found = state.find_closest_absorbing_within(ActorId(1), &[Claim::Pain], 1.0);
        assert_eq!(found, Some(ActorId(3)));
    }

    #[test]
    fn closest_skips_origin_and_carried_items() {
        let state = State::new(
            ElevationFunction::new(10.0),
            vec![placed(1, EntityKind::Pirate, 0.0), stack(2, EntityKind::Gold, 1)],
        )
        .unwrap();
        assert_eq!(
            state.find_closest_delivering_within(ActorId(1), &[Claim::Cargo], 100.0),
            None
        );
        assert_eq!(
            state.find_closest_absorbing_within(ActorId(1), &[Claim::Cargo], 100.0),
            None
        );
    }

    fn crafting_fixture(rocks: u32, gold: u32) -> (State, Inventory) {
        let rock = stack(1, EntityKind::Rocks, rocks);
        let gold_stack = stack(2, EntityKind::Gold, gold);
        let log = stack(3, EntityKind::Log, 1);

        let mut inventory = Inventory::default();
        inventory.insert(1, entry_of(&rock));
        inventory.insert(2, entry_of(&gold_stack));
        inventory.insert(3, entry_of(&log));

        let state = State::new(ElevationFunction::new(1000.0), vec![rock, gold_stack, log]).unwrap();
        (state, inventory)
    }

    fn axe_assembly(rocks: u32) -> Assembly {
        Assembly::new(
            "axe",
            vec![
                vec![Item::new(ActorId(1), Essence::Rocks, rocks)],
                vec![Item::new(ActorId(3), Essence::Logs, 1)],
            ],
        )
    }

    #[test]
    fn craft_consumes_sources_and_creates_output() {
        let (mut state, mut inventory) = crafting_fixture(2, 2);
        let before = state.entity_count();

        let result = state.craft_entity(&axe_assembly(2), &mut inventory);

        assert_eq!(result.created.len(), 1);
        let mut deleted = result.deleted.clone();
        deleted.sort();
        assert_eq!(deleted, vec![ActorId(1), ActorId(3)]);
        assert_eq!(
            state.entity_count() as isize,
            before as isize + result.created.len() as isize - result.deleted.len() as isize
        );

        let names: Vec<_> = state.entities().map(|e| e.codename()).collect();
        assert_eq!(names, vec!["gold", "axe"]);

        let axe_id = result.created[0].id;
        let mut items = inventory.to_items();
        items.sort_by_key(|i| i.actor_id);
        assert_eq!(
            items,
            vec![
                Item::new(ActorId(2), Essence::Gold, 2),
                Item::new(axe_id, Essence::Tool, 1),
            ]
        );
    }

    #[test]
    fn craft_decrements_partially_used_stack() {
        let (mut state, mut inventory) = crafting_fixture(5, 1);
        let result = state.craft_entity(&axe_assembly(2), &mut inventory);

        assert_eq!(result.deleted, vec![ActorId(3)]);
        let rock = state.get_entity(ActorId(1)).unwrap();
        assert_eq!(rock.quantity(), 3);
        assert_eq!(inventory.get_pocket_entry(1).unwrap().quantity, 3);
    }

    #[test]
    fn craft_with_missing_quantity_is_noop() {
        let (mut state, mut inventory) = crafting_fixture(1, 1);
        let before_inventory = inventory.clone();
        let before_ids = state.ids();

        let mut assembly = axe_assembly(1);
        assembly.sources[0][0].quantity = 2;
        assert!(!state.validate_assembly(&assembly, &inventory));

        let result = state.craft_entity(&assembly, &mut inventory);
        assert!(result.is_empty());
        assert_eq!(inventory, before_inventory);
        assert_eq!(state.ids(), before_ids);
    }

    #[test]
    fn craft_rejects_unknown_recipe_and_double_counting() {
        let (state, inventory) = crafting_fixture(2, 1);
        let unknown = Assembly::new("sword", axe_assembly(2).sources);
        assert!(!state.validate_assembly(&unknown, &inventory));

        let double = Assembly::new(
            "axe",
            vec![
                vec![
                    Item::new(ActorId(1), Essence::Rocks, 1),
                    Item::new(ActorId(1), Essence::Rocks, 1),
                ],
                vec![Item::new(ActorId(3), Essence::Logs, 1)],
            ],
        );
        assert!(state.validate_assembly(&double, &inventory));

        let (state, inventory) = crafting_fixture(1, 1);
        assert!(!state.validate_assembly(&double, &inventory));
    }

    #[test]
    fn craft_with_overflowing_quantities_is_noop() {
        let (mut state, mut inventory) = crafting_fixture(2, 1);
        let before_inventory = inventory.clone();
        let before_ids = state.ids();

        let mut assembly = axe_assembly(2);
        assembly.sources[0] = vec![
            Item::new(ActorId(1), Essence::Rocks, u32::MAX),
            Item::new(ActorId(1), Essence::Rocks, 3),
        ];
        assert!(!state.validate_assembly(&assembly, &inventory));
        assert!(state.craft_entity(&assembly, &mut inventory).is_empty());
        assert_eq!(inventory, before_inventory);
        assert_eq!(state.ids(), before_ids);
    }

    #[test]
    fn demand_across_groups_that_overflows_is_rejected() {
        let (state, inventory) = crafting_fixture(2, 1);
        let state = state.with_recipes(RecipeBook::new(vec![Recipe::new(
            EntityKind::Axe,
            vec![
                Ingredient::new(Essence::Rocks, u32::MAX),
                Ingredient::new(Essence::Rocks, u32::MAX),
            ],
        )]));
        let assembly = Assembly::new(
            "axe",
            vec![
                vec![Item::new(ActorId(1), Essence::Rocks, u32::MAX)],
                vec![Item::new(ActorId(1), Essence::Rocks, u32::MAX)],
            ],
        );
        assert!(!state.validate_assembly(&assembly, &inventory));
    }

    #[test]
    fn craft_reuses_depleted_slot_when_full() {
        let rock = stack(1, EntityKind::Rocks, 2);
        let log = stack(3, EntityKind::Log, 1);
        let mut inventory = Inventory::with_pockets(0);
        inventory.store(Hand::Left, entry_of(&rock));
        inventory.store(Hand::Right, entry_of(&log));
        let mut state = State::new(ElevationFunction::new(1000.0), vec![rock, log]).unwrap();

        let result = state.craft_entity(&axe_assembly(2), &mut inventory);
        assert_eq!(result.created.len(), 1);
        assert_eq!(inventory.get_hand(Hand::Left), Some(result.created[0].id));
        assert!(inventory.get_hand_entry(Hand::Right).is_none());
    }

    fn merge_fixture(source: u32, target: u32) -> (State, Inventory) {
        let rock1 = stack(1, EntityKind::Rocks, source);
        let rock2 = stack(2, EntityKind::Rocks, target);
        let mut inventory = Inventory::default();
        inventory.store(Hand::Left, entry_of(&rock1));
        inventory.insert(2, entry_of(&rock2));
        let state = State::new(ElevationFunction::new(1000.0), vec![rock1, rock2]).unwrap();
        (state, inventory)
    }

    #[test]
    fn merge_that_fits_removes_source() {
        let (mut state, mut inventory) = merge_fixture(2, 2);
        let outcome = state.merge_entities(&mut inventory, Hand::Left, 2);

        assert_eq!(outcome, MergeOutcome::Combined { removed: ActorId(1) });
        assert!(state.get_entity(ActorId(1)).is_none());
        assert!(inventory.get_hand_entry(Hand::Left).is_none());
        assert_eq!(inventory.get_pocket_entry(2).unwrap().id, ActorId(2));
        assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), 4);
    }

    #[test]
    fn merge_that_overflows_splits() {
        let (mut state, mut inventory) = merge_fixture(12, 12);
        let outcome = state.merge_entities(&mut inventory, Hand::Left, 2);

        assert_eq!(outcome, MergeOutcome::Overflowed);
        assert_eq!(state.get_entity(ActorId(1)).unwrap().quantity(), 4);
        assert_eq!(inventory.get_hand_entry(Hand::Left).unwrap().quantity, 4);
        assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), 20);
        assert_eq!(inventory.get_pocket_entry(2).unwrap().quantity, 20);
    }

    #[test]
    fn merge_of_different_essences_is_skipped() {
        let rock = stack(1, EntityKind::Rocks, 3);
        let gold = stack(2, EntityKind::Gold, 3);
        let mut inventory = Inventory::default();
        inventory.store(Hand::Right, entry_of(&rock));
        inventory.insert(0, entry_of(&gold));
        let mut state = State::new(ElevationFunction::new(1000.0), vec![rock, gold]).unwrap();

        let outcome = state.merge_entities(&mut inventory, Hand::Right, 0);
        assert_eq!(outcome, MergeOutcome::Skipped);
        assert_eq!(state.get_entity(ActorId(1)).unwrap().quantity(), 3);
        assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), 3);
    }

    #[test]
    fn merge_with_empty_slot_is_skipped() {
        let (mut state, mut inventory) = merge_fixture(2, 2);
        assert_eq!(
            state.merge_entities(&mut inventory, Hand::Right, 2),
            MergeOutcome::Skipped
        );
        assert_eq!(
            state.merge_entities(&mut inventory, Hand::Left, 7),
            MergeOutcome::Skipped
        );
    }

    #[test]
    fn snapshot_builds_state() {
        let json = r#"{
            "elevation": { "radius": 50.0, "terrain": [] },
            "entities": [
                { "id": 1, "codename": "pirate", "position": { "theta": 1.5, "phi": 0.0 } },
                { "id": 2, "codename": "rocks", "position": { "theta": 1.5, "phi": 0.01 }, "quantity": 6 },
                { "id": 3, "codename": "log" }
            ]
        }"#;
        let state = State::from_json(json).unwrap();
        assert_eq!(state.entity_count(), 3);
        assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), 6);
        assert!(state.get_entity(ActorId(3)).unwrap().position.is_none());
        assert!((state.get_radius() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_rejects_unknown_codename() {
        let json = r#"{ "elevation": { "radius": 5.0 }, "entities": [ { "id": 1, "codename": "kraken" } ] }"#;
        assert!(matches!(
            State::from_json(json),
            Err(CoreError::UnknownCodename(_))
        ));
        assert!(matches!(State::from_json("{"), Err(CoreError::Snapshot(_))));
    }

    proptest! {
        #[test]
        fn merge_preserves_total_quantity(source in 1u32..=20, target in 1u32..=20) {
            let (mut state, mut inventory) = merge_fixture(source, target);
            let outcome = state.merge_entities(&mut inventory, Hand::Left, 2);
            let total = source + target;

            if total <= 20 {
                prop_assert_eq!(outcome, MergeOutcome::Combined { removed: ActorId(1) });
                prop_assert!(state.get_entity(ActorId(1)).is_none());
                prop_assert!(inventory.get_hand_entry(Hand::Left).is_none());
                prop_assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), total);
            } else {
                prop_assert_eq!(outcome, MergeOutcome::Overflowed);
                prop_assert_eq!(state.get_entity(ActorId(2)).unwrap().quantity(), 20);
                prop_assert_eq!(state.get_entity(ActorId(1)).unwrap().quantity(), total - 20);
                prop_assert_eq!(
                    inventory.get_hand_entry(Hand::Left).unwrap().quantity,
                    total - 20
                );
            }
        }
    }
}
