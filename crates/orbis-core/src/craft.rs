use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{ActorId, EntityKind};

/// Craft-material category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Essence {
    /// Stone.
    Rocks,
    /// Precious metal.
    Gold,
    /// Wood.
    Logs,
    /// Crafted tools.
    Tool,
    /// Growing things.
    Plant,
    /// Characters.
    Hero,
}

impl fmt::Display for Essence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rocks => write!(f, "rocks"),
            Self::Gold => write!(f, "gold"),
            Self::Logs => write!(f, "logs"),
            Self::Tool => write!(f, "tool"),
            Self::Plant => write!(f, "plant"),
            Self::Hero => write!(f, "hero"),
        }
    }
}

/// A quantity of a specific actor offered as crafting material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// The entity offered.
    pub actor_id: ActorId,
    /// What it counts as.
    pub essence: Essence,
    /// How much of it to use.
    pub quantity: u32,
}

impl Item {
    /// Offer `quantity` of `actor_id`.
    pub fn new(actor_id: ActorId, essence: Essence, quantity: u32) -> Self {
        Self {
            actor_id,
            essence,
            quantity,
        }
    }
}

/// A crafting request: the recipe to follow and the items filling each of
/// its ingredient groups, in recipe order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    /// Codename of the recipe's output.
    pub recipe_codename: String,
    /// One group of items per ingredient.
    pub sources: Vec<Vec<Item>>,
}

impl Assembly {
    /// Request `recipe_codename` from `sources`.
    pub fn new(recipe_codename: impl Into<String>, sources: Vec<Vec<Item>>) -> Self {
        Self {
            recipe_codename: recipe_codename.into(),
            sources,
        }
    }
}

/// One ingredient group of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    /// Material required.
    pub essence: Essence,
    /// Total amount required.
    pub quantity: u32,
}

impl Ingredient {
    /// Require `quantity` of `essence`.
    pub fn new(essence: Essence, quantity: u32) -> Self {
        Self { essence, quantity }
    }
}

/// Describes how to make one entity of `output` kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Kind of entity produced.
    pub output: EntityKind,
    /// Required materials, in order.
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// A recipe producing `output`.
    pub fn new(output: EntityKind, ingredients: Vec<Ingredient>) -> Self {
        Self {
            output,
            ingredients,
        }
    }

    /// The recipe's name, which is its output's codename.
    pub fn codename(&self) -> &'static str {
        self.output.codename()
    }

    /// Check that the assembly's groups line up with this recipe's
    /// ingredients: same count, matching essence, exact quantity. A group
    /// whose quantities overflow never matches.
    pub fn matches(&self, assembly: &Assembly) -> bool {
        if assembly.sources.len() != self.ingredients.len() {
            return false;
        }
        self.ingredients
            .iter()
            .zip(&assembly.sources)
            .all(|(ingredient, group)| {
                !group.is_empty()
                    && group.iter().all(|item| item.essence == ingredient.essence)
                    && group
                        .iter()
                        .try_fold(0u32, |total, item| total.checked_add(item.quantity))
                        == Some(ingredient.quantity)
            })
    }
}

/// The set of recipes known to the world.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::new(vec![Recipe::new(
            EntityKind::Axe,
            vec![
                Ingredient::new(Essence::Rocks, 2),
                Ingredient::new(Essence::Logs, 1),
            ],
        )])
    }
}

impl RecipeBook {
    /// A book holding exactly `recipes`.
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// A book with no recipes.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Add a recipe. Earlier recipes win on codename clashes.
    pub fn add(&mut self, recipe: Recipe) {
        self.recipes.push(recipe);
    }

    /// Look up a recipe by its output codename.
    pub fn find(&self, codename: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.codename() == codename)
    }

    /// All recipes, in insertion order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}
