use std::fmt;

use serde::{Deserialize, Serialize};

use crate::craft::{Essence, Item};
use crate::entity::ActorId;

/// Number of pocket slots in a fresh inventory.
pub const DEFAULT_POCKET_COUNT: usize = 10;

/// One of the two hands an inventory owner holds items in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    /// The left hand, filled first.
    Left,
    /// The right hand.
    Right,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Addresses a single inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A hand slot.
    Hand(Hand),
    /// A pocket slot by index.
    Pocket(usize),
}

/// What an inventory remembers about a stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// The stored entity.
    pub id: ActorId,
    /// Its crafting material.
    pub essence: Essence,
    /// Stack size, 1 for unstackable items.
    pub quantity: u32,
    /// Its kind's codename.
    pub codename: String,
}

impl InventoryEntry {
    /// Describe a stored item.
    pub fn new(id: ActorId, essence: Essence, quantity: u32, codename: impl Into<String>) -> Self {
        Self {
            id,
            essence,
            quantity,
            codename: codename.into(),
        }
    }

    /// The entry as a crafting item offering all of it.
    pub fn to_item(&self) -> Item {
        Item::new(self.id, self.essence, self.quantity)
    }
}

/// Hand slots plus a fixed row of pocket slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    left: Option<InventoryEntry>,
    right: Option<InventoryEntry>,
    pockets: Vec<Option<InventoryEntry>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_pockets(DEFAULT_POCKET_COUNT)
    }
}

impl Inventory {
    /// Empty hands and `count` empty pockets.
    pub fn with_pockets(count: usize) -> Self {
        Self {
            left: None,
            right: None,
            pockets: vec![None; count],
        }
    }

    /// Number of pocket slots.
    pub fn pocket_count(&self) -> usize {
        self.pockets.len()
    }

    // -----------------------------------------------------------------------
    // Hands
    // -----------------------------------------------------------------------

    /// Put `entry` into `hand`, returning whatever was held there before.
    pub fn store(&mut self, hand: Hand, entry: InventoryEntry) -> Option<InventoryEntry> {
        self.hand_mut(hand).replace(entry)
    }

    /// ID of the item held in `hand`, if any.
    pub fn get_hand(&self, hand: Hand) -> Option<ActorId> {
        self.get_hand_entry(hand).map(|e| e.id)
    }

    /// Entry held in `hand`, if any.
    pub fn get_hand_entry(&self, hand: Hand) -> Option<&InventoryEntry> {
        match hand {
            Hand::Left => self.left.as_ref(),
            Hand::Right => self.right.as_ref(),
        }
    }

    fn hand_mut(&mut self, hand: Hand) -> &mut Option<InventoryEntry> {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// The first empty hand, left before right.
    pub fn free_hand(&self) -> Option<Hand> {
        [Hand::Left, Hand::Right]
            .into_iter()
            .find(|h| self.get_hand_entry(*h).is_none())
    }

    // -----------------------------------------------------------------------
    // Pockets
    // -----------------------------------------------------------------------

    /// Put `entry` into pocket `index`. Returns `false` if the index is out of
    /// range or the pocket is occupied.
    pub fn insert(&mut self, index: usize, entry: InventoryEntry) -> bool {
        match self.pockets.get_mut(index) {
            Some(pocket) if pocket.is_none() => {
                *pocket = Some(entry);
                true
            }
            _ => false,
        }
    }

    /// Entry in pocket `index`, if any.
    pub fn get_pocket_entry(&self, index: usize) -> Option<&InventoryEntry> {
        self.pockets.get(index).and_then(|p| p.as_ref())
    }

    // -----------------------------------------------------------------------
    // Slots
    // -----------------------------------------------------------------------

    /// Entry in `slot`, if any.
    pub fn entry(&self, slot: Slot) -> Option<&InventoryEntry> {
        match slot {
            Slot::Hand(hand) => self.get_hand_entry(hand),
            Slot::Pocket(index) => self.get_pocket_entry(index),
        }
    }

    /// Mutable entry in `slot`, if any.
    pub fn entry_mut(&mut self, slot: Slot) -> Option<&mut InventoryEntry> {
        match slot {
            Slot::Hand(hand) => self.hand_mut(hand).as_mut(),
            Slot::Pocket(index) => self.pockets.get_mut(index).and_then(|p| p.as_mut()),
        }
    }

    /// Empty a slot, returning its entry.
    pub fn take(&mut self, slot: Slot) -> Option<InventoryEntry> {
        match slot {
            Slot::Hand(hand) => self.hand_mut(hand).take(),
            Slot::Pocket(index) => self.pockets.get_mut(index).and_then(|p| p.take()),
        }
    }

    /// Fill an empty slot. Returns `false` without changes if the slot is
    /// occupied or does not exist.
    pub fn put(&mut self, slot: Slot, entry: InventoryEntry) -> bool {
        match slot {
            Slot::Hand(hand) => {
                let target = self.hand_mut(hand);
                if target.is_some() {
                    return false;
                }
                *target = Some(entry);
                true
            }
            Slot::Pocket(index) => self.insert(index, entry),
        }
    }

    /// The first empty slot: a free hand, otherwise the first free pocket.
    pub fn free_slot(&self) -> Option<Slot> {
        if let Some(hand) = self.free_hand() {
            return Some(Slot::Hand(hand));
        }
        self.pockets
            .iter()
            .position(|p| p.is_none())
            .map(Slot::Pocket)
    }

    /// Exchange the contents of `hand` and pocket `index`. Out-of-range
    /// indices leave the inventory untouched.
    pub fn swap(&mut self, hand: Hand, index: usize) -> bool {
        let Some(pocket) = self.pockets.get_mut(index) else {
            return false;
        };
        let held = match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        };
        std::mem::swap(held, pocket);
        true
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every occupied slot with its entry, hands first.
    pub fn entries(&self) -> impl Iterator<Item = (Slot, &InventoryEntry)> {
        let hands = [Hand::Left, Hand::Right]
            .into_iter()
            .filter_map(|h| self.get_hand_entry(h).map(|e| (Slot::Hand(h), e)));
        let pockets = self
            .pockets
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|e| (Slot::Pocket(i), e)));
        hands.chain(pockets)
    }

    /// Locate the slot holding actor `id`.
    pub fn find(&self, id: ActorId) -> Option<Slot> {
        self.entries()
            .find(|(_, e)| e.id == id)
            .map(|(slot, _)| slot)
    }

    /// IDs of every stored item, hands first.
    pub fn all_ids(&self) -> Vec<ActorId> {
        self.entries().map(|(_, e)| e.id).collect()
    }

    /// Every stored item as a crafting item, hands first.
    pub fn to_items(&self) -> Vec<Item> {
        self.entries().map(|(_, e)| e.to_item()).collect()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}
