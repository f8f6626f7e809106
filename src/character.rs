//! Character read model consumed by the engine.
//!
//! The engine only reads and mutates these in-memory structures; durable
//! persistence of their effects belongs to the hosting application.

use crate::items::Item;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// A spell a character knows. Level 0 is a cantrip (unlimited casts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownSpell {
    pub name: String,
    pub level: u8,
}

impl KnownSpell {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}

/// One spell level's slot counts. Invariant: `current <= maximum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub current: u8,
    pub maximum: u8,
}

impl SlotInfo {
    pub fn full(maximum: u8) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }
}

/// Spell slots per level (levels 1+; cantrips are not slot-gated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlotPool {
    pub slots: HashMap<u8, SlotInfo>,
}

impl SpellSlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(levels: &[(u8, u8)]) -> Self {
        Self {
            slots: levels
                .iter()
                .map(|&(level, max)| (level, SlotInfo::full(max)))
                .collect(),
        }
    }

    /// Remaining slots at a level; 0 when the level has no pool entry.
    pub fn available(&self, level: u8) -> u8 {
        self.slots.get(&level).map(|s| s.current).unwrap_or(0)
    }

    /// Check-and-decrement in one step so a persistence adapter can run it
    /// inside a transaction. Returns false when no slot remains.
    pub fn consume(&mut self, level: u8) -> bool {
        match self.slots.get_mut(&level) {
            Some(slot) if slot.current > 0 => {
                slot.current -= 1;
                true
            }
            _ => false,
        }
    }

    /// Refill every level to its maximum.
    pub fn restore_all(&mut self) {
        for slot in self.slots.values_mut() {
            slot.current = slot.maximum;
        }
    }
}

/// A player character as the engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    pub class: CharacterClass,
    pub level: u8,
    pub max_hp: i32,
    pub current_hp: i32,
    pub experience: u32,
    pub known_spells: Vec<KnownSpell>,
    pub spell_slots: SpellSlotPool,
    pub inventory: Vec<Item>,
}

impl Character {
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class,
            level: 1,
            max_hp: 10,
            current_hp: 10,
            experience: 0,
            known_spells: Vec::new(),
            spell_slots: SpellSlotPool::new(),
            inventory: Vec::new(),
        }
    }

    /// Look up a known spell by name, case-insensitive.
    pub fn known_spell(&self, name: &str) -> Option<&KnownSpell> {
        let name_lower = name.to_lowercase();
        self.known_spells
            .iter()
            .find(|s| s.name.to_lowercase() == name_lower)
    }

    /// Apply a signed HP delta, clamped to `[0, max_hp]`.
    pub fn apply_hp_change(&mut self, delta: i32) {
        self.current_hp = (self.current_hp + delta).clamp(0, self.max_hp);
    }

    pub fn add_experience(&mut self, amount: u32) {
        self.experience += amount;
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }
}
