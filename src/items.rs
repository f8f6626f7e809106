//! Item payload model for narrator-granted items.
//!
//! The narrator's `[ITEM-GAIN: {...}]` tag carries untrusted JSON, so the
//! kind/rarity enums deserialize leniently: unknown strings coerce to the
//! `Misc`/`Common` defaults instead of failing the whole payload.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Accessory,
    #[default]
    Misc,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Potion => "potion",
            ItemKind::Accessory => "accessory",
            ItemKind::Misc => "misc",
        }
    }

    /// Parse a kind string; anything unrecognized becomes `Misc`.
    pub fn from_str_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weapon" => ItemKind::Weapon,
            "armor" => ItemKind::Armor,
            "potion" => ItemKind::Potion,
            "accessory" => ItemKind::Accessory,
            "misc" => ItemKind::Misc,
            other => {
                tracing::debug!(kind = other, "unknown item type, coercing to misc");
                ItemKind::Misc
            }
        }
    }
}

impl Serialize for ItemKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ItemKind::from_str_lenient(&s))
    }
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    VeryRare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::VeryRare => "very_rare",
            Rarity::Legendary => "legendary",
        }
    }

    /// Parse a rarity string; anything unrecognized becomes `Common`.
    pub fn from_str_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "common" => Rarity::Common,
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "very_rare" | "very rare" => Rarity::VeryRare,
            "legendary" => Rarity::Legendary,
            other => {
                tracing::debug!(rarity = other, "unknown rarity, coercing to common");
                Rarity::Common
            }
        }
    }
}

impl Serialize for Rarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Rarity::from_str_lenient(&s))
    }
}

fn default_quantity() -> u32 {
    1
}

/// A narrator-granted item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(rename = "armorValue", default)]
    pub armor_value: Option<i32>,
    #[serde(rename = "statBonuses", default)]
    pub stat_bonuses: Option<HashMap<String, i32>>,
    #[serde(rename = "requiresAttunement", default)]
    pub requires_attunement: bool,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            kind,
            rarity,
            damage: None,
            armor_value: None,
            stat_bonuses: None,
            requires_attunement: false,
            quantity: 1,
        }
    }

    /// Enforce payload invariants after deserializing untrusted input.
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.quantity = self.quantity.max(1);
        self
    }
}
