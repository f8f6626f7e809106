//! Item gain extraction.
//!
//! The structured tag carries a JSON payload. A malformed payload degrades
//! gracefully: it is logged and the text heuristics run as if no tag were
//! present. Text heuristics can only recover a bare item name, so kind and
//! rarity default to misc/common.

use super::EventSource;
use crate::items::{Item, ItemKind, Rarity};
use crate::patterns::RuleTable;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// An extracted item grant. `item == None` with `source == None` means
/// nothing was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGainEvent {
    pub item: Option<Item>,
    pub source: Option<EventSource>,
    pub confidence: f32,
    pub raw: Option<String>,
}

impl ItemGainEvent {
    fn none() -> Self {
        Self {
            item: None,
            source: None,
            confidence: 0.0,
            raw: None,
        }
    }
}

static ITEM_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[ITEM-GAIN:\s*(\{.*?\})\s*\]").expect("valid regex"));

static ITEM_TEXT_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::from_patterns(&[
        (r"(?i)(?:nalézáš|nacházíš)\s+([\w 'áčďéěíňóřšťúůýž-]+)", 0.6),
        (r"(?i)(?:bereš\s+si|sebereš)\s+([\w 'áčďéěíňóřšťúůýž-]+)", 0.6),
        (r"(?i)získáváš\s+([\w 'áčďéěíňóřšťúůýž-]+)", 0.5),
        (
            r"(?i)\byou\s+(?:find|found|take|took|pick(?:ed)?\s+up|grab)\s+(?:(?:a|an|the)\s+)?([\w' -]+)",
            0.6,
        ),
    ])
});

/// Tokens that mark a captured phrase as XP or currency, not an item.
static REWARD_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+\s*(?:xp|zkušenost\w*|zlaťák\w*|zlat\w*|gold|gp|coins?|minc\w*)")
        .expect("valid regex")
});

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 50;

fn plausible_name(name: &str) -> bool {
    let len = name.chars().count();
    (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len)
        && !REWARD_NOISE_RE.is_match(name)
        && !name.chars().all(|c| c.is_ascii_digit())
}

fn parse_tag_payload(json: &str) -> Option<Item> {
    let value: serde_json::Value = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(%err, "malformed ITEM-GAIN payload, falling back to text heuristics");
            return None;
        }
    };

    // name, type and rarity are required in the tag contract; a payload
    // missing any of them is treated as no structured match.
    let has_required = value.get("name").and_then(|n| n.as_str()).map_or(false, |n| !n.trim().is_empty())
        && value.get("type").is_some()
        && value.get("rarity").is_some();
    if !has_required {
        tracing::warn!("ITEM-GAIN payload missing name/type/rarity, ignoring tag");
        return None;
    }

    match serde_json::from_value::<Item>(value) {
        Ok(item) => Some(item.normalize()),
        Err(err) => {
            tracing::warn!(%err, "ITEM-GAIN payload did not deserialize, ignoring tag");
            None
        }
    }
}

/// Extract an item grant from narrator text.
pub fn extract_item_gain(text: &str) -> ItemGainEvent {
    if let Some(caps) = ITEM_TAG_RE.captures(text) {
        if let Some(item) = parse_tag_payload(&caps[1]) {
            return ItemGainEvent {
                item: Some(item),
                source: Some(EventSource::Pattern),
                confidence: 1.0,
                raw: Some(caps[0].to_string()),
            };
        }
    }

    for m in ITEM_TEXT_RULES.iter_matches(text) {
        let Some(name) = m.group(1) else { continue };
        let name = name.trim_matches(|c: char| c.is_whitespace() || c == '-');
        if !plausible_name(name) {
            continue;
        }
        // Prose carries no kind/rarity signal; defaults are deliberate.
        return ItemGainEvent {
            item: Some(Item::new(name, ItemKind::Misc, Rarity::Common)),
            source: Some(EventSource::Text),
            confidence: m.confidence,
            raw: Some(m.matched().to_string()),
        };
    }

    ItemGainEvent::none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_full_payload() {
        let text = r#"[ITEM-GAIN: {"name": "Flaming Sword", "type": "weapon", "rarity": "rare", "damage": "1d8+1", "requiresAttunement": true}]"#;
        let event = extract_item_gain(text);
        let item = event.item.unwrap();
        assert_eq!(item.name, "Flaming Sword");
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.rarity, Rarity::Rare);
        assert!(item.requires_attunement);
        assert_eq!(event.source, Some(EventSource::Pattern));
        assert_eq!(event.confidence, 1.0);
    }

    #[test]
    fn test_tag_coerces_bad_enums() {
        let text = r#"[ITEM-GAIN: {"name": "Dagger", "type": "bogus", "rarity": "bogus"}]"#;
        let event = extract_item_gain(text);
        let item = event.item.unwrap();
        assert_eq!(item.kind, ItemKind::Misc);
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(event.confidence, 1.0);
    }

    #[test]
    fn test_tag_missing_required_falls_through() {
        // No rarity; the tag is ignored but the prose still matches.
        let text = r#"You found a silver ring. [ITEM-GAIN: {"name": "Silver Ring", "type": "accessory"}]"#;
        let event = extract_item_gain(text);
        assert_eq!(event.source, Some(EventSource::Text));
        assert_eq!(event.item.unwrap().name, "silver ring");
    }

    #[test]
    fn test_malformed_json_falls_through() {
        let text = "[ITEM-GAIN: {not json}] You pick up a rusty key.";
        let event = extract_item_gain(text);
        assert_eq!(event.source, Some(EventSource::Text));
        assert_eq!(event.item.unwrap().name, "rusty key");
    }

    #[test]
    fn test_czech_prose() {
        let event = extract_item_gain("V truhle nalézáš stříbrnou dýku");
        let item = event.item.unwrap();
        assert_eq!(item.name, "stříbrnou dýku");
        assert_eq!(item.kind, ItemKind::Misc);
        assert_eq!(item.rarity, Rarity::Common);
        assert_eq!(event.source, Some(EventSource::Text));
    }

    #[test]
    fn test_xp_phrase_not_an_item() {
        // "získáváš 100 zkušeností" is an XP grant, not an item.
        let event = extract_item_gain("získáváš 100 zkušeností");
        assert_eq!(event, ItemGainEvent::none());
    }

    #[test]
    fn test_currency_not_an_item() {
        let event = extract_item_gain("You take 50 gold coins from the chest.");
        assert_eq!(event, ItemGainEvent::none());
    }

    #[test]
    fn test_too_short_name_discarded() {
        let event = extract_item_gain("You take it");
        assert_eq!(event, ItemGainEvent::none());
    }

    #[test]
    fn test_no_event() {
        let event = extract_item_gain("The corridor stretches into darkness.");
        assert_eq!(event, ItemGainEvent::none());
    }
}
