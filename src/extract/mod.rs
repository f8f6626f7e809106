//! Narrative event extraction from narrator output.
//!
//! The narrator is asked to emit machine-readable bracket tags
//! (`[HP-CHANGE: -5]`, `[XP-GAIN: 100]`, `[ITEM-GAIN: {...}]`,
//! `[DICE-REQUIRED: 1d20 ...]`) but often writes prose instead. Every
//! extractor therefore runs the same hybrid algorithm: structured tag first
//! (authoritative, confidence 1.0), then an ordered table of localized
//! phrase patterns with fixed per-pattern confidences, else a neutral
//! "nothing found" result with confidence 0. Extraction never fails; it is
//! best-effort parsing over adversarial input with an explicit confidence
//! signal.

pub mod dice_request;
pub mod hp;
pub mod item;
pub mod xp;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use dice_request::{extract_dice_request, DiceRequest};
pub use hp::{extract_hp_change, HpChangeEvent};
pub use item::{extract_item_gain, ItemGainEvent};
pub use xp::{extract_xp_gain, XpGainEvent};

/// Where an extracted event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// A structured bracket tag. Always confidence 1.0.
    Pattern,
    /// A fuzzy phrase match in prose.
    Text,
}

static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(?:HP-CHANGE|XP-GAIN|ITEM-GAIN|DICE-REQUIRED):[^\]]*\]").expect("valid regex")
});
static SPACE_RUNS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Remove all recognized bracket tags so clean prose can be shown to the
/// player, collapsing the whitespace they leave behind.
pub fn strip_tags(text: &str) -> String {
    let stripped = ANY_TAG_RE.replace_all(text, "");
    let collapsed = SPACE_RUNS_RE.replace_all(&stripped, " ");
    let collapsed = BLANK_LINES_RE.replace_all(&collapsed, "\n\n");
    collapsed.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_removes_all_kinds() {
        let text = "You strike true. [HP-CHANGE: -5] The goblin falls. \
                    [XP-GAIN: 50] [ITEM-GAIN: {\"name\": \"Dagger\", \"type\": \"weapon\", \"rarity\": \"common\"}]";
        let clean = strip_tags(text);
        assert!(!clean.contains('['));
        assert!(clean.contains("You strike true."));
        assert!(clean.contains("The goblin falls."));
    }

    #[test]
    fn test_strip_tags_collapses_whitespace() {
        let clean = strip_tags("Before  [DICE-REQUIRED: 1d20 dc:15]  after");
        assert_eq!(clean, "Before after");
    }

    #[test]
    fn test_strip_tags_plain_prose_untouched() {
        assert_eq!(strip_tags("Nothing special here."), "Nothing special here.");
    }
}
