//! HP change extraction.
//!
//! The structured tag carries a signed delta directly. Text patterns fall
//! into three groups evaluated in order: damage phrasings (captured
//! magnitude negated), healing phrasings (positive), and absolute-HP
//! phrasings where the delta is the captured target minus current HP.

use super::EventSource;
use crate::patterns::RuleTable;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// An extracted HP delta. `change == 0` with `source == None` means no
/// HP-related content was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpChangeEvent {
    pub change: i32,
    pub source: Option<EventSource>,
    pub confidence: f32,
    pub raw: Option<String>,
}

impl HpChangeEvent {
    fn none() -> Self {
        Self {
            change: 0,
            source: None,
            confidence: 0.0,
            raw: None,
        }
    }
}

static HP_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[HP-CHANGE:\s*([+-]?\d+)\s*\]").expect("valid regex"));

/// What a text pattern's captured number means.
#[derive(Debug, Clone, Copy)]
enum HpSemantics {
    Damage,
    Healing,
    Absolute,
}

struct HpRules {
    table: RuleTable,
    semantics: Vec<HpSemantics>,
}

static HP_TEXT_RULES: LazyLock<HpRules> = LazyLock::new(|| {
    use HpSemantics::*;
    // Most specific phrasings first; Czech before the English fallbacks.
    let rules: &[(&str, f32, HpSemantics)] = &[
        // damage
        (r"(?i)ztrácíš\s+(\d+)\s+život", 0.8, Damage),
        (r"(?i)utrpíš\s+(\d+)\s+(?:bodů?\s+)?poškození", 0.8, Damage),
        (r"(?i)dostáváš\s+(\d+)\s+(?:bodů?\s+)?poškození", 0.7, Damage),
        (r"(?i)\byou\s+take\s+(\d+)\s+(?:points?\s+of\s+)?damage", 0.8, Damage),
        (r"(?i)\byou\s+lose\s+(\d+)\s+(?:hit\s+points?|hp)", 0.8, Damage),
        (r"(?i)deals?\s+(\d+)\s+damage\s+to\s+you", 0.7, Damage),
        // healing
        (r"(?i)léčíš\s+se\s+o\s+(\d+)", 0.8, Healing),
        (r"(?i)obnovuješ?\s+(?:si\s+)?(\d+)\s+život", 0.8, Healing),
        (r"(?i)\byou\s+regain\s+(\d+)\s+(?:hit\s+points?|hp)", 0.8, Healing),
        (r"(?i)\byou\s+recover\s+(\d+)\s+(?:hit\s+points?|hp)", 0.7, Healing),
        (r"(?i)heals?\s+you\s+for\s+(\d+)", 0.7, Healing),
        // absolute HP
        (r"(?i)máš\s+(?:nyní\s+)?(\d+)\s+život", 0.6, Absolute),
        (r"(?i)\byour?\s+(?:hp|hit\s+points?)\s+(?:is|are)\s+now\s+(\d+)", 0.6, Absolute),
    ];

    HpRules {
        table: RuleTable::from_patterns(
            &rules.iter().map(|&(p, c, _)| (p, c)).collect::<Vec<_>>(),
        ),
        semantics: rules.iter().map(|&(_, _, s)| s).collect(),
    }
});

/// Extract an HP change from narrator text. `current_hp` anchors the
/// absolute-HP phrasings.
pub fn extract_hp_change(text: &str, current_hp: i32) -> HpChangeEvent {
    if let Some(caps) = HP_TAG_RE.captures(text) {
        if let Ok(change) = caps[1].parse::<i32>() {
            return HpChangeEvent {
                change,
                source: Some(EventSource::Pattern),
                confidence: 1.0,
                raw: Some(caps[0].to_string()),
            };
        }
    }

    if let Some(m) = HP_TEXT_RULES.table.first_match(text) {
        if let Some(amount) = m.group(1).and_then(|g| g.parse::<i32>().ok()) {
            let change = match HP_TEXT_RULES.semantics[m.index] {
                HpSemantics::Damage => -amount,
                HpSemantics::Healing => amount,
                HpSemantics::Absolute => amount - current_hp,
            };
            return HpChangeEvent {
                change,
                source: Some(EventSource::Text),
                confidence: m.confidence,
                raw: Some(m.matched().to_string()),
            };
        }
    }

    HpChangeEvent::none()
}
