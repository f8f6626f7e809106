//! XP gain extraction. Gains only; the narrator never takes XP away.

use super::EventSource;
use crate::patterns::RuleTable;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// An extracted XP gain. `amount == 0` with `source == None` means none found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpGainEvent {
    pub amount: u32,
    pub source: Option<EventSource>,
    pub confidence: f32,
    pub raw: Option<String>,
}

impl XpGainEvent {
    fn none() -> Self {
        Self {
            amount: 0,
            source: None,
            confidence: 0.0,
            raw: None,
        }
    }
}

static XP_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[XP-GAIN:\s*\+?(\d+)\s*\]").expect("valid regex"));

static XP_TEXT_RULES: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::from_patterns(&[
        (r"(?i)získáváš\s+(\d+)\s+(?:bodů?\s+)?zkušenost", 0.8),
        (r"(?i)obdržíš\s+(\d+)\s+zkušenost", 0.7),
        (r"(?i)\byou\s+(?:gain|earn|receive)\s+(\d+)\s+(?:experience(?:\s+points?)?|xp)\b", 0.8),
        (r"(?i)\bawarded\s+(\d+)\s+(?:experience(?:\s+points?)?|xp)\b", 0.7),
        (r"(?i)\b(\d+)\s+(?:experience\s+points?|xp)\s+(?:gained|awarded)", 0.6),
    ])
});

/// Extract an XP gain from narrator text.
pub fn extract_xp_gain(text: &str) -> XpGainEvent {
    if let Some(caps) = XP_TAG_RE.captures(text) {
        if let Ok(amount) = caps[1].parse::<u32>() {
            return XpGainEvent {
                amount,
                source: Some(EventSource::Pattern),
                confidence: 1.0,
                raw: Some(caps[0].to_string()),
            };
        }
    }

    if let Some(m) = XP_TEXT_RULES.first_match(text) {
        if let Some(amount) = m.group(1).and_then(|g| g.parse::<u32>().ok()) {
            return XpGainEvent {
                amount,
                source: Some(EventSource::Text),
                confidence: m.confidence,
                raw: Some(m.matched().to_string()),
            };
        }
    }

    XpGainEvent::none()
}
