//! `[DICE-REQUIRED: ...]` tag parsing.
//!
//! The narrator emits this tag when the story needs a player roll:
//! `[DICE-REQUIRED: 1d20+3 Perception dc:15 desc:"Spot the ambush"]`.
//! Skill, DC and description are all optional. The inner notation is
//! validated by the dice parser; a tag with invalid notation is logged and
//! ignored.

use crate::dice::DiceSpec;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// A roll the narrator requires before the story continues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceRequest {
    pub spec: DiceSpec,
    pub skill: Option<String>,
    pub dc: Option<i32>,
    pub description: Option<String>,
    pub raw: String,
}

static DICE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\[DICE-REQUIRED:\s*(\d*d\d+(?:[+-]\d+)?)(?:\s+([A-Za-zÀ-ž]+))?(?:\s+dc:(\d+))?(?:\s+desc:"([^"]*)")?\s*\]"#,
    )
    .expect("valid regex")
});

/// Extract a required dice roll from narrator text.
pub fn extract_dice_request(text: &str) -> Option<DiceRequest> {
    let caps = DICE_TAG_RE.captures(text)?;

    let spec = match DiceSpec::parse(&caps[1]) {
        Ok(spec) => spec,
        Err(err) => {
            tracing::warn!(%err, tag = &caps[0], "DICE-REQUIRED tag with invalid notation");
            return None;
        }
    };

    Some(DiceRequest {
        spec,
        skill: caps.get(2).map(|m| m.as_str().to_string()),
        dc: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        description: caps.get(4).map(|m| m.as_str().to_string()),
        raw: caps[0].to_string(),
    })
}
