//! Pre-flight validation of player actions.
//!
//! Runs before the narrator ever sees the action. This is a hard gate: a
//! rule violation is an ordinary `Invalid` result for the player, never an
//! error. Forbidden-content checks take precedence over spell detection.

use crate::character::Character;
use crate::{forbidden, ledger, spellcast};
use serde::{Deserialize, Serialize};

/// A spell the validator resolved from the action text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSpell {
    pub name: String,
    pub level: u8,
}

/// Outcome of validating one player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "valid")]
pub enum ValidationResult {
    #[serde(rename = "true")]
    Valid {
        detected_spell: Option<DetectedSpell>,
    },
    #[serde(rename = "false")]
    Invalid { reason: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid { .. })
    }
}

/// How many known spells to list when guiding a player after a failed cast.
const SPELL_GUIDANCE_LIMIT: usize = 5;

/// Validate a submitted player action against the character's rules state.
pub fn validate(character: &Character, action: &str) -> ValidationResult {
    if let Some(hit) = forbidden::check(action) {
        return ValidationResult::Invalid { reason: hit.reason };
    }

    if let Some(name) = spellcast::detect(action, &character.known_spells) {
        // detect only returns spells from the known list
        let spell = character
            .known_spell(&name)
            .expect("detected spell is known");

        if !ledger::is_available(character, &spell.name) {
            return ValidationResult::Invalid {
                reason: exhausted_reason(character, &spell.name, spell.level),
            };
        }

        return ValidationResult::Valid {
            detected_spell: Some(DetectedSpell {
                name: spell.name.clone(),
                level: spell.level,
            }),
        };
    }

    // Casting language aimed at a spell the character does not know.
    if spellcast::looks_like_casting(action) {
        let attempted = spellcast::captured_spell_phrase(action).unwrap_or_default();
        return ValidationResult::Invalid {
            reason: unknown_spell_reason(character, &attempted),
        };
    }

    ValidationResult::Valid {
        detected_spell: None,
    }
}

fn unknown_spell_reason(character: &Character, attempted: &str) -> String {
    let mut spells: Vec<_> = character.known_spells.iter().collect();
    spells.sort_by_key(|s| s.level);

    let guidance: Vec<String> = spells
        .iter()
        .take(SPELL_GUIDANCE_LIMIT)
        .map(|s| {
            if s.is_cantrip() {
                format!("{} (cantrip)", s.name)
            } else {
                format!("{} (level {})", s.name, s.level)
            }
        })
        .collect();

    if guidance.is_empty() {
        format!("You don't know the spell \"{attempted}\" and have no spells to cast.")
    } else {
        format!(
            "You don't know the spell \"{attempted}\". Spells you can cast: {}.",
            guidance.join(", ")
        )
    }
}

fn exhausted_reason(character: &Character, name: &str, level: u8) -> String {
    let mut remaining: Vec<_> = character
        .spell_slots
        .slots
        .iter()
        .filter(|&(&lvl, slot)| lvl != level && slot.current > 0)
        .map(|(&lvl, slot)| (lvl, slot.current))
        .collect();
    remaining.sort_by_key(|&(lvl, _)| lvl);

    let mut reason = format!("No level {level} spell slots remaining for {name}.");
    if !remaining.is_empty() {
        let rest: Vec<String> = remaining
            .iter()
            .map(|(lvl, cur)| format!("level {lvl}: {cur}"))
            .collect();
        reason.push_str(&format!(" Remaining slots: {}.", rest.join(", ")));
    }
    reason
}
