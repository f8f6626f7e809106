//! Spell slot accounting and rest recovery.
//!
//! Cantrips never consume a slot. Leveled spells require a remaining slot of
//! the matching level; availability fails closed for unknown spells or
//! missing pool entries.

use crate::character::{Character, CharacterClass};

/// Can the character cast this spell right now?
pub fn is_available(character: &Character, spell_name: &str) -> bool {
    match character.known_spell(spell_name) {
        Some(spell) if spell.is_cantrip() => true,
        Some(spell) => character.spell_slots.available(spell.level) > 0,
        None => false,
    }
}

/// Spend one slot of the given level. Exhausted pools are a logged no-op,
/// never a negative count. Level 0 is ignored (cantrips are free).
pub fn consume(character: &mut Character, spell_level: u8) {
    if spell_level == 0 {
        return;
    }
    if !character.spell_slots.consume(spell_level) {
        tracing::warn!(
            character = %character.name,
            level = spell_level,
            "no spell slot left to consume"
        );
    }
}

/// Full reset: every slot level back to maximum, HP restored to max.
pub fn long_rest(character: &mut Character) {
    character.spell_slots.restore_all();
    character.current_hp = character.max_hp;
}

/// Short rest. Only Warlocks (Pact Magic) regain their slots; other classes'
/// short-rest resources are not modeled yet.
///
/// TODO: Fighter Second Wind and Bard Font of Inspiration belong here once
/// class features are tracked.
pub fn short_rest(character: &mut Character) {
    if character.class == CharacterClass::Warlock {
        character.spell_slots.restore_all();
    }
}
