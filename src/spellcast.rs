//! Spell cast detection in free-text player actions.
//!
//! Players rarely type a spell's canonical name. Resolution order, first
//! non-empty result wins:
//!
//! 1. exact case-insensitive substring match of a known spell name,
//! 2. localized alias lookup (Czech synonyms for the English spell names),
//! 3. casting-verb capture ("sešlu X", "I cast X") fuzzy-matched against
//!    known names by bidirectional containment.
//!
//! No match means the action is not spell-related, not that it is invalid.

use crate::character::KnownSpell;
use crate::patterns::RuleTable;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Czech aliases for canonical spell names, keyed by lowercase name.
    /// Inflected forms are listed so substring matching survives Czech
    /// declension ("ohnivou kouli" in accusative).
    static ref SPELL_ALIASES: HashMap<&'static str, Vec<&'static str>> = {
        let mut m = HashMap::new();
        m.insert("fireball", vec!["ohnivá koule", "ohnivou kouli", "ohnivé koule"]);
        m.insert("fire bolt", vec!["ohnivý šíp", "ohnivým šípem"]);
        m.insert("magic missile", vec!["magická střela", "magickou střelu", "magické střely"]);
        m.insert("cure wounds", vec!["léčba zranění", "vyléčení ran", "zhojení ran"]);
        m.insert("healing word", vec!["léčivé slovo", "léčivým slovem"]);
        m.insert("shield", vec!["štít", "magický štít"]);
        m.insert("mage armor", vec!["mágova zbroj", "magická zbroj"]);
        m.insert("lightning bolt", vec!["blesk", "bleskem"]);
        m.insert("thunderwave", vec!["hromová vlna", "hromovou vlnu"]);
        m.insert("burning hands", vec!["hořící ruce", "hořícíma rukama"]);
        m.insert("misty step", vec!["mlžný krok", "mlžným krokem"]);
        m.insert("sleep", vec!["spánek", "uspání"]);
        m.insert("charm person", vec!["zmámení osoby", "okouzlení osoby"]);
        m.insert("mage hand", vec!["mágova ruka", "kouzelná ruka"]);
        m.insert("light", vec!["světlo", "kouzelné světlo"]);
        m.insert("ray of frost", vec!["mrazivý paprsek", "paprsek mrazu"]);
        m
    };

    /// Casting-verb captures, most specific first. Confidence is carried for
    /// symmetry with the extractor tables but detection is binary.
    static ref CASTING_VERBS: RuleTable = RuleTable::from_patterns(&[
        (r"(?i)\b(?:sešlu|sesílám|seslat)\s+(?:kouzlo\s+)?([\w 'áčďéěíňóřšťúůýž-]+)", 0.9),
        (r"(?i)\b(?:kouzlím|čaruji|vyčaruji)\s+(?:kouzlo\s+)?([\w 'áčďéěíňóřšťúůýž-]+)", 0.8),
        (r"(?i)\bpoužij[iu]\s+kouzlo\s+([\w 'áčďéěíňóřšťúůýž-]+)", 0.8),
        (r"(?i)\bI\s+cast\s+([\w '-]+)", 0.9),
        (r"(?i)\bcast(?:ing)?\s+(?:the\s+spell\s+)?([\w '-]+)", 0.7),
    ]);
}

/// Detect which known spell, if any, an action tries to cast. Returns the
/// spell name exactly as stored in the character's spell list.
pub fn detect(action: &str, known_spells: &[KnownSpell]) -> Option<String> {
    let action_lower = action.to_lowercase();

    // 1. Exact name as a substring.
    for spell in known_spells {
        if action_lower.contains(&spell.name.to_lowercase()) {
            return Some(spell.name.clone());
        }
    }

    // 2. Localized aliases.
    for spell in known_spells {
        if let Some(aliases) = SPELL_ALIASES.get(spell.name.to_lowercase().as_str()) {
            if aliases.iter().any(|alias| action_lower.contains(alias)) {
                return Some(spell.name.clone());
            }
        }
    }

    // 3. Casting-verb capture with fuzzy containment.
    if let Some(m) = CASTING_VERBS.first_match(action) {
        if let Some(phrase) = m.group(1) {
            let phrase = phrase
                .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
                .to_lowercase();
            if phrase.len() >= 3 {
                for spell in known_spells {
                    let name = spell.name.to_lowercase();
                    if phrase.contains(&name) || name.contains(&phrase) {
                        return Some(spell.name.clone());
                    }
                }
            }
        }
    }

    None
}

/// Whether the action looks like spellcasting at all, known spell or not.
/// Used to phrase validation feedback for unknown spells.
pub fn looks_like_casting(action: &str) -> bool {
    CASTING_VERBS.first_match(action).is_some()
}

/// The phrase a casting verb targets, when present.
pub fn captured_spell_phrase(action: &str) -> Option<String> {
    CASTING_VERBS.first_match(action).and_then(|m| {
        m.group(1).map(|p| {
            p.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
                .to_string()
        })
    })
}
