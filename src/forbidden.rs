//! Forbidden content filter for player actions.
//!
//! Rejects anachronistic or out-of-genre actions before they ever reach the
//! narrator, since the narrator itself cannot be trusted to refuse them.
//! Rules are ordered from most to least specific; the first match wins and
//! its reason is surfaced to the player.

use crate::patterns::RuleTable;
use lazy_static::lazy_static;

/// Why an action was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenMatch {
    pub reason: String,
}

struct FilterRules {
    table: RuleTable,
    reasons: Vec<&'static str>,
}

lazy_static! {
    static ref RULES: FilterRules = {
        // Patterns cover Czech and English player phrasing.
        let rules: &[(&str, &str)] = &[
            (
                r"(?i)\b(pistol(?:e|i|í|ích|emi)?|revolver|samopal|kulomet|gun|rifle|firearm)\b",
                "Firearms do not exist in this world.",
            ),
            (
                r"(?i)\b(mobil(em|u)?|telefon(em|u)?|smartphone|phone)\b",
                "There are no telephones in this world.",
            ),
            (
                r"(?i)\b(po[cč][ií]ta[cč](em|i)?|internet(u|em)?|wi-?fi|notebook|laptop|computer)\b",
                "Computers and the internet do not exist in this world.",
            ),
            (
                // "car" and "train" are common fantasy words ("I train with
                // my sword"), so the English nouns need an article or "by".
                r"(?i)\b(auto(mobil)?(em|u)?|motork(a|ou)|vlak(em|u)?|letadl(o|em)|airplane|helicopter|(?:a|the|by)\s+(?:car|train))\b",
                "Modern vehicles do not exist in this world.",
            ),
            (
                r"(?i)\b(elekt[rř]in(a|ou|y)|baterk(a|ou)|baterie|electricity|flashlight)\b",
                "Electricity has not been discovered in this world.",
            ),
            (
                r"(?i)\b(hitler|stalin|napoleon|einstein|amerik(a|y|u)|usa\b|nato)\b",
                "That belongs to another world's history.",
            ),
        ];

        FilterRules {
            table: RuleTable::from_patterns(
                &rules.iter().map(|&(p, _)| (p, 1.0)).collect::<Vec<_>>(),
            ),
            reasons: rules.iter().map(|&(_, r)| r).collect(),
        }
    };
}

/// Check an action against the forbidden rules. Returns the first matching
/// rule's reason, or `None` when the action is clean.
pub fn check(action: &str) -> Option<ForbiddenMatch> {
    RULES.table.first_match(action).map(|m| ForbiddenMatch {
        reason: RULES.reasons[m.index].to_string(),
    })
}
