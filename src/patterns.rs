//! Ordered rule tables over free text.
//!
//! The same shape recurs across the engine: an ordered list of regex rules,
//! first match wins, each rule carrying a fixed confidence reflecting how
//! unambiguous its phrasing is. Rules must be listed from most to least
//! specific.

use regex::{Captures, Regex};

/// A single rule: a compiled pattern plus the confidence of its match.
#[derive(Debug)]
pub struct TextRule {
    pub regex: Regex,
    pub confidence: f32,
}

impl TextRule {
    /// Compile a rule. Panics on an invalid pattern, so only call this from
    /// static table construction with known-good patterns.
    pub fn new(pattern: &str, confidence: f32) -> Self {
        Self {
            regex: Regex::new(pattern).expect("valid regex"),
            confidence,
        }
    }
}

/// First match against an ordered rule table.
#[derive(Debug)]
pub struct RuleMatch<'t> {
    /// Index of the winning rule.
    pub index: usize,
    pub confidence: f32,
    pub captures: Captures<'t>,
}

impl<'t> RuleMatch<'t> {
    /// The full matched substring.
    pub fn matched(&self) -> &'t str {
        self.captures.get(0).map(|m| m.as_str()).unwrap_or("")
    }

    /// A capture group's text, trimmed.
    pub fn group(&self, index: usize) -> Option<&'t str> {
        self.captures.get(index).map(|m| m.as_str().trim())
    }
}

/// An ordered rule table.
#[derive(Debug, Default)]
pub struct RuleTable {
    rules: Vec<TextRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<TextRule>) -> Self {
        Self { rules }
    }

    /// Build from `(pattern, confidence)` pairs, preserving order.
    pub fn from_patterns(patterns: &[(&str, f32)]) -> Self {
        Self::new(
            patterns
                .iter()
                .map(|&(p, c)| TextRule::new(p, c))
                .collect(),
        )
    }

    /// Evaluate rules in order; the first whose regex matches wins.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<RuleMatch<'t>> {
        self.iter_matches(text).next()
    }

    /// All matching rules in table order. Lets a caller reject a candidate
    /// (e.g. an implausible captured item name) and fall through to later
    /// rules.
    pub fn iter_matches<'a, 't>(
        &'a self,
        text: &'t str,
    ) -> impl Iterator<Item = RuleMatch<'t>> + 'a
    where
        't: 'a,
    {
        self.rules.iter().enumerate().filter_map(move |(index, rule)| {
            rule.regex.captures(text).map(|captures| RuleMatch {
                index,
                confidence: rule.confidence,
                captures,
            })
        })
    }
}
