//! Dice notation parsing and rolling.
//!
//! Supports the notation the narrator emits in `[DICE-REQUIRED: ...]` tags
//! and players submit directly: `XdY+Z` with the standard die sizes, plus
//! advantage/disadvantage rolls for single dice.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of dice a single notation may roll.
pub const MAX_DICE_COUNT: u32 = 100;

/// Error type for dice parsing and rolling.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: d{0} (valid: d4, d6, d8, d10, d12, d20, d100)")]
    InvalidDieSize(u32),
    #[error("Invalid dice count: {0} (must be 1-{MAX_DICE_COUNT})")]
    InvalidDiceCount(u32),
    #[error("Advantage/disadvantage only applies to a single die, got {0}")]
    UnsupportedForMultiDie(String),
}

/// A parsed dice notation: `<count>d<sides>[+|-modifier]`.
///
/// Immutable once parsed; `notation` is the normalized lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
    pub notation: String,
}

const VALID_SIDES: [u32; 7] = [4, 6, 8, 10, 12, 20, 100];

impl DiceSpec {
    /// Parse a dice notation string, case-insensitive, whitespace ignored.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let raw: String = notation
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let d_pos = raw
            .find('d')
            .ok_or_else(|| DiceError::InvalidNotation(notation.to_string()))?;

        let count_str = &raw[..d_pos];
        let rest = &raw[d_pos + 1..];

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?
        };

        let (sides_str, modifier) = if let Some(pos) = rest.find(|c| c == '+' || c == '-') {
            let sign: i32 = if rest.as_bytes()[pos] == b'+' { 1 } else { -1 };
            let value: i32 = rest[pos + 1..]
                .parse()
                .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;
            (&rest[..pos], sign * value)
        } else {
            (rest, 0)
        };

        let sides: u32 = sides_str
            .parse()
            .map_err(|_| DiceError::InvalidNotation(notation.to_string()))?;

        if count == 0 || count > MAX_DICE_COUNT {
            return Err(DiceError::InvalidDiceCount(count));
        }
        if !VALID_SIDES.contains(&sides) {
            return Err(DiceError::InvalidDieSize(sides));
        }

        Ok(DiceSpec {
            count,
            sides,
            modifier,
            notation: raw,
        })
    }

    /// Roll the full spec: `count` draws, summed, plus modifier.
    pub fn roll(&self, roll_type: Option<&str>) -> DiceRoll {
        self.roll_with_rng(roll_type, &mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&self, roll_type: Option<&str>, rng: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = rolls.iter().sum::<u32>() as i32 + self.modifier;

        DiceRoll {
            spec: self.clone(),
            rolls,
            total,
            roll_type: roll_type.map(str::to_string),
            advantage: false,
            disadvantage: false,
        }
    }
}

impl FromStr for DiceSpec {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceSpec::parse(s)
    }
}

impl fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}

/// Complete result of a dice roll.
///
/// For advantage/disadvantage rolls `rolls` holds both raw draws; `total`
/// uses the selected one plus the modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRoll {
    pub spec: DiceSpec,
    pub rolls: Vec<u32>,
    pub total: i32,
    pub roll_type: Option<String>,
    pub advantage: bool,
    pub disadvantage: bool,
}

impl DiceRoll {
    /// Natural 20 check. Only d20 rolls can crit; with advantage or
    /// disadvantage any retained draw counts.
    pub fn is_critical_hit(&self) -> bool {
        if self.spec.sides != 20 {
            return false;
        }
        if self.advantage || self.disadvantage {
            self.rolls.iter().any(|&r| r == 20)
        } else {
            self.rolls.len() == 1 && self.rolls[0] == 20
        }
    }

    /// Natural 1 check; with advantage/disadvantage all draws must be 1.
    pub fn is_critical_miss(&self) -> bool {
        if self.spec.sides != 20 {
            return false;
        }
        if self.advantage || self.disadvantage {
            self.rolls.iter().all(|&r| r == 1)
        } else {
            self.rolls.len() == 1 && self.rolls[0] == 1
        }
    }

    /// Deterministic human-readable rendering:
    /// `"2d6+3 → [4, 2] + 3 = 9"`, with advantage and critical markers.
    pub fn format(&self) -> String {
        let rolls_str = self
            .rolls
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = format!("{} → [{}]", self.spec.notation, rolls_str);
        if self.spec.modifier > 0 {
            out.push_str(&format!(" + {}", self.spec.modifier));
        } else if self.spec.modifier < 0 {
            out.push_str(&format!(" - {}", self.spec.modifier.abs()));
        }
        out.push_str(&format!(" = {}", self.total));

        if self.advantage {
            out.push_str(" (Advantage)");
        } else if self.disadvantage {
            out.push_str(" (Disadvantage)");
        }

        if self.is_critical_hit() {
            out.push_str(" (Critical Hit!)");
        } else if self.is_critical_miss() {
            out.push_str(" (Critical Miss!)");
        }

        out
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Roll dice from a notation string.
pub fn roll(notation: &str, roll_type: Option<&str>) -> Result<DiceRoll, DiceError> {
    let spec = DiceSpec::parse(notation)?;
    Ok(spec.roll(roll_type))
}

/// Roll a single die twice, keeping the higher draw.
pub fn roll_with_advantage(notation: &str, roll_type: Option<&str>) -> Result<DiceRoll, DiceError> {
    roll_twice(notation, roll_type, true, &mut rand::thread_rng())
}

/// Roll a single die twice, keeping the lower draw.
pub fn roll_with_disadvantage(
    notation: &str,
    roll_type: Option<&str>,
) -> Result<DiceRoll, DiceError> {
    roll_twice(notation, roll_type, false, &mut rand::thread_rng())
}

/// RNG-injectable advantage/disadvantage roll.
pub fn roll_twice<R: Rng>(
    notation: &str,
    roll_type: Option<&str>,
    advantage: bool,
    rng: &mut R,
) -> Result<DiceRoll, DiceError> {
    let spec = DiceSpec::parse(notation)?;
    if spec.count != 1 {
        return Err(DiceError::UnsupportedForMultiDie(spec.notation));
    }

    let roll1 = rng.gen_range(1..=spec.sides);
    let roll2 = rng.gen_range(1..=spec.sides);
    let selected = if advantage {
        roll1.max(roll2)
    } else {
        roll1.min(roll2)
    };
    let total = selected as i32 + spec.modifier;

    Ok(DiceRoll {
        spec,
        rolls: vec![roll1, roll2],
        total,
        roll_type: roll_type.map(str::to_string),
        advantage,
        disadvantage: !advantage,
    })
}
