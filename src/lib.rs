//! Action validation and narrative event extraction for an LLM-narrated RPG.
//!
//! An LLM narrator cannot be trusted to enforce game state, so this crate
//! sits on both sides of every narrator call:
//!
//! - **Before**: [`validator::validate`] checks a player action against the
//!   forbidden-content rules, spell detection and spell-slot accounting. It
//!   is a hard gate; the narrator is only invoked for valid actions.
//! - **Around**: [`retry::RetryableInvoker`] wraps the call with exponential
//!   backoff, and [`quota::QuotaTracker::with_tracking`] records it against
//!   the player's sliding-window request quota.
//! - **After**: the [`extract`] module mines the narrator's free-text reply
//!   for HP changes, XP gains, item grants and required dice rolls. Each
//!   extractor prefers a structured bracket tag (confidence 1.0) and falls
//!   back to ordered, localized phrase patterns with fixed confidences.
//!
//! # Quick start
//!
//! ```
//! use narrator_engine::character::{Character, CharacterClass, KnownSpell, SpellSlotPool};
//! use narrator_engine::{extract, validator};
//!
//! let mut hero = Character::new("Elora", CharacterClass::Wizard);
//! hero.known_spells.push(KnownSpell::new("Magic Missile", 1));
//! hero.spell_slots = SpellSlotPool::with_slots(&[(1, 2)]);
//!
//! let result = validator::validate(&hero, "I cast Magic Missile at the goblin");
//! assert!(result.is_valid());
//!
//! let reply = "The goblin shrieks and claws you. [HP-CHANGE: -3] [XP-GAIN: 25]";
//! let hp = extract::extract_hp_change(reply, hero.current_hp);
//! assert_eq!(hp.change, -3);
//! assert_eq!(hp.confidence, 1.0);
//! ```

pub mod character;
pub mod dice;
pub mod extract;
pub mod forbidden;
pub mod items;
pub mod ledger;
pub mod patterns;
pub mod quota;
pub mod retry;
pub mod spellcast;
pub mod validator;

// Primary public API
pub use character::{Character, CharacterClass, KnownSpell, SlotInfo, SpellSlotPool};
pub use dice::{DiceError, DiceRoll, DiceSpec};
pub use extract::{
    extract_dice_request, extract_hp_change, extract_item_gain, extract_xp_gain, strip_tags,
    DiceRequest, EventSource, HpChangeEvent, ItemGainEvent, XpGainEvent,
};
pub use items::{Item, ItemKind, Rarity};
pub use quota::{QuotaConfig, QuotaStats, QuotaTracker, UsageEntry, UsageLog};
pub use retry::{RetryConfig, RetryableInvoker};
pub use validator::{DetectedSpell, ValidationResult};
