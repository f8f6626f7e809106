//! End-to-end flow: validate a player action, invoke a scripted narrator
//! through the retry and tracking wrappers, then apply the extracted events
//! to the character.

use narrator_engine::character::{Character, CharacterClass, KnownSpell, SpellSlotPool};
use narrator_engine::quota::{QuotaConfig, QuotaTracker, UsageEntry, UsageLog};
use narrator_engine::retry::{RetryableInvoker, RetryConfig};
use narrator_engine::{extract, ledger, validator, DiceRoll, DiceSpec, ValidationResult};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

struct MemoryLog {
    entries: Mutex<Vec<UsageEntry>>,
}

impl UsageLog for &MemoryLog {
    async fn append(&self, entry: UsageEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    async fn count_since(&self, user_id: &str, since: SystemTime) -> u32 {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id && e.timestamp >= since)
            .count() as u32
    }
}

fn hero() -> Character {
    let mut ch = Character::new("Elora", CharacterClass::Wizard);
    ch.max_hp = 14;
    ch.current_hp = 14;
    ch.known_spells = vec![
        KnownSpell::new("Fire Bolt", 0),
        KnownSpell::new("Magic Missile", 1),
    ];
    ch.spell_slots = SpellSlotPool::with_slots(&[(1, 2)]);
    ch
}

#[tokio::test]
async fn player_turn_round_trip() {
    let mut hero = hero();
    let log = MemoryLog {
        entries: Mutex::new(Vec::new()),
    };
    let tracker = QuotaTracker::new(&log, QuotaConfig::default());
    let invoker = RetryableInvoker::new(RetryConfig {
        max_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    });

    // 1. Pre-flight validation is a hard gate.
    let action = "Sešlu magickou střelu na goblina";
    let result = validator::validate(&hero, action);
    let spell = match result {
        ValidationResult::Valid {
            detected_spell: Some(spell),
        } => spell,
        other => panic!("expected a detected spell, got {other:?}"),
    };
    assert_eq!(spell.name, "Magic Missile");
    ledger::consume(&mut hero, spell.level);
    assert_eq!(hero.spell_slots.available(1), 1);

    // 2. The narrator call goes through retry + usage tracking. The scripted
    //    narrator fails once with a transient error, then replies with tags.
    let attempts = Mutex::new(0u32);
    let reply: Result<String, String> = tracker
        .with_tracking("elora", "player_action", || {
            invoker.invoke("player_action", || {
                let mut attempts = attempts.lock().unwrap();
                *attempts += 1;
                let attempt = *attempts;
                async move {
                    if attempt == 1 {
                        Err("generator timeout".to_string())
                    } else {
                        Ok("The darts slam into the goblin. It claws you back. \
                            [HP-CHANGE: -3] [XP-GAIN: 25] \
                            [ITEM-GAIN: {\"name\": \"Goblin Ear\", \"type\": \"misc\", \"rarity\": \"common\"}] \
                            [DICE-REQUIRED: 1d20 dc:12 desc:\"Dodge the counterattack\"]"
                            .to_string())
                    }
                }
            })
        })
        .await;
    let reply = reply.expect("narrator call should succeed after retry");
    assert_eq!(*attempts.lock().unwrap(), 2);

    // 3. The call was recorded and counts against the quota.
    assert_eq!(log.entries.lock().unwrap().len(), 1);
    let stats = tracker.stats("elora").await;
    assert_eq!(stats.minute_count, 1);

    // 4. Extract every event type from the same reply and apply them.
    let hp = extract::extract_hp_change(&reply, hero.current_hp);
    assert_eq!(hp.change, -3);
    assert_eq!(hp.confidence, 1.0);
    hero.apply_hp_change(hp.change);
    assert_eq!(hero.current_hp, 11);

    let xp = extract::extract_xp_gain(&reply);
    assert_eq!(xp.amount, 25);
    hero.add_experience(xp.amount);
    assert_eq!(hero.experience, 25);

    let item = extract::extract_item_gain(&reply).item.expect("item tag");
    assert_eq!(item.name, "Goblin Ear");
    hero.add_item(item);
    assert_eq!(hero.inventory.len(), 1);

    let request = extract::extract_dice_request(&reply).expect("dice tag");
    assert_eq!(request.spec.notation, "1d20");
    assert_eq!(request.dc, Some(12));

    // 5. The prose shown to the player carries no tags.
    let prose = extract::strip_tags(&reply);
    assert!(!prose.contains('['));
    assert!(prose.contains("The darts slam into the goblin."));
}

#[test]
fn dice_example_from_the_wire_contract() {
    // "1d20+5" with a mocked draw of 13 renders as [13] + 5 = 18.
    let spec = DiceSpec::parse("1d20+5").unwrap();
    let roll = DiceRoll {
        spec,
        rolls: vec![13],
        total: 18,
        roll_type: None,
        advantage: false,
        disadvantage: false,
    };
    assert_eq!(roll.total, roll.rolls[0] as i32 + 5);
    assert_eq!(roll.format(), "1d20+5 → [13] + 5 = 18");
}

#[test]
fn unknown_spell_blocks_the_narrator() {
    let hero = hero();
    let result = validator::validate(&hero, "Sešlu Fireball");
    match result {
        ValidationResult::Invalid { reason } => {
            assert!(reason.contains("Fireball"));
        }
        other => panic!("expected invalid, got {other:?}"),
    }
}

#[test]
fn rests_restore_resources() {
    let mut hero = hero();
    hero.current_hp = 2;
    hero.spell_slots.consume(1);
    hero.spell_slots.consume(1);

    ledger::short_rest(&mut hero);
    assert_eq!(hero.spell_slots.available(1), 0, "wizards regain nothing");

    ledger::long_rest(&mut hero);
    assert_eq!(hero.spell_slots.available(1), 2);
    assert_eq!(hero.current_hp, hero.max_hp);
}
