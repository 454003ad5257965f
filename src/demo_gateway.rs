use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use anyhow::{Result, anyhow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value, json};

use crate::calculator::{MAX_LEVEL, xp_for_level};
use crate::gateway::ProfileGateway;
use crate::model::{ClanRecord, GameMode, PlayerRecord};
use crate::pvm::{BOSSES, CLAN_BOSSES, RAIDS};
use crate::skills::SKILLS;
use crate::upgrades::UPGRADE_CATEGORIES;

/// Player name that the demo gateway always reports as missing.
pub const DEMO_MISSING_PLAYER: &str = "ghost";
/// Clan whose lookup always fails, to exercise the contained-failure path.
pub const DEMO_BROKEN_CLAN: &str = "Lost Expedition";

const DEMO_CLANS: [&str; 4] = ["Night Owls", "Emerald Order", "Iron Anglers", DEMO_BROKEN_CLAN];

/// Offline gateway producing stable fake profiles: the same name always
/// yields the same player.
#[derive(Debug, Clone, Default)]
pub struct DemoGateway;

impl DemoGateway {
    pub fn new() -> Self {
        Self
    }
}

impl ProfileGateway for DemoGateway {
    fn fetch_player_profile(&self, username: &str) -> Result<PlayerRecord> {
        if username.eq_ignore_ascii_case(DEMO_MISSING_PLAYER) {
            return Err(anyhow!("http 404 Not Found: player {username} does not exist"));
        }
        let mut rng = StdRng::seed_from_u64(seed_for(username));

        let skill_experiences = SKILLS
            .iter()
            .map(|skill| {
                let level = rng.gen_range(1..=MAX_LEVEL);
                let next = xp_for_level((level + 1).min(MAX_LEVEL));
                let base = xp_for_level(level);
                let xp = if next > base { rng.gen_range(base..next) } else { base };
                (skill.to_string(), xp)
            })
            .collect::<BTreeMap<_, _>>();

        let mut upgrades = BTreeMap::new();
        for category in &UPGRADE_CATEGORIES {
            for id in category.upgrades {
                if rng.gen_bool(0.45) {
                    upgrades.insert(id.to_string(), rng.gen_range(1..=5));
                }
            }
        }

        let mut pvm_stats = BTreeMap::new();
        for id in BOSSES.iter().chain(RAIDS.iter()).chain(CLAN_BOSSES.iter()) {
            if rng.gen_bool(0.7) {
                pvm_stats.insert(id.to_string(), rng.gen_range(0..2_500));
            }
        }

        let guild_name = if rng.gen_bool(0.8) {
            Some(DEMO_CLANS[rng.gen_range(0..DEMO_CLANS.len())].to_string())
        } else {
            None
        };
        let game_mode = if rng.gen_bool(0.15) {
            GameMode::Other("ironman".to_string())
        } else {
            GameMode::Default
        };

        Ok(PlayerRecord {
            username: username.to_string(),
            game_mode,
            guild_name,
            skill_experiences,
            upgrades,
            pvm_stats,
        })
    }

    fn fetch_clan_by_name(&self, name: &str) -> Result<ClanRecord> {
        if name == DEMO_BROKEN_CLAN {
            return Err(anyhow!("http 503 Service Unavailable"));
        }
        let mut rng = StdRng::seed_from_u64(seed_for(name));
        let members = (0..rng.gen_range(5..=20))
            .map(|i| json!({ "memberName": format!("member{i}"), "rank": i % 3 }))
            .collect::<Vec<_>>();

        let mut fields = Map::new();
        fields.insert("tag".to_string(), Value::from(tag_for(name)));
        fields.insert("isRecruiting".to_string(), Value::from(rng.gen_bool(0.5)));
        fields.insert("language".to_string(), Value::from("English"));
        fields.insert("memberlist".to_string(), Value::Array(members));
        Ok(ClanRecord {
            name: name.to_string(),
            fields,
        })
    }
}

fn seed_for(name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

fn tag_for(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}
