use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameMode {
    #[default]
    Default,
    Other(String),
}

impl From<String> for GameMode {
    fn from(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default") {
            GameMode::Default
        } else {
            GameMode::Other(trimmed.to_string())
        }
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Default => "default".to_string(),
            GameMode::Other(tag) => tag,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Default => f.write_str("Normal"),
            GameMode::Other(tag) => f.write_str(tag),
        }
    }
}

/// A player profile as returned by the profile endpoint.
///
/// Records are never patched in place; a re-fetch replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub username: String,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub guild_name: Option<String>,
    #[serde(default, deserialize_with = "count_map")]
    pub skill_experiences: BTreeMap<String, u64>,
    #[serde(default, deserialize_with = "upgrade_levels")]
    pub upgrades: BTreeMap<String, u32>,
    #[serde(default, deserialize_with = "count_map")]
    pub pvm_stats: BTreeMap<String, u64>,
}

impl PlayerRecord {
    pub fn owns_upgrade(&self, id: &str) -> bool {
        self.upgrades.get(id).is_some_and(|level| *level > 0)
    }

    pub fn clan_label(&self) -> &str {
        self.guild_name.as_deref().unwrap_or("No Clan")
    }
}

/// Clan metadata. Everything except the name is kept as opaque JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClanRecord {
    #[serde(rename = "clanName", alias = "name", default)]
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ClanRecord {
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty() && self.fields.is_empty()
    }

    pub fn member_count(&self) -> Option<usize> {
        for key in ["memberlist", "memberList", "members"] {
            if let Some(list) = self.fields.get(key).and_then(Value::as_array) {
                return Some(list.len());
            }
        }
        self.fields
            .get("memberCount")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
    }

    pub fn tag(&self) -> Option<&str> {
        self.fields
            .get("tag")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClanStatus {
    NoClan,
    Loaded(Source),
    // Clan fetch failed; the reason is only surfaced in the console.
    Failed(String),
}

/// A player joined with its clan. The clan is a placeholder, never missing,
/// when the player has no clan or the clan fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedView {
    pub player: PlayerRecord,
    pub player_source: Source,
    pub clan: ClanRecord,
    pub clan_status: ClanStatus,
}

pub fn source_label(source: Source) -> &'static str {
    match source {
        Source::Cache => "cache",
        Source::Remote => "remote",
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

// The API reports experience as floats; negative or non-numeric values are dropped.
fn count_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    if let Value::Object(map) = value {
        for (key, raw) in map {
            if let Some(n) = raw.as_f64().filter(|n| n.is_finite() && *n >= 0.0) {
                out.insert(key, n.round() as u64);
            }
        }
    }
    Ok(out)
}

fn upgrade_levels<'de, D>(deserializer: D) -> Result<BTreeMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let mut out = BTreeMap::new();
    match value {
        Value::Object(map) => {
            for (key, raw) in map {
                let level = match raw {
                    Value::Bool(true) => 1,
                    other => other.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0) as u32,
                };
                if level > 0 {
                    out.insert(key, level);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Some(id) = item.as_str() {
                    out.insert(id.to_string(), 1);
                }
            }
        }
        _ => {}
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_profile_tolerates_float_xp_and_blank_guild() {
        let raw = r#"{
            "username": "Alice",
            "gameMode": "default",
            "guildName": "  ",
            "skillExperiences": {"attack": 1234.6, "magic": -5, "cooking": null},
            "upgrades": {"housing": 2, "ninja": 0},
            "pvmStats": {"Griffin": 12}
        }"#;
        let player: PlayerRecord = serde_json::from_str(raw).expect("valid profile");
        assert_eq!(player.guild_name, None);
        assert_eq!(player.clan_label(), "No Clan");
        assert_eq!(player.skill_experiences.get("attack"), Some(&1235));
        assert!(!player.skill_experiences.contains_key("magic"));
        assert!(player.owns_upgrade("housing"));
        assert!(!player.owns_upgrade("ninja"));
        assert_eq!(player.game_mode, GameMode::Default);
    }

    #[test]
    fn upgrades_accept_a_plain_list() {
        let raw = r#"{"username": "Bob", "upgrades": ["autoEating", "teamwork"]}"#;
        let player: PlayerRecord = serde_json::from_str(raw).expect("valid profile");
        assert!(player.owns_upgrade("teamwork"));
        assert_eq!(player.upgrades.len(), 2);
    }

    #[test]
    fn game_mode_keeps_unknown_tags() {
        let mode = GameMode::from("ironman".to_string());
        assert_eq!(mode.to_string(), "ironman");
        assert_eq!(GameMode::Default.to_string(), "Normal");
    }

    #[test]
    fn clan_placeholder_is_empty() {
        let clan = ClanRecord::placeholder();
        assert!(clan.is_placeholder());
        assert_eq!(clan.member_count(), None);

        let clan: ClanRecord =
            serde_json::from_str(r#"{"clanName": "Raiders", "memberlist": [{}, {}], "tag": "RDR"}"#)
                .expect("valid clan");
        assert!(!clan.is_placeholder());
        assert_eq!(clan.member_count(), Some(2));
        assert_eq!(clan.tag(), Some("RDR"));
    }
}
