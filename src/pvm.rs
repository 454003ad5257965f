use std::collections::BTreeMap;

use ratatui::style::Color;

pub const RAIDS: [&str; 3] = ["ReckoningOfTheGods", "GuardiansOfTheCitadel", "BloodmoonMassacre"];
pub const CLAN_BOSSES: [&str; 3] = ["MalignantSpider", "SkeletonWarrior", "OtherworldlyGolem"];
pub const BOSSES: [&str; 9] = [
    "Griffin", "Devil", "Hades", "Zeus", "Medusa", "Chimera", "Kronos", "Sobek", "Mesines",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossCategory {
    Raid,
    ClanBoss,
    Boss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossKills {
    pub id: String,
    pub kills: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorizedBosses {
    pub raids: Vec<BossKills>,
    pub clan_bosses: Vec<BossKills>,
    pub bosses: Vec<BossKills>,
}

impl CategorizedBosses {
    pub fn raid_total(&self) -> u64 {
        total(&self.raids)
    }

    pub fn clan_boss_total(&self) -> u64 {
        total(&self.clan_bosses)
    }

    pub fn boss_total(&self) -> u64 {
        total(&self.bosses)
    }
}

// Counts arrive saturated at u64::MAX, so the sum saturates too.
fn total(list: &[BossKills]) -> u64 {
    list.iter().map(|b| b.kills).fold(0u64, u64::saturating_add)
}

/// Anything not a known raid or clan boss counts as a regular boss.
pub fn category_of(id: &str) -> BossCategory {
    if RAIDS.contains(&id) {
        BossCategory::Raid
    } else if CLAN_BOSSES.contains(&id) {
        BossCategory::ClanBoss
    } else {
        BossCategory::Boss
    }
}

/// Known bosses keep their table order; unknown ones follow alphabetically.
pub fn categorize(stats: &BTreeMap<String, u64>) -> CategorizedBosses {
    let mut out = CategorizedBosses::default();
    let known = RAIDS.iter().chain(CLAN_BOSSES.iter()).chain(BOSSES.iter());
    for id in known {
        if let Some(kills) = stats.get(*id) {
            push(&mut out, id, *kills);
        }
    }
    for (id, kills) in stats {
        let is_known = RAIDS.contains(&id.as_str())
            || CLAN_BOSSES.contains(&id.as_str())
            || BOSSES.contains(&id.as_str());
        if !is_known {
            push(&mut out, id, *kills);
        }
    }
    out
}

fn push(out: &mut CategorizedBosses, id: &str, kills: u64) {
    let entry = BossKills {
        id: id.to_string(),
        kills,
    };
    match category_of(id) {
        BossCategory::Raid => out.raids.push(entry),
        BossCategory::ClanBoss => out.clan_bosses.push(entry),
        BossCategory::Boss => out.bosses.push(entry),
    }
}

/// "ReckoningOfTheGods" -> "Reckoning Of The Gods".
pub fn format_boss_name(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 4);
    let mut prev_lower = false;
    for ch in id.chars() {
        if ch == '_' || ch == '-' {
            out.push(' ');
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.push(ch);
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => out,
    }
}

pub fn boss_color(id: &str) -> Color {
    match id {
        "ReckoningOfTheGods" => Color::LightYellow,
        "GuardiansOfTheCitadel" => Color::LightCyan,
        "BloodmoonMassacre" => Color::LightRed,
        "MalignantSpider" => Color::Magenta,
        "SkeletonWarrior" => Color::Gray,
        "OtherworldlyGolem" => Color::LightBlue,
        "Griffin" => Color::Yellow,
        "Devil" => Color::Red,
        "Hades" => Color::LightMagenta,
        "Zeus" => Color::Cyan,
        "Medusa" => Color::Green,
        "Chimera" => Color::LightGreen,
        "Kronos" => Color::Blue,
        "Sobek" => Color::Rgb(0xc8, 0xa0, 0x50),
        "Mesines" => Color::Rgb(0x90, 0x70, 0xd0),
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn huge_kill_counts_saturate_the_total() {
        let grouped = categorize(&stats(&[("Griffin", u64::MAX), ("Zeus", u64::MAX)]));
        assert_eq!(grouped.boss_total(), u64::MAX);
        assert_eq!(grouped.raid_total(), 0);
    }

    #[test]
    fn splits_into_categories_with_totals() {
        let s = stats(&[
            ("Griffin", 10),
            ("Zeus", 5),
            ("BloodmoonMassacre", 3),
            ("ReckoningOfTheGods", 2),
            ("MalignantSpider", 7),
            ("Cerberus", 1),
        ]);
        let c = categorize(&s);
        let raid_ids: Vec<&str> = c.raids.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(raid_ids, ["ReckoningOfTheGods", "BloodmoonMassacre"]);
        assert_eq!(c.raid_total(), 5);
        assert_eq!(c.clan_boss_total(), 7);
        assert_eq!(c.boss_total(), 16);
        assert_eq!(c.bosses.last().map(|b| b.id.as_str()), Some("Cerberus"));
    }

    #[test]
    fn empty_stats_have_zero_totals() {
        let c = categorize(&BTreeMap::new());
        assert_eq!(c, CategorizedBosses::default());
        assert_eq!(c.raid_total() + c.clan_boss_total() + c.boss_total(), 0);
    }

    #[test]
    fn boss_names_are_split_into_words() {
        assert_eq!(format_boss_name("ReckoningOfTheGods"), "Reckoning Of The Gods");
        assert_eq!(format_boss_name("griffin"), "Griffin");
        assert_eq!(format_boss_name("skeleton_warrior"), "Skeleton warrior");
    }

    #[test]
    fn unknown_bosses_get_a_neutral_color() {
        assert_eq!(boss_color("Griffin"), Color::Yellow);
        assert_eq!(boss_color("Cerberus"), Color::White);
    }
}
