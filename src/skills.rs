use std::collections::BTreeMap;

use crate::calculator::level_for_xp;

/// In-game skill order.
pub const SKILLS: [&str; 20] = [
    "attack",
    "strength",
    "defence",
    "archery",
    "magic",
    "health",
    "crafting",
    "woodcutting",
    "carpentry",
    "fishing",
    "cooking",
    "mining",
    "smithing",
    "foraging",
    "farming",
    "agility",
    "plundering",
    "enchanting",
    "brewing",
    "exterminating",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub skill: String,
    pub xp: u64,
    pub level: u32,
}

/// Known skills first in game order (missing ones at zero XP), then any
/// skill the API sent that is not in the list.
pub fn skill_rows(experiences: &BTreeMap<String, u64>) -> Vec<SkillRow> {
    let mut rows: Vec<SkillRow> = SKILLS
        .iter()
        .map(|skill| row(skill, experiences.get(*skill).copied().unwrap_or(0)))
        .collect();
    for (skill, xp) in experiences {
        if !SKILLS.contains(&skill.as_str()) {
            rows.push(row(skill, *xp));
        }
    }
    rows
}

fn row(skill: &str, xp: u64) -> SkillRow {
    SkillRow {
        skill: skill.to_string(),
        xp,
        level: level_for_xp(xp),
    }
}

pub fn total_level(rows: &[SkillRow]) -> u32 {
    rows.iter().map(|r| r.level).fold(0u32, u32::saturating_add)
}

pub fn total_xp(rows: &[SkillRow]) -> u64 {
    rows.iter().map(|r| r.xp).fold(0u64, u64::saturating_add)
}

pub fn skill_label(skill: &str) -> String {
    let mut chars = skill.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_xp(xp: u64) -> String {
    let digits = xp.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_experience_saturates_the_total() {
        let xp = BTreeMap::from([
            ("attack".to_string(), u64::MAX),
            ("strength".to_string(), u64::MAX),
        ]);
        let rows = skill_rows(&xp);
        assert_eq!(total_xp(&rows), u64::MAX);
        assert_eq!(total_level(&rows), 2 * 120 + (SKILLS.len() as u32 - 2));
    }

    #[test]
    fn rows_follow_game_order_and_keep_extras() {
        let mut xp = BTreeMap::new();
        xp.insert("woodcutting".to_string(), 83);
        xp.insert("sailing".to_string(), 10);
        let rows = skill_rows(&xp);
        assert_eq!(rows.len(), SKILLS.len() + 1);
        assert_eq!(rows[0].skill, "attack");
        assert_eq!(rows[0].level, 1);
        assert_eq!(rows[7].skill, "woodcutting");
        assert_eq!(rows[7].level, 2);
        assert_eq!(rows.last().map(|r| r.skill.as_str()), Some("sailing"));
        assert_eq!(total_xp(&rows), 93);
        assert_eq!(total_level(&rows), 22);
    }

    #[test]
    fn xp_gets_thousands_separators() {
        assert_eq!(format_xp(0), "0");
        assert_eq!(format_xp(999), "999");
        assert_eq!(format_xp(1_000), "1,000");
        assert_eq!(format_xp(13_034_431), "13,034,431");
    }

    #[test]
    fn labels_capitalize() {
        assert_eq!(skill_label("exterminating"), "Exterminating");
        assert_eq!(skill_label(""), "");
    }
}
