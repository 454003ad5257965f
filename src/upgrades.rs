use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy)]
pub struct UpgradeCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub upgrades: &'static [&'static str],
}

pub const UPGRADE_CATEGORIES: [UpgradeCategory; 4] = [
    UpgradeCategory {
        id: "general",
        title: "General",
        upgrades: &[
            "keepItSpacious",
            "valuedClanMember",
            "housing",
            "lazyRaider",
            "extraLoadouts",
            "offlineProgress",
            "toolbeltUpgrade",
        ],
    },
    UpgradeCategory {
        id: "skilling",
        title: "Skilling",
        upgrades: &[
            "ancientWisdom",
            "masterCrafter",
            "mostEfficientFisherman",
            "farmingTrickery",
            "theFisherman",
            "powerForager",
            "plankBargain",
            "smeltingMagic",
            "theLumberjack",
        ],
    },
    UpgradeCategory {
        id: "combat",
        title: "Combat",
        upgrades: &[
            "autoEating",
            "autoLooting",
            "bossSlayer",
            "ninja",
            "monsterHunter",
            "showUsTheMoney",
            "kronosWho?",
            "pickyEater",
            "ammo-saver",
            "teamwork",
            "bountyHunter",
        ],
    },
    UpgradeCategory {
        id: "unlockedWithItems",
        title: "Unlocked with items",
        upgrades: &[
            "arrowCrafter",
            "keepItBurning",
            "betterSkinner",
            "delicateManufacturing",
            "gettingInSync",
            "lastNegotiation",
            "prestigiousWoodworking",
            "responsibleDrinking",
            "betterFisherman",
            "betterLumberjack",
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRow {
    pub id: &'static str,
    pub level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatus {
    pub title: &'static str,
    pub rows: Vec<UpgradeRow>,
}

impl CategoryStatus {
    pub fn owned(&self) -> usize {
        self.rows.iter().filter(|r| r.level.is_some()).count()
    }
}

pub fn category_status(owned: &BTreeMap<String, u32>) -> Vec<CategoryStatus> {
    UPGRADE_CATEGORIES
        .iter()
        .map(|cat| CategoryStatus {
            title: cat.title,
            rows: cat
                .upgrades
                .iter()
                .map(|id| UpgradeRow {
                    id: *id,
                    level: owned.get(*id).copied().filter(|l| *l > 0),
                })
                .collect(),
        })
        .collect()
}

/// Owned upgrades that no category lists.
pub fn uncategorized(owned: &BTreeMap<String, u32>) -> Vec<&str> {
    owned
        .keys()
        .map(String::as_str)
        .filter(|id| !UPGRADE_CATEGORIES.iter().any(|c| c.upgrades.contains(id)))
        .collect()
}

/// "kronosWho?" -> "Kronos Who?", "ammo-saver" -> "Ammo Saver".
pub fn format_upgrade_name(id: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in id.chars() {
        if ch == '-' || ch == '_' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
