use once_cell::sync::Lazy;

pub const MAX_LEVEL: u32 = 120;

// XP_TABLE[level] is the total experience needed to reach `level`.
static XP_TABLE: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut table = vec![0u64; MAX_LEVEL as usize + 1];
    let mut points = 0.0f64;
    for level in 2..=MAX_LEVEL {
        let prev = (level - 1) as f64;
        points += (prev + 300.0 * 2f64.powf(prev / 7.0)).floor();
        table[level as usize] = (points / 4.0).floor() as u64;
    }
    table
});

pub fn xp_for_level(level: u32) -> u64 {
    let level = level.clamp(1, MAX_LEVEL);
    XP_TABLE[level as usize]
}

pub fn level_for_xp(xp: u64) -> u32 {
    // partition_point over levels 1..=MAX gives the count of levels reached.
    let reached = XP_TABLE[1..].partition_point(|needed| *needed <= xp);
    (reached as u32).clamp(1, MAX_LEVEL)
}

pub fn xp_to_level(current_xp: u64, target_level: u32) -> u64 {
    xp_for_level(target_level).saturating_sub(current_xp)
}

/// Percent of the way from the current level to the next, 100 at max level.
pub fn progress_to_next(xp: u64) -> f64 {
    let level = level_for_xp(xp);
    if level >= MAX_LEVEL {
        return 100.0;
    }
    let floor = xp_for_level(level);
    let ceil = xp_for_level(level + 1);
    let span = ceil.saturating_sub(floor).max(1);
    (xp.saturating_sub(floor) as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorPlan {
    pub current_xp: u64,
    pub current_level: u32,
    pub target_level: u32,
    pub target_xp: u64,
    pub remaining_xp: u64,
    pub progress: f64,
}

impl CalculatorPlan {
    pub fn is_reached(&self) -> bool {
        self.remaining_xp == 0
    }
}

pub fn plan(current_xp: u64, target_level: u32) -> CalculatorPlan {
    let target_level = target_level.clamp(1, MAX_LEVEL);
    CalculatorPlan {
        current_xp,
        current_level: level_for_xp(current_xp),
        target_level,
        target_xp: xp_for_level(target_level),
        remaining_xp: xp_to_level(current_xp, target_level),
        progress: progress_to_next(current_xp),
    }
}

/// Actions of `xp_per_action` needed to cover `remaining_xp`, rounded up.
/// `None` when the rate is not positive.
pub fn actions_needed(remaining_xp: u64, xp_per_action: f64) -> Option<u64> {
    if xp_per_action.is_nan() || xp_per_action <= 0.0 {
        return None;
    }
    Some((remaining_xp as f64 / xp_per_action).ceil() as u64)
}

/// Next level up from the current one, capped at the maximum.
pub fn default_target(current_xp: u64) -> u32 {
    (level_for_xp(current_xp) + 1).min(MAX_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_known_thresholds() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_for_level(10), 1_154);
        assert_eq!(xp_for_level(99), 13_034_431);
        assert_eq!(xp_for_level(MAX_LEVEL), 104_273_167);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(82), 1);
        assert_eq!(level_for_xp(83), 2);
        assert_eq!(level_for_xp(13_034_431), 99);
        assert_eq!(level_for_xp(u64::MAX), MAX_LEVEL);
    }

    #[test]
    fn remaining_xp_saturates() {
        assert_eq!(xp_to_level(0, 2), 83);
        assert_eq!(xp_to_level(1_000, 2), 0);
    }

    #[test]
    fn plan_clamps_target_and_reports_progress() {
        let p = plan(83, 500);
        assert_eq!(p.target_level, MAX_LEVEL);
        assert_eq!(p.current_level, 2);
        assert_eq!(p.progress, 0.0);
        assert!(!p.is_reached());
        assert_eq!(progress_to_next(104_273_167), 100.0);
        assert_eq!(default_target(104_273_167), MAX_LEVEL);
    }

    #[test]
    fn actions_round_up() {
        assert_eq!(actions_needed(83, 10.0), Some(9));
        assert_eq!(actions_needed(80, 10.0), Some(8));
        assert_eq!(actions_needed(0, 2.5), Some(0));
        assert_eq!(actions_needed(83, 0.0), None);
        assert_eq!(actions_needed(83, -1.0), None);
    }
}
