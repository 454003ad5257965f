use std::collections::VecDeque;

use crate::calculator::{self, MAX_LEVEL};
use crate::model::{ClanStatus, CombinedView, source_label};
use crate::skills::{SKILLS, skill_rows};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Profile,
    Pvm,
    Upgrades,
    Calculator,
}

pub const VIEWS: [View; 4] = [View::Profile, View::Pvm, View::Upgrades, View::Calculator];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    Resolve { generation: u64, username: String },
}

#[derive(Debug, Clone)]
pub enum Delta {
    Resolved {
        generation: u64,
        view: Box<CombinedView>,
    },
    LookupFailed {
        generation: u64,
        message: String,
        detail: String,
    },
    // Blank input reached the resolver; nothing was fetched.
    Skipped {
        generation: u64,
    },
    Log(String),
}

const XP_PER_ACTION_STEPS: [u32; 8] = [5, 10, 25, 50, 100, 250, 500, 1_000];

#[derive(Debug, Clone)]
pub struct CalculatorState {
    pub selected: usize,
    // None follows the selected skill's next level.
    pub target_level: Option<u32>,
    // Index into XP_PER_ACTION_STEPS.
    pub rate_step: usize,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            selected: 0,
            target_level: None,
            rate_step: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub input: String,
    pub lookup_in_flight: bool,
    // Bumped on every submission; deltas for older generations are stale.
    pub generation: u64,
    pub resolved: Option<CombinedView>,
    pub error: Option<String>,
    pub calculator: CalculatorState,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Profile,
            input: String::new(),
            lookup_in_flight: false,
            generation: 0,
            resolved: None,
            error: None,
            calculator: CalculatorState::default(),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.lookup_in_flight && !self.input.trim().is_empty()
    }

    pub fn push_char(&mut self, ch: char) {
        if !self.lookup_in_flight {
            self.input.push(ch);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.lookup_in_flight {
            self.input.pop();
        }
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Starts a lookup for the current input, or returns `None` while one is
    /// already running or the input is blank.
    pub fn begin_lookup(&mut self) -> Option<ProviderCommand> {
        if !self.can_submit() {
            return None;
        }
        self.generation += 1;
        self.lookup_in_flight = true;
        self.error = None;
        Some(ProviderCommand::Resolve {
            generation: self.generation,
            username: self.input.clone(),
        })
    }

    /// Lets the UI recover if the command could not be delivered.
    pub fn abort_lookup(&mut self, reason: &str) {
        self.lookup_in_flight = false;
        self.push_log(format!("[WARN] Lookup request failed: {reason}"));
    }

    pub fn cycle_view_next(&mut self) {
        let idx = VIEWS.iter().position(|v| *v == self.view).unwrap_or(0);
        self.view = VIEWS[(idx + 1) % VIEWS.len()];
    }

    pub fn cycle_view_prev(&mut self) {
        let idx = VIEWS.iter().position(|v| *v == self.view).unwrap_or(0);
        self.view = VIEWS[(idx + VIEWS.len() - 1) % VIEWS.len()];
    }

    pub fn calculator_rows(&self) -> usize {
        self.resolved
            .as_ref()
            .map(|v| skill_rows(&v.player.skill_experiences).len())
            .unwrap_or(SKILLS.len())
    }

    pub fn select_skill_next(&mut self) {
        let total = self.calculator_rows();
        if total == 0 {
            return;
        }
        self.calculator.selected = (self.calculator.selected + 1).min(total - 1);
        self.calculator.target_level = None;
    }

    pub fn select_skill_prev(&mut self) {
        self.calculator.selected = self.calculator.selected.saturating_sub(1);
        self.calculator.target_level = None;
    }

    pub fn selected_skill_xp(&self) -> u64 {
        let Some(view) = &self.resolved else {
            return 0;
        };
        skill_rows(&view.player.skill_experiences)
            .get(self.calculator.selected)
            .map(|r| r.xp)
            .unwrap_or(0)
    }

    pub fn target_level(&self) -> u32 {
        self.calculator
            .target_level
            .unwrap_or_else(|| calculator::default_target(self.selected_skill_xp()))
    }

    pub fn raise_target(&mut self) {
        self.calculator.target_level = Some((self.target_level() + 1).min(MAX_LEVEL));
    }

    pub fn lower_target(&mut self) {
        self.calculator.target_level = Some(self.target_level().saturating_sub(1).max(1));
    }

    pub fn xp_per_action(&self) -> u32 {
        XP_PER_ACTION_STEPS[self.calculator.rate_step.min(XP_PER_ACTION_STEPS.len() - 1)]
    }

    pub fn raise_rate(&mut self) {
        self.calculator.rate_step =
            (self.calculator.rate_step + 1).min(XP_PER_ACTION_STEPS.len() - 1);
    }

    pub fn lower_rate(&mut self) {
        self.calculator.rate_step = self.calculator.rate_step.saturating_sub(1);
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Resolved { generation, view } => {
            if generation != state.generation {
                state.push_log(format!(
                    "[INFO] Dropped stale result for {}",
                    view.player.username
                ));
                return;
            }
            state.lookup_in_flight = false;
            state.error = None;
            state.push_log(format!(
                "[INFO] Loaded {} ({})",
                view.player.username,
                source_label(view.player_source)
            ));
            match &view.clan_status {
                ClanStatus::NoClan => {}
                ClanStatus::Loaded(source) => state.push_log(format!(
                    "[INFO] Clan {} ({})",
                    view.clan.name,
                    source_label(*source)
                )),
                ClanStatus::Failed(reason) => {
                    state.push_log(format!("[WARN] Failed to fetch clan data: {reason}"))
                }
            }
            state.calculator = CalculatorState {
                rate_step: state.calculator.rate_step,
                ..CalculatorState::default()
            };
            state.resolved = Some(*view);
        }
        Delta::LookupFailed {
            generation,
            message,
            detail,
        } => {
            if generation != state.generation {
                return;
            }
            // The previous view stays on screen beneath the error.
            state.lookup_in_flight = false;
            state.error = Some(message);
            state.push_log(format!("[WARN] Player lookup failed: {detail}"));
        }
        Delta::Skipped { generation } => {
            if generation == state.generation {
                state.lookup_in_flight = false;
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn view_label(view: View) -> &'static str {
    match view {
        View::Profile => "PROFILE",
        View::Pvm => "PVM",
        View::Upgrades => "UPGRADES",
        View::Calculator => "CALCULATOR",
    }
}
