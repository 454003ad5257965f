use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use idleclans_terminal::calculator;
use idleclans_terminal::config::{self, AppConfig};
use idleclans_terminal::demo_gateway::DemoGateway;
use idleclans_terminal::gateway::HttpGateway;
use idleclans_terminal::input_store::{
    DebouncedSaver, FileSlot, Freshness, InputStore, default_slot_path,
};
use idleclans_terminal::model::{ClanStatus, CombinedView};
use idleclans_terminal::provider::spawn_provider;
use idleclans_terminal::pvm::{self, BossKills};
use idleclans_terminal::skills::{self, format_xp, skill_label, skill_rows};
use idleclans_terminal::state::{
    AppState, Delta, ProviderCommand, VIEWS, View, apply_delta, view_label,
};
use idleclans_terminal::upgrades::{self, format_upgrade_name};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
    saver: Option<DebouncedSaver<FileSlot>>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>, saver: Option<DebouncedSaver<FileSlot>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            saver,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('u') => self.clear_input(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                if self.state.help_overlay {
                    self.state.help_overlay = false;
                } else {
                    self.clear_input();
                }
            }
            KeyCode::Backspace => {
                self.state.pop_char();
                self.input_changed();
            }
            KeyCode::Char(ch) => {
                self.state.push_char(ch);
                self.input_changed();
            }
            KeyCode::Tab => self.state.cycle_view_next(),
            KeyCode::BackTab => self.state.cycle_view_prev(),
            KeyCode::Down => self.state.select_skill_next(),
            KeyCode::Up => self.state.select_skill_prev(),
            KeyCode::Right => self.state.raise_target(),
            KeyCode::Left => self.state.lower_target(),
            KeyCode::PageUp => self.state.raise_rate(),
            KeyCode::PageDown => self.state.lower_rate(),
            KeyCode::F(1) => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn submit(&mut self) {
        let Some(cmd) = self.state.begin_lookup() else {
            return;
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.abort_lookup("lookup worker stopped");
        }
    }

    fn clear_input(&mut self) {
        if self.state.lookup_in_flight {
            return;
        }
        self.state.clear_input();
        self.input_changed();
    }

    fn input_changed(&mut self) {
        if let Some(saver) = self.saver.as_mut() {
            saver.input_changed(&self.state.input, Instant::now());
        }
    }

    fn flush_input(&mut self) {
        let Some(saver) = self.saver.as_mut() else {
            return;
        };
        if let Err(err) = saver.tick(Instant::now(), Utc::now().timestamp_millis()) {
            self.state
                .push_log(format!("[WARN] Could not save last username: {err:#}"));
        }
    }
}

fn main() -> io::Result<()> {
    config::load_dotenv();
    let config = AppConfig::from_env();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _provider = if config.demo {
        spawn_provider(DemoGateway::new(), tx, cmd_rx)
    } else {
        spawn_provider(
            HttpGateway::new(config.api_base.clone(), config.timeout_secs),
            tx,
            cmd_rx,
        )
    };

    let saver = default_slot_path(config.state_dir.as_deref())
        .map(|path| DebouncedSaver::new(InputStore::new(FileSlot::new(path))));
    let mut app = App::new(cmd_tx, saver);
    if config.demo {
        app.state.push_log("[INFO] Demo mode: profiles are generated offline");
    } else {
        app.state
            .push_log(format!("[INFO] Using API {}", config.api_base));
    }
    restore_last_username(&mut app);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn restore_last_username(app: &mut App) {
    let Some(saver) = app.saver.as_mut() else {
        return;
    };
    let loaded = saver.store_mut().load(Utc::now().timestamp_millis());
    match loaded {
        Ok(Some(input)) => {
            let note = match input.freshness {
                Freshness::Fresh { age_ms } => format!("saved {}s ago", age_ms / 1000),
                Freshness::Legacy => "legacy record".to_string(),
            };
            app.state
                .push_log(format!("[INFO] Restored last username ({note})"));
            app.state.input = input.value;
            app.input_changed();
            app.submit();
        }
        Ok(None) => {}
        Err(err) => app
            .state
            .push_log(format!("[WARN] Could not read last username: {err:#}")),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.flush_input();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_line(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_search(frame, chunks[1], &app.state);

    let body = if let Some(error) = &app.state.error {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(chunks[2]);
        let banner = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Error"));
        frame.render_widget(banner, rows[0]);
        rows[1]
    } else {
        chunks[2]
    };

    match &app.state.resolved {
        Some(view) => match app.state.view {
            View::Profile => render_profile(frame, body, view),
            View::Pvm => render_pvm(frame, body, view),
            View::Upgrades => render_upgrades(frame, body, view),
            View::Calculator => render_calculator(frame, body, &app.state, view),
        },
        None => {
            let empty = Paragraph::new(
                "Enter an Idle Clans username above to load profile data\n\nThe calculator uses the profile to work out XP requirements",
            )
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, body);
        }
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(
        "Enter Search | Esc Clear | Tab/Shift-Tab View | ↑/↓ Skill | ←/→ Target | F1 Help | Ctrl-C Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_line(state: &AppState) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " IDLE CLANS ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )];
    for view in VIEWS {
        spans.push(Span::raw("  "));
        let style = if view == state.view {
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(view_label(view), style));
    }
    Line::from(spans)
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let status = if state.lookup_in_flight {
        Span::styled(" searching… ", Style::default().fg(Color::Yellow))
    } else if state.can_submit() {
        Span::styled(" Enter to search ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" type a name ", Style::default().fg(Color::DarkGray))
    };
    let text = if state.input.is_empty() {
        Line::from(Span::styled(
            "Player name",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(state.input.clone()),
            Span::styled("▏", Style::default().fg(Color::Green)),
        ])
    };
    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search for a player")
            .title(
                Title::from(status)
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            ),
    );
    frame.render_widget(input, area);
}

fn render_profile(frame: &mut Frame, area: Rect, view: &CombinedView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(30)])
        .split(area);

    frame.render_widget(
        Paragraph::new(player_info_text(view))
            .block(Block::default().title("Player Info").borders(Borders::ALL)),
        cols[0],
    );

    let rows = skill_rows(&view.player.skill_experiences);
    let mut lines = Vec::with_capacity(rows.len() + 2);
    for row in &rows {
        lines.push(format!(
            "{:<14} {:>3}  {:>13} xp",
            skill_label(&row.skill),
            row.level,
            format_xp(row.xp)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{:<14} {:>3}  {:>13} xp",
        "Total",
        skills::total_level(&rows),
        format_xp(skills::total_xp(&rows))
    ));
    frame.render_widget(
        Paragraph::new(lines.join("\n"))
            .block(Block::default().title("Skills").borders(Borders::ALL)),
        cols[1],
    );
}

fn player_info_text(view: &CombinedView) -> String {
    let player = &view.player;
    let mut lines = vec![
        format!("Nickname:  {}", player.username),
        format!("Game Mode: {}", player.game_mode),
        format!("Clan:      {}", player.clan_label()),
    ];
    match &view.clan_status {
        ClanStatus::Loaded(_) => {
            if let Some(tag) = view.clan.tag() {
                lines.push(format!("Clan tag:  {tag}"));
            }
            if let Some(count) = view.clan.member_count() {
                lines.push(format!("Members:   {count}"));
            }
        }
        ClanStatus::Failed(_) => lines.push("Clan details unavailable".to_string()),
        ClanStatus::NoClan => {}
    }
    lines.join("\n")
}

fn render_pvm(frame: &mut Frame, area: Rect, view: &CombinedView) {
    let categorized = pvm::categorize(&view.player.pvm_stats);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[0]);

    render_boss_category(frame, left[0], "Raids", &categorized.raids, categorized.raid_total());
    render_boss_category(
        frame,
        left[1],
        "Clan bosses",
        &categorized.clan_bosses,
        categorized.clan_boss_total(),
    );
    render_boss_category(
        frame,
        cols[1],
        "Boss kills",
        &categorized.bosses,
        categorized.boss_total(),
    );
}

fn render_boss_category(frame: &mut Frame, area: Rect, title: &str, bosses: &[BossKills], total: u64) {
    let lines: Vec<Line> = if bosses.is_empty() {
        vec![Line::from(Span::styled(
            "No kills recorded",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        bosses
            .iter()
            .map(|b| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<24}", pvm::format_boss_name(&b.id)),
                        Style::default().fg(pvm::boss_color(&b.id)),
                    ),
                    Span::raw(format!("{:>8}", format_xp(b.kills))),
                ])
            })
            .collect()
    };
    let block = Block::default()
        .title(format!("{title} ({})", format_xp(total)))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_upgrades(frame: &mut Frame, area: Rect, view: &CombinedView) {
    let status = upgrades::category_status(&view.player.upgrades);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (cat, col) in status.iter().zip(cols.iter()) {
        let lines: Vec<Line> = cat
            .rows
            .iter()
            .map(|row| match row.level {
                Some(level) => Line::from(Span::styled(
                    format!("✓ {} ({level})", format_upgrade_name(row.id)),
                    Style::default().fg(Color::Green),
                )),
                None => Line::from(Span::styled(
                    format!("✗ {}", format_upgrade_name(row.id)),
                    Style::default().fg(Color::DarkGray),
                )),
            })
            .collect();
        let block = Block::default()
            .title(format!("{} {}/{}", cat.title, cat.owned(), cat.rows.len()))
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), *col);
    }
}

fn render_calculator(frame: &mut Frame, area: Rect, state: &AppState, view: &CombinedView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(30)])
        .split(area);

    let rows = skill_rows(&view.player.skill_experiences);
    let selected = state.calculator.selected.min(rows.len().saturating_sub(1));
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let text = format!("{:<16} {:>3}", skill_label(&row.skill), row.level);
            if idx == selected {
                Line::from(Span::styled(
                    format!("> {text}"),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                ))
            } else {
                Line::from(format!("  {text}"))
            }
        })
        .collect();
    let visible = cols[0].height.saturating_sub(2) as usize;
    let (start, end) = visible_range(selected, lines.len(), visible);
    frame.render_widget(
        Paragraph::new(lines[start..end].to_vec())
            .block(Block::default().title("Skills").borders(Borders::ALL)),
        cols[0],
    );

    let Some(row) = rows.get(selected) else {
        return;
    };
    let plan = calculator::plan(row.xp, state.target_level());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Length(3), Constraint::Min(0)])
        .split(cols[1]);

    let remaining = if plan.is_reached() {
        "Target already reached".to_string()
    } else {
        format!("{} xp to go", format_xp(plan.remaining_xp))
    };
    let rate = state.xp_per_action();
    let actions = calculator::actions_needed(plan.remaining_xp, f64::from(rate))
        .map(|n| format!("{} actions at {rate} xp each", format_xp(n)))
        .unwrap_or_default();
    let text = [
        format!("{}'s {}", view.player.username, skill_label(&row.skill)),
        String::new(),
        format!("Current: level {} ({} xp)", plan.current_level, format_xp(plan.current_xp)),
        format!("Target:  level {} ({} xp)", plan.target_level, format_xp(plan.target_xp)),
        remaining,
        actions,
    ]
    .join("\n");
    frame.render_widget(
        Paragraph::new(text).block(Block::default().title("XP Calculator").borders(Borders::ALL)),
        right[0],
    );

    let gauge = Gauge::default()
        .block(Block::default().title("Next level").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio((plan.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", plan.progress));
    frame.render_widget(gauge, right[1]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Idle Clans Terminal - Help",
        "",
        "Search:",
        "  type         Edit player name",
        "  Enter        Look up player and clan",
        "  Esc / Ctrl-U Clear the name",
        "",
        "Views:",
        "  Tab          Next view",
        "  Shift-Tab    Previous view",
        "",
        "Calculator:",
        "  ↑/↓          Select skill",
        "  ←/→          Lower/raise target level",
        "  PgUp/PgDn    Raise/lower xp per action",
        "",
        "  F1           Toggle help",
        "  Ctrl-C       Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
