use anyhow::{Result, anyhow};

use idleclans_terminal::config::{self, AppConfig};
use idleclans_terminal::demo_gateway::DemoGateway;
use idleclans_terminal::gateway::{HttpGateway, ProfileGateway};
use idleclans_terminal::model::{ClanStatus, CombinedView, source_label};
use idleclans_terminal::pvm;
use idleclans_terminal::resolve::Resolver;
use idleclans_terminal::skills::{self, format_xp, skill_label, skill_rows};
use idleclans_terminal::upgrades;

fn main() -> Result<()> {
    config::load_dotenv();
    let config = AppConfig::from_env();

    let names: Vec<String> = std::env::args().skip(1).collect();
    if names.is_empty() {
        return Err(anyhow!("usage: lookup <username> [<username>...]"));
    }

    let gateway: Box<dyn ProfileGateway> = if config.demo {
        Box::new(DemoGateway::new())
    } else {
        Box::new(HttpGateway::new(config.api_base.clone(), config.timeout_secs))
    };
    let mut resolver = Resolver::new(gateway);

    for name in names {
        match resolver.resolve(&name) {
            Ok(Some(view)) => print_view(&view),
            Ok(None) => eprintln!("[INFO] Skipping blank name"),
            Err(err) => eprintln!("[WARN] {err} ({})", err.detail()),
        }
    }
    Ok(())
}

fn print_view(view: &CombinedView) {
    let player = &view.player;
    println!(
        "{} [{}] ({})",
        player.username,
        player.game_mode,
        source_label(view.player_source)
    );
    match &view.clan_status {
        ClanStatus::NoClan => println!("  clan: none"),
        ClanStatus::Loaded(source) => println!(
            "  clan: {} ({}, {} members)",
            view.clan.name,
            source_label(*source),
            view.clan
                .member_count()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        ),
        ClanStatus::Failed(reason) => {
            eprintln!("[WARN] clan lookup failed: {reason}");
            println!("  clan: {} (unavailable)", player.clan_label());
        }
    }

    let rows = skill_rows(&player.skill_experiences);
    println!(
        "  total level {} / {} xp",
        skills::total_level(&rows),
        format_xp(skills::total_xp(&rows))
    );
    for row in rows.iter().filter(|r| r.xp > 0) {
        println!(
            "    {:<14} {:>3} {:>13}",
            skill_label(&row.skill),
            row.level,
            format_xp(row.xp)
        );
    }

    let bosses = pvm::categorize(&player.pvm_stats);
    println!(
        "  kills: raids {} | clan bosses {} | bosses {}",
        bosses.raid_total(),
        bosses.clan_boss_total(),
        bosses.boss_total()
    );

    for cat in upgrades::category_status(&player.upgrades) {
        println!("  upgrades {}: {}/{}", cat.title, cat.owned(), cat.rows.len());
    }
    let other = upgrades::uncategorized(&player.upgrades);
    if !other.is_empty() {
        println!("  other upgrades: {}", other.join(", "));
    }
}
