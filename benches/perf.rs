use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use idleclans_terminal::calculator;
use idleclans_terminal::demo_gateway::DemoGateway;
use idleclans_terminal::gateway::parse_player_profile_json;
use idleclans_terminal::pvm::categorize;
use idleclans_terminal::resolve::Resolver;
use idleclans_terminal::skills::skill_rows;
use idleclans_terminal::upgrades::category_status;

const PLAYER_JSON: &str = include_str!("../tests/fixtures/player_profile.json");

fn bench_profile_parse(c: &mut Criterion) {
    c.bench_function("player_profile_parse", |b| {
        b.iter(|| {
            let player = parse_player_profile_json(black_box(PLAYER_JSON)).unwrap();
            black_box(player.skill_experiences.len());
        })
    });
}

fn bench_presentation(c: &mut Criterion) {
    let player = parse_player_profile_json(PLAYER_JSON).expect("valid fixture json");
    c.bench_function("presentation_tables", |b| {
        b.iter(|| {
            let rows = skill_rows(black_box(&player.skill_experiences));
            let bosses = categorize(black_box(&player.pvm_stats));
            let upgrades = category_status(black_box(&player.upgrades));
            black_box((rows.len(), bosses.boss_total(), upgrades.len()));
        })
    });
}

fn bench_level_lookup(c: &mut Criterion) {
    c.bench_function("level_for_xp", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for xp in (0..104_273_167u64).step_by(997_331) {
                sum += calculator::level_for_xp(black_box(xp));
            }
            black_box(sum);
        })
    });
}

fn bench_cached_resolve(c: &mut Criterion) {
    let mut resolver = Resolver::new(DemoGateway::new());
    resolver.resolve("Alice").expect("demo lookup");
    c.bench_function("resolve_cache_hit", |b| {
        b.iter(|| {
            let view = resolver.resolve(black_box("Alice")).unwrap();
            black_box(view.is_some());
        })
    });
}

criterion_group!(
    benches,
    bench_profile_parse,
    bench_presentation,
    bench_level_lookup,
    bench_cached_resolve
);
criterion_main!(benches);
