use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow};

use idleclans_terminal::cache::SessionCache;
use idleclans_terminal::error::PLAYER_LOOKUP_MESSAGE;
use idleclans_terminal::gateway::ProfileGateway;
use idleclans_terminal::model::{ClanRecord, ClanStatus, GameMode, PlayerRecord, Source};
use idleclans_terminal::resolve::Resolver;

#[derive(Default)]
struct ScriptedGateway {
    players: HashMap<String, PlayerRecord>,
    clans: HashMap<String, ClanRecord>,
    player_calls: Cell<usize>,
    clan_calls: Cell<usize>,
    call_order: RefCell<Vec<String>>,
}

impl ScriptedGateway {
    fn with_player(mut self, player: PlayerRecord) -> Self {
        self.players.insert(player.username.clone(), player);
        self
    }

    fn with_clan(mut self, name: &str) -> Self {
        self.clans.insert(
            name.to_string(),
            ClanRecord {
                name: name.to_string(),
                fields: Default::default(),
            },
        );
        self
    }
}

impl ProfileGateway for ScriptedGateway {
    fn fetch_player_profile(&self, username: &str) -> Result<PlayerRecord> {
        self.player_calls.set(self.player_calls.get() + 1);
        self.call_order.borrow_mut().push(format!("player:{username}"));
        self.players
            .get(username)
            .cloned()
            .ok_or_else(|| anyhow!("http 404 Not Found"))
    }

    fn fetch_clan_by_name(&self, name: &str) -> Result<ClanRecord> {
        self.clan_calls.set(self.clan_calls.get() + 1);
        self.call_order.borrow_mut().push(format!("clan:{name}"));
        self.clans
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("http 500 Internal Server Error"))
    }
}

fn player(name: &str, clan: Option<&str>) -> PlayerRecord {
    PlayerRecord {
        username: name.to_string(),
        game_mode: GameMode::Default,
        guild_name: clan.map(str::to_string),
        skill_experiences: BTreeMap::from([("attack".to_string(), 83)]),
        upgrades: BTreeMap::new(),
        pvm_stats: BTreeMap::new(),
    }
}

#[test]
fn blank_input_makes_no_calls() {
    let mut resolver = Resolver::new(ScriptedGateway::default());
    assert!(resolver.resolve("").expect("no error").is_none());
    assert!(resolver.resolve("   \t").expect("no error").is_none());
    assert_eq!(resolver.gateway().player_calls.get(), 0);
    assert_eq!(resolver.gateway().clan_calls.get(), 0);
}

#[test]
fn repeated_lookup_hits_the_cache() {
    let gateway = ScriptedGateway::default()
        .with_player(player("Alice", Some("Night Owls")))
        .with_clan("Night Owls");
    let mut resolver = Resolver::new(gateway);

    let first = resolver.resolve("Alice").expect("ok").expect("view");
    assert_eq!(first.player_source, Source::Remote);
    assert_eq!(first.clan_status, ClanStatus::Loaded(Source::Remote));

    let second = resolver.resolve(" Alice ").expect("ok").expect("view");
    assert_eq!(second.player_source, Source::Cache);
    assert_eq!(second.clan_status, ClanStatus::Loaded(Source::Cache));
    assert_eq!(second.player, first.player);

    assert_eq!(resolver.gateway().player_calls.get(), 1);
    assert_eq!(resolver.gateway().clan_calls.get(), 1);
}

#[test]
fn cache_keys_are_case_sensitive() {
    let gateway = ScriptedGateway::default().with_player(player("Alice", None));
    let mut resolver = Resolver::new(gateway);
    resolver.resolve("Alice").expect("ok");
    assert!(resolver.resolve("alice").is_err());
    assert_eq!(resolver.gateway().player_calls.get(), 2);
}

#[test]
fn player_without_clan_never_calls_clan_gateway() {
    let gateway = ScriptedGateway::default().with_player(player("Solo", None));
    let mut resolver = Resolver::new(gateway);

    let view = resolver.resolve("Solo").expect("ok").expect("view");
    assert_eq!(view.clan_status, ClanStatus::NoClan);
    assert!(view.clan.is_placeholder());
    assert_eq!(resolver.gateway().clan_calls.get(), 0);
}

#[test]
fn blank_clan_name_counts_as_no_clan() {
    let gateway = ScriptedGateway::default().with_player(player("Odd", Some("  ")));
    let mut resolver = Resolver::new(gateway);

    let view = resolver.resolve("Odd").expect("ok").expect("view");
    assert_eq!(view.clan_status, ClanStatus::NoClan);
    assert_eq!(resolver.gateway().clan_calls.get(), 0);
}

#[test]
fn clan_failure_is_contained() {
    let gateway = ScriptedGateway::default().with_player(player("Bob", Some("Broken Clan")));
    let mut resolver = Resolver::new(gateway);

    let view = resolver.resolve("Bob").expect("player still resolves").expect("view");
    assert!(view.clan.is_placeholder());
    match &view.clan_status {
        ClanStatus::Failed(reason) => assert!(reason.contains("500")),
        other => panic!("expected a contained clan failure, got {other:?}"),
    }
    assert!(!resolver.cache().clans.contains("Broken Clan"));

    // Failed clans are retried on the next lookup since nothing was cached.
    resolver.resolve("Bob").expect("ok");
    assert_eq!(resolver.gateway().clan_calls.get(), 2);
    assert_eq!(resolver.gateway().player_calls.get(), 1);
}

#[test]
fn player_failure_is_fatal_and_leaves_cache_untouched() {
    let mut resolver = Resolver::new(ScriptedGateway::default());

    let err = resolver.resolve("Nobody").expect_err("player lookup should fail");
    assert_eq!(err.to_string(), PLAYER_LOOKUP_MESSAGE);
    assert_eq!(err.username, "Nobody");
    assert!(err.detail().contains("404"));
    assert!(!resolver.cache().players.contains("Nobody"));
    assert!(resolver.cache().players.is_empty());
    assert_eq!(resolver.gateway().clan_calls.get(), 0);
}

#[test]
fn player_is_fetched_before_clan() {
    let gateway = ScriptedGateway::default()
        .with_player(player("Alice", Some("Night Owls")))
        .with_clan("Night Owls");
    let mut resolver = Resolver::new(gateway);
    resolver.resolve("Alice").expect("ok");
    assert_eq!(
        *resolver.gateway().call_order.borrow(),
        ["player:Alice", "clan:Night Owls"]
    );
}

#[test]
fn prefilled_cache_avoids_the_network() {
    let mut cache = SessionCache::new();
    cache.players.set("Alice", player("Alice", Some("Night Owls")));
    cache.clans.set(
        "Night Owls",
        ClanRecord {
            name: "Night Owls".to_string(),
            fields: Default::default(),
        },
    );
    let mut resolver = Resolver::with_cache(ScriptedGateway::default(), cache);

    let view = resolver.resolve("Alice").expect("ok").expect("view");
    assert_eq!(view.clan.name, "Night Owls");
    assert_eq!(resolver.gateway().player_calls.get(), 0);
    assert_eq!(resolver.gateway().clan_calls.get(), 0);
}
