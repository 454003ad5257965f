use crate::cache::{SessionCache, lookup_key};
use crate::error::LookupError;
use crate::gateway::ProfileGateway;
use crate::model::{ClanRecord, ClanStatus, CombinedView, PlayerRecord, Source};

/// Turns a typed username into a [`CombinedView`].
///
/// Owns the session cache, so each resolver (and each test) starts cold.
/// The player is always resolved before the clan. A player failure aborts
/// the resolution; a clan failure is recorded in [`ClanStatus::Failed`] and
/// the view still resolves with a placeholder clan.
pub struct Resolver<G> {
    gateway: G,
    cache: SessionCache,
}

impl<G: ProfileGateway> Resolver<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_cache(gateway, SessionCache::new())
    }

    pub fn with_cache(gateway: G, cache: SessionCache) -> Self {
        Self { gateway, cache }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// `Ok(None)` means the input was blank and nothing was looked up.
    pub fn resolve(&mut self, raw_username: &str) -> Result<Option<CombinedView>, LookupError> {
        let username = lookup_key(raw_username);
        if username.is_empty() {
            return Ok(None);
        }

        let (player, player_source) = self.resolve_player(&username)?;
        let (clan, clan_status) = match player.guild_name.as_deref().map(lookup_key) {
            Some(name) if !name.is_empty() => self.resolve_clan(&name),
            _ => (ClanRecord::placeholder(), ClanStatus::NoClan),
        };

        Ok(Some(CombinedView {
            player,
            player_source,
            clan,
            clan_status,
        }))
    }

    fn resolve_player(&mut self, username: &str) -> Result<(PlayerRecord, Source), LookupError> {
        if let Some(player) = self.cache.players.get(username) {
            return Ok((player.clone(), Source::Cache));
        }
        let player = self
            .gateway
            .fetch_player_profile(username)
            .map_err(|source| LookupError::new(username, source))?;
        self.cache.players.set(username, player.clone());
        Ok((player, Source::Remote))
    }

    fn resolve_clan(&mut self, name: &str) -> (ClanRecord, ClanStatus) {
        if let Some(clan) = self.cache.clans.get(name) {
            return (clan.clone(), ClanStatus::Loaded(Source::Cache));
        }
        match self.gateway.fetch_clan_by_name(name) {
            Ok(clan) => {
                self.cache.clans.set(name, clan.clone());
                (clan, ClanStatus::Loaded(Source::Remote))
            }
            Err(err) => (ClanRecord::placeholder(), ClanStatus::Failed(format!("{err:#}"))),
        }
    }
}
