use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use reqwest::header::ACCEPT;

use crate::http_client::http_client;
use crate::model::{ClanRecord, PlayerRecord};

/// Remote source of player and clan records.
///
/// Both calls fail with a plain fetch error on a non-success status or a
/// transport failure; callers decide which failures are fatal.
pub trait ProfileGateway {
    fn fetch_player_profile(&self, username: &str) -> Result<PlayerRecord>;
    fn fetch_clan_by_name(&self, name: &str) -> Result<ClanRecord>;
}

impl<G: ProfileGateway + ?Sized> ProfileGateway for Box<G> {
    fn fetch_player_profile(&self, username: &str) -> Result<PlayerRecord> {
        (**self).fetch_player_profile(username)
    }

    fn fetch_clan_by_name(&self, name: &str) -> Result<ClanRecord> {
        (**self).fetch_clan_by_name(name)
    }
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    base: String,
    timeout_secs: u64,
}

impl HttpGateway {
    pub fn new(base: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base: base.into(),
            timeout_secs,
        }
    }

    pub fn player_url(&self, username: &str) -> Result<Url> {
        endpoint(&self.base, &["Player", "profile", username])
    }

    pub fn clan_url(&self, name: &str) -> Result<Url> {
        endpoint(&self.base, &["Clan", "recruitment", name])
    }

    fn get_text(&self, url: Url) -> Result<String> {
        let client = http_client(self.timeout_secs)?;
        let resp = client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, body.trim()));
        }
        Ok(body)
    }
}

impl ProfileGateway for HttpGateway {
    fn fetch_player_profile(&self, username: &str) -> Result<PlayerRecord> {
        let url = self.player_url(username)?;
        let body = self.get_text(url).context("player profile request failed")?;
        parse_player_profile_json(&body)
    }

    fn fetch_clan_by_name(&self, name: &str) -> Result<ClanRecord> {
        let url = self.clan_url(name)?;
        let body = self.get_text(url).context("clan request failed")?;
        parse_clan_json(&body)
    }
}

pub fn parse_player_profile_json(raw: &str) -> Result<PlayerRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty player response"));
    }
    serde_json::from_str(trimmed).context("invalid player profile json")
}

pub fn parse_clan_json(raw: &str) -> Result<ClanRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow!("empty clan response"));
    }
    serde_json::from_str(trimmed).context("invalid clan json")
}

// Segments are appended through the url crate so names with spaces or
// slashes are percent-encoded rather than spliced into the path.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("invalid api base url: {base}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("api base url cannot take a path: {base}"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
