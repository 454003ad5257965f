use thiserror::Error;

pub const PLAYER_LOOKUP_MESSAGE: &str =
    "Failed to fetch player profile. Please check the username and try again.";

/// The only lookup failure that reaches the user. Clan failures are absorbed
/// by the resolver and never produce one of these.
#[derive(Debug, Error)]
#[error("{}", PLAYER_LOOKUP_MESSAGE)]
pub struct LookupError {
    pub username: String,
    #[source]
    pub source: anyhow::Error,
}

impl LookupError {
    pub fn new(username: impl Into<String>, source: anyhow::Error) -> Self {
        Self {
            username: username.into(),
            source,
        }
    }

    /// Full cause chain, for the console rather than the error banner.
    pub fn detail(&self) -> String {
        format!("{}: {:#}", self.username, self.source)
    }
}
