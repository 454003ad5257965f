use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://query.idleclans.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub timeout_secs: u64,
    pub demo: bool,
    pub state_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            demo: false,
            state_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = non_empty("IDLECLANS_API_BASE")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let timeout_secs = non_empty("IDLECLANS_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 60);
        let demo = non_empty("IDLECLANS_DEMO")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let state_dir = non_empty("IDLECLANS_STATE_DIR").map(PathBuf::from);

        Self {
            api_base,
            timeout_secs,
            demo,
            state_dir,
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn reads_and_clamps_values() {
        let cfg = config_from(&[
            ("IDLECLANS_API_BASE", " http://localhost:8080/api "),
            ("IDLECLANS_TIMEOUT_SECS", "600"),
            ("IDLECLANS_DEMO", "Yes"),
            ("IDLECLANS_STATE_DIR", "/tmp/ic"),
        ]);
        assert_eq!(cfg.api_base, "http://localhost:8080/api");
        assert_eq!(cfg.timeout_secs, 60);
        assert!(cfg.demo);
        assert_eq!(cfg.state_dir, Some(PathBuf::from("/tmp/ic")));
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        let cfg = config_from(&[("IDLECLANS_TIMEOUT_SECS", "soon")]);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
