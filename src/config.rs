//! Runtime configuration read from the environment.

/// Default number of further participants examined to avoid a repeat pairing.
pub const DEFAULT_PAIRING_LOOKAHEAD: usize = 3;

/// Engine-facing settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub pairing_lookahead: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pairing_lookahead: DEFAULT_PAIRING_LOOKAHEAD,
        }
    }
}

/// Server settings: HOST (default 0.0.0.0), PORT (default 8080),
/// PAIRING_LOOKAHEAD (default 3).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        let port = parse_or(&lookup, "PORT", defaults.port);
        let pairing_lookahead =
            parse_or(&lookup, "PAIRING_LOOKAHEAD", defaults.engine.pairing_lookahead);
        Self {
            host,
            port,
            engine: EngineConfig { pairing_lookahead },
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid {key}={raw:?}");
            default
        }),
        None => default,
    }
}
