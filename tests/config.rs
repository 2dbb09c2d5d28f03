//! Environment configuration.

use std::collections::HashMap;
use swiss_tournament::config::DEFAULT_PAIRING_LOOKAHEAD;
use swiss_tournament::Config;

fn from(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_unset() {
    let config = from(&[]);
    assert_eq!(config, Config::default());
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.engine.pairing_lookahead, DEFAULT_PAIRING_LOOKAHEAD);
}

#[test]
fn reads_overrides() {
    let config = from(&[("HOST", "127.0.0.1"), ("PORT", "9000"), ("PAIRING_LOOKAHEAD", "5")]);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.engine.pairing_lookahead, 5);
}

#[test]
fn invalid_values_fall_back_to_defaults() {
    let config = from(&[("HOST", "  "), ("PORT", "eighty"), ("PAIRING_LOOKAHEAD", "-1")]);
    assert_eq!(config, Config::default());
}
