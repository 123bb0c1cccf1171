//! Layered CLI configuration: defaults, then a TOML file named by
//! `UNO_CONFIG`, then `UNO_*` environment variables. Command-line flags are
//! applied on top by each command.

use serde::{Deserialize, Serialize};
use std::fs;

use uno_engine::game::DEFAULT_TARGET_SCORE;
use uno_engine::round::{DEFAULT_CARDS_PER_PLAYER, MAX_DEALT_CARDS, MAX_PLAYERS, MIN_PLAYERS};

pub const CONFIG_ENV: &str = "UNO_CONFIG";
pub const MAX_CARDS_PER_PLAYER: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub players: usize,
    pub target_score: u32,
    pub cards_per_player: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub players: ValueSource,
    pub target_score: ValueSource,
    pub cards_per_player: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            players: ValueSource::Default,
            target_score: ValueSource::Default,
            cards_per_player: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            players: 4,
            target_score: DEFAULT_TARGET_SCORE,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

impl Config {
    /// Apply command-line flags on top of the resolved values.
    pub fn with_overrides(
        mut self,
        seed: Option<u64>,
        players: Option<usize>,
        target_score: Option<u32>,
        cards_per_player: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(v) = players {
            self.players = v;
        }
        if let Some(v) = target_score {
            self.target_score = v;
        }
        if let Some(v) = cards_per_player {
            self.cards_per_player = v;
        }
        validate(&self)?;
        Ok(self)
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolve configuration with `env` standing in for the process environment.
pub fn resolve<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Some(path) = env(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.players {
            cfg.players = v;
            sources.players = ValueSource::File;
        }
        if let Some(v) = f.target_score {
            cfg.target_score = v;
            sources.target_score = ValueSource::File;
        }
        if let Some(v) = f.cards_per_player {
            cfg.cards_per_player = v;
            sources.cards_per_player = ValueSource::File;
        }
    }

    if let Some(seed) = env("UNO_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed: {}", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(players) = env("UNO_PLAYERS")
        && !players.is_empty()
    {
        cfg.players = players
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid players: {}", players)))?;
        sources.players = ValueSource::Env;
    }
    if let Some(target) = env("UNO_TARGET_SCORE")
        && !target.is_empty()
    {
        cfg.target_score = target
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid target_score: {}", target)))?;
        sources.target_score = ValueSource::Env;
    }
    if let Some(cards) = env("UNO_CARDS_PER_PLAYER")
        && !cards.is_empty()
    {
        cfg.cards_per_player = cards
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid cards_per_player: {}", cards)))?;
        sources.cards_per_player = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    players: Option<usize>,
    #[serde(default)]
    target_score: Option<u32>,
    #[serde(default)]
    cards_per_player: Option<usize>,
}

/// Range checks shared by the resolved config and command-line overrides.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&cfg.players) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: players must be between {} and {}",
            MIN_PLAYERS, MAX_PLAYERS
        )));
    }
    if cfg.target_score == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: target_score must be >0".into(),
        ));
    }
    if !(1..=MAX_CARDS_PER_PLAYER).contains(&cfg.cards_per_player) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: cards_per_player must be between 1 and {}",
            MAX_CARDS_PER_PLAYER
        )));
    }
    if cfg.players * cfg.cards_per_player > MAX_DEALT_CARDS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: cannot deal {} cards to {} players (at most {} cards in hands)",
            cfg.cards_per_player, cfg.players, MAX_DEALT_CARDS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let resolved = resolve(env_of(&[])).unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources.seed, ValueSource::Default);
        assert_eq!(resolved.config.target_score, 500);
        assert_eq!(resolved.config.cards_per_player, 7);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uno.toml");
        fs::write(&path, "seed = 7\nplayers = 3\ntarget_score = 200\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let env = env_of(&[(CONFIG_ENV, path.as_str()), ("UNO_SEED", "99")]);
        let resolved = resolve(env).unwrap();
        assert_eq!(resolved.config.seed, Some(99));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.players, 3);
        assert_eq!(resolved.sources.players, ValueSource::File);
        assert_eq!(resolved.config.target_score, 200);
        assert_eq!(resolved.sources.target_score, ValueSource::File);
        assert_eq!(resolved.sources.cards_per_player, ValueSource::Default);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let resolved = resolve(env_of(&[("UNO_SEED", ""), ("UNO_PLAYERS", "")])).unwrap();
        assert_eq!(resolved.config.seed, None);
        assert_eq!(resolved.sources.players, ValueSource::Default);
    }

    #[test]
    fn test_rejects_unparseable_and_out_of_range_values() {
        assert!(matches!(
            resolve(env_of(&[("UNO_SEED", "abc")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            resolve(env_of(&[("UNO_TARGET_SCORE", "0")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            resolve(env_of(&[("UNO_PLAYERS", "11")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            resolve(env_of(&[("UNO_CARDS_PER_PLAYER", "16")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_deal_must_fit_the_deck() {
        let full = resolve(env_of(&[
            ("UNO_PLAYERS", "9"),
            ("UNO_CARDS_PER_PLAYER", "11"),
        ]))
        .unwrap();
        assert_eq!(full.config.players * full.config.cards_per_player, 99);
        assert!(matches!(
            resolve(env_of(&[("UNO_PLAYERS", "10"), ("UNO_CARDS_PER_PLAYER", "10")])),
            Err(ConfigError::Invalid(_))
        ));
        let base = Config {
            cards_per_player: 15,
            ..Config::default()
        };
        assert!(matches!(
            base.with_overrides(None, Some(7), None, None),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_flags_override_resolved_values() {
        let base = Config {
            seed: Some(1),
            ..Config::default()
        };
        let cfg = base
            .clone()
            .with_overrides(None, Some(2), Some(150), None)
            .unwrap();
        assert_eq!(cfg.seed, Some(1));
        assert_eq!(cfg.players, 2);
        assert_eq!(cfg.target_score, 150);
        assert_eq!(cfg.cards_per_player, 7);
        assert!(base.with_overrides(None, Some(1), None, None).is_err());
    }

    #[test]
    fn test_missing_and_malformed_files() {
        assert!(matches!(
            resolve(env_of(&[(CONFIG_ENV, "/nonexistent/uno.toml")])),
            Err(ConfigError::Io(_))
        ));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "players = \"many\"\n").unwrap();
        let path = path.to_string_lossy().into_owned();
        assert!(matches!(
            resolve(env_of(&[(CONFIG_ENV, path.as_str())])),
            Err(ConfigError::Parse(_))
        ));
    }
}
