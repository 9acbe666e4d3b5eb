use serde::{Deserialize, Serialize};
use std::fs;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_ENV: &str = "FAIRDEAL_CONFIG";

pub const MAX_DECKS: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub decks: usize,
    /// External fairness source: program followed by its arguments
    pub shuffle_cmd: Option<String>,
    pub shuffle_timeout_secs: u64,
    /// Keep a shoe until fewer cards remain; `None` reshuffles every round
    pub reshuffle_at: Option<usize>,
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
    pub decks: ValueSource,
    pub shuffle_cmd: ValueSource,
    pub shuffle_timeout_secs: ValueSource,
    pub reshuffle_at: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            decks: ValueSource::Default,
            shuffle_cmd: ValueSource::Default,
            shuffle_timeout_secs: ValueSource::Default,
            reshuffle_at: ValueSource::Default,
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
            decks: 1,
            shuffle_cmd: None,
            shuffle_timeout_secs: 30,
            reshuffle_at: None,
        }
    }
}

impl Config {
    /// Splits `shuffle_cmd` into the program and its arguments.
    pub fn shuffle_command(&self) -> Option<(String, Vec<String>)> {
        let cmd = self.shuffle_cmd.as_deref()?;
        let mut parts = cmd.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some((program, parts.collect()))
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

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.decks {
            cfg.decks = v;
            sources.decks = ValueSource::File;
        }
        if let Some(v) = f.shuffle_cmd {
            cfg.shuffle_cmd = Some(v);
            sources.shuffle_cmd = ValueSource::File;
        }
        if let Some(v) = f.shuffle_timeout_secs {
            cfg.shuffle_timeout_secs = v;
            sources.shuffle_timeout_secs = ValueSource::File;
        }
        if let Some(v) = f.reshuffle_at {
            cfg.reshuffle_at = Some(v);
            sources.reshuffle_at = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("FAIRDEAL_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(decks) = std::env::var("FAIRDEAL_DECKS")
        && !decks.is_empty()
    {
        cfg.decks = decks
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid decks".into()))?;
        sources.decks = ValueSource::Env;
    }
    if let Ok(cmd) = std::env::var("FAIRDEAL_SHUFFLE_CMD")
        && !cmd.is_empty()
    {
        cfg.shuffle_cmd = Some(cmd);
        sources.shuffle_cmd = ValueSource::Env;
    }
    if let Ok(secs) = std::env::var("FAIRDEAL_SHUFFLE_TIMEOUT_SECS")
        && !secs.is_empty()
    {
        cfg.shuffle_timeout_secs = secs
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid shuffle timeout".into()))?;
        sources.shuffle_timeout_secs = ValueSource::Env;
    }
    if let Ok(at) = std::env::var("FAIRDEAL_RESHUFFLE_AT")
        && !at.is_empty()
    {
        cfg.reshuffle_at = Some(
            at.parse()
                .map_err(|_| ConfigError::Invalid("Invalid reshuffle threshold".into()))?,
        );
        sources.reshuffle_at = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    decks: Option<usize>,
    #[serde(default)]
    shuffle_cmd: Option<String>,
    #[serde(default)]
    shuffle_timeout_secs: Option<u64>,
    #[serde(default)]
    reshuffle_at: Option<usize>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(1..=MAX_DECKS).contains(&cfg.decks) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: decks must be between 1 and {}",
            MAX_DECKS
        )));
    }
    if cfg.shuffle_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: shuffle_timeout_secs must be >=1".into(),
        ));
    }
    if cfg.shuffle_cmd.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ConfigError::Invalid(
            "Invalid configuration: shuffle_cmd must not be blank".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_deck_counts_outside_one_to_eight() {
        for decks in [0, 9] {
            let cfg = Config {
                decks,
                ..Config::default()
            };
            assert!(validate(&cfg).is_err(), "decks={}", decks);
        }
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = Config {
            shuffle_timeout_secs: 0,
            ..Config::default()
        };
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn splits_shuffle_command() {
        let cfg = Config {
            shuffle_cmd: Some("/usr/bin/shuffler --decks 2".into()),
            ..Config::default()
        };
        let (program, args) = cfg.shuffle_command().unwrap();
        assert_eq!(program, "/usr/bin/shuffler");
        assert_eq!(args, vec!["--decks", "2"]);
    }
}
