//! Server configuration from the environment.

use anyhow::Context;
use flashdrill_core::Settings;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// JSON word list replacing the bundled one.
    pub vocabulary_path: Option<PathBuf>,
    /// Countdown per card, in seconds.
    pub round_seconds: f64,
}

impl Config {
    /// Read `HOST`, `PORT`, `DATABASE_PATH`, `VOCABULARY_PATH` and
    /// `ROUND_SECONDS`, falling back to defaults for unset variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a port number, got {port:?}"))?,
            None => 3000,
        };
        let round_seconds = match var("ROUND_SECONDS") {
            Some(secs) => secs
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .with_context(|| format!("ROUND_SECONDS must be a positive number, got {secs:?}"))?,
            None => Settings::default().round_seconds,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_path: var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            vocabulary_path: var("VOCABULARY_PATH").map(PathBuf::from),
            round_seconds,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            round_seconds: self.round_seconds,
            ..Settings::default()
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashdrill")
        .join("flashdrill.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.round_seconds, 60.0);
        assert!(config.vocabulary_path.is_none());
        assert!(config.database_path.ends_with("flashdrill/flashdrill.db"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("DATABASE_PATH", "/tmp/drill.db"),
            ("VOCABULARY_PATH", "/tmp/words.json"),
            ("ROUND_SECONDS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.database_path, PathBuf::from("/tmp/drill.db"));
        assert_eq!(config.vocabulary_path, Some(PathBuf::from("/tmp/words.json")));
        assert_eq!(config.settings().round_seconds, 15.0);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("ROUND_SECONDS", "-3")])).is_err());
    }
}
