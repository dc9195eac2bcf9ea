//! Application configuration.
//!
//! The deck file is resolved with priority: `--deck-file` > `FLASHCARDS_FILE` (env or `.env`)
//! > `flashcards.toml` > `~/.flashcards.json`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::session::DEFAULT_SESSION_SIZE;

pub const CONFIG_FILE: &str = "flashcards.toml";
pub const DECK_FILE_ENV: &str = "FLASHCARDS_FILE";
pub const DEFAULT_DECK_FILE_NAME: &str = ".flashcards.json";

/// Contents of `flashcards.toml`
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub deck_file: Option<PathBuf>,
    pub session_size: Option<usize>,
}

impl FileConfig {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads the config file if it exists.
    pub fn read(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub deck_file: PathBuf,
    pub session_size: usize,
}

impl Config {
    /// Combines every configuration source.
    pub fn resolve(
        flag: Option<PathBuf>,
        env: Option<PathBuf>,
        file: FileConfig,
        home: Option<PathBuf>,
    ) -> Self {
        let deck_file = flag
            .or(env)
            .or(file.deck_file)
            .unwrap_or_else(|| home.unwrap_or_default().join(DEFAULT_DECK_FILE_NAME));

        Self {
            deck_file,
            session_size: file.session_size.unwrap_or(DEFAULT_SESSION_SIZE),
        }
    }

    /// Loads configuration from the environment, `.env` and `flashcards.toml`
    /// in the current directory.
    pub fn load(deck_file_flag: Option<PathBuf>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let env = std::env::var_os(DECK_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let file = FileConfig::read(Path::new(CONFIG_FILE))?;
        let config = Self::resolve(deck_file_flag, env, file, dirs::home_dir());

        tracing::info!("Using deck file {}", config.deck_file.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/learner"))
    }

    #[test]
    fn test_default_in_home() {
        let config = Config::resolve(None, None, FileConfig::default(), home());

        assert_eq!(
            config.deck_file,
            PathBuf::from("/home/learner/.flashcards.json")
        );
        assert_eq!(config.session_size, 10);
    }

    #[test]
    fn test_no_home_uses_current_dir() {
        let config = Config::resolve(None, None, FileConfig::default(), None);
        assert_eq!(config.deck_file, PathBuf::from(".flashcards.json"));
    }

    #[test]
    fn test_priority() {
        let file = || FileConfig {
            deck_file: Some("from_toml.json".into()),
            session_size: Some(25),
        };

        let config = Config::resolve(
            Some("flag.json".into()),
            Some("env.json".into()),
            file(),
            home(),
        );
        assert_eq!(config.deck_file, PathBuf::from("flag.json"));
        assert_eq!(config.session_size, 25);

        let config = Config::resolve(None, Some("env.json".into()), file(), home());
        assert_eq!(config.deck_file, PathBuf::from("env.json"));

        let config = Config::resolve(None, None, file(), home());
        assert_eq!(config.deck_file, PathBuf::from("from_toml.json"));
    }

    #[test]
    fn test_parse_file_config() {
        let parsed = FileConfig::parse("deck_file = \"/data/cards.json\"\nsession_size = 5\n").unwrap();
        assert_eq!(
            parsed,
            FileConfig {
                deck_file: Some("/data/cards.json".into()),
                session_size: Some(5),
            }
        );

        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
        assert!(matches!(
            FileConfig::parse("session_size = \"many\""),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(
            FileConfig::read(&dir.path().join(CONFIG_FILE)).unwrap(),
            FileConfig::default()
        );
    }
}
