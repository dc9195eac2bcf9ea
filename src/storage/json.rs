//! JSON persistence for the deck set.
//! Saves go through a temporary file in the same directory followed by a rename,
//! so the previous store stays intact if writing fails.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::DeckSet;
use crate::models::learning_session::DeckSink;

/// Loads the deck set stored at `path`.
/// A missing file is an empty deck set; a file with invalid JSON is an error.
pub fn load_deck_set(path: &Path) -> Result<DeckSet> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No deck file at {}, starting empty", path.display());
            return Ok(DeckSet::default());
        }
        Err(e) => return Err(e.into()),
    };

    let decks: DeckSet = serde_json::from_str(&contents)?;
    tracing::info!(
        "Loaded {} decks from {}",
        decks.decks.len(),
        path.display()
    );
    Ok(decks)
}

/// Writes the deck set to `path` as pretty-printed JSON.
pub fn save_deck_set(path: &Path, decks: &DeckSet) -> Result<()> {
    let json_string = serde_json::to_string_pretty(decks)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path);
    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(json_string.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|_| fs::rename(&tmp_path, path)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::info!("Saved {} decks to {}", decks.decks.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "decks.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Deck sink writing to a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<DeckSet> {
        load_deck_set(&self.path)
    }
}

impl DeckSink for JsonFileSink {
    fn save(&mut self, decks: &DeckSet) -> Result<()> {
        save_deck_set(&self.path, decks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{Rating, Schedule};
    use tempfile::TempDir;

    fn create_test_decks() -> DeckSet {
        let mut decks = DeckSet::default();
        let polish = decks.get_or_create("Polish Vocabulary");
        polish.add_card("cześć", "hello");
        polish.add_card("do widzenia", "goodbye");
        polish.cards[1].apply(Rating::Suspend, "2024-05-01T18:00:00".parse().unwrap());
        decks.get_or_create("Empty");
        decks
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();

        let decks = load_deck_set(&dir.path().join("nope.json")).unwrap();
        assert!(decks.decks.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("decks.json");
        let decks = create_test_decks();

        save_deck_set(&path, &decks).unwrap();
        let loaded = load_deck_set(&path).unwrap();

        assert_eq!(loaded, decks);
        assert_eq!(
            loaded.get("Polish Vocabulary").unwrap().cards[1].schedule,
            Schedule::Suspended
        );
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_import_existing_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flashcards.json");
        fs::write(
            &path,
            r#"{
  "spanish": [
    {
      "front": "hola",
      "back": "hello",
      "interval_days": 99999,
      "easiness": 2.2,
      "last_review": "2023-11-02T07:45:12.551000",
      "reviews": 5
    }
  ]
}"#,
        )
        .unwrap();

        let decks = load_deck_set(&path).unwrap();

        let card = &decks.get("spanish").unwrap().cards[0];
        assert_eq!(card.front, "hola");
        assert_eq!(card.schedule, Schedule::Suspended);
        assert_eq!(card.reviews, 5);
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ this is not valid json }").unwrap();

        assert!(matches!(load_deck_set(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("decks.json");
        save_deck_set(&path, &create_test_decks()).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        // A directory where the temp file should go makes the write fail.
        fs::create_dir(temp_path(&path)).unwrap();
        let mut sink = JsonFileSink::new(&path);
        assert!(sink.save(&DeckSet::default()).is_err());

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_sink_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("decks.json"));
        let decks = create_test_decks();

        sink.save(&decks).unwrap();

        assert_eq!(sink.load().unwrap(), decks);
    }
}
