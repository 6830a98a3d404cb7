// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Persisted user preferences.
//!
//! Settings are stored as one JSON object under [`SETTINGS_KEY`]:
//!
//! ```json
//! { "lang": "sv", "location": { "name": "Stockholm", "latitude": 59.3293, "longitude": 18.0686, "elevation": 0 } }
//! ```
//!
//! Reading is lenient: an unknown language reads as Swedish, a location
//! whose latitude is not a number reads as the default location, and an
//! unreadable store reads as the defaults altogether.

use crate::coordinates::{GeoCoordinate, Location};
use crate::error::SettingsError;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key the settings object is stored under.
pub const SETTINGS_KEY: &str = "thelema_settings_v4";

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Sv,
    En,
}

impl Language {
    /// `"en"` is English; anything else is Swedish.
    pub fn parse_lenient(code: &str) -> Self {
        if code == "en" {
            Language::En
        } else {
            Language::Sv
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Sv => "sv",
            Language::En => "en",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::Sv => Language::En,
            Language::En => Language::Sv,
        }
    }
}

/// Key-value persistence for JSON documents.
pub trait SettingsStore {
    /// The document under `key`, `None` if nothing was stored.
    fn load(&self, key: &str) -> Result<Option<Value>, SettingsError>;

    fn save(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// A single JSON file holding an object of key → document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, SettingsError> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        // A corrupt file is replaced rather than blocking every later save.
        let mut all = self.read_all().unwrap_or_else(|e| {
            log::warn!("discarding unreadable {}: {e}", self.path.display());
            Map::new()
        });
        all.insert(key.to_owned(), value);
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(all))?)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct StoredLocation {
    #[serde(default)]
    name: Option<String>,
    latitude: f64,
    #[serde(default)]
    longitude: f64,
    #[serde(default)]
    elevation: f64,
}

/// Language and observer location.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub lang: Language,
    pub location: Location,
}

impl Settings {
    /// Read a stored settings document, substituting defaults for anything
    /// unrecognised.
    pub fn from_json(value: &Value) -> Self {
        let lang = value
            .get("lang")
            .and_then(Value::as_str)
            .map(Language::parse_lenient)
            .unwrap_or_default();
        let location = value
            .get("location")
            .filter(|loc| loc.get("latitude").is_some_and(Value::is_number))
            .and_then(|loc| StoredLocation::deserialize(loc).ok())
            .map(|s| {
                Location::new(
                    s.name.unwrap_or_else(|| Location::LOCAL_NAME.to_owned()),
                    GeoCoordinate::new(s.latitude, s.longitude, s.elevation),
                )
            })
            .unwrap_or_default();
        Self { lang, location }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "lang": self.lang.code(),
            "location": self.location,
        })
    }

    /// Load from `store`, falling back to the defaults on any failure.
    pub fn load_or_default<S: SettingsStore + ?Sized>(store: &S) -> Self {
        match store.load(SETTINGS_KEY) {
            Ok(Some(value)) => Self::from_json(&value),
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("settings unreadable, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: SettingsStore + ?Sized>(&self, store: &mut S) -> Result<(), SettingsError> {
        store.save(SETTINGS_KEY, self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let s = Settings::load_or_default(&MemoryStore::new());
        assert_eq!(s.lang, Language::Sv);
        assert_eq!(s.location, Location::stockholm());
    }

    #[test]
    fn language_parsing_and_toggle() {
        assert_eq!(Language::parse_lenient("en"), Language::En);
        assert_eq!(Language::parse_lenient("EN"), Language::Sv);
        assert_eq!(Language::parse_lenient("de"), Language::Sv);
        assert_eq!(Language::Sv.toggle(), Language::En);
        assert_eq!(Language::En.toggle().toggle(), Language::En);
    }

    #[test]
    fn lenient_reading() {
        let s = Settings::from_json(&json!({ "lang": 5, "location": { "latitude": "north" } }));
        assert_eq!(s, Settings::default());

        let s = Settings::from_json(&json!({ "lang": "en", "location": null }));
        assert_eq!(s.lang, Language::En);
        assert_eq!(s.location, Location::stockholm());

        let s = Settings::from_json(&json!("not an object"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn location_without_name_or_elevation() {
        let s = Settings::from_json(&json!({ "location": { "latitude": 48.85, "longitude": 2.35 } }));
        assert_eq!(s.location.name, Location::LOCAL_NAME);
        assert_eq!(s.location.coordinate, GeoCoordinate::new(48.85, 2.35, 0.0));
    }

    #[test]
    fn memory_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            lang: Language::En,
            location: Location::new("Cefalù", GeoCoordinate::new(38.04, 14.02, 30.0)),
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load_or_default(&store), settings);
        assert_eq!(store.load(SETTINGS_KEY).unwrap().unwrap()["lang"], "en");
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));
        assert_eq!(store.load(SETTINGS_KEY).unwrap(), None);

        let settings = Settings {
            lang: Language::En,
            location: Location::stockholm(),
        };
        settings.save(&mut store).unwrap();
        store.save("other", json!(1)).unwrap();

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(Settings::load_or_default(&reopened), settings);
        assert_eq!(reopened.load("other").unwrap(), Some(json!(1)));
    }

    #[test]
    fn corrupt_file_reads_as_defaults_and_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(SETTINGS_KEY), Err(SettingsError::Json(_))));
        assert_eq!(Settings::load_or_default(&store), Settings::default());

        Settings::default().save(&mut store).unwrap();
        assert_eq!(Settings::load_or_default(&store), Settings::default());
    }
}
