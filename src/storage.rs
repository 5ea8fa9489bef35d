//! The persistent preference store.
//!
//! Classifications, notes, filter selections, and view toggles live in a
//! flat key-value store with a documented key schema, JSON-encoded values,
//! and synchronous writes. The store sits behind the [`PrefStore`] trait so
//! tests swap in an in-memory fake; the shipped backend is a single JSON
//! file. Export and import move a subset of the keys through a versioned
//! document; import overwrites only the keys present in the document and
//! finishes with a full state reload.

use anyhow::{bail, Context};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::catchments::CatchmentVisibility;
use crate::data::property::Classification;
use crate::filter::{ClassificationFilter, FilterCriteria};

// Key schema /////////////////////////////////////////////////////////////////
// Used both in the store file and in export/import documents.

pub const PROPERTY_CLASSIFICATIONS_KEY: &str = "property-classifications";
pub const PROPERTY_NOTES_KEY: &str = "property-notes";
pub const FILTER_CLASSIFICATION_SELECTION_KEY: &str = "filter-classification-selection";
pub const FILTER_PRICE_MIN_KEY: &str = "filter-price-min";
pub const FILTER_PRICE_MAX_KEY: &str = "filter-price-max";
pub const SHOW_PRIMARY_CATCHMENT_AREAS_KEY: &str = "show-primary-catchment-areas";
pub const SHOW_SECONDARY_CATCHMENT_AREAS_KEY: &str = "show-secondary-catchment-areas";
pub const CENTRE_MAP_ON_SELECTED_PROPERTY_KEY: &str = "centre-map-on-selected-property";

/// Every key that participates in export and import.
pub const STORAGE_KEYS: [&str; 8] = [
    PROPERTY_CLASSIFICATIONS_KEY,
    PROPERTY_NOTES_KEY,
    FILTER_CLASSIFICATION_SELECTION_KEY,
    FILTER_PRICE_MIN_KEY,
    FILTER_PRICE_MAX_KEY,
    SHOW_PRIMARY_CATCHMENT_AREAS_KEY,
    SHOW_SECONDARY_CATCHMENT_AREAS_KEY,
    CENTRE_MAP_ON_SELECTED_PROPERTY_KEY,
];

const APP_VERSION_FIELD: &str = "appVersion";
const EXPORTED_AT_FIELD: &str = "exportedAt";

// Store backends /////////////////////////////////////////////////////////////

/// Raw key-value access over JSON-encoded values. Writes are synchronous;
/// concurrent writers to the same backing file are last-writer-wins.
pub trait PrefStore: Send + Sync + 'static {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn set_raw(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

/// In-memory store for tests and as the fallback when the prefs file cannot
/// be opened.
#[derive(Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl PrefStore for MemoryPrefs {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
    fn set_raw(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// File-backed store: one JSON object, decoded values, rewritten on every
/// mutation.
pub struct FilePrefs {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FilePrefs {
    /// Opens the store, starting empty when the file does not exist yet.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => {
                let decoded: serde_json::Map<String, serde_json::Value> =
                    serde_json::from_str(&text)
                        .with_context(|| format!("corrupt prefs file {}", path.display()))?;
                decoded
                    .into_iter()
                    .map(|(key, value)| (key, value.to_string()))
                    .collect()
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("cannot read prefs file {}", path.display()));
            }
        };
        Ok(Self { path, values })
    }

    fn persist(&self) {
        let mut decoded = serde_json::Map::new();
        for (key, value) in &self.values {
            match serde_json::from_str(value) {
                Ok(parsed) => {
                    decoded.insert(key.clone(), parsed);
                }
                Err(err) => log::warn!("skipping unencodable pref {key}: {err}"),
            }
        }
        let text = serde_json::to_string_pretty(&serde_json::Value::Object(decoded))
            .unwrap_or_else(|_| "{}".to_string());
        if let Err(err) = std::fs::write(&self.path, text) {
            log::error!("failed to write prefs file {}: {err}", self.path.display());
        }
    }
}

impl PrefStore for FilePrefs {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
    fn set_raw(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.persist();
    }
    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.persist();
    }
}

// Typed access ///////////////////////////////////////////////////////////////

/// The app-wide preference store resource.
#[derive(Resource)]
pub struct Prefs {
    store: Box<dyn PrefStore>,
}

impl Prefs {
    pub fn new(store: impl PrefStore) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("ignoring malformed stored value for {key}: {err}");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(encoded) => self.store.set_raw(key, encoded),
            Err(err) => log::error!("cannot encode value for {key}: {err}"),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.store.remove(key);
    }

    /// Builds the export document: version, timestamp, and every storage
    /// key currently present.
    pub fn export_document(&self, exported_at: DateTime<Utc>) -> serde_json::Value {
        let mut doc = serde_json::Map::new();
        doc.insert(
            APP_VERSION_FIELD.into(),
            serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
        );
        doc.insert(
            EXPORTED_AT_FIELD.into(),
            serde_json::Value::String(exported_at.to_rfc3339()),
        );
        for key in STORAGE_KEYS {
            if let Some(raw) = self.store.get_raw(key) {
                match serde_json::from_str(&raw) {
                    Ok(value) => {
                        doc.insert(key.into(), value);
                    }
                    Err(err) => log::warn!("skipping unexportable pref {key}: {err}"),
                }
            }
        }
        serde_json::Value::Object(doc)
    }

    /// Writes the export document next to the working directory and returns
    /// the file name.
    pub fn export_to_file(&self, exported_at: DateTime<Utc>) -> anyhow::Result<String> {
        let name = export_file_name(exported_at);
        let doc = self.export_document(exported_at);
        std::fs::write(&name, serde_json::to_string_pretty(&doc)?)
            .with_context(|| format!("cannot write {name}"))?;
        Ok(name)
    }

    /// Applies an export document: every storage key present in the
    /// document overwrites the stored value; absent keys are left
    /// untouched. A malformed document aborts before any write.
    pub fn import_document(&mut self, json: &str) -> anyhow::Result<Vec<&'static str>> {
        let parsed: serde_json::Value =
            serde_json::from_str(json).context("import file is not valid JSON")?;
        let Some(doc) = parsed.as_object() else {
            bail!("import file is not a JSON object");
        };
        let mut applied = Vec::new();
        for key in STORAGE_KEYS {
            if let Some(value) = doc.get(key) {
                self.store.set_raw(key, value.to_string());
                applied.push(key);
            }
        }
        Ok(applied)
    }
}

/// Export file name carrying a filesystem-safe timestamp.
pub fn export_file_name(exported_at: DateTime<Utc>) -> String {
    format!(
        "perch-data-{}.json",
        exported_at.format("%Y-%m-%d-%H-%M-%S")
    )
}

// Stored state resources /////////////////////////////////////////////////////

/// The user's classification assignments, keyed by property id.
#[derive(Resource, Debug, Default)]
pub struct Classifications {
    pub map: HashMap<String, Classification>,
}

impl Classifications {
    /// The effective classification for a property; unrecorded means
    /// unclassified.
    pub fn get(&self, id: &str) -> Classification {
        self.map.get(id).copied().unwrap_or_default()
    }
}

/// Free-text notes, keyed by property id.
#[derive(Resource, Debug, Default)]
pub struct Notes {
    pub map: HashMap<String, String>,
}

/// Whether selecting a property also centres the map on it.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CentreOnSelect(pub bool);

impl Default for CentreOnSelect {
    fn default() -> Self {
        // On by default, matching the settings panel.
        Self(true)
    }
}

/// Fired after an import so every pref-derived resource rebuilds, the
/// in-process analog of a full page reload.
#[derive(Event)]
pub struct PrefsReloaded;

/// Reads every pref-derived resource out of the store.
pub fn load_stored_state(
    prefs: &Prefs,
) -> (
    Classifications,
    Notes,
    FilterCriteria,
    CatchmentVisibility,
    CentreOnSelect,
) {
    let classifications = Classifications {
        map: prefs
            .get::<HashMap<String, Classification>>(PROPERTY_CLASSIFICATIONS_KEY)
            .unwrap_or_default(),
    };
    let notes = Notes {
        map: prefs
            .get::<HashMap<String, String>>(PROPERTY_NOTES_KEY)
            .unwrap_or_default(),
    };
    let classification_filter = prefs
        .get::<String>(FILTER_CLASSIFICATION_SELECTION_KEY)
        .and_then(|key| ClassificationFilter::from_key(&key))
        .unwrap_or_default();
    let criteria = FilterCriteria {
        classification: classification_filter,
        min_price: prefs.get::<i64>(FILTER_PRICE_MIN_KEY),
        max_price: prefs.get::<i64>(FILTER_PRICE_MAX_KEY),
    };
    let visibility = CatchmentVisibility {
        primary: prefs
            .get::<bool>(SHOW_PRIMARY_CATCHMENT_AREAS_KEY)
            .unwrap_or(false),
        secondary: prefs
            .get::<bool>(SHOW_SECONDARY_CATCHMENT_AREAS_KEY)
            .unwrap_or(false),
    };
    let centre = CentreOnSelect(
        prefs
            .get::<bool>(CENTRE_MAP_ON_SELECTED_PROPERTY_KEY)
            .unwrap_or(true),
    );
    (classifications, notes, criteria, visibility, centre)
}

// Persistence systems ////////////////////////////////////////////////////////

pub fn persist_classifications(
    classifications: Res<Classifications>,
    mut prefs: ResMut<Prefs>,
) {
    if classifications.is_changed() && !classifications.is_added() {
        prefs.set(PROPERTY_CLASSIFICATIONS_KEY, &classifications.map);
    }
}

pub fn persist_notes(notes: Res<Notes>, mut prefs: ResMut<Prefs>) {
    if notes.is_changed() && !notes.is_added() {
        prefs.set(PROPERTY_NOTES_KEY, &notes.map);
    }
}

pub fn persist_filter_criteria(criteria: Res<FilterCriteria>, mut prefs: ResMut<Prefs>) {
    if !criteria.is_changed() || criteria.is_added() {
        return;
    }
    prefs.set(
        FILTER_CLASSIFICATION_SELECTION_KEY,
        &criteria.classification.key(),
    );
    match criteria.min_price {
        Some(min) => prefs.set(FILTER_PRICE_MIN_KEY, &min),
        None => prefs.remove(FILTER_PRICE_MIN_KEY),
    }
    match criteria.max_price {
        Some(max) => prefs.set(FILTER_PRICE_MAX_KEY, &max),
        None => prefs.remove(FILTER_PRICE_MAX_KEY),
    }
}

pub fn persist_view_toggles(
    visibility: Res<CatchmentVisibility>,
    centre: Res<CentreOnSelect>,
    mut prefs: ResMut<Prefs>,
) {
    if visibility.is_changed() && !visibility.is_added() {
        prefs.set(SHOW_PRIMARY_CATCHMENT_AREAS_KEY, &visibility.primary);
        prefs.set(SHOW_SECONDARY_CATCHMENT_AREAS_KEY, &visibility.secondary);
    }
    if centre.is_changed() && !centre.is_added() {
        prefs.set(CENTRE_MAP_ON_SELECTED_PROPERTY_KEY, &centre.0);
    }
}

/// Rebuilds every pref-derived resource after an import.
pub fn reload_after_import(
    mut events: EventReader<PrefsReloaded>,
    prefs: Res<Prefs>,
    mut classifications: ResMut<Classifications>,
    mut notes: ResMut<Notes>,
    mut criteria: ResMut<FilterCriteria>,
    mut visibility: ResMut<CatchmentVisibility>,
    mut centre: ResMut<CentreOnSelect>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();
    let (new_classifications, new_notes, new_criteria, new_visibility, new_centre) =
        load_stored_state(&prefs);
    *classifications = new_classifications;
    *notes = new_notes;
    *criteria = new_criteria;
    *visibility = new_visibility;
    *centre = new_centre;
    info!("preferences reloaded from store");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seeded_prefs() -> Prefs {
        let mut prefs = Prefs::new(MemoryPrefs::default());
        let mut classifications = HashMap::new();
        classifications.insert("p-1".to_string(), Classification::Shortlist);
        classifications.insert("p-2".to_string(), Classification::Reject);
        prefs.set(PROPERTY_CLASSIFICATIONS_KEY, &classifications);
        let mut notes = HashMap::new();
        notes.insert("p-1".to_string(), "viewed twice, nice garden".to_string());
        prefs.set(PROPERTY_NOTES_KEY, &notes);
        prefs.set(FILTER_CLASSIFICATION_SELECTION_KEY, &"shortlist");
        prefs.set(SHOW_PRIMARY_CATCHMENT_AREAS_KEY, &true);
        prefs.set(CENTRE_MAP_ON_SELECTED_PROPERTY_KEY, &false);
        prefs
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn export_then_import_reproduces_the_store() {
        let prefs = seeded_prefs();
        let doc = prefs.export_document(stamp());
        let text = serde_json::to_string(&doc).unwrap();

        let mut restored = Prefs::new(MemoryPrefs::default());
        let applied = restored.import_document(&text).expect("import should apply");
        assert!(applied.contains(&PROPERTY_CLASSIFICATIONS_KEY));
        assert!(applied.contains(&PROPERTY_NOTES_KEY));

        let original: HashMap<String, Classification> =
            prefs.get(PROPERTY_CLASSIFICATIONS_KEY).unwrap();
        let round_tripped: HashMap<String, Classification> =
            restored.get(PROPERTY_CLASSIFICATIONS_KEY).unwrap();
        assert_eq!(original, round_tripped);
        assert_eq!(
            restored.get::<HashMap<String, String>>(PROPERTY_NOTES_KEY),
            prefs.get::<HashMap<String, String>>(PROPERTY_NOTES_KEY)
        );
        assert_eq!(restored.get::<bool>(SHOW_PRIMARY_CATCHMENT_AREAS_KEY), Some(true));
        assert_eq!(
            restored.get::<bool>(CENTRE_MAP_ON_SELECTED_PROPERTY_KEY),
            Some(false)
        );
    }

    #[test]
    fn export_document_carries_version_and_timestamp() {
        let prefs = seeded_prefs();
        let doc = prefs.export_document(stamp());
        assert_eq!(
            doc[APP_VERSION_FIELD],
            serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string())
        );
        assert!(doc[EXPORTED_AT_FIELD]
            .as_str()
            .unwrap()
            .starts_with("2026-08-06T12:00:00"));
    }

    #[test]
    fn import_overwrites_present_keys_and_leaves_absent_keys_alone() {
        let mut prefs = seeded_prefs();
        // A document carrying only classifications: notes and toggles must
        // survive untouched.
        let partial = r#"{
            "appVersion": "0.1.0",
            "exportedAt": "2026-01-01T00:00:00Z",
            "property-classifications": {"p-9": "shortlist"}
        }"#;
        let applied = prefs.import_document(partial).expect("import should apply");
        assert_eq!(applied, vec![PROPERTY_CLASSIFICATIONS_KEY]);

        let classifications: HashMap<String, Classification> =
            prefs.get(PROPERTY_CLASSIFICATIONS_KEY).unwrap();
        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications["p-9"], Classification::Shortlist);
        let notes: HashMap<String, String> = prefs.get(PROPERTY_NOTES_KEY).unwrap();
        assert_eq!(notes["p-1"], "viewed twice, nice garden");
    }

    #[test]
    fn malformed_import_applies_nothing() {
        let mut prefs = seeded_prefs();
        assert!(prefs.import_document("not json at all").is_err());
        assert!(prefs.import_document("[1, 2, 3]").is_err());
        let classifications: HashMap<String, Classification> =
            prefs.get(PROPERTY_CLASSIFICATIONS_KEY).unwrap();
        assert_eq!(classifications.len(), 2, "failed import must not write");
    }

    #[test]
    fn export_file_name_is_filesystem_safe() {
        let name = export_file_name(stamp());
        assert_eq!(name, "perch-data-2026-08-06-12-00-00.json");
        assert!(!name.contains(':'));
    }

    #[test]
    fn stored_state_defaults_when_store_is_empty() {
        let prefs = Prefs::new(MemoryPrefs::default());
        let (classifications, notes, criteria, visibility, centre) = load_stored_state(&prefs);
        assert!(classifications.map.is_empty());
        assert!(notes.map.is_empty());
        assert_eq!(criteria, FilterCriteria::default());
        assert!(!visibility.primary && !visibility.secondary);
        assert!(centre.0, "centre-on-select defaults to on");
    }
}
