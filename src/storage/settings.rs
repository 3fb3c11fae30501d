use crate::bridge::Bridge;
use crate::config::{Config, SETTINGS_FILE};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{what} is not a JSON object")]
    NotAnObject { what: &'static str },
}

/// Single source of truth for user preferences, backed by one JSON file.
///
/// The document is loaded lazily on first mutation, held in memory for the
/// process lifetime, and flushed to disk synchronously after every change.
/// Every successful mutation also pushes the serialized document to the
/// bridge, so disk, memory, and the host side stay consistent copies.
pub struct SettingsStore {
    config: Config,
    bridge: Rc<dyn Bridge>,
    document: Option<Map<String, Value>>,
}

impl SettingsStore {
    pub fn new(config: Config, bridge: Rc<dyn Bridge>) -> Self {
        Self {
            config,
            bridge,
            document: None,
        }
    }

    /// Read a file under the data directory and return its text with
    /// newlines stripped. A missing file is created empty (along with the
    /// data directory) and reads back as the literal `"{}"`.
    ///
    /// Pure with respect to the in-memory document; use `load_document` to
    /// refresh store state.
    pub fn read_raw_text(&self, name: &str) -> Result<String, StoreError> {
        let path = self.config.data_dir.join(name);
        if !path.exists() {
            debug!(file = name, "file does not exist, creating");
            // best effort, the file creation below reports real failures
            let _ = fs::create_dir_all(&self.config.data_dir);
            fs::File::create(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        }
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        // the file holds one JSON document; newlines carry no meaning
        let joined: String = text.lines().collect();
        if joined.is_empty() {
            Ok("{}".to_string())
        } else {
            Ok(joined)
        }
    }

    /// Re-read `settings.json` and replace the in-memory document.
    ///
    /// On parse failure the previous document is left untouched.
    pub fn load_document(&mut self) -> Result<(), StoreError> {
        let text = self.read_raw_text(SETTINGS_FILE)?;
        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Parse {
            what: "settings document",
            source,
        })?;
        match value {
            Value::Object(map) => {
                self.document = Some(map);
                Ok(())
            }
            _ => Err(StoreError::NotAnObject {
                what: "settings document",
            }),
        }
    }

    /// Serialize `document` compactly and write it under the data directory.
    ///
    /// The bytes go to a uniquely named sibling first and are renamed into
    /// place, so a crash mid-write cannot leave a truncated file behind.
    pub fn write_file<T: Serialize>(&self, name: &str, document: &T) -> Result<(), StoreError> {
        let path = self.config.data_dir.join(name);
        let text = serde_json::to_string(document).map_err(|source| StoreError::Parse {
            what: "document to write",
            source,
        })?;

        let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, &text).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            StoreError::Io {
                path: path.clone(),
                source,
            }
        })?;
        Ok(())
    }

    /// Set or create one preference and persist the updated document.
    ///
    /// `"true"` and `"false"` are coerced to JSON booleans. With `fence` the
    /// value must itself parse as a JSON object (the geofence polygon);
    /// anything else is stored as a JSON string. On any failure no observable
    /// state changes: disk is written before memory is committed.
    pub fn set_setting(&mut self, key: &str, value: &str, fence: bool) -> Result<(), StoreError> {
        if self.document.is_none() {
            self.load_document()?;
        }

        let json_value = if value == "true" {
            Value::Bool(true)
        } else if value == "false" {
            Value::Bool(false)
        } else if fence {
            let parsed: Value = serde_json::from_str(value).map_err(|source| StoreError::Parse {
                what: "fence value",
                source,
            })?;
            if !parsed.is_object() {
                return Err(StoreError::NotAnObject {
                    what: "fence value",
                });
            }
            parsed
        } else {
            Value::String(value.to_string())
        };

        let mut updated = self.document.clone().unwrap_or_default();
        updated.insert(key.to_string(), json_value);

        self.write_file(SETTINGS_FILE, &updated)?;
        let blob = serde_json::to_string(&updated).map_err(|source| StoreError::Parse {
            what: "settings document",
            source,
        })?;
        self.bridge.push_settings(&blob);
        self.document = Some(updated);
        Ok(())
    }

    /// Flat boolean projection of the in-memory document over the exposed
    /// key list. Absent or non-boolean entries read as `false`; string- and
    /// object-valued preferences are invisible here.
    pub fn get_settings(&self) -> BTreeMap<String, bool> {
        let mut map = BTreeMap::new();
        for key in &self.config.exposed_keys {
            let enabled = self
                .document
                .as_ref()
                .and_then(|doc| doc.get(key))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            map.insert(key.clone(), enabled);
        }
        map
    }
}
