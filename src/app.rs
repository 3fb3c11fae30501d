use crate::bridge::{Bridge, LogBridge};
use crate::config::{Config, SETTINGS_FILE};
use crate::storage::SettingsStore;
use anyhow::Result;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{info, warn};

/// Wires the bridge and the settings store together and carries out the
/// startup handshake: read the settings file once (creating it if absent),
/// load the document, and push the raw file text to the host side.
pub struct App {
    store: SettingsStore,
    bridge: Rc<LogBridge>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let bridge = Rc::new(LogBridge::new());
        bridge.set_text_handler(Box::new(|text| info!(text, "feedback from host")));

        let mut store = SettingsStore::new(config, Rc::clone(&bridge) as Rc<dyn Bridge>);
        let raw = store.read_raw_text(SETTINGS_FILE)?;
        if let Err(err) = store.load_document() {
            warn!(%err, "stored settings could not be parsed, continuing without them");
        }
        // the host gets the file text verbatim, parsed or not
        bridge.push_settings(&raw);

        Ok(Self { store, bridge })
    }

    /// Raw text of the settings file
    pub fn show(&self) -> Result<String> {
        Ok(self.store.read_raw_text(SETTINGS_FILE)?)
    }

    /// Boolean projection of the current document
    pub fn get(&self) -> BTreeMap<String, bool> {
        self.store.get_settings()
    }

    /// Set one preference and propagate it to disk and the host side
    pub fn set(&mut self, key: &str, value: &str, fence: bool) -> Result<()> {
        self.store.set_setting(key, value, fence)?;
        Ok(())
    }

    pub fn bridge(&self) -> &LogBridge {
        &self.bridge
    }
}
