pub mod settings;

pub use settings::{SettingsStore, StoreError};
