//! Persisted view preferences.
//!
//! The remembered view axis, grid visibility and lighting survive across
//! asset selections and restarts. Everything else is per-load.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::ViewAxis;
use crate::error::PreviewResult;

/// User preferences the session reads at construction and writes on change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewPreferences {
    pub view_axis: ViewAxis,
    pub grid_visible: bool,
    pub lighting_enabled: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            view_axis: ViewAxis::Z,
            grid_visible: true,
            lighting_enabled: true,
        }
    }
}

/// Write-back target for preference changes
pub trait PreferenceSink {
    fn save(&mut self, preferences: &ViewPreferences) -> PreviewResult<()>;
}

/// File layout; the axis is stored as an integer
#[derive(Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PreferenceFile {
    view_axis: i32,
    grid_visible: bool,
    lighting_enabled: bool,
}

impl Default for PreferenceFile {
    fn default() -> Self {
        ViewPreferences::default().into()
    }
}

impl From<ViewPreferences> for PreferenceFile {
    fn from(p: ViewPreferences) -> Self {
        Self {
            view_axis: p.view_axis.to_index(),
            grid_visible: p.grid_visible,
            lighting_enabled: p.lighting_enabled,
        }
    }
}

impl From<PreferenceFile> for ViewPreferences {
    fn from(file: PreferenceFile) -> Self {
        Self {
            view_axis: ViewAxis::from_index(file.view_axis),
            grid_visible: file.grid_visible,
            lighting_enabled: file.lighting_enabled,
        }
    }
}

/// JSON preference file under a settings root.
///
/// Reads `ViewportX/ViewportXConfig.json`. When only the older
/// `PrefabPreviewer/PrefabPreviewerConfig.json` exists, it is read and
/// rewritten to the current location.
#[derive(Clone, Debug)]
pub struct JsonPreferenceStore {
    root: PathBuf,
}

impl JsonPreferenceStore {
    pub const DIRECTORY: &'static str = "ViewportX";
    pub const FILE_NAME: &'static str = "ViewportXConfig.json";
    pub const LEGACY_DIRECTORY: &'static str = "PrefabPreviewer";
    pub const LEGACY_FILE_NAME: &'static str = "PrefabPreviewerConfig.json";

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(Self::DIRECTORY).join(Self::FILE_NAME)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.root.join(Self::LEGACY_DIRECTORY).join(Self::LEGACY_FILE_NAME)
    }

    /// Load preferences, migrating or creating the file as needed.
    ///
    /// Never fails: unreadable files fall back to defaults.
    pub fn load_or_create(&self) -> ViewPreferences {
        match self.try_load() {
            Ok(preferences) => preferences,
            Err(e) => {
                log::warn!("Falling back to default view preferences: {}", e);
                ViewPreferences::default()
            }
        }
    }

    fn try_load(&self) -> PreviewResult<ViewPreferences> {
        let path = self.path();
        if path.exists() {
            return read_file(&path);
        }

        let legacy = self.legacy_path();
        let preferences = if legacy.exists() {
            let preferences = read_file(&legacy)?;
            log::info!(
                "Migrated view preferences from {} to {}",
                legacy.display(),
                path.display()
            );
            preferences
        } else {
            ViewPreferences::default()
        };

        self.write(&preferences)?;
        Ok(preferences)
    }

    fn write(&self, preferences: &ViewPreferences) -> PreviewResult<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&PreferenceFile::from(*preferences))?;
        fs::write(&path, json)?;
        Ok(())
    }
}

fn read_file(path: &Path) -> PreviewResult<ViewPreferences> {
    let json = fs::read_to_string(path)?;
    let file: PreferenceFile = serde_json::from_str(&json)?;
    Ok(file.into())
}

impl PreferenceSink for JsonPreferenceStore {
    fn save(&mut self, preferences: &ViewPreferences) -> PreviewResult<()> {
        self.write(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path());

        assert_eq!(store.load_or_create(), ViewPreferences::default());
        assert!(store.path().exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut store = JsonPreferenceStore::new(dir.path());
        let prefs = ViewPreferences {
            view_axis: ViewAxis::Y,
            grid_visible: false,
            lighting_enabled: true,
        };

        store.save(&prefs).unwrap();
        assert_eq!(JsonPreferenceStore::new(dir.path()).load_or_create(), prefs);
    }

    #[test]
    fn test_legacy_file_migrated() {
        let dir = tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path());
        let legacy = store.legacy_path();
        fs::create_dir_all(legacy.parent().unwrap()).unwrap();
        fs::write(
            &legacy,
            r#"{ "uiLanguage": 1, "viewAxis": 0, "gridVisible": false, "lightingEnabled": false }"#,
        )
        .unwrap();

        let prefs = store.load_or_create();
        assert_eq!(prefs.view_axis, ViewAxis::X);
        assert!(!prefs.grid_visible);
        assert!(!prefs.lighting_enabled);

        let migrated = fs::read_to_string(store.path()).unwrap();
        assert!(migrated.contains("\"viewAxis\": 0"));
    }

    #[test]
    fn test_invalid_axis_and_garbage() {
        let dir = tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(store.path(), r#"{ "viewAxis": 9 }"#).unwrap();
        let prefs = store.load_or_create();
        assert_eq!(prefs.view_axis, ViewAxis::Z);
        assert!(prefs.grid_visible);

        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.load_or_create(), ViewPreferences::default());
    }
}
