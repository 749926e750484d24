use std::path::Path;

use crate::config::Config;
use crate::data::filter::{filtered_bundle, Selection, SelectionKey, SelectionKeys};
use crate::data::loader::load_dataset;
use crate::data::model::{DataStore, DatasetKind, Table};
use crate::data::options::OptionMenus;
use crate::error::FilterError;
use crate::scene::camera::OrbitCamera;
use crate::scene::{build_model, build_section, ModelScene, SectionScene};

// ---------------------------------------------------------------------------
// Notices – modal messages raised at the action boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Views and built scenes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tables,
    Section,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Section,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuiltScene {
    Section(SectionScene),
    Model(ModelScene),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded datasets (each absent until the user loads a file).
    pub store: DataStore,

    /// Choices offered by the four selection menus.
    pub menus: OptionMenus,

    /// Current menu selections.
    pub selection: Selection,

    /// Last built scene; cleared whenever its inputs change.
    pub scene: Option<BuiltScene>,

    pub view: View,

    /// Dataset shown in the tables view.
    pub table_tab: DatasetKind,

    pub camera: OrbitCamera,

    /// Modal notices, oldest first.
    pub notices: Vec<Notice>,

    /// Status line shown in the top bar.
    pub status_message: Option<String>,

    /// An export was requested and awaits its screenshot.
    pub pending_export: Option<std::path::PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: DataStore::default(),
            menus: OptionMenus::default(),
            selection: Selection::default(),
            scene: None,
            view: View::Tables,
            table_tab: DatasetKind::Well,
            camera: OrbitCamera::default(),
            notices: Vec::new(),
            status_message: None,
            pending_export: None,
        }
    }

    /// Load every dataset named in the config.
    pub fn load_configured(&mut self) {
        let entries: Vec<(DatasetKind, std::path::PathBuf)> = self
            .config
            .data
            .entries()
            .into_iter()
            .map(|(k, p)| (k, p.to_path_buf()))
            .collect();
        for (kind, path) in entries {
            self.load(kind, &path);
        }
    }

    /// Load a file as `kind`. On failure the previous dataset is kept and
    /// an error notice is raised.
    pub fn load(&mut self, kind: DatasetKind, path: &Path) {
        let result = load_dataset(kind, path).and_then(|table| {
            self.store.set(kind, table)?;
            Ok(())
        });
        match result {
            Ok(()) => {
                if let Some(table) = self.store.get(kind) {
                    log::info!(
                        "Loaded {} {kind} rows with columns {:?}",
                        table.len(),
                        table.columns
                    );
                    self.status_message =
                        Some(format!("{kind}: {} rows from {}", table.len(), path.display()));
                }
                self.on_dataset_replaced(kind);
            }
            Err(e) => {
                log::error!("Failed to load {kind} data: {e:#}");
                self.notices
                    .push(Notice::error(format!("Failed to load {kind} data: {e:#}")));
            }
        }
    }

    /// Refresh the menus `kind` feeds and reset their selections.
    fn on_dataset_replaced(&mut self, kind: DatasetKind) {
        if let Some(table) = self.store.get(kind) {
            self.menus.refresh(kind, table);
        }
        for key in SelectionKey::fed_by(kind) {
            self.selection.set(*key, None);
        }
        self.table_tab = kind;
        self.invalidate_scene();
    }

    /// Change a selection. Any built scene becomes stale.
    pub fn select(&mut self, key: SelectionKey, value: Option<String>) {
        if self.selection.get(key) == value.as_deref() {
            return;
        }
        self.selection.set(key, value);
        self.invalidate_scene();
    }

    pub fn invalidate_scene(&mut self) {
        if self.scene.take().is_some() {
            log::debug!("scene invalidated");
        }
    }

    /// Filter every dataset by the current selection and build a scene.
    pub fn build(&mut self, kind: SceneKind) {
        let keys = match SelectionKeys::from_selection(&self.selection) {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("build refused: {e}");
                self.notices.push(match e {
                    FilterError::MissingSelection(_) => Notice::warning(e.to_string()),
                    FilterError::InvalidKey { .. } => Notice::error(e.to_string()),
                });
                return;
            }
        };

        let bundle = filtered_bundle(&self.store, &keys);

        let absent = bundle.absent_kinds();
        if !absent.is_empty() {
            self.notices.push(Notice::warning(format!(
                "Not loaded: {}. The model is built without it.",
                join_kinds(&absent)
            )));
        }
        let empty = bundle.empty_kinds();
        if !empty.is_empty() {
            self.notices.push(Notice::info(format!(
                "No matching rows in: {}.",
                join_kinds(&empty)
            )));
        }

        let (scene, view) = match kind {
            SceneKind::Section => (BuiltScene::Section(build_section(&bundle, &keys)), View::Section),
            SceneKind::Model => (
                BuiltScene::Model(build_model(&bundle, &keys, &self.config.scene)),
                View::Model,
            ),
        };
        log::info!("{kind:?} model created for {keys:?}");
        self.scene = Some(scene);
        self.view = view;
    }

    pub fn table(&self, kind: DatasetKind) -> Option<&Table> {
        self.store.get(kind)
    }

    pub fn dismiss_notice(&mut self) {
        if !self.notices.is_empty() {
            self.notices.remove(0);
        }
    }
}

fn join_kinds(kinds: &[DatasetKind]) -> String {
    kinds
        .iter()
        .map(|k| k.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    const WELLS: &str = "Timestamp,Xpos,Ypos,Well1\n100,1,2,-5\n200,1,2,-6\n";
    const RAIN: &str = "Region,January,February\nNorth,41.5,38\nSouth,12,3\n";
    const INFILTRATION: &str =
        "Timeseries,Infiltration Rate,Infiltration Speed,Water Consumption\n0,250,0.5,100\n60,300,0.4,120\n";

    fn select_all(state: &mut AppState) {
        state.select(SelectionKey::Timestamp, Some("100".into()));
        state.select(SelectionKey::Region, Some("North".into()));
        state.select(SelectionKey::Timeseries, Some("60".into()));
        state.select(SelectionKey::Month, Some("January".into()));
    }

    #[test]
    fn load_fills_menus_and_resets_selection() {
        let dir = tempfile::tempdir().unwrap();
        let wells = write(dir.path(), "wells.csv", WELLS);
        let mut state = AppState::default();
        state.load(DatasetKind::Well, &wells);
        assert_eq!(state.menus.timestamps, vec!["100", "200"]);

        state.select(SelectionKey::Timestamp, Some("200".into()));
        state.select(SelectionKey::Month, Some("January".into()));
        state.load(DatasetKind::Well, &wells);
        assert_eq!(state.selection.timestamp, None);
        assert_eq!(state.selection.month.as_deref(), Some("January"));
        assert_eq!(state.menus.timestamps, vec!["100", "200"]);
    }

    #[test]
    fn startup_loads_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        let wells = write(dir.path(), "wells.csv", WELLS);
        let rain = write(dir.path(), "rain.csv", RAIN);
        let missing = dir.path().join("missing.csv");
        let config = Config::from_toml(&format!(
            "[data]\nwell = '{}'\nprecipitation = '{}'\ninfiltration = '{}'\n",
            wells.display(),
            rain.display(),
            missing.display()
        ))
        .unwrap();

        let mut state = AppState::new(config);
        state.load_configured();

        assert_eq!(state.table(DatasetKind::Well).map(Table::len), Some(2));
        assert_eq!(state.menus.regions, vec!["North", "South"]);
        assert!(state.table(DatasetKind::Infiltration).is_none());
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].severity, Severity::Error);
        assert!(state.notices[0].message.contains("Infiltration"));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let wells = write(dir.path(), "wells.csv", WELLS);
        let broken = write(dir.path(), "broken.csv", "Timestamp,Xpos\n1,2\n");
        let mut state = AppState::default();
        state.load(DatasetKind::Well, &wells);
        state.load(DatasetKind::Well, &broken);

        assert_eq!(state.table(DatasetKind::Well).map(Table::len), Some(2));
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].severity, Severity::Error);
        assert!(state.notices[0].message.contains("Ypos"));
    }

    #[test]
    fn build_requires_every_selection() {
        let mut state = AppState::default();
        state.select(SelectionKey::Region, Some("North".into()));
        state.build(SceneKind::Section);
        assert!(state.scene.is_none());
        assert_eq!(state.notices[0].severity, Severity::Warning);
        assert!(state.notices[0].message.contains("timestamp"));
    }

    #[test]
    fn build_then_select_invalidates_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load(DatasetKind::Well, &write(dir.path(), "w.csv", WELLS));
        state.load(DatasetKind::Precipitation, &write(dir.path(), "p.csv", RAIN));
        state.load(DatasetKind::Infiltration, &write(dir.path(), "i.csv", INFILTRATION));
        assert_eq!(state.menus.months, vec!["January", "February"]);
        select_all(&mut state);

        state.build(SceneKind::Model);
        assert!(matches!(state.scene, Some(BuiltScene::Model(_))));
        assert_eq!(state.view, View::Model);
        // soil was never loaded
        assert_eq!(state.notices.len(), 1);
        assert_eq!(state.notices[0].severity, Severity::Warning);
        assert!(state.notices[0].message.contains("Soil"));

        state.select(SelectionKey::Month, Some("January".into()));
        assert!(state.scene.is_some());
        state.select(SelectionKey::Month, Some("February".into()));
        assert!(state.scene.is_none());
    }

    #[test]
    fn empty_filter_result_is_an_info_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load(DatasetKind::Well, &write(dir.path(), "w.csv", WELLS));
        select_all(&mut state);
        state.select(SelectionKey::Timestamp, Some("999".into()));
        state.build(SceneKind::Section);

        assert!(matches!(state.scene, Some(BuiltScene::Section(_))));
        assert!(state
            .notices
            .iter()
            .any(|n| n.severity == Severity::Info && n.message.contains("Well")));
    }

    #[test]
    fn invalid_key_is_an_error_notice() {
        let mut state = AppState::default();
        select_all(&mut state);
        state.select(SelectionKey::Timeseries, Some("soon".into()));
        state.build(SceneKind::Model);
        assert!(state.scene.is_none());
        assert_eq!(state.notices[0].severity, Severity::Error);
        state.dismiss_notice();
        assert!(state.notices.is_empty());
    }
}
