use crate::settings::{SimulationSettings, Viewport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named preset containing simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: SimulationSettings,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: SimulationSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// Load the built-in presets
    fn load_builtin_presets(&mut self) {
        self.builtin = vec![
            // Classic - the original hand-placed run
            Preset::new(
                "classic",
                "10 points, slow growth, freeze after 4 isolated steps",
                SimulationSettings::default(),
            ),
            // Sparse - few points in a wide viewport, most runs freeze
            Preset::new(
                "sparse",
                "5 points spread thin; isolation usually wins",
                SimulationSettings {
                    num_points: 5,
                    expansion_rate: 0.03,
                    total_steps: 30,
                    isolation_limit: 3,
                    viewport: Viewport::square(-2.0, 3.0),
                    ..Default::default()
                },
            ),
            // Crowded - dense placement connects almost immediately
            Preset::new(
                "crowded",
                "25 points and fast growth; everything links up",
                SimulationSettings {
                    num_points: 25,
                    expansion_rate: 0.1,
                    total_steps: 25,
                    isolation_limit: 5,
                    step_interval_ms: 500,
                    ..Default::default()
                },
            ),
            // Marathon - long run with a generous isolation budget
            Preset::new(
                "marathon",
                "Long slow run; late connections can thaw frozen circles",
                SimulationSettings {
                    num_points: 15,
                    expansion_rate: 0.02,
                    total_steps: 200,
                    isolation_limit: 12,
                    step_interval_ms: 200,
                    ..Default::default()
                },
            ),
        ];
    }

    /// Directory where user presets live
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("circle-growth").join("presets"))
    }

    /// Load user presets from the presets directory. Unreadable or
    /// malformed files are skipped.
    fn load_user_presets(&mut self) {
        let Some(dir) = Self::presets_dir() else {
            return;
        };
        let Ok(entries) = fs::read_dir(&dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                    self.user.push(preset);
                }
            }
        }
    }

    /// Find a preset by name, user presets shadowing built-ins
    pub fn find(&self, name: &str) -> Option<&Preset> {
        let lower = name.to_lowercase();
        self.user
            .iter()
            .chain(self.builtin.iter())
            .find(|preset| preset.name.to_lowercase() == lower)
    }

    /// Names of every known preset, for the CLI error message
    pub fn names(&self) -> Vec<&str> {
        self.builtin
            .iter()
            .chain(self.user.iter())
            .map(|preset| preset.name.as_str())
            .collect()
    }
}
