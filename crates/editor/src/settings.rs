//! Editor settings

use serde::{Deserialize, Serialize};

/// Camera and orbit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Initial distance from the target
    pub distance: f32,
    /// Initial horizontal angle in degrees
    pub yaw: f32,
    /// Initial vertical angle in degrees
    pub pitch: f32,
    /// Point the camera orbits around
    pub target: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// Degrees per dragged pixel
    pub rotate_speed: f32,
    /// World units per dragged pixel
    pub pan_speed: f32,
    /// Fraction of distance per scroll unit
    pub zoom_speed: f32,
    /// Fraction of the queued rotation applied on each update, whatever the
    /// frame time (values outside (0, 1) apply it all at once)
    pub damping: f32,
    /// Auto-rotation in degrees per second
    pub auto_rotate_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 60.0,
            znear: 1.0,
            zfar: 5000.0,
            distance: 2000.0,
            yaw: 30.0,
            pitch: 20.0,
            target: [0.0, 200.0, 0.0],
            min_distance: 100.0,
            max_distance: 4500.0,
            rotate_speed: 0.4,
            pan_speed: 1.5,
            zoom_speed: 0.002,
            damping: 0.05,
            auto_rotate_speed: 12.0,
        }
    }
}

/// Selection highlight settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// Colour drawn for highlighted meshes
    pub color: [u8; 3],
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            color: [170, 170, 170],
        }
    }
}

/// Dimensions of the roof built at start-up
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoofSettings {
    pub width: f64,
    pub depth: f64,
    /// Ridge height at start-up
    pub height: f64,
    /// Lowest height the handle can be dragged to
    pub height_floor: f64,
    pub handle_radius: f64,
}

impl Default for RoofSettings {
    fn default() -> Self {
        Self {
            width: 1000.0,
            depth: 500.0,
            height: 400.0,
            height_floor: 0.0,
            handle_radius: 5.0,
        }
    }
}

/// Picking tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingSettings {
    /// World distance within which a line counts as hit
    pub line_threshold: f32,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self {
            line_threshold: 5.0,
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub camera: CameraSettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub roof: RoofSettings,
    #[serde(default)]
    pub picking: PickingSettings,
}

impl EditorSettings {
    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(dirs) = directories::ProjectDirs::from("com", "roof-editor", "roof-editor") {
            let config_path = dirs.config_dir().join("settings.json");
            if let Ok(json) = std::fs::read_to_string(&config_path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "roof-editor", "roof-editor") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save settings: {}", e);
                    }
                }
            }
        }
    }
}
