//! User-tunable demo settings.

use std::{
    path::Path,
    fs::File,
    io::{
        BufReader,
        BufWriter,
    },
    time::Duration,
};
use serde::{Serialize, Deserialize};
use anyhow::{
    ensure,
    Result,
};


pub const SETTINGS_FILE_NAME: &'static str = "settings.json";


/// Demo settings. Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side length of a placed cube.
    pub cube_size: f32,
    /// Mass of a placed cube. Only the engine's integrator uses this.
    pub cube_mass: f32,
    /// How far above the tapped point a cube spawns, so that it drops onto the plane.
    pub insertion_y_offset: f32,
    /// How far below the long-pressed point the blast origin sits.
    pub explosion_y_offset: f32,
    /// Distance from the blast origin at and beyond which cubes are unaffected.
    pub explosion_max_distance: f32,
    /// Multiplier on the squared falloff of an explosion.
    pub explosion_strength: f32,
    /// Point in a cube's local frame at which explosion impulses are applied.
    pub impulse_offset: [f32; 3],
    /// Seconds a single finger must be held to trigger an explosion.
    pub long_press_secs: f32,
    /// Seconds two fingers must be held to hide the planes.
    pub two_finger_long_press_secs: f32,
    /// Screen distance a touch may wander and still count as stationary.
    pub touch_slop: f32,
    /// Multiplier from the engine's ambient intensity estimate to light intensity.
    pub light_intensity_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cube_size: 0.1,
            cube_mass: 2.0,
            insertion_y_offset: 0.5,
            explosion_y_offset: 0.1,
            explosion_max_distance: 2.0,
            explosion_strength: 2.0,
            impulse_offset: [0.05, 0.05, 0.05],
            long_press_secs: 0.5,
            two_finger_long_press_secs: 1.0,
            touch_slop: 10.0,
            light_intensity_scale: 1.0,
        }
    }
}

impl Settings {
    /// Read from `path`, falling back to defaults if it can't be read.
    pub fn read(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::try_read(path)
            .map_err(|e| debug!(%e, path=%path.display(), "using default settings"))
            .unwrap_or_default()
    }

    pub fn try_read(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        serde_json::to_writer_pretty(BufWriter::new(File::create(path)?), self)?;
        Ok(())
    }

    /// Reject values the rest of the program can't sensibly work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.cube_size > 0.0, "cube_size must be positive");
        ensure!(self.cube_mass > 0.0, "cube_mass must be positive");
        ensure!(self.explosion_max_distance >= 0.0, "explosion_max_distance must be non-negative");
        ensure!(
            Duration::try_from_secs_f32(self.long_press_secs).is_ok(),
            "long_press_secs must be a non-negative duration in range",
        );
        ensure!(
            Duration::try_from_secs_f32(self.two_finger_long_press_secs).is_ok(),
            "two_finger_long_press_secs must be a non-negative duration in range",
        );
        ensure!(self.touch_slop >= 0.0, "touch_slop must be non-negative");
        Ok(())
    }

    /// Single-finger hold threshold. Falls back to the default if out of range.
    pub fn long_press(&self) -> Duration {
        secs_or(self.long_press_secs, Settings::default().long_press_secs)
    }

    /// Two-finger hold threshold. Falls back to the default if out of range.
    pub fn two_finger_long_press(&self) -> Duration {
        secs_or(self.two_finger_long_press_secs, Settings::default().two_finger_long_press_secs)
    }
}

// settings can be built in code without going through validate
fn secs_or(secs: f32, default: f32) -> Duration {
    Duration::try_from_secs_f32(secs)
        .map_err(|e| warn!(%e, secs, "duration out of range, using default"))
        .unwrap_or_else(|()| Duration::from_secs_f32(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "cube_size": 0.2 }"#).unwrap();
        assert_eq!(settings.cube_size, 0.2);
        assert_eq!(settings.explosion_max_distance, 2.0);
        assert_eq!(settings.impulse_offset, [0.05, 0.05, 0.05]);
    }

    #[test]
    fn invalid_mass_rejected() {
        let settings = Settings {
            cube_mass: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::read("/nonexistent/arcube/settings.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn write_then_read() {
        let path = std::env::temp_dir().join(format!("arcube-settings-{}.json", std::process::id()));
        let settings = Settings {
            explosion_strength: 3.5,
            ..Default::default()
        };
        settings.write(&path).unwrap();
        let read = Settings::try_read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(read, settings);
    }

    #[test]
    fn huge_duration_rejected_on_read() {
        let path = std::env::temp_dir()
            .join(format!("arcube-settings-huge-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "long_press_secs": 1e30 }"#).unwrap();
        let result = Settings::try_read(&path);
        let settings = Settings::read(&path);
        let _ = std::fs::remove_file(&path);
        assert!(result.is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn out_of_range_durations_fall_back() {
        let settings = Settings {
            long_press_secs: 1e30,
            two_finger_long_press_secs: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.long_press(), Duration::from_millis(500));
        assert_eq!(settings.two_finger_long_press(), Duration::from_secs(1));
    }

    #[test]
    fn negative_duration_rejected() {
        let settings = Settings {
            two_finger_long_press_secs: -1.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.two_finger_long_press(), Duration::from_secs(1));
    }

    #[test]
    fn press_durations() {
        let settings = Settings::default();
        assert_eq!(settings.long_press(), Duration::from_millis(500));
        assert_eq!(settings.two_finger_long_press(), Duration::from_secs(1));
    }
}
