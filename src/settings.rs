// settings.rs
// Loads the optional pa_sweep.toml that overrides the solver contract defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::archive::Axis;
use crate::config;
use crate::error::SweepError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSettings {
    /// Solver executable, invoked as `<solver_path> <config> <quiet_flag>`
    #[serde(default = "SweepSettings::default_solver_path")]
    pub solver_path: String,
    #[serde(default = "SweepSettings::default_quiet_flag")]
    pub quiet_flag: String,
    #[serde(default)]
    pub outputs: OutputNames,
    /// Written once by the solver and removed after the last run
    #[serde(default = "SweepSettings::default_auxiliary_output")]
    pub auxiliary_output: String,
    /// Written one level above the output directory
    #[serde(default = "SweepSettings::default_manifest_name")]
    pub manifest_name: String,
    #[serde(default = "SweepSettings::default_first_layer")]
    pub first_layer: i32,
    /// tracing filter directive, e.g. "warn" or "pa_sweep=debug"
    #[serde(default = "SweepSettings::default_log_level")]
    pub log_level: String,
}

impl SweepSettings {
    fn default_solver_path() -> String {
        config::DEFAULT_SOLVER_PATH.to_string()
    }
    fn default_quiet_flag() -> String {
        config::DEFAULT_QUIET_FLAG.to_string()
    }
    fn default_auxiliary_output() -> String {
        config::DEFAULT_AUXILIARY_OUTPUT.to_string()
    }
    fn default_manifest_name() -> String {
        config::DEFAULT_MANIFEST_NAME.to_string()
    }
    fn default_first_layer() -> i32 {
        config::DEFAULT_FIRST_LAYER
    }
    fn default_log_level() -> String {
        config::DEFAULT_LOG_LEVEL.to_string()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SweepError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Layers below the default first layer lie on the grid boundary.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.first_layer < config::DEFAULT_FIRST_LAYER {
            return Err(SweepError::InvalidSetting(format!(
                "first_layer must be at least {}, got {}",
                config::DEFAULT_FIRST_LAYER,
                self.first_layer
            )));
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Read `pa_sweep.toml` from the working directory, or fall back to defaults.
    pub fn load_default() -> Result<Self, SweepError> {
        let path = Path::new(config::SETTINGS_FILE);
        if path.exists() {
            tracing::info!("loading settings from {}", path.display());
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            solver_path: Self::default_solver_path(),
            quiet_flag: Self::default_quiet_flag(),
            outputs: OutputNames::default(),
            auxiliary_output: Self::default_auxiliary_output(),
            manifest_name: Self::default_manifest_name(),
            first_layer: Self::default_first_layer(),
            log_level: Self::default_log_level(),
        }
    }
}

/// Fixed filenames the solver writes for each axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputNames {
    #[serde(default = "OutputNames::default_x")]
    pub x: String,
    #[serde(default = "OutputNames::default_y")]
    pub y: String,
    #[serde(default = "OutputNames::default_z")]
    pub z: String,
}

impl OutputNames {
    fn default_x() -> String {
        config::DEFAULT_OUTPUT_X.to_string()
    }
    fn default_y() -> String {
        config::DEFAULT_OUTPUT_Y.to_string()
    }
    fn default_z() -> String {
        config::DEFAULT_OUTPUT_Z.to_string()
    }

    /// Pairs each fixed name with the axis letter it is archived under.
    pub fn by_axis(&self) -> [(String, Axis); 3] {
        [
            (self.x.clone(), Axis::X),
            (self.y.clone(), Axis::Y),
            (self.z.clone(), Axis::Z),
        ]
    }
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            x: Self::default_x(),
            y: Self::default_y(),
            z: Self::default_z(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_settings_use_solver_defaults() {
        let settings = SweepSettings::from_toml_str("").unwrap();
        assert_eq!(settings.solver_path, "./LEXSIMECK.OUT");
        assert_eq!(settings.quiet_flag, "-q");
        assert_eq!(settings.outputs, OutputNames::default());
        assert_eq!(settings.auxiliary_output, "mat_ga_e.dat");
        assert_eq!(settings.manifest_name, "flyE.conf");
        assert_eq!(settings.first_layer, 2);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let settings = SweepSettings::from_toml_str(
            "solver_path = \"/opt/solver/run\"\n[outputs]\nz = \"field_z.dat\"\n",
        )
        .unwrap();
        assert_eq!(settings.solver_path, "/opt/solver/run");
        assert_eq!(settings.outputs.x, "mat_ga_x.dat");
        assert_eq!(settings.outputs.z, "field_z.dat");
        assert_eq!(settings.first_layer, 2);
    }

    #[test]
    fn malformed_settings_are_rejected() {
        let err = SweepSettings::from_toml_str("first_layer = \"two\"").unwrap_err();
        assert!(matches!(err, SweepError::Settings(_)));
    }

    #[test]
    fn boundary_layers_cannot_be_enabled() {
        for text in ["first_layer = 1", "first_layer = -2147483648"] {
            let err = SweepSettings::from_toml_str(text).unwrap_err();
            assert!(matches!(err, SweepError::InvalidSetting(_)), "{text}");
        }
        assert_eq!(SweepSettings::from_toml_str("first_layer = 3").unwrap().first_layer, 3);
    }
}
