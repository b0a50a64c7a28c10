use serde_derive::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`generate_command` must name a program")]
    EmptyCommand,
}

/// Where `mkdefconfig` looks for things and how it regenerates the defconfig.
///
/// Every field has a default matching the usual SDK layout, so a settings
/// file only needs to name what differs:
///
/// ```toml
/// nuttx_dir = "../../nuttx"
/// generate_command = ["make", "-C", "..", "savedefconfig"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding one subdirectory per configuration slot.
    pub configs_dir: PathBuf,
    /// The build tree whose `.config` is captured.
    pub nuttx_dir: PathBuf,
    /// Directory the generator runs in and leaves its output in.
    pub work_dir: PathBuf,
    /// File name of the generated defconfig, both transient and inside a slot.
    pub defconfig_name: String,
    /// Slot diffed against when a name implies a diff.
    pub base_slot: String,
    pub generate_command: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            configs_dir: PathBuf::from("configs"),
            nuttx_dir: PathBuf::from("../nuttx"),
            work_dir: PathBuf::from("."),
            defconfig_name: "defconfig".to_string(),
            base_slot: "default".to_string(),
            generate_command: vec!["make".to_string(), "savedefconfig".to_string()],
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.generate_command.first() {
            Some(program) if !program.is_empty() => Ok(()),
            _ => Err(SettingsError::EmptyCommand),
        }
    }

    /// Points `configs_dir` at `dir`, appending `configs` unless `dir` already
    /// ends with it.
    pub fn set_configs_dir<P: AsRef<Path>>(&mut self, dir: P) {
        let dir = dir.as_ref();
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        self.configs_dir = if dir.ends_with("configs") {
            dir
        } else {
            dir.join("configs")
        };
    }

    /// The file whose presence means the build tree has been configured.
    pub fn dotconfig_path(&self) -> PathBuf {
        self.nuttx_dir.join(".config")
    }

    /// The defconfig the generator leaves behind.
    pub fn generated_path(&self) -> PathBuf {
        self.work_dir.join(&self.defconfig_name)
    }

    pub fn slot_dir(&self, name: &str) -> PathBuf {
        self.configs_dir.join(name)
    }

    pub fn slot_defconfig(&self, name: &str) -> PathBuf {
        self.slot_dir(name).join(&self.defconfig_name)
    }
}
