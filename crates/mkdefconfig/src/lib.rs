//! Captures the active NuttX `.config` as a named defconfig slot.
//!
//! The flow is: check the build tree is configured, ask before overwriting an
//! existing slot, run the [`MinimalConfigGenerator`], then store the result
//! either as a full defconfig or as a diff against a base slot.

use std::{io, path::PathBuf};

use kconfig::{Defconfig, LoadError, SaveError};
use thiserror::Error;

pub mod generator;
pub mod interrupt;
pub mod logger;
pub mod prompt;
pub mod settings;

pub use generator::{CommandGenerator, GenerateError, MinimalConfigGenerator};
pub use prompt::{Confirm, TerminalPrompt};
pub use settings::{Settings, SettingsError};

#[derive(Debug, Error)]
pub enum MkdefconfigError {
    #[error("NuttX is not configured.")]
    NotConfigured { dotconfig: PathBuf },

    #[error("configuration couldn't be saved: {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("minimal config was not generated at {}", .0.display())]
    MissingOutput(PathBuf),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("failed to create {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl MkdefconfigError {
    /// Process exit code for this failure. A failing generator passes its
    /// own code through.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Generate(err) => u8::try_from(err.exit_code())
                .ok()
                .filter(|code| *code != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

/// How a captured configuration is written into its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// Full canonical defconfig.
    Standalone,
    /// Listing of the differences from the defconfig in slot `base`.
    Diff { base: String },
}

impl SaveMode {
    /// The historical naming rule: a slot name containing `/` is stored as a
    /// diff against `base`.
    pub fn from_slot_name(name: &str, base: &str) -> Self {
        if name.contains('/') {
            SaveMode::Diff {
                base: base.to_string(),
            }
        } else {
            SaveMode::Standalone
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Slot name, relative to the configs directory.
    pub name: String,
    pub mode: SaveMode,
    /// Replace an existing slot without asking.
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The defconfig (or diff) was written to this file.
    Saved(PathBuf),
    /// The user chose not to overwrite the existing slot.
    Declined,
}

pub struct Mkdefconfig<G, C> {
    settings: Settings,
    generator: G,
    prompt: C,
}

impl<G, C> Mkdefconfig<G, C>
where
    G: MinimalConfigGenerator,
    C: Confirm,
{
    pub fn new(settings: Settings, generator: G, prompt: C) -> Self {
        Self {
            settings,
            generator,
            prompt,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn run(&mut self, request: &Request) -> Result<Outcome, MkdefconfigError> {
        let dotconfig = self.settings.dotconfig_path();
        if !dotconfig.exists() {
            return Err(MkdefconfigError::NotConfigured { dotconfig });
        }

        let slot_dir = self.settings.slot_dir(&request.name);
        if slot_dir.exists() {
            if !slot_dir.is_dir() {
                return Err(MkdefconfigError::NotADirectory(slot_dir));
            }
            if !request.overwrite {
                let question = format!("{} already exists, overwrite?", request.name);
                if !self
                    .prompt
                    .confirm(&question)
                    .map_err(MkdefconfigError::Prompt)?
                {
                    log::info!("Keeping existing {}", slot_dir.display());
                    return Ok(Outcome::Declined);
                }
            }
        }

        log::info!("Generating minimal config");
        self.generator.generate()?;

        std::fs::create_dir_all(&slot_dir).map_err(|source| MkdefconfigError::CreateDir {
            path: slot_dir.clone(),
            source,
        })?;

        let generated = self.settings.generated_path();
        let output = self.settings.slot_defconfig(&request.name);
        let mut config = Defconfig::with_path(&output);
        config.load(Some(&generated)).map_err(|err| {
            if err.is_not_found() {
                MkdefconfigError::MissingOutput(generated.clone())
            } else {
                MkdefconfigError::Load(err)
            }
        })?;
        log::debug!("Captured {}", config);

        match &request.mode {
            SaveMode::Standalone => config.save(None)?,
            SaveMode::Diff { base } => {
                let base_path = self.settings.slot_defconfig(base);
                let mut base_config = Defconfig::with_path(&base_path);
                match base_config.load(None) {
                    Err(err) if err.is_not_found() => {
                        log::warn!("{}, diffing against an empty configuration", err);
                    }
                    result => result?,
                }
                config.save_diff(&base_config, None)?;
            }
        }

        std::fs::remove_file(&generated).map_err(|source| MkdefconfigError::Remove {
            path: generated.clone(),
            source,
        })?;

        Ok(Outcome::Saved(output))
    }
}
