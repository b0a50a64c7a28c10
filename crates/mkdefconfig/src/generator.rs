use std::{
    path::PathBuf,
    process::{Command, Stdio},
};

use thiserror::Error;

use crate::settings::{Settings, SettingsError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {code}")]
    Failed { command: String, code: i32 },

    #[error("`{command}` was terminated by a signal")]
    Killed { command: String },
}

impl GenerateError {
    /// Exit code the tool should pass on to its caller.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed { code, .. } => *code,
            _ => 1,
        }
    }
}

/// Produces a minimal defconfig from the currently active `.config`.
///
/// Implementations leave the result at [`Settings::generated_path`].
pub trait MinimalConfigGenerator {
    fn generate(&self) -> Result<(), GenerateError>;
}

impl<G: MinimalConfigGenerator + ?Sized> MinimalConfigGenerator for &G {
    fn generate(&self) -> Result<(), GenerateError> {
        (**self).generate()
    }
}

/// Runs an external command, `make savedefconfig` by default.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    work_dir: PathBuf,
    quiet: bool,
}

impl CommandGenerator {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            work_dir: PathBuf::from("."),
            quiet: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let (program, args) = settings
            .generate_command
            .split_first()
            .ok_or(SettingsError::EmptyCommand)?;
        Ok(Self::new(program.as_str())
            .args(args.iter().cloned())
            .work_dir(&settings.work_dir))
    }

    pub fn args<I: IntoIterator<Item = String>>(mut self, args: I) -> Self {
        self.args.extend(args);
        self
    }

    pub fn work_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Discards the command's standard output.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MinimalConfigGenerator for CommandGenerator {
    fn generate(&self) -> Result<(), GenerateError> {
        let command_line = self.command_line();
        log::debug!("command: \"{}\" in {}", command_line, self.work_dir.display());

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.current_dir(&self.work_dir);
        if self.quiet {
            command.stdout(Stdio::null());
        }
        let status = command.status().map_err(|source| GenerateError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(GenerateError::Failed {
                command: command_line,
                code,
            }),
            None => Err(GenerateError::Killed {
                command: command_line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_command_from_settings() {
        let settings = Settings {
            generate_command: vec!["make".into(), "-C".into(), "..".into(), "savedefconfig".into()],
            work_dir: PathBuf::from("sdk"),
            ..Settings::default()
        };
        let generator = CommandGenerator::from_settings(&settings).unwrap();
        assert_eq!(generator.command_line(), "make -C .. savedefconfig");
        assert_eq!(generator.work_dir, PathBuf::from("sdk"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let settings = Settings {
            generate_command: vec![],
            ..Settings::default()
        };
        assert!(CommandGenerator::from_settings(&settings).is_err());
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let err = CommandGenerator::new("mkdefconfig-test-no-such-program")
            .generate()
            .unwrap_err();
        assert!(matches!(err, GenerateError::Spawn { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn passes_through_exit_code() {
        let err = CommandGenerator::new("sh")
            .args(["-c".to_string(), "exit 3".to_string()])
            .quiet(true)
            .generate()
            .unwrap_err();
        assert!(matches!(err, GenerateError::Failed { code: 3, .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        CommandGenerator::new("sh")
            .args(["-c".to_string(), "echo CONFIG_A=y > defconfig".to_string()])
            .work_dir(dir.path())
            .generate()
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("defconfig")).unwrap(),
            "CONFIG_A=y\n"
        );
    }
}
