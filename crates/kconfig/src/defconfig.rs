use std::{
    collections::BTreeMap,
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::{DefconfigDiff, LoadError, SaveError};

/// Prefix every symbol carries on disk.
pub const SYMBOL_PREFIX: &str = "CONFIG_";

/// Value of an option that is explicitly turned off.
pub const DISABLED: &str = "n";

/// Comment block written at the top of every saved defconfig.
pub const DEFCONFIG_HEADER: &str = "#
# This file is autogenerated: PLEASE DO NOT EDIT IT.
#
# You can use \"make menuconfig\" to make any modifications to the installed .config file.
# You can then do \"make savedefconfig\" to generate a new defconfig file that includes your
# modifications.
#";

const NOT_SET_SUFFIX: &str = " is not set";

enum Line<'a> {
    Disabled(&'a str),
    Assignment(&'a str, &'a str),
}

impl<'a> Line<'a> {
    /// `# SYMBOL is not set` takes priority over `SYMBOL=VALUE`.
    fn parse(line: &'a str) -> Option<Self> {
        if let Some(symbol) = line
            .strip_prefix("# ")
            .and_then(|rest| rest.rfind(NOT_SET_SUFFIX).map(|end| &rest[..end]))
        {
            return Some(Line::Disabled(symbol));
        }
        line.split_once('=')
            .map(|(symbol, value)| Line::Assignment(symbol, value))
    }
}

fn strip_symbol_prefix(symbol: &str) -> &str {
    symbol.strip_prefix(SYMBOL_PREFIX).unwrap_or(symbol)
}

/// A set of Kconfig options, keyed by symbol name without the `CONFIG_` prefix.
#[derive(Debug, Clone, Default)]
pub struct Defconfig {
    path: Option<PathBuf>,
    options: BTreeMap<String, String>,
}

impl Defconfig {
    /// Creates an empty configuration that is not bound to any file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty configuration bound to `path`.
    ///
    /// The bound path is used by [`load`](Self::load), [`save`](Self::save) and
    /// [`save_diff`](Self::save_diff) whenever they are not given one.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
            options: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Looks up `symbol` exactly as stored, without the `CONFIG_` prefix.
    pub fn get(&self, symbol: &str) -> Option<&str> {
        self.options.get(symbol).map(String::as_str)
    }

    /// Sets `symbol` to `value`, replacing any previous value.
    ///
    /// `symbol` is taken verbatim; only [`load`](Self::load) strips the
    /// on-disk `CONFIG_` prefix.
    pub fn set<S: Into<String>, V: Into<String>>(&mut self, symbol: S, value: V) {
        self.options.insert(symbol.into(), value.into());
    }

    pub fn remove(&mut self, symbol: &str) -> Option<String> {
        self.options.remove(symbol)
    }

    pub fn is_disabled(&self, symbol: &str) -> bool {
        self.get(symbol) == Some(DISABLED)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Iterates over `(symbol, value)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(s, v)| (s.as_str(), v.as_str()))
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Reads options from `path`, or from the bound path when `path` is `None`.
    ///
    /// Entries already present are kept; a symbol read again is overwritten.
    /// Lines that are neither `# SYMBOL is not set` nor `SYMBOL=VALUE` are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] for which [`LoadError::is_not_found`] holds when
    /// there is no path to read or the file does not exist. The configuration
    /// is left untouched in that case.
    pub fn load(&mut self, path: Option<&Path>) -> Result<(), LoadError> {
        let path = path.or(self.path.as_deref()).ok_or(LoadError::Unresolved)?;
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading defconfig from {}", path.display());
        self.load_str(&text);
        Ok(())
    }

    /// Applies the lines of `text` the same way [`load`](Self::load) applies a file.
    pub fn load_str(&mut self, text: &str) {
        for line in text.lines() {
            match Line::parse(line) {
                Some(Line::Disabled(symbol)) => {
                    self.set(strip_symbol_prefix(symbol), DISABLED);
                }
                Some(Line::Assignment(symbol, value)) => {
                    self.set(strip_symbol_prefix(symbol), value);
                }
                None => log::debug!("[IGNORE]: {}", line.trim()),
            }
        }
    }

    /// Renders the canonical defconfig text: the header followed by every
    /// option line in plain string order.
    pub fn to_defconfig_string(&self) -> String {
        let mut lines: Vec<String> = self
            .options
            .iter()
            .map(|(symbol, value)| {
                if value == DISABLED {
                    format!("# {SYMBOL_PREFIX}{symbol}{NOT_SET_SUFFIX}")
                } else {
                    format!("{SYMBOL_PREFIX}{symbol}={value}")
                }
            })
            .collect();
        // "# CONFIG_..." and "CONFIG_..." lines interleave by string order
        lines.sort();

        let mut out = String::from(DEFCONFIG_HEADER);
        out.push('\n');
        out.push_str(&lines.join("\n"));
        out.push('\n');
        out
    }

    /// Writes the canonical defconfig to `path`, or to the bound path.
    pub fn save(&self, path: Option<&Path>) -> Result<(), SaveError> {
        let path = self.resolve_output(path)?;
        log::info!("Writing defconfig to {}", path.display());
        write(path, &self.to_defconfig_string())
    }

    /// Computes what must change to get from `target` to `self`.
    pub fn diff(&self, target: &Defconfig) -> DefconfigDiff {
        DefconfigDiff::between(target, self)
    }

    /// Writes the difference from `target` to `self` as a listing to `path`,
    /// or to the bound path.
    ///
    /// `target` is only read.
    pub fn save_diff(&self, target: &Defconfig, path: Option<&Path>) -> Result<(), SaveError> {
        let path = self.resolve_output(path)?;
        let diff = self.diff(target);
        log::info!(
            "Writing defconfig diff to {} ({} removed, {} changed, {} added)",
            path.display(),
            diff.minus.len(),
            diff.changes.len(),
            diff.plus.len()
        );
        write(path, &diff.to_string())
    }

    fn resolve_output<'a>(&'a self, path: Option<&'a Path>) -> Result<&'a Path, SaveError> {
        path.or(self.path.as_deref()).ok_or(SaveError::Unresolved)
    }
}

fn write(path: &Path, contents: &str) -> Result<(), SaveError> {
    fs::write(path, contents).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl fmt::Display for Defconfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (symbol, value)) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "({symbol} = {value})")?;
        }
        Ok(())
    }
}

impl<S: Into<String>, V: Into<String>> FromIterator<(S, V)> for Defconfig {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        config.extend(iter);
        config
    }
}

impl<S: Into<String>, V: Into<String>> Extend<(S, V)> for Defconfig {
    fn extend<I: IntoIterator<Item = (S, V)>>(&mut self, iter: I) {
        for (symbol, value) in iter {
            self.set(symbol, value);
        }
    }
}
