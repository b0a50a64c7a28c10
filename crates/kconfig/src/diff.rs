use std::fmt;

use crate::Defconfig;

/// One-way difference between a target configuration and a current one.
///
/// Each group holds already formatted lines, sorted by their text:
/// - `minus`: `-SYMBOL=VALUE` for options only the target has,
/// - `changes`: ` SYMBOL=OLD->NEW` for options whose value differs,
/// - `plus`: `+SYMBOL=VALUE` for options only the current configuration has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefconfigDiff {
    pub minus: Vec<String>,
    pub changes: Vec<String>,
    pub plus: Vec<String>,
}

impl DefconfigDiff {
    /// Lists what must change to get from `target` to `current`.
    pub fn between(target: &Defconfig, current: &Defconfig) -> Self {
        let mut diff = Self::default();

        for (symbol, value) in target.iter() {
            if !current.options().contains_key(symbol) {
                diff.minus.push(format!("-{symbol}={value}"));
            }
        }
        for (symbol, value) in current.iter() {
            match target.options().get(symbol).map(String::as_str) {
                None => diff.plus.push(format!("+{symbol}={value}")),
                Some(old) if old != value => {
                    diff.changes.push(format!(" {symbol}={old}->{value}"));
                }
                Some(_) => {}
            }
        }

        diff.minus.sort();
        diff.changes.sort();
        diff.plus.sort();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.minus.is_empty() && self.changes.is_empty() && self.plus.is_empty()
    }

    /// All lines in output order: removals, then changes, then additions.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.minus
            .iter()
            .chain(&self.changes)
            .chain(&self.plus)
            .map(String::as_str)
    }
}

impl fmt::Display for DefconfigDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
