//! In-memory model of Kconfig `defconfig` files.
//!
//! A [`Defconfig`] maps option symbols (stored without the `CONFIG_` prefix)
//! to their values. It can be loaded from a `.config`/`defconfig` style file,
//! written back in canonical sorted form, and compared against another
//! configuration to produce a [`DefconfigDiff`].

mod defconfig;
mod diff;
mod error;

pub use defconfig::{DEFCONFIG_HEADER, DISABLED, Defconfig, SYMBOL_PREFIX};
pub use diff::DefconfigDiff;
pub use error::{LoadError, SaveError};
