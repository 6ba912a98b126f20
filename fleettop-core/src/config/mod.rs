//! Fleet configuration: file loading, host directory, and resolution
//!
//! The flow is one pass: raw descriptors and override entries are loaded
//! from the configuration file, the overrides build a [`HostDirectory`],
//! and [`ConfigResolver`] merges both sources into one [`ConnectionSpec`]
//! per host before the session pool opens anything.

mod descriptor;
mod directory;
mod pattern;
mod resolver;

pub use descriptor::{FleetConfig, OverrideEntry, RawHostDescriptor};
pub use directory::{HostDirectory, HostRecord, DEFAULT_KEY};
pub use pattern::HostPattern;
pub use resolver::{ConfigResolver, ConnectionSpec, EffectiveConfig};
