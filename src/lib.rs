//! Reader of legacy HOOMD configuration files (XML and GSD) which reconstructs
//! molecules from the bonded topology.
//!
//! The entry point is [ParticleSystem](core::ParticleSystem):
//!
//! ```no_run
//! use hoomd_reader::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut system = ParticleSystem::from_file("config.hoomdxml", &LoadOptions::default())?;
//! for (pattern, name) in system.unique_molecules().iter() {
//!     println!("{name}: {pattern}");
//! }
//! system.set_molecule_name_by_dictionary([("CH3CH2CH2CH2CH3", "pentane")]);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod io;

pub mod prelude {
    pub use crate::core::*;
    pub use crate::io::*;
}

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
