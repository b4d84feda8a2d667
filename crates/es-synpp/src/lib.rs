#![deny(missing_docs)]
#![doc = "Synthesis configuration schema: output sampling and a list of setups, each with its own species, composed with the common ES parameters."]

/// Output wavelength sampling.
pub mod output;
pub mod setup;
/// Root synthesis job.
pub mod synpp;

pub use es_core::{Component, EsError};
pub use output::{Output, OutputParams};
pub use setup::{Ion, IonParams, Setup, SetupParams};
pub use synpp::{Synpp, SynppParams};
