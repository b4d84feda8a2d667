#![deny(missing_docs)]
#![doc = "Fit configuration schema: evaluator regions, fit variables and per-ion variable sets composed with the common ES parameters."]

/// Fit parameters and per-ion variable sets.
pub mod config;
/// Fit objective and its weighted regions.
pub mod evaluator;
/// Root fit job.
pub mod synapps;
/// Fittable scalars.
pub mod variable;

pub use config::{Config, ConfigParams, Ion, IonParams};
pub use es_core::{Component, EsError};
pub use evaluator::{Evaluator, EvaluatorParams, Region, RegionColumns, RegionParams};
pub use synapps::{Synapps, SynappsParams};
pub use variable::{Variable, VariableColumns, VariableParams};
