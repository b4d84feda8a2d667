use serde::{Deserialize, Serialize};

use es_core::report::section;
use es_core::{Component, EsError, Field, Scalar};

/// Wavelength range and sampling of the synthetic spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Shortest wavelength written.
    pub min_wl: f64,
    /// Longest wavelength written.
    pub max_wl: f64,
    /// Wavelength step between output bins.
    pub wl_step: f64,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            min_wl: 2500.0,
            max_wl: 10000.0,
            wl_step: 5.0,
        }
    }
}

/// Partial [`Output`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputParams {
    /// See [`Output::min_wl`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_wl: Option<f64>,
    /// See [`Output::max_wl`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wl: Option<f64>,
    /// See [`Output::wl_step`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wl_step: Option<f64>,
}

const OUTPUT_FIELDS: &[Field<Output>] = &[
    Field::new("min_wl", |o| Scalar::Real(o.min_wl)),
    Field::new("max_wl", |o| Scalar::Real(o.max_wl)),
    Field::new("wl_step", |o| Scalar::Real(o.wl_step)),
];

impl Component for Output {
    const NAME: &'static str = "output";
    type Params = OutputParams;

    fn from_params(params: OutputParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            min_wl: params.min_wl.unwrap_or(default.min_wl),
            max_wl: params.max_wl.unwrap_or(default.max_wl),
            wl_step: params.wl_step.unwrap_or(default.wl_step),
        })
    }

    fn to_params(&self) -> OutputParams {
        OutputParams {
            min_wl: Some(self.min_wl),
            max_wl: Some(self.max_wl),
            wl_step: Some(self.wl_step),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, OUTPUT_FIELDS)
    }
}

es_core::impl_display!(Output);
