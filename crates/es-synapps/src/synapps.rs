use serde::{Deserialize, Serialize};
use serde_json::Value;

use es_core::report::blocks;
use es_core::serde::{from_json_value, from_yaml_str, to_json_value, to_yaml_string};
use es_core::{
    Component, EsError, Grid, GridParams, Opacity, OpacityParams, Source, SourceParams, Spectrum,
    SpectrumParams,
};

use crate::config::{Config, ConfigParams};
use crate::evaluator::{Evaluator, EvaluatorParams};

/// A complete fit job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Synapps {
    /// Velocity grid.
    pub grid: Grid,
    /// Opacity tables.
    pub opacity: Opacity,
    /// Photosphere sampling.
    pub source: Source,
    /// Spectrum sampling.
    pub spectrum: Spectrum,
    /// Fit objective.
    pub evaluator: Evaluator,
    /// Fit parameters.
    pub config: Config,
}

/// Partial [`Synapps`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynappsParams {
    /// See [`Synapps::grid`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridParams>,
    /// See [`Synapps::opacity`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<OpacityParams>,
    /// See [`Synapps::source`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceParams>,
    /// See [`Synapps::spectrum`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<SpectrumParams>,
    /// See [`Synapps::evaluator`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluator: Option<EvaluatorParams>,
    /// See [`Synapps::config`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ConfigParams>,
}

impl Component for Synapps {
    const NAME: &'static str = "synapps";
    type Params = SynappsParams;

    fn from_params(params: SynappsParams) -> Result<Self, EsError> {
        Ok(Self {
            grid: Grid::create(params.grid)?,
            opacity: Opacity::create(params.opacity)?,
            source: Source::create(params.source)?,
            spectrum: Spectrum::create(params.spectrum)?,
            evaluator: Evaluator::create(params.evaluator)?,
            config: Config::create(params.config)?,
        })
    }

    fn to_params(&self) -> SynappsParams {
        SynappsParams {
            grid: Some(self.grid.to_params()),
            opacity: Some(self.opacity.to_params()),
            source: Some(self.source.to_params()),
            spectrum: Some(self.spectrum.to_params()),
            evaluator: Some(self.evaluator.to_params()),
            config: Some(self.config.to_params()),
        }
    }

    fn render(&self) -> String {
        blocks([
            self.grid.render(),
            self.opacity.render(),
            self.source.render(),
            self.spectrum.render(),
            self.evaluator.render(),
            self.config.render(),
        ])
    }
}

impl Synapps {
    /// Builds a fit job from YAML text; a null document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, EsError> {
        let params: Option<SynappsParams> = from_yaml_str(Self::NAME, text)?;
        Self::create(params)
    }

    /// Builds a fit job from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, EsError> {
        let params: Option<SynappsParams> = from_json_value(Self::NAME, value)?;
        Self::create(params)
    }

    /// Fully specified YAML document for this job.
    pub fn to_yaml_string(&self) -> Result<String, EsError> {
        to_yaml_string(Self::NAME, &self.to_params())
    }

    /// Fully specified JSON document for this job.
    pub fn to_json_value(&self) -> Result<Value, EsError> {
        to_json_value(Self::NAME, &self.to_params())
    }
}

es_core::impl_display!(Synapps);
