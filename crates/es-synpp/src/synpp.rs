use serde::{Deserialize, Serialize};
use serde_json::Value;

use es_core::report::blocks;
use es_core::serde::{from_json_value, from_yaml_str, to_json_value, to_yaml_string};
use es_core::{
    Component, EsError, Grid, GridParams, Opacity, OpacityParams, Source, SourceParams, Spectrum,
    SpectrumParams,
};

use crate::output::{Output, OutputParams};
use crate::setup::{Setup, SetupParams};

/// A complete synthesis job: shared parameters and at least one setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synpp {
    /// Output wavelength sampling.
    pub output: Output,
    /// Velocity grid.
    pub grid: Grid,
    /// Opacity tables.
    pub opacity: Opacity,
    /// Photosphere sampling.
    pub source: Source,
    /// Spectrum sampling.
    pub spectrum: Spectrum,
    /// Synthesis scenarios in document order; never empty.
    pub setups: Vec<Setup>,
}

impl Default for Synpp {
    fn default() -> Self {
        Self {
            output: Output::default(),
            grid: Grid::default(),
            opacity: Opacity::default(),
            source: Source::default(),
            spectrum: Spectrum::default(),
            setups: vec![Setup::default()],
        }
    }
}

/// Partial [`Synpp`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynppParams {
    /// See [`Synpp::output`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputParams>,
    /// See [`Synpp::grid`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridParams>,
    /// See [`Synpp::opacity`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<OpacityParams>,
    /// See [`Synpp::source`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceParams>,
    /// See [`Synpp::spectrum`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<SpectrumParams>,
    /// Partial setups; a null entry stands for a default setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setups: Option<Vec<Option<SetupParams>>>,
}

/// Builds the setup list; an absent or empty list yields one default setup.
fn create_setups(entries: Option<Vec<Option<SetupParams>>>) -> Result<Vec<Setup>, EsError> {
    let entries = entries.unwrap_or_default();
    if entries.is_empty() {
        tracing::debug!("no setups supplied, using a single default setup");
        return Ok(vec![Setup::default()]);
    }
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Setup::create(entry)
                .map_err(|err| err.with_context("component", format!("setups[{index}]")))
        })
        .collect()
}

impl Component for Synpp {
    const NAME: &'static str = "synpp";
    type Params = SynppParams;

    fn from_params(params: SynppParams) -> Result<Self, EsError> {
        Ok(Self {
            output: Output::create(params.output)?,
            grid: Grid::create(params.grid)?,
            opacity: Opacity::create(params.opacity)?,
            source: Source::create(params.source)?,
            spectrum: Spectrum::create(params.spectrum)?,
            setups: create_setups(params.setups)?,
        })
    }

    fn to_params(&self) -> SynppParams {
        SynppParams {
            output: Some(self.output.to_params()),
            grid: Some(self.grid.to_params()),
            opacity: Some(self.opacity.to_params()),
            source: Some(self.source.to_params()),
            spectrum: Some(self.spectrum.to_params()),
            setups: Some(
                self.setups
                    .iter()
                    .map(|setup| Some(setup.to_params()))
                    .collect(),
            ),
        }
    }

    fn render(&self) -> String {
        let mut setups = vec!["setups :".to_string()];
        setups.extend(self.setups.iter().map(Setup::render));
        blocks([
            self.output.render(),
            self.grid.render(),
            self.opacity.render(),
            self.source.render(),
            self.spectrum.render(),
            setups.join("\n"),
        ])
    }
}

impl Synpp {
    /// Builds a synthesis job from YAML text; a null document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, EsError> {
        let params: Option<SynppParams> = from_yaml_str(Self::NAME, text)?;
        Self::create(params)
    }

    /// Builds a synthesis job from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, EsError> {
        let params: Option<SynppParams> = from_json_value(Self::NAME, value)?;
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

es_core::impl_display!(Synpp);
