//! Parameters shared by the fit and synthesis schemas: velocity grid,
//! opacity tables, photosphere source sampling and spectrum sampling.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::EsError;
use crate::report::{section, Field, Scalar};
use crate::Component;

/// Site directory holding the line lists and reference line file.
///
/// This is a deployment-specific location, not a portable default; other
/// installations should build their opacity with [`Opacity::with_data_dir`]
/// or supply `line_dir`/`ref_file` explicitly.
pub const DEFAULT_DATA_DIR: &str = "/project/projectdirs/snfactry/rthomas/local/share/es/";

/// Discretization of velocity space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// Wavelength bin width in the opacity grid.
    pub bin_width: f64,
    /// Number of velocity grid points.
    pub v_size: f64,
    /// Largest outer velocity the grid has to cover.
    pub v_outer_max: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            bin_width: 0.3,
            v_size: 100.0,
            v_outer_max: 30.0,
        }
    }
}

/// Partial [`Grid`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridParams {
    /// See [`Grid::bin_width`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_width: Option<f64>,
    /// See [`Grid::v_size`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_size: Option<f64>,
    /// See [`Grid::v_outer_max`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_outer_max: Option<f64>,
}

const GRID_FIELDS: &[Field<Grid>] = &[
    Field::new("bin_width", |g| Scalar::Real(g.bin_width)),
    Field::new("v_size", |g| Scalar::Real(g.v_size)),
    Field::new("v_outer_max", |g| Scalar::Real(g.v_outer_max)),
];

impl Component for Grid {
    const NAME: &'static str = "grid";
    type Params = GridParams;

    fn from_params(params: GridParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            bin_width: params.bin_width.unwrap_or(default.bin_width),
            v_size: params.v_size.unwrap_or(default.v_size),
            v_outer_max: params.v_outer_max.unwrap_or(default.v_outer_max),
        })
    }

    fn to_params(&self) -> GridParams {
        GridParams {
            bin_width: Some(self.bin_width),
            v_size: Some(self.v_size),
            v_outer_max: Some(self.v_outer_max),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, GRID_FIELDS)
    }
}

/// Functional form of the reference line opacity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpacityForm {
    /// Exponential in velocity.
    #[default]
    Exp,
    /// Power law in velocity.
    Power,
    /// User supplied profile.
    UserProfile,
}

impl OpacityForm {
    const ACCEPTED: &'static str = "exp, exponential, power, pow, user, user_profile";

    /// Parses the spellings accepted by the engine, ignoring case.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "exp" | "exponential" => Some(OpacityForm::Exp),
            "power" | "pow" => Some(OpacityForm::Power),
            "user" | "user_profile" => Some(OpacityForm::UserProfile),
            _ => None,
        }
    }

    /// Canonical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpacityForm::Exp => "exp",
            OpacityForm::Power => "power",
            OpacityForm::UserProfile => "user_profile",
        }
    }
}

impl fmt::Display for OpacityForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the line opacity tables live and how reference lines are profiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opacity {
    /// Directory of per-ion line lists.
    pub line_dir: PathBuf,
    /// Reference line file.
    pub ref_file: PathBuf,
    /// Opacity profile form.
    pub form: OpacityForm,
    /// Reference velocity of the profile.
    pub v_ref: f64,
    /// Lines weaker than this (log optical depth) are dropped.
    pub log_tau_min: f64,
}

impl Opacity {
    /// Default opacity settings with line data rooted at `dir`.
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            line_dir: dir.join("lines"),
            ref_file: dir.join("refs.dat"),
            form: OpacityForm::Exp,
            v_ref: 10.0,
            log_tau_min: -2.0,
        }
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}

/// Partial [`Opacity`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpacityParams {
    /// See [`Opacity::line_dir`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_dir: Option<PathBuf>,
    /// See [`Opacity::ref_file`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_file: Option<PathBuf>,
    /// Any spelling accepted by [`OpacityForm::parse`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    /// See [`Opacity::v_ref`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_ref: Option<f64>,
    /// See [`Opacity::log_tau_min`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tau_min: Option<f64>,
}

const OPACITY_FIELDS: &[Field<Opacity>] = &[
    Field::new("line_dir", |o| Scalar::path(Some(o.line_dir.as_path()))),
    Field::new("ref_file", |o| Scalar::path(Some(o.ref_file.as_path()))),
    Field::new("form", |o| Scalar::Text(o.form.to_string())),
    Field::new("v_ref", |o| Scalar::Real(o.v_ref)),
    Field::new("log_tau_min", |o| Scalar::Real(o.log_tau_min)),
];

impl Component for Opacity {
    const NAME: &'static str = "opacity";
    type Params = OpacityParams;

    fn from_params(params: OpacityParams) -> Result<Self, EsError> {
        let default = Self::default();
        let form = match params.form {
            Some(text) => OpacityForm::parse(&text).ok_or_else(|| {
                EsError::invalid_value(Self::NAME, "form", &text, OpacityForm::ACCEPTED)
            })?,
            None => default.form,
        };
        Ok(Self {
            line_dir: params.line_dir.unwrap_or(default.line_dir),
            ref_file: params.ref_file.unwrap_or(default.ref_file),
            form,
            v_ref: params.v_ref.unwrap_or(default.v_ref),
            log_tau_min: params.log_tau_min.unwrap_or(default.log_tau_min),
        })
    }

    fn to_params(&self) -> OpacityParams {
        OpacityParams {
            line_dir: Some(self.line_dir.clone()),
            ref_file: Some(self.ref_file.clone()),
            form: Some(self.form.as_str().to_string()),
            v_ref: Some(self.v_ref),
            log_tau_min: Some(self.log_tau_min),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, OPACITY_FIELDS)
    }
}

/// Angular sampling of the photosphere source function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Number of direction cosines sampled.
    pub mu_size: u32,
}

impl Default for Source {
    fn default() -> Self {
        Self { mu_size: 10 }
    }
}

/// Partial [`Source`] document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceParams {
    /// See [`Source::mu_size`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mu_size: Option<u32>,
}

const SOURCE_FIELDS: &[Field<Source>] =
    &[Field::new("mu_size", |s| Scalar::Count(i64::from(s.mu_size)))];

impl Component for Source {
    const NAME: &'static str = "source";
    type Params = SourceParams;

    fn from_params(params: SourceParams) -> Result<Self, EsError> {
        Ok(Self {
            mu_size: params.mu_size.unwrap_or(Self::default().mu_size),
        })
    }

    fn to_params(&self) -> SourceParams {
        SourceParams {
            mu_size: Some(self.mu_size),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, SOURCE_FIELDS)
    }
}

/// Sampling of the emergent spectrum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Number of impact parameters.
    pub p_size: u32,
    /// Divide out the continuum.
    pub flatten: bool,
}

impl Default for Spectrum {
    fn default() -> Self {
        Self {
            p_size: 60,
            flatten: false,
        }
    }
}

/// Partial [`Spectrum`] document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpectrumParams {
    /// See [`Spectrum::p_size`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_size: Option<u32>,
    /// See [`Spectrum::flatten`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flatten: Option<bool>,
}

const SPECTRUM_FIELDS: &[Field<Spectrum>] = &[
    Field::new("p_size", |s| Scalar::Count(i64::from(s.p_size))),
    Field::new("flatten", |s| Scalar::Flag(s.flatten)),
];

impl Component for Spectrum {
    const NAME: &'static str = "spectrum";
    type Params = SpectrumParams;

    fn from_params(params: SpectrumParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            p_size: params.p_size.unwrap_or(default.p_size),
            flatten: params.flatten.unwrap_or(default.flatten),
        })
    }

    fn to_params(&self) -> SpectrumParams {
        SpectrumParams {
            p_size: Some(self.p_size),
            flatten: Some(self.flatten),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, SPECTRUM_FIELDS)
    }
}

crate::impl_display!(Grid, Opacity, Source, Spectrum);
