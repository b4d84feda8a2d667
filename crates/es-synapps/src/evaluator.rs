use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use es_core::report::{
    record_columns, row, section, ColumnLayout, NESTED_INDENT, NESTED_LABEL_WIDTH,
};
use es_core::{export_column, take_column, Component, EsError, Field, Scalar};

/// Weighted wavelength interval of the fit objective.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Whether the region takes part in the objective.
    pub apply: bool,
    /// Weight applied to residuals inside the interval.
    pub weight: f64,
    /// Lower wavelength bound.
    pub lower: f64,
    /// Upper wavelength bound.
    pub upper: f64,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            apply: false,
            weight: 1.0,
            lower: 0.0,
            upper: 0.0,
        }
    }
}

/// Partial [`Region`] document (single record form).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionParams {
    /// See [`Region::apply`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<bool>,
    /// See [`Region::weight`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// See [`Region::lower`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// See [`Region::upper`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

const REGION_FIELDS: &[Field<Region>] = &[
    Field::new("apply", |r| Scalar::Flag(r.apply)),
    Field::new("weight", |r| Scalar::Real(r.weight)),
    Field::new("lower", |r| Scalar::Real(r.lower)),
    Field::new("upper", |r| Scalar::Real(r.upper)),
];

impl Component for Region {
    const NAME: &'static str = "region";
    type Params = RegionParams;

    fn from_params(params: RegionParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            apply: params.apply.unwrap_or(default.apply),
            weight: params.weight.unwrap_or(default.weight),
            lower: params.lower.unwrap_or(default.lower),
            upper: params.upper.unwrap_or(default.upper),
        })
    }

    fn to_params(&self) -> RegionParams {
        RegionParams {
            apply: Some(self.apply),
            weight: Some(self.weight),
            lower: Some(self.lower),
            upper: Some(self.upper),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, REGION_FIELDS)
    }
}

/// Regions in struct-of-arrays form; the `apply` column fixes the count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionColumns {
    /// `apply` of every region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply: Option<Vec<bool>>,
    /// `weight` of every region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Vec<f64>>,
    /// `lower` of every region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<f64>>,
    /// `upper` of every region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<f64>>,
}

/// Definition of the fit objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluator {
    /// Observed spectrum the fit is scored against.
    pub target_file: Option<PathBuf>,
    /// Order of the residual vector norm.
    pub vector_norm: u32,
    /// Weighted sub-intervals in document order.
    pub regions: Vec<Region>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            target_file: None,
            vector_norm: 2,
            regions: Vec::new(),
        }
    }
}

/// Partial [`Evaluator`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorParams {
    /// See [`Evaluator::target_file`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_file: Option<PathBuf>,
    /// See [`Evaluator::vector_norm`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_norm: Option<u32>,
    /// See [`Evaluator::regions`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<RegionColumns>,
}

const REGION_COLUMN_LAYOUT: ColumnLayout = ColumnLayout {
    indent: NESTED_INDENT,
    label_width: NESTED_LABEL_WIDTH,
    open: "[ ",
    cell: |s| s.fixed(8, 2),
};

fn zip_regions(columns: RegionColumns) -> Result<Vec<Region>, EsError> {
    const COMPONENT: &str = "evaluator.regions";
    let count = columns.apply.as_ref().map_or(0, Vec::len);
    let apply = take_column(COMPONENT, "apply", columns.apply, count)?;
    let weight = take_column(COMPONENT, "weight", columns.weight, count)?;
    let lower = take_column(COMPONENT, "lower", columns.lower, count)?;
    let upper = take_column(COMPONENT, "upper", columns.upper, count)?;
    tracing::trace!(regions = count, "zipped region columns");
    Ok((0..count)
        .map(|i| Region {
            apply: apply[i],
            weight: weight[i],
            lower: lower[i],
            upper: upper[i],
        })
        .collect())
}

impl Component for Evaluator {
    const NAME: &'static str = "evaluator";
    type Params = EvaluatorParams;

    fn from_params(params: EvaluatorParams) -> Result<Self, EsError> {
        let default = Self::default();
        let regions = match params.regions {
            Some(columns) => zip_regions(columns)?,
            None => default.regions,
        };
        Ok(Self {
            target_file: params.target_file.or(default.target_file),
            vector_norm: params.vector_norm.unwrap_or(default.vector_norm),
            regions,
        })
    }

    fn to_params(&self) -> EvaluatorParams {
        let regions = (!self.regions.is_empty()).then(|| RegionColumns {
            apply: export_column(&self.regions, |r| r.apply),
            weight: export_column(&self.regions, |r| r.weight),
            lower: export_column(&self.regions, |r| r.lower),
            upper: export_column(&self.regions, |r| r.upper),
        });
        EvaluatorParams {
            target_file: self.target_file.clone(),
            vector_norm: Some(self.vector_norm),
            regions,
        }
    }

    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} :", Self::NAME),
            row("target_file", &Scalar::path(self.target_file.as_deref()).plain()),
            row("vector_norm", &self.vector_norm.to_string()),
            row("regions", "").trim_end().to_string(),
        ];
        lines.extend(record_columns(&self.regions, REGION_FIELDS, REGION_COLUMN_LAYOUT));
        lines.join("\n").trim_end().to_string()
    }
}

es_core::impl_display!(Region, Evaluator);
