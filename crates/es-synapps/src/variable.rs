use serde::{Deserialize, Serialize};

use es_core::report::{ColumnLayout, NESTED_INDENT, NESTED_LABEL_WIDTH};
use es_core::{take_column, Component, EsError, Field, Scalar};

/// One fittable scalar with its search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Hold the value at `start` instead of fitting it.
    pub fixed: bool,
    /// Starting value of the search.
    pub start: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Characteristic step scale used by the optimizer.
    pub scale: f64,
}

impl Default for Variable {
    fn default() -> Self {
        Self {
            fixed: false,
            start: 1.0,
            lower: 0.0,
            upper: 10.0,
            scale: 1.0,
        }
    }
}

/// Partial [`Variable`] document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariableParams {
    /// See [`Variable::fixed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    /// See [`Variable::start`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// See [`Variable::lower`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// See [`Variable::upper`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// See [`Variable::scale`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

pub(crate) const VARIABLE_FIELDS: &[Field<Variable>] = &[
    Field::new("fixed", |v| Scalar::Flag(v.fixed)),
    Field::new("start", |v| Scalar::Real(v.start)),
    Field::new("lower", |v| Scalar::Real(v.lower)),
    Field::new("upper", |v| Scalar::Real(v.upper)),
    Field::new("scale", |v| Scalar::Real(v.scale)),
];

/// Nested per-ion rows: ` %6s` flags, ` %6.2f` numbers.
pub(crate) const ION_COLUMN_LAYOUT: ColumnLayout = ColumnLayout {
    indent: NESTED_INDENT,
    label_width: NESTED_LABEL_WIDTH,
    open: "[ ",
    cell: |s| format!(" {}", s.fixed(6, 2)),
};

impl Variable {
    /// Single-line form: `{ fixed:  No, start:   1.00, ... }`.
    pub fn inline(&self) -> String {
        let cells: Vec<String> = VARIABLE_FIELDS
            .iter()
            .map(|field| {
                let value = (field.get)(self);
                let text = match value {
                    Scalar::Flag(_) => value.fixed(3, 0),
                    _ => value.fixed(6, 2),
                };
                format!(" {:>5}: {text}", field.name)
            })
            .collect();
        format!("{{{} }}", cells.join(","))
    }
}

impl Component for Variable {
    const NAME: &'static str = "variable";
    type Params = VariableParams;

    fn from_params(params: VariableParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            fixed: params.fixed.unwrap_or(default.fixed),
            start: params.start.unwrap_or(default.start),
            lower: params.lower.unwrap_or(default.lower),
            upper: params.upper.unwrap_or(default.upper),
            scale: params.scale.unwrap_or(default.scale),
        })
    }

    fn to_params(&self) -> VariableParams {
        VariableParams {
            fixed: Some(self.fixed),
            start: Some(self.start),
            lower: Some(self.lower),
            upper: Some(self.upper),
            scale: Some(self.scale),
        }
    }

    fn render(&self) -> String {
        self.inline()
    }
}

/// Per-ion [`Variable`]s in struct-of-arrays form: one array per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariableColumns {
    /// `fixed` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Vec<bool>>,
    /// `start` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Vec<f64>>,
    /// `lower` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<f64>>,
    /// `upper` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<f64>>,
    /// `scale` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<f64>>,
}

impl VariableColumns {
    /// Zips the five columns of `attribute` into `count` variables.
    ///
    /// Every column must hold exactly `count` entries.
    pub fn into_variables(
        columns: Option<Self>,
        component: &str,
        attribute: &str,
        count: usize,
    ) -> Result<Vec<Variable>, EsError> {
        let columns = match columns {
            Some(columns) => columns,
            None if count == 0 => return Ok(Vec::new()),
            None => return Err(EsError::column_missing(component, attribute, count)),
        };
        let path = |field: &str| format!("{attribute}.{field}");
        let fixed = take_column(component, &path("fixed"), columns.fixed, count)?;
        let start = take_column(component, &path("start"), columns.start, count)?;
        let lower = take_column(component, &path("lower"), columns.lower, count)?;
        let upper = take_column(component, &path("upper"), columns.upper, count)?;
        let scale = take_column(component, &path("scale"), columns.scale, count)?;
        Ok((0..count)
            .map(|i| Variable {
                fixed: fixed[i],
                start: start[i],
                lower: lower[i],
                upper: upper[i],
                scale: scale[i],
            })
            .collect())
    }

    /// Splits variables back into columns; `None` when there are none.
    pub fn from_variables(variables: &[Variable]) -> Option<Self> {
        if variables.is_empty() {
            return None;
        }
        Some(Self {
            fixed: Some(variables.iter().map(|v| v.fixed).collect()),
            start: Some(variables.iter().map(|v| v.start).collect()),
            lower: Some(variables.iter().map(|v| v.lower).collect()),
            upper: Some(variables.iter().map(|v| v.upper).collect()),
            scale: Some(variables.iter().map(|v| v.scale).collect()),
        })
    }
}

es_core::impl_display!(Variable);
