//! Free and fixed parameters of a fit: the six global [`Variable`]s and
//! the per-ion variable sets.
//!
//! Documents carry ions as parallel columns (`ions`, `active`, `detach` and
//! one [`VariableColumns`] per ion variable); [`Config::create`] zips them
//! into one [`Ion`] per position and [`Config::to_params`] splits them back.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use es_core::report::{record_columns, row, ColumnLayout, LABEL_WIDTH, ROW_INDENT};
use es_core::{export_column, take_column, Component, EsError, Field, IonId, Scalar};

use crate::variable::{
    Variable, VariableColumns, VariableParams, ION_COLUMN_LAYOUT, VARIABLE_FIELDS,
};

/// One species of the fit with its five fittable profile parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ion {
    /// Species identifier.
    pub ion: IonId,
    /// Whether the species contributes to the spectrum.
    pub active: bool,
    /// Whether the species is detached from the photosphere.
    pub detach: bool,
    /// Log optical depth of the reference line.
    pub log_tau: Variable,
    /// Inner velocity cutoff.
    pub v_min: Variable,
    /// Outer velocity cutoff.
    pub v_max: Variable,
    /// Auxiliary profile parameter (e-folding velocity for exponential profiles).
    pub aux: Variable,
    /// Excitation temperature.
    pub temp: Variable,
}

/// Partial [`Ion`] document (single record form).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IonParams {
    /// See [`Ion::ion`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ion: Option<IonId>,
    /// See [`Ion::active`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// See [`Ion::detach`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detach: Option<bool>,
    /// See [`Ion::log_tau`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tau: Option<VariableParams>,
    /// See [`Ion::v_min`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_min: Option<VariableParams>,
    /// See [`Ion::v_max`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_max: Option<VariableParams>,
    /// See [`Ion::aux`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<VariableParams>,
    /// See [`Ion::temp`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<VariableParams>,
}

const ION_FIELDS: &[Field<Ion>] = &[
    Field::new("ions", |i| Scalar::Text(i.ion.to_string())),
    Field::new("active", |i| Scalar::Flag(i.active)),
    Field::new("detach", |i| Scalar::Flag(i.detach)),
];

const ION_VARIABLES: [(&str, fn(&Ion) -> Variable); 5] = [
    ("log_tau", |i| i.log_tau),
    ("v_min", |i| i.v_min),
    ("v_max", |i| i.v_max),
    ("aux", |i| i.aux),
    ("temp", |i| i.temp),
];

impl Component for Ion {
    const NAME: &'static str = "ion";
    type Params = IonParams;

    fn from_params(params: IonParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            ion: params.ion.unwrap_or(default.ion),
            active: params.active.unwrap_or(default.active),
            detach: params.detach.unwrap_or(default.detach),
            log_tau: Variable::create(params.log_tau)?,
            v_min: Variable::create(params.v_min)?,
            v_max: Variable::create(params.v_max)?,
            aux: Variable::create(params.aux)?,
            temp: Variable::create(params.temp)?,
        })
    }

    fn to_params(&self) -> IonParams {
        IonParams {
            ion: Some(self.ion.clone()),
            active: Some(self.active),
            detach: Some(self.detach),
            log_tau: Some(self.log_tau.to_params()),
            v_min: Some(self.v_min.to_params()),
            v_max: Some(self.v_max.to_params()),
            aux: Some(self.aux.to_params()),
            temp: Some(self.temp.to_params()),
        }
    }

    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} :", Self::NAME),
            row("ion", &self.ion.to_string()),
            row("active", es_core::report::yes_no(self.active)),
            row("detach", es_core::report::yes_no(self.detach)),
        ];
        for (name, get) in ION_VARIABLES {
            lines.push(row(name, &get(self).inline()));
        }
        lines.join("\n")
    }
}

/// Parameters of a whole fit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the engine writes the best fit.
    pub fit_file: Option<PathBuf>,
    /// Evaluation cache shared between runs.
    pub cache_file: Option<PathBuf>,
    /// Constant term of the continuum warping polynomial.
    pub a0: Variable,
    /// Linear term of the continuum warping polynomial.
    pub a1: Variable,
    /// Quadratic term of the continuum warping polynomial.
    pub a2: Variable,
    /// Photospheric velocity.
    pub v_phot: Variable,
    /// Outer velocity of the line forming region.
    pub v_outer: Variable,
    /// Photospheric blackbody temperature.
    pub t_phot: Variable,
    /// Species in document order.
    pub ions: Vec<Ion>,
}

/// Partial [`Config`] document; ions are given column-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigParams {
    /// See [`Config::fit_file`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_file: Option<PathBuf>,
    /// See [`Config::cache_file`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
    /// See [`Config::a0`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a0: Option<VariableParams>,
    /// See [`Config::a1`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a1: Option<VariableParams>,
    /// See [`Config::a2`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a2: Option<VariableParams>,
    /// See [`Config::v_phot`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_phot: Option<VariableParams>,
    /// See [`Config::v_outer`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_outer: Option<VariableParams>,
    /// See [`Config::t_phot`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_phot: Option<VariableParams>,
    /// Species identifiers; their count fixes the length of every other ion column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ions: Option<Vec<IonId>>,
    /// `active` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Vec<bool>>,
    /// `detach` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detach: Option<Vec<bool>>,
    /// `log_tau` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tau: Option<VariableColumns>,
    /// `v_min` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_min: Option<VariableColumns>,
    /// `v_max` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_max: Option<VariableColumns>,
    /// `aux` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<VariableColumns>,
    /// `temp` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<VariableColumns>,
}

/// Top-level `ions`/`active`/`detach` rows: ` %6s` cells.
const CONFIG_ROW_LAYOUT: ColumnLayout = ColumnLayout {
    indent: ROW_INDENT,
    label_width: LABEL_WIDTH,
    open: "[ ",
    cell: |s| format!(" {}", s.fixed(6, 2)),
};

impl Config {
    fn global_variables(&self) -> [(&'static str, &Variable); 6] {
        [
            ("a0", &self.a0),
            ("a1", &self.a1),
            ("a2", &self.a2),
            ("v_phot", &self.v_phot),
            ("v_outer", &self.v_outer),
            ("t_phot", &self.t_phot),
        ]
    }

    fn zip_ions(params: &mut ConfigParams) -> Result<Vec<Ion>, EsError> {
        let component = Self::NAME;
        let ions = params.ions.take().unwrap_or_default();
        let count = ions.len();
        let active = take_column(component, "active", params.active.take(), count)?;
        let detach = take_column(component, "detach", params.detach.take(), count)?;
        let variables = |columns: Option<VariableColumns>, attribute: &str| {
            VariableColumns::into_variables(columns, component, attribute, count)
        };
        let log_tau = variables(params.log_tau.take(), "log_tau")?;
        let v_min = variables(params.v_min.take(), "v_min")?;
        let v_max = variables(params.v_max.take(), "v_max")?;
        let aux = variables(params.aux.take(), "aux")?;
        let temp = variables(params.temp.take(), "temp")?;
        tracing::trace!(ions = count, "zipped ion columns");
        Ok(ions
            .into_iter()
            .enumerate()
            .map(|(i, ion)| Ion {
                ion,
                active: active[i],
                detach: detach[i],
                log_tau: log_tau[i],
                v_min: v_min[i],
                v_max: v_max[i],
                aux: aux[i],
                temp: temp[i],
            })
            .collect())
    }
}

impl Component for Config {
    const NAME: &'static str = "config";
    type Params = ConfigParams;

    fn from_params(mut params: ConfigParams) -> Result<Self, EsError> {
        let ions = Self::zip_ions(&mut params)?;
        Ok(Self {
            fit_file: params.fit_file,
            cache_file: params.cache_file,
            a0: Variable::create(params.a0)?,
            a1: Variable::create(params.a1)?,
            a2: Variable::create(params.a2)?,
            v_phot: Variable::create(params.v_phot)?,
            v_outer: Variable::create(params.v_outer)?,
            t_phot: Variable::create(params.t_phot)?,
            ions,
        })
    }

    fn to_params(&self) -> ConfigParams {
        let column = |get: fn(&Ion) -> Variable| {
            let variables: Vec<Variable> = self.ions.iter().map(get).collect();
            VariableColumns::from_variables(&variables)
        };
        ConfigParams {
            fit_file: self.fit_file.clone(),
            cache_file: self.cache_file.clone(),
            a0: Some(self.a0.to_params()),
            a1: Some(self.a1.to_params()),
            a2: Some(self.a2.to_params()),
            v_phot: Some(self.v_phot.to_params()),
            v_outer: Some(self.v_outer.to_params()),
            t_phot: Some(self.t_phot.to_params()),
            ions: export_column(&self.ions, |ion| ion.ion.clone()),
            active: export_column(&self.ions, |ion| ion.active),
            detach: export_column(&self.ions, |ion| ion.detach),
            log_tau: column(ION_VARIABLES[0].1),
            v_min: column(ION_VARIABLES[1].1),
            v_max: column(ION_VARIABLES[2].1),
            aux: column(ION_VARIABLES[3].1),
            temp: column(ION_VARIABLES[4].1),
        }
    }

    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} :", Self::NAME),
            row("fit_file", &Scalar::path(self.fit_file.as_deref()).plain()),
            row("cache_file", &Scalar::path(self.cache_file.as_deref()).plain()),
            String::new(),
        ];
        for (name, variable) in self.global_variables() {
            lines.push(row(name, &variable.inline()));
        }
        lines.push(String::new());
        lines.extend(record_columns(&self.ions, ION_FIELDS, CONFIG_ROW_LAYOUT));
        lines.push(String::new());
        for (name, get) in ION_VARIABLES {
            let variables: Vec<Variable> = self.ions.iter().map(get).collect();
            lines.push(row(name, "").trim_end().to_string());
            lines.extend(record_columns(&variables, VARIABLE_FIELDS, ION_COLUMN_LAYOUT));
        }
        lines.join("\n").trim_end().to_string()
    }
}

es_core::impl_display!(Ion, Config);

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(values: &[f64]) -> VariableColumns {
        VariableColumns {
            fixed: Some(vec![false; values.len()]),
            start: Some(values.to_vec()),
            lower: Some(vec![0.0; values.len()]),
            upper: Some(vec![50.0; values.len()]),
            scale: Some(vec![1.0; values.len()]),
        }
    }

    fn two_ion_params() -> ConfigParams {
        ConfigParams {
            ions: Some(vec![IonId::from(1401), IonId::from(2001)]),
            active: Some(vec![true, false]),
            detach: Some(vec![false, true]),
            log_tau: Some(columns(&[0.5, -1.0])),
            v_min: Some(columns(&[10.0, 12.0])),
            v_max: Some(columns(&[30.0, 30.0])),
            aux: Some(columns(&[1.0, 2.0])),
            temp: Some(columns(&[7.0, 9.0])),
            ..ConfigParams::default()
        }
    }

    #[test]
    fn ions_zip_positionally() {
        let config = Config::create(Some(two_ion_params())).expect("config");
        assert_eq!(config.ions.len(), 2);
        assert_eq!(config.ions[0].ion, IonId::from(1401));
        assert!(config.ions[1].detach);
        assert_eq!(config.ions[1].log_tau.start, -1.0);
        assert_eq!(config.ions[0].v_min.start, 10.0);
        assert_eq!(config.a0, Variable::default());
    }

    #[test]
    fn missing_ion_column_is_structural() {
        let mut params = two_ion_params();
        params.temp = None;
        let err = Config::create(Some(params)).unwrap_err();
        assert_eq!(err.info().code, "column_missing");
        assert_eq!(err.field_path().as_deref(), Some("config.temp"));
    }

    #[test]
    fn report_lists_ions_column_wise() {
        let config = Config::create(Some(two_ion_params())).expect("config");
        let text = config.render();
        assert!(text.contains("\n    ions         : [    1401,   2001 ]\n"));
        assert!(text.contains("\n    active       : [     Yes,     No ]\n"));
        assert!(text.contains("\n    log_tau      :\n        fixed    : [      No,     No ]\n        start    : [    0.50,  -1.00 ]\n"));
    }

    #[test]
    fn default_report_has_empty_lists() {
        let text = Config::default().render();
        assert!(text.starts_with("config :\n    fit_file     : None\n    cache_file   : None\n\n    a0           : { fixed:  No,"));
        assert!(text.contains("\n    ions         : [  ]\n"));
        assert!(text.ends_with("        scale    : [  ]"));
    }

    #[test]
    fn single_ion_report() {
        let ion = Ion {
            ion: IonId::from("SiII"),
            active: true,
            ..Ion::default()
        };
        let text = ion.render();
        assert!(text.starts_with("ion :\n    ion          : SiII\n    active       : Yes\n    detach       : No\n"));
        assert!(text.ends_with("    temp         : { fixed:  No, start:   1.00, lower:   0.00, upper:  10.00, scale:   1.00 }"));
    }
}
