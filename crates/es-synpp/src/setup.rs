//! One synthesis scenario: photosphere parameters plus the species list.
//!
//! Species arrive column-wise (`ions`, `active`, `log_tau`, `v_min`,
//! `v_max`, `aux`, `temp`), one plain value per ion in each column.

use serde::{Deserialize, Serialize};

use es_core::report::{
    record_columns, section, ColumnLayout, NESTED_INDENT, NESTED_LABEL_WIDTH, ROW_INDENT,
};
use es_core::{export_column, take_column, Component, EsError, Field, IonId, Scalar};

/// A species taking part in a synthesis setup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ion {
    /// Species identifier.
    pub ion: IonId,
    /// Whether the species contributes to the spectrum.
    pub active: bool,
    /// Log optical depth of the reference line.
    pub log_tau: f64,
    /// Inner velocity cutoff.
    pub v_min: f64,
    /// Outer velocity cutoff.
    pub v_max: f64,
    /// Auxiliary profile parameter.
    pub aux: f64,
    /// Excitation temperature.
    pub temp: f64,
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
    /// See [`Ion::log_tau`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tau: Option<f64>,
    /// See [`Ion::v_min`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_min: Option<f64>,
    /// See [`Ion::v_max`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_max: Option<f64>,
    /// See [`Ion::aux`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<f64>,
    /// See [`Ion::temp`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

const ION_FIELDS: &[Field<Ion>] = &[
    Field::new("ion", |i| Scalar::Text(i.ion.to_string())),
    Field::new("active", |i| Scalar::Flag(i.active)),
    Field::new("log_tau", |i| Scalar::Real(i.log_tau)),
    Field::new("v_min", |i| Scalar::Real(i.v_min)),
    Field::new("v_max", |i| Scalar::Real(i.v_max)),
    Field::new("aux", |i| Scalar::Real(i.aux)),
    Field::new("temp", |i| Scalar::Real(i.temp)),
];

// Same columns as ION_FIELDS; the identifier row is labelled after the document key.
const ION_COLUMNS: &[Field<Ion>] = &[
    Field::new("ions", |i| Scalar::Text(i.ion.to_string())),
    Field::new("active", |i| Scalar::Flag(i.active)),
    Field::new("log_tau", |i| Scalar::Real(i.log_tau)),
    Field::new("v_min", |i| Scalar::Real(i.v_min)),
    Field::new("v_max", |i| Scalar::Real(i.v_max)),
    Field::new("aux", |i| Scalar::Real(i.aux)),
    Field::new("temp", |i| Scalar::Real(i.temp)),
];

const ION_COLUMN_LAYOUT: ColumnLayout = ColumnLayout {
    indent: NESTED_INDENT,
    label_width: NESTED_LABEL_WIDTH,
    open: "[",
    cell: |s| format!(" {}", s.fixed(6, 2)),
};

impl Component for Ion {
    const NAME: &'static str = "ion";
    type Params = IonParams;

    fn from_params(params: IonParams) -> Result<Self, EsError> {
        let default = Self::default();
        Ok(Self {
            ion: params.ion.unwrap_or(default.ion),
            active: params.active.unwrap_or(default.active),
            log_tau: params.log_tau.unwrap_or(default.log_tau),
            v_min: params.v_min.unwrap_or(default.v_min),
            v_max: params.v_max.unwrap_or(default.v_max),
            aux: params.aux.unwrap_or(default.aux),
            temp: params.temp.unwrap_or(default.temp),
        })
    }

    fn to_params(&self) -> IonParams {
        IonParams {
            ion: Some(self.ion.clone()),
            active: Some(self.active),
            log_tau: Some(self.log_tau),
            v_min: Some(self.v_min),
            v_max: Some(self.v_max),
            aux: Some(self.aux),
            temp: Some(self.temp),
        }
    }

    fn render(&self) -> String {
        section(Self::NAME, self, ION_FIELDS)
    }
}

/// Photosphere parameters and species of one synthetic spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    /// Constant term of the continuum warping polynomial.
    pub a0: f64,
    /// Linear term of the continuum warping polynomial.
    pub a1: f64,
    /// Quadratic term of the continuum warping polynomial.
    pub a2: f64,
    /// Photospheric velocity.
    pub v_phot: f64,
    /// Outer velocity of the line forming region.
    pub v_outer: f64,
    /// Photospheric temperature.
    pub t_phot: f64,
    /// Species in document order.
    pub ions: Vec<Ion>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
            v_phot: 10.0,
            v_outer: 30.0,
            t_phot: 10.0,
            ions: Vec::new(),
        }
    }
}

/// Partial [`Setup`] document; ions are given column-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupParams {
    /// See [`Setup::a0`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a0: Option<f64>,
    /// See [`Setup::a1`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a1: Option<f64>,
    /// See [`Setup::a2`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a2: Option<f64>,
    /// See [`Setup::v_phot`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_phot: Option<f64>,
    /// See [`Setup::v_outer`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_outer: Option<f64>,
    /// See [`Setup::t_phot`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t_phot: Option<f64>,
    /// Species identifiers; their count fixes the length of every other ion column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ions: Option<Vec<IonId>>,
    /// `active` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<Vec<bool>>,
    /// `log_tau` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_tau: Option<Vec<f64>>,
    /// `v_min` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_min: Option<Vec<f64>>,
    /// `v_max` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub v_max: Option<Vec<f64>>,
    /// `aux` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aux: Option<Vec<f64>>,
    /// `temp` of every ion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<Vec<f64>>,
}

impl Setup {
    fn scalars(&self) -> [(&'static str, f64); 6] {
        [
            ("a0", self.a0),
            ("a1", self.a1),
            ("a2", self.a2),
            ("v_phot", self.v_phot),
            ("v_outer", self.v_outer),
            ("t_phot", self.t_phot),
        ]
    }

    fn zip_ions(params: &mut SetupParams) -> Result<Vec<Ion>, EsError> {
        let component = Self::NAME;
        let ions = params.ions.take().unwrap_or_default();
        let count = ions.len();
        let active = take_column(component, "active", params.active.take(), count)?;
        let log_tau = take_column(component, "log_tau", params.log_tau.take(), count)?;
        let v_min = take_column(component, "v_min", params.v_min.take(), count)?;
        let v_max = take_column(component, "v_max", params.v_max.take(), count)?;
        let aux = take_column(component, "aux", params.aux.take(), count)?;
        let temp = take_column(component, "temp", params.temp.take(), count)?;
        tracing::trace!(ions = count, "zipped setup ion columns");
        Ok(ions
            .into_iter()
            .enumerate()
            .map(|(i, ion)| Ion {
                ion,
                active: active[i],
                log_tau: log_tau[i],
                v_min: v_min[i],
                v_max: v_max[i],
                aux: aux[i],
                temp: temp[i],
            })
            .collect())
    }
}

impl Component for Setup {
    const NAME: &'static str = "setup";
    type Params = SetupParams;

    fn from_params(mut params: SetupParams) -> Result<Self, EsError> {
        let ions = Self::zip_ions(&mut params)?;
        let default = Self::default();
        Ok(Self {
            a0: params.a0.unwrap_or(default.a0),
            a1: params.a1.unwrap_or(default.a1),
            a2: params.a2.unwrap_or(default.a2),
            v_phot: params.v_phot.unwrap_or(default.v_phot),
            v_outer: params.v_outer.unwrap_or(default.v_outer),
            t_phot: params.t_phot.unwrap_or(default.t_phot),
            ions,
        })
    }

    fn to_params(&self) -> SetupParams {
        SetupParams {
            a0: Some(self.a0),
            a1: Some(self.a1),
            a2: Some(self.a2),
            v_phot: Some(self.v_phot),
            v_outer: Some(self.v_outer),
            t_phot: Some(self.t_phot),
            ions: export_column(&self.ions, |ion| ion.ion.clone()),
            active: export_column(&self.ions, |ion| ion.active),
            log_tau: export_column(&self.ions, |ion| ion.log_tau),
            v_min: export_column(&self.ions, |ion| ion.v_min),
            v_max: export_column(&self.ions, |ion| ion.v_max),
            aux: export_column(&self.ions, |ion| ion.aux),
            temp: export_column(&self.ions, |ion| ion.temp),
        }
    }

    /// Renders as an entry of the `setups :` list: the first row carries the
    /// `-` marker, values are left-aligned `%-6.2f`.
    fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .scalars()
            .into_iter()
            .enumerate()
            .map(|(idx, (name, value))| {
                let marker = if idx == 0 { "-   " } else { "    " };
                format!(
                    "{ROW_INDENT}{marker}{name:<NESTED_LABEL_WIDTH$} : {}",
                    Scalar::Real(value).left(6, 2)
                )
            })
            .collect();
        lines.extend(record_columns(&self.ions, ION_COLUMNS, ION_COLUMN_LAYOUT));
        lines.join("\n").trim_end().to_string()
    }
}

es_core::impl_display!(Ion, Setup);

#[cfg(test)]
mod tests {
    use super::*;

    fn silicon() -> SetupParams {
        SetupParams {
            ions: Some(vec![IonId::from("SiII")]),
            active: Some(vec![true]),
            log_tau: Some(vec![0.5]),
            v_min: Some(vec![8.0]),
            v_max: Some(vec![20.0]),
            aux: Some(vec![0.0]),
            temp: Some(vec![10000.0]),
            ..SetupParams::default()
        }
    }

    #[test]
    fn single_ion_columns_zip_into_one_record() {
        let setup = Setup::create(Some(silicon())).expect("setup");
        assert_eq!(
            setup.ions,
            vec![Ion {
                ion: IonId::from("SiII"),
                active: true,
                log_tau: 0.5,
                v_min: 8.0,
                v_max: 20.0,
                aux: 0.0,
                temp: 10000.0,
            }]
        );
        assert_eq!(setup.v_phot, 10.0);
    }

    #[test]
    fn short_column_is_structural() {
        let mut params = silicon();
        params.temp = Some(Vec::new());
        let err = Setup::create(Some(params)).unwrap_err();
        assert_eq!(err.info().code, "column_length");
        assert_eq!(err.field_path().as_deref(), Some("setup.temp"));
    }

    #[test]
    fn default_report() {
        let text = Setup::default().render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    -   a0       : 1.00  ");
        assert_eq!(lines[1], "        a1       : 0.00  ");
        assert_eq!(lines[5], "        t_phot   : 10.00 ");
        assert_eq!(lines[6], "        ions     : [ ]");
        assert_eq!(lines.len(), 13);
    }

    #[test]
    fn ion_rows_list_every_species() {
        let mut params = silicon();
        params.ions = Some(vec![IonId::from("SiII"), IonId::from(2001)]);
        params.active = Some(vec![true, false]);
        params.log_tau = Some(vec![0.5, -1.25]);
        params.v_min = Some(vec![8.0, 9.0]);
        params.v_max = Some(vec![20.0, 25.0]);
        params.aux = Some(vec![0.0, 1.0]);
        params.temp = Some(vec![10000.0, 7.5]);
        let text = Setup::create(Some(params)).expect("setup").render();
        assert!(text.contains("\n        ions     : [   SiII,   2001 ]\n"));
        assert!(text.contains("\n        active   : [    Yes,     No ]\n"));
        assert!(text.contains("\n        log_tau  : [   0.50,  -1.25 ]\n"));
        assert!(text.ends_with("        temp     : [ 10000.00,   7.50 ]"));
    }

    #[test]
    fn single_ion_report() {
        let ion = Ion::create(Some(IonParams {
            ion: Some(IonId::from("CaII")),
            temp: Some(8.0),
            ..IonParams::default()
        }))
        .expect("ion");
        assert_eq!(
            ion.render(),
            "ion :\n    ion          : CaII\n    active       : No\n    log_tau      : 0.0\n    v_min        : 0.0\n    v_max        : 0.0\n    aux          : 0.0\n    temp         : 8.0"
        );
    }
}
