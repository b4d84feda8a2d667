//! Fixed-column report rendering.
//!
//! Each component declares an ordered table of [`Field`]s; the helpers here
//! turn those tables into the indented `name : value` layout and the
//! bracketed per-record lists used for ion columns.

use std::path::Path;

/// Indentation of a top-level row inside a component block.
pub const ROW_INDENT: &str = "    ";
/// Indentation of a nested row (per-record column of a composite attribute).
pub const NESTED_INDENT: &str = "        ";
/// Label width of top-level rows.
pub const LABEL_WIDTH: usize = 12;
/// Label width of nested rows.
pub const NESTED_LABEL_WIDTH: usize = 8;

/// A single value as it appears in a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Boolean flag, always rendered as `Yes`/`No`.
    Flag(bool),
    /// Floating point value.
    Real(f64),
    /// Integer value.
    Count(i64),
    /// Free text (paths, labels, enum spellings).
    Text(String),
    /// Optional value that was not supplied.
    Missing,
}

impl Scalar {
    /// Text for an optional path, `None` when absent.
    pub fn path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Scalar::Text(path.display().to_string()),
            None => Scalar::Missing,
        }
    }

    /// Natural rendering used by `name : value` rows.
    pub fn plain(&self) -> String {
        match self {
            Scalar::Flag(flag) => yes_no(*flag).to_string(),
            Scalar::Real(value) => format!("{value:?}"),
            Scalar::Count(value) => value.to_string(),
            Scalar::Text(text) => text.clone(),
            Scalar::Missing => "None".to_string(),
        }
    }

    /// Right-justified rendering; reals use `precision` decimals.
    pub fn fixed(&self, width: usize, precision: usize) -> String {
        match self {
            Scalar::Real(value) => format!("{value:>width$.precision$}"),
            other => format!("{:>width$}", other.plain()),
        }
    }

    /// Left-justified rendering; reals use `precision` decimals.
    pub fn left(&self, width: usize, precision: usize) -> String {
        match self {
            Scalar::Real(value) => format!("{value:<width$.precision$}"),
            other => format!("{:<width$}", other.plain()),
        }
    }
}

/// `Yes` or `No`.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// One named entry of a component's report table.
pub struct Field<T> {
    /// Attribute name printed as the row label.
    pub name: &'static str,
    /// Accessor producing the value to print.
    pub get: fn(&T) -> Scalar,
}

impl<T> Field<T> {
    /// Creates a field entry.
    pub const fn new(name: &'static str, get: fn(&T) -> Scalar) -> Self {
        Self { name, get }
    }
}

/// `    label        : value` with the top-level label width.
pub fn row(label: &str, value: &str) -> String {
    format!("{ROW_INDENT}{label:<LABEL_WIDTH$} : {value}")
}

/// Renders a titled block from a field table, without trailing whitespace.
pub fn section<T>(title: &str, value: &T, fields: &[Field<T>]) -> String {
    let mut out = format!("{title} :\n");
    for field in fields {
        out.push_str(&row(field.name, &(field.get)(value).plain()));
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Joins pre-formatted cells into a bracketed list: `open` + cells + ` ]`.
///
/// Cells are separated by commas with no trailing comma; the caller decides
/// the spacing carried by `open` and by each cell.
pub fn bracket(open: &str, cells: impl IntoIterator<Item = String>) -> String {
    let cells: Vec<String> = cells.into_iter().collect();
    format!("{open}{} ]", cells.join(","))
}

/// Layout of per-record column rows.
#[derive(Debug, Clone, Copy)]
pub struct ColumnLayout {
    /// Leading indentation of each row.
    pub indent: &'static str,
    /// Width the row label is padded to.
    pub label_width: usize,
    /// Text between ` : ` and the first cell.
    pub open: &'static str,
    /// Formats one cell, including any leading padding.
    pub cell: fn(&Scalar) -> String,
}

/// Renders one row per field, each listing that field across all records
/// in record order (the array-of-structs to struct-of-arrays direction).
pub fn record_columns<T>(records: &[T], fields: &[Field<T>], layout: ColumnLayout) -> Vec<String> {
    fields
        .iter()
        .map(|field| {
            let cells = records.iter().map(|record| (layout.cell)(&(field.get)(record)));
            format!(
                "{}{:<width$} : {}",
                layout.indent,
                field.name,
                bracket(layout.open, cells),
                width = layout.label_width
            )
        })
        .collect()
}

/// Joins component blocks with a blank line between them.
pub fn blocks(parts: impl IntoIterator<Item = String>) -> String {
    let parts: Vec<String> = parts.into_iter().collect();
    parts.join("\n\n").trim_end().to_string()
}
