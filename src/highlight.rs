//! Cell highlighting for the dashboard tables.
//!
//! Two rules produce per-cell style strings:
//! - the biochemical panel is highlighted row by row when a reading crosses
//!   its abnormality threshold
//! - every other table is tinted with a constant color for its category
//!
//! Both rules are pure. They return style tokens and know nothing about HTML.

use crate::record::{BiochemicalReading, Parameter};

/// Style applied to every cell of an abnormal biochemical row
pub const ABNORMAL_STYLE: &str = "background-color: red";

impl Parameter {
    /// Whether `value` is clinically abnormal for this parameter.
    ///
    /// NaN never crosses a threshold and is reported as normal.
    pub fn is_abnormal(&self, value: f64) -> bool {
        match self {
            Parameter::Cholesterol => value >= 200.0,
            Parameter::Hdl => value <= 40.0,
            Parameter::Ldl => value >= 100.0,
            Parameter::Triglycerides => value >= 150.0,
            Parameter::BloodGlucose => value >= 100.0,
            Parameter::BloodPressure => value >= 120.0,
        }
    }
}

/// Classify a reading by parameter name. Unknown names are never abnormal.
pub fn is_abnormal(parameter: &str, value: f64) -> bool {
    Parameter::from_name(parameter)
        .map(|p| p.is_abnormal(value))
        .unwrap_or(false)
}

/// Style tokens for one biochemical row, one per column.
///
/// A matching row is highlighted across all of its cells, not only the value.
pub fn biochemical_row_styles(reading: &BiochemicalReading, columns: usize) -> Vec<String> {
    let style = if is_abnormal(&reading.parameter, reading.value) {
        ABNORMAL_STYLE
    } else {
        ""
    };
    vec![style.to_string(); columns]
}

/// Identity of a dashboard table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableCategory {
    Biochemical,
    Pharmacogenomics,
    RiskScore,
    FamilyHistory,
    Echo,
    Mri,
}

impl TableCategory {
    /// Constant tint for the category; the biochemical panel has none
    pub fn tint(&self) -> Option<&'static str> {
        match self {
            TableCategory::Biochemical => None,
            TableCategory::Pharmacogenomics => Some("lightblue"),
            TableCategory::RiskScore => Some("lightyellow"),
            TableCategory::FamilyHistory => Some("lightgreen"),
            TableCategory::Echo => Some("lightcoral"),
            TableCategory::Mri => Some("lightcyan"),
        }
    }

    /// Section heading used on the page
    pub fn title(&self) -> &'static str {
        match self {
            TableCategory::Biochemical => "Biochemical Parameters",
            TableCategory::Pharmacogenomics => "Pharmacogenomics",
            TableCategory::RiskScore => "Polygenic Risk Score",
            TableCategory::FamilyHistory => "Family History",
            TableCategory::Echo => "Echo Findings",
            TableCategory::Mri => "MRI Findings",
        }
    }

    /// Anchor id for the section
    pub fn slug(&self) -> &'static str {
        match self {
            TableCategory::Biochemical => "biochemical",
            TableCategory::Pharmacogenomics => "pharmacogenomics",
            TableCategory::RiskScore => "risk-score",
            TableCategory::FamilyHistory => "family-history",
            TableCategory::Echo => "echo",
            TableCategory::Mri => "mri",
        }
    }
}

/// Uniform tint styles for a `rows` x `cols` table of the given category.
pub fn tint_styles(category: TableCategory, rows: usize, cols: usize) -> Vec<Vec<String>> {
    let style = category
        .tint()
        .map(|color| format!("background-color: {}", color))
        .unwrap_or_default();
    vec![vec![style; cols]; rows]
}
