//! In-memory clinical record for a single patient.
//!
//! Every table is built once from literals and never mutated afterwards. The
//! presentation layer borrows a [`ClinicalRecord`] and derives its views from
//! it; nothing downstream holds on to the record past a page render.

use serde::Serialize;
use std::fmt;

/// Patient demographics shown in the header of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub name: String,
    pub age: u32,
    /// Primary clinical classification (e.g. "Hypertension")
    pub clinical_classification: String,
}

/// The fixed set of biochemical parameters on the panel.
///
/// The parameter determines which abnormality rule applies to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Parameter {
    Cholesterol,
    #[serde(rename = "HDL")]
    Hdl,
    #[serde(rename = "LDL")]
    Ldl,
    Triglycerides,
    #[serde(rename = "Blood Glucose")]
    BloodGlucose,
    #[serde(rename = "Blood Pressure")]
    BloodPressure,
}

impl Parameter {
    /// All parameters in panel order
    pub const ALL: [Parameter; 6] = [
        Parameter::Cholesterol,
        Parameter::Hdl,
        Parameter::Ldl,
        Parameter::Triglycerides,
        Parameter::BloodGlucose,
        Parameter::BloodPressure,
    ];

    /// Display name as it appears in the panel
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Cholesterol => "Cholesterol",
            Parameter::Hdl => "HDL",
            Parameter::Ldl => "LDL",
            Parameter::Triglycerides => "Triglycerides",
            Parameter::BloodGlucose => "Blood Glucose",
            Parameter::BloodPressure => "Blood Pressure",
        }
    }

    /// Look up a parameter by its exact display name.
    pub fn from_name(name: &str) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Reference range text for the parameter
    pub fn reference_range(&self) -> &'static str {
        match self {
            Parameter::Cholesterol => "< 200 mg/dL",
            Parameter::Hdl => "> 40 mg/dL",
            Parameter::Ldl => "< 100 mg/dL",
            Parameter::Triglycerides => "< 150 mg/dL",
            Parameter::BloodGlucose => "< 100 mg/dL",
            Parameter::BloodPressure => "120/80 mmHg",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the biochemical panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiochemicalReading {
    /// Parameter name; normally one of [`Parameter::name`]
    pub parameter: String,
    pub value: f64,
    pub reference_range: String,
}

impl BiochemicalReading {
    pub fn new(parameter: Parameter, value: f64) -> Self {
        Self {
            parameter: parameter.name().to_string(),
            value,
            reference_range: parameter.reference_range().to_string(),
        }
    }
}

/// Gene symbol with its genotype or metaboliser phenotype
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenomicFinding {
    pub gene: String,
    pub genotype: String,
}

/// Qualitative polygenic risk for a trait
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskScoreEntry {
    pub trait_name: String,
    pub risk: String,
}

/// Relative roles recorded in the family history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Relative {
    Father,
    Mother,
    Brother,
    Sister,
}

impl Relative {
    pub fn label(&self) -> &'static str {
        match self {
            Relative::Father => "Father",
            Relative::Mother => "Mother",
            Relative::Brother => "Brother",
            Relative::Sister => "Sister",
        }
    }

    /// Parents sit one generation above the patient
    pub fn is_parent(&self) -> bool {
        matches!(self, Relative::Father | Relative::Mother)
    }

    /// Siblings share both parents with the patient
    pub fn is_sibling(&self) -> bool {
        matches!(self, Relative::Brother | Relative::Sister)
    }
}

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyHistoryEntry {
    pub relative: Relative,
    pub condition: String,
}

/// A finding from an imaging study (echocardiogram or MRI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagingFinding {
    pub finding: String,
    pub result: String,
}

/// The complete, read-only record rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicalRecord {
    pub patient: Patient,
    pub biochemical: Vec<BiochemicalReading>,
    pub pharmacogenomics: Vec<GenomicFinding>,
    pub risk_scores: Vec<RiskScoreEntry>,
    pub family_history: Vec<FamilyHistoryEntry>,
    pub echo: Vec<ImagingFinding>,
    pub mri: Vec<ImagingFinding>,
}

fn genomic(gene: &str, genotype: &str) -> GenomicFinding {
    GenomicFinding { gene: gene.into(), genotype: genotype.into() }
}

fn imaging(finding: &str, result: &str) -> ImagingFinding {
    ImagingFinding { finding: finding.into(), result: result.into() }
}

fn family(relative: Relative, condition: &str) -> FamilyHistoryEntry {
    FamilyHistoryEntry { relative, condition: condition.into() }
}

impl ClinicalRecord {
    /// The sample patient shipped with the dashboard.
    pub fn sample() -> Self {
        Self {
            patient: Patient {
                name: "John Doe".to_string(),
                age: 45,
                clinical_classification: "Hypertension".to_string(),
            },
            biochemical: vec![
                BiochemicalReading::new(Parameter::Cholesterol, 250.0),
                BiochemicalReading::new(Parameter::Hdl, 35.0),
                BiochemicalReading::new(Parameter::Ldl, 160.0),
                BiochemicalReading::new(Parameter::Triglycerides, 180.0),
                BiochemicalReading::new(Parameter::BloodGlucose, 110.0),
                BiochemicalReading::new(Parameter::BloodPressure, 140.0),
            ],
            pharmacogenomics: vec![genomic("CYP2C19", "Poor Metaboliser")],
            risk_scores: vec![RiskScoreEntry {
                trait_name: "Cardiovascular Disease".to_string(),
                risk: "High".to_string(),
            }],
            family_history: vec![
                family(Relative::Father, "Hypertension"),
                family(Relative::Mother, "Diabetes"),
                family(Relative::Brother, "Hypertension"),
                family(Relative::Sister, "None"),
            ],
            echo: vec![
                imaging("Left Ventricular Hypertrophy", "Present"),
                imaging("Ejection Fraction", "55%"),
                imaging("Aortic Stenosis", "None"),
            ],
            mri: vec![
                imaging("Brain Lesions", "None"),
                imaging("Spinal Cord Lesions", "None"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_names_round_trip() {
        for p in Parameter::ALL {
            assert_eq!(Parameter::from_name(p.name()), Some(p));
        }
        assert_eq!(Parameter::from_name("hdl"), None);
        assert_eq!(Parameter::from_name("Unknown"), None);
    }

    #[test]
    fn sample_record_shape() {
        let r = ClinicalRecord::sample();
        assert_eq!(r.patient.name, "John Doe");
        assert_eq!(r.patient.age, 45);
        assert_eq!(r.biochemical.len(), 6);
        assert_eq!(r.biochemical[5].reference_range, "120/80 mmHg");
        assert_eq!(r.family_history.len(), 4);
        assert_eq!(r.echo[1].result, "55%");
        assert_eq!(r.mri.len(), 2);
    }

    #[test]
    fn record_serializes_with_display_names() {
        let js = serde_json::to_value(ClinicalRecord::sample()).unwrap();
        assert_eq!(js["biochemical"][1]["parameter"], "HDL");
        assert_eq!(js["family_history"][0]["relative"], "Father");
        assert_eq!(js["pharmacogenomics"][0]["gene"], "CYP2C19");
    }
}
