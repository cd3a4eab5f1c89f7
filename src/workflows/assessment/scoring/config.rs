use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::catalog::CatalogError;
use super::super::domain::Construct;

pub(crate) const DEFAULT_STEEPNESS: f64 = 6.0;

/// Norm-curve parameters: logistic steepness plus per-construct calibration offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormTable {
    pub steepness: f64,
    pub offsets: BTreeMap<Construct, f64>,
}

impl NormTable {
    pub fn offset(&self, construct: Construct) -> f64 {
        self.offsets.get(&construct).copied().unwrap_or(0.0)
    }
}

impl Default for NormTable {
    fn default() -> Self {
        let offsets = BTreeMap::from([
            (Construct::ProceduralReliability, 0.05),
            (Construct::EthicalJudgment, 0.05),
            (Construct::MetacognitiveCalibration, 0.03),
            (Construct::CognitiveFlexibility, 0.02),
        ]);

        Self {
            steepness: DEFAULT_STEEPNESS,
            offsets,
        }
    }
}

/// Percentile thresholds for the production red-flag rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagRules {
    /// Any construct strictly below this percentile raises a critical flag.
    pub extreme_low_percentile: u8,
    /// Behavioral-integrity constructs strictly below this percentile raise a warning.
    pub behavioral_concern_percentile: u8,
}

impl Default for FlagRules {
    fn default() -> Self {
        Self {
            extreme_low_percentile: 10,
            behavioral_concern_percentile: 25,
        }
    }
}

/// Configuration-as-data bundle consumed by the scoring engine.
///
/// Every field is optional in JSON; anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub norms: NormTable,
    pub flags: FlagRules,
    /// Gate on the cutline's overall minimum as a fourth dimension. Off unless opted in.
    pub enforce_overall_minimum: bool,
}

impl ScoringConfig {
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_json_reader(file)
    }
}
