use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::Construct;
use super::PercentileLookup;

const FASTEST_BASE_WEEKS: f64 = 4.0;
const SLOWEST_BASE_WEEKS: f64 = 16.0;
const MIN_WEEKS: f64 = 3.0;
const MAX_WEEKS: f64 = 20.0;
const HIGH_THRESHOLD: u8 = 70;
const LOW_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampTimeLabel {
    Accelerated,
    Standard,
    Extended,
    Prolonged,
}

impl RampTimeLabel {
    fn for_weeks(weeks: u8) -> Self {
        match weeks {
            0..=6 => Self::Accelerated,
            7..=10 => Self::Standard,
            11..=14 => Self::Extended,
            _ => Self::Prolonged,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RampTimeLabel::Accelerated => "Accelerated ramp",
            RampTimeLabel::Standard => "Standard ramp",
            RampTimeLabel::Extended => "Extended ramp",
            RampTimeLabel::Prolonged => "Prolonged ramp",
        }
    }
}

/// Estimated weeks to independent productivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RampTimePrediction {
    pub weeks: u8,
    pub label: RampTimeLabel,
    pub inputs: BTreeMap<Construct, u8>,
    pub factors: Vec<String>,
}

pub fn predict_ramp_time(lookup: &PercentileLookup) -> RampTimePrediction {
    let inputs = lookup.inputs(&[
        Construct::LearningVelocity,
        Construct::ExecutiveControl,
        Construct::SystemsDiagnostics,
    ]);
    let learning = lookup.get(Construct::LearningVelocity);
    let executive = lookup.get(Construct::ExecutiveControl);
    let diagnostics = lookup.get(Construct::SystemsDiagnostics);

    let position = (f64::from(learning.max(1)) - 1.0) / 98.0;
    let mut weeks = SLOWEST_BASE_WEEKS - (SLOWEST_BASE_WEEKS - FASTEST_BASE_WEEKS) * position;
    let mut factors = vec![format!(
        "Learning velocity at {learning} sets a {:.1}-week baseline",
        weeks
    )];

    if executive >= HIGH_THRESHOLD {
        weeks -= 1.0;
        factors.push(format!("Executive control at {executive} shortens ramp by 1 week"));
    } else if executive < LOW_THRESHOLD {
        weeks += 1.0;
        factors.push(format!("Executive control at {executive} lengthens ramp by 1 week"));
    }

    if diagnostics >= HIGH_THRESHOLD {
        weeks -= 1.0;
        factors.push(format!(
            "Systems diagnostics at {diagnostics} shortens ramp by 1 week"
        ));
    } else if diagnostics < LOW_THRESHOLD {
        weeks += 2.0;
        factors.push(format!(
            "Systems diagnostics at {diagnostics} lengthens ramp by 2 weeks"
        ));
    }

    let weeks = weeks.clamp(MIN_WEEKS, MAX_WEEKS).round() as u8;

    RampTimePrediction {
        weeks,
        label: RampTimeLabel::for_weeks(weeks),
        inputs,
        factors,
    }
}
