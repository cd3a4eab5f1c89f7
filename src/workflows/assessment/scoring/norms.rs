use super::super::domain::Construct;
use super::config::{NormTable, DEFAULT_STEEPNESS};

pub const MIN_PERCENTILE: u8 = 1;
pub const MAX_PERCENTILE: u8 = 99;

/// Maps a construct raw score to an integer percentile in [1, 99].
///
/// The logistic curve is a stand-in until norm-referenced tables exist; anything that
/// implements this trait can replace it without touching the aggregator.
pub trait NormCurve: Send + Sync {
    fn percentile(&self, construct: Construct, raw_score: f64) -> u8;
}

/// Logistic curve centered at 0.5, rescaled so raw 0 maps to 1 and raw 1 maps to 99.
#[derive(Debug, Clone)]
pub struct LogisticNormCurve {
    table: NormTable,
}

impl LogisticNormCurve {
    pub fn new(mut table: NormTable) -> Self {
        if !table.steepness.is_finite() || table.steepness <= 0.0 {
            table.steepness = DEFAULT_STEEPNESS;
        }
        Self { table }
    }

    pub fn table(&self) -> &NormTable {
        &self.table
    }
}

impl Default for LogisticNormCurve {
    fn default() -> Self {
        Self::new(NormTable::default())
    }
}

impl NormCurve for LogisticNormCurve {
    fn percentile(&self, construct: Construct, raw_score: f64) -> u8 {
        let raw = if raw_score.is_finite() { raw_score } else { 0.0 };
        let x = (raw - self.table.offset(construct)).clamp(0.0, 1.0);
        let k = self.table.steepness;

        let low = logistic(-k / 2.0);
        let high = logistic(k / 2.0);
        let scaled = (logistic(k * (x - 0.5)) - low) / (high - low);

        let span = f64::from(MAX_PERCENTILE - MIN_PERCENTILE);
        (scaled * span + f64::from(MIN_PERCENTILE))
            .round()
            .clamp(f64::from(MIN_PERCENTILE), f64::from(MAX_PERCENTILE)) as u8
    }
}

fn logistic(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}
