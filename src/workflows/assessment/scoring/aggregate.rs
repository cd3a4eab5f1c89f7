use std::collections::BTreeMap;

use super::super::domain::{Construct, ConstructScore, ScoredItem};
use super::norms::NormCurve;

/// Group scored items by construct and map each mean onto the norm curve.
///
/// Output is ordered by construct so repeated runs produce identical rows.
pub fn aggregate_constructs(items: &[ScoredItem], curve: &dyn NormCurve) -> Vec<ConstructScore> {
    let mut groups: BTreeMap<Construct, Vec<&ScoredItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.construct).or_default().push(item);
    }

    groups
        .into_iter()
        .map(|(construct, group)| {
            let total: f64 = group.iter().map(|item| item.raw_score).sum();
            let raw_score = round_to_hundredths(total / group.len() as f64);

            let latencies: Vec<u64> = group
                .iter()
                .filter_map(|item| item.latency_ms.map(u64::from))
                .collect();
            let mean_latency_ms = if latencies.is_empty() {
                0
            } else {
                let sum: u64 = latencies.iter().sum();
                let count = latencies.len() as u64;
                ((sum + count / 2) / count) as u32
            };

            ConstructScore {
                construct,
                layer: construct.layer(),
                raw_score,
                percentile: curve.percentile(construct, raw_score),
                item_count: group.len() as u32,
                mean_latency_ms,
            }
        })
        .collect()
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::domain::{ItemId, Layer};
    use crate::workflows::assessment::scoring::norms::LogisticNormCurve;

    fn scored(id: &str, construct: Construct, raw: f64, latency: Option<u32>) -> ScoredItem {
        ScoredItem {
            item_id: ItemId(id.to_string()),
            construct,
            raw_score: raw,
            latency_ms: latency,
        }
    }

    #[test]
    fn groups_items_and_rounds_mean() {
        let items = vec![
            scored("fr-1", Construct::FluidReasoning, 1.0, Some(1_000)),
            scored("fr-2", Construct::FluidReasoning, 0.0, Some(2_000)),
            scored("fr-3", Construct::FluidReasoning, 1.0, None),
            scored("ej-1", Construct::EthicalJudgment, 0.75, None),
        ];

        let scores = aggregate_constructs(&items, &LogisticNormCurve::default());

        assert_eq!(scores.len(), 2);
        let fluid = &scores[0];
        assert_eq!(fluid.construct, Construct::FluidReasoning);
        assert_eq!(fluid.layer, Layer::CoreCognitive);
        assert_eq!(fluid.raw_score, 0.67);
        assert_eq!(fluid.item_count, 3);
        assert_eq!(fluid.mean_latency_ms, 1_500);

        let ethics = &scores[1];
        assert_eq!(ethics.layer, Layer::BehavioralIntegrity);
        assert_eq!(ethics.mean_latency_ms, 0);
    }

    #[test]
    fn empty_input_produces_no_rows() {
        assert!(aggregate_constructs(&[], &LogisticNormCurve::default()).is_empty());
    }
}
