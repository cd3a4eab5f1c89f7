//! Item response scoring: one (item, response, latency) triple to a raw score in [0, 1].

use super::super::domain::{Item, ItemResponse, ItemType, ResponsePayload, ScoredItem};

/// Lowest credit a correct timed answer can earn, reached at the time limit.
pub const TIMED_CREDIT_FLOOR: f64 = 0.8;

/// Scoring seam for free-text and AI follow-up answers.
///
/// Implementations must return a value in [0, 1]; the aggregator relies on nothing else.
pub trait FreeTextScorer: Send + Sync {
    fn score(&self, item: &Item, text: &str) -> f64;
}

/// Provisional word-count heuristic standing in for rubric or model scoring.
///
/// The buckets reward effort, not correctness: 50+ words earn 0.7, 30+ earn 0.5,
/// anything shorter earns 0.3.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountHeuristic;

impl FreeTextScorer for WordCountHeuristic {
    fn score(&self, _item: &Item, text: &str) -> f64 {
        let words = text.split_whitespace().count();
        if words >= 50 {
            0.7
        } else if words >= 30 {
            0.5
        } else {
            0.3
        }
    }
}

pub fn score_response(
    item: &Item,
    payload: &ResponsePayload,
    latency_ms: Option<u32>,
    free_text: &dyn FreeTextScorer,
) -> f64 {
    let score = match item.item_type {
        ItemType::SingleChoice => match payload {
            ResponsePayload::Selected(choice) if is_correct(item, choice) => 1.0,
            _ => 0.0,
        },
        ItemType::TimedChoice => match payload {
            ResponsePayload::Selected(choice) if is_correct(item, choice) => {
                timed_credit(item.time_limit_seconds, latency_ms)
            }
            _ => 0.0,
        },
        ItemType::LikertScale => match payload {
            ResponsePayload::Selected(choice) => scale_position(&item.options, choice),
            _ => 0.0,
        },
        ItemType::FreeText | ItemType::AiFollowUp => match payload {
            ResponsePayload::Text(text) | ResponsePayload::Selected(text) => {
                free_text.score(item, text)
            }
            ResponsePayload::Expired => free_text.score(item, ""),
        },
    };

    score.clamp(0.0, 1.0)
}

pub fn score_item(item: &Item, response: &ItemResponse, free_text: &dyn FreeTextScorer) -> ScoredItem {
    ScoredItem {
        item_id: item.id.clone(),
        construct: item.construct,
        raw_score: score_response(item, &response.payload, response.latency_ms, free_text),
        latency_ms: response.latency_ms,
    }
}

fn is_correct(item: &Item, choice: &str) -> bool {
    item.correct_answer
        .as_deref()
        .map(|answer| answer.trim() == choice.trim())
        .unwrap_or(false)
}

fn timed_credit(time_limit_seconds: Option<u32>, latency_ms: Option<u32>) -> f64 {
    let (Some(limit), Some(latency)) = (time_limit_seconds, latency_ms) else {
        return 1.0;
    };
    if limit == 0 {
        return TIMED_CREDIT_FLOOR;
    }

    let elapsed = (latency as f64 / (limit as f64 * 1000.0)).clamp(0.0, 1.0);
    1.0 - (1.0 - TIMED_CREDIT_FLOOR) * elapsed
}

fn scale_position(options: &[String], choice: &str) -> f64 {
    let Some(index) = options
        .iter()
        .position(|option| option.trim() == choice.trim())
    else {
        return 0.0;
    };

    if options.len() == 1 {
        return 0.5;
    }
    index as f64 / (options.len() - 1) as f64
}
