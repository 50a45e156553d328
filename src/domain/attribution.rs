// src/domain/attribution.rs

use crate::domain::lead::Touchpoint;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Attribution models supported by the marketing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributionModel {
    FirstTouch,
    LastTouch,
    Linear,
    UShaped,
}

impl AttributionModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributionModel::FirstTouch => "first_touch",
            AttributionModel::LastTouch => "last_touch",
            AttributionModel::Linear => "linear",
            AttributionModel::UShaped => "u_shaped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_touch" => Some(AttributionModel::FirstTouch),
            "last_touch" => Some(AttributionModel::LastTouch),
            "linear" => Some(AttributionModel::Linear),
            "u_shaped" => Some(AttributionModel::UShaped),
            _ => None,
        }
    }
}

/// One source's aggregated share of the conversion credit.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceWeight {
    pub source: String,
    pub weight: f64,
}

/// Touchpoints with no source are credited to this channel.
const DIRECT_SOURCE: &str = "Direct";

fn created_or_epoch(tp: &Touchpoint) -> DateTime<Utc> {
    tp.created_at.unwrap_or(DateTime::UNIX_EPOCH)
}

fn source_of(tp: &Touchpoint) -> String {
    tp.source
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DIRECT_SOURCE)
        .to_string()
}

/// Distributes conversion credit across the touchpoints' sources.
///
/// Weights always sum to 1.0 for a non-empty journey; a single touchpoint
/// takes the full credit under every model. The U-shaped 40/40/20 split
/// degenerates to 50/50 for exactly two touchpoints rather than leaving 20%
/// unassigned. Results are aggregated per source and returned hottest first.
pub fn calculate_attribution(
    touchpoints: &[Touchpoint],
    model: AttributionModel,
) -> Vec<SourceWeight> {
    if touchpoints.is_empty() {
        return Vec::new();
    }

    let mut ordered: Vec<&Touchpoint> = touchpoints.iter().collect();
    ordered.sort_by_key(|tp| created_or_epoch(tp));

    let n = ordered.len();
    let mut weights = vec![0.0f64; n];

    match model {
        AttributionModel::FirstTouch => weights[0] = 1.0,
        AttributionModel::LastTouch => weights[n - 1] = 1.0,
        AttributionModel::Linear => {
            let share = 1.0 / n as f64;
            for w in &mut weights {
                *w = share;
            }
        }
        AttributionModel::UShaped => match n {
            1 => weights[0] = 1.0,
            2 => {
                weights[0] = 0.5;
                weights[1] = 0.5;
            }
            _ => {
                weights[0] = 0.4;
                weights[n - 1] = 0.4;
                let middle_share = 0.2 / (n - 2) as f64;
                for w in &mut weights[1..n - 1] {
                    *w = middle_share;
                }
            }
        },
    }

    let mut by_source: HashMap<String, f64> = HashMap::new();
    for (tp, w) in ordered.iter().zip(&weights) {
        *by_source.entry(source_of(tp)).or_insert(0.0) += w;
    }

    let mut out: Vec<SourceWeight> = by_source
        .into_iter()
        .map(|(source, weight)| SourceWeight { source, weight })
        .collect();
    out.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));
    out
}
