use serde::Serialize;
use std::collections::HashMap;

use crate::data::FacultyId;

/// Informational metrics behind the scalar score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessComponents {
    pub workload_std_dev: f64,
    pub workload_variance: f64,
    /// Placed sessions over total slot-classroom cells.
    pub utilization_rate: f64,
    pub average_load: f64,
}

/// Scalar quality score in [0, 100] for one candidate schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessResult {
    pub score: f64,
    pub components: FitnessComponents,
}

/// Scores a candidate from its faculty workload distribution: start at
/// 100, subtract twice the population standard deviation of weekly
/// session counts (over faculty with at least one assignment), clamp
/// to [0, 100]. Even distribution scores highest. The other components
/// are informational only; extending the score to a weighted
/// multi-factor formula is deliberately left open.
pub fn score(
    workload: &HashMap<FacultyId, u32>,
    placed_sessions: usize,
    grid_cells: usize,
    classroom_count: usize,
) -> FitnessResult {
    let loads: Vec<f64> = workload.values().map(|&c| f64::from(c)).collect();
    let (variance, std_dev, average) = if loads.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let mean = loads.iter().sum::<f64>() / loads.len() as f64;
        let variance =
            loads.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / loads.len() as f64;
        (variance, variance.sqrt(), mean)
    };

    let total_cells = grid_cells * classroom_count;
    let utilization_rate = if total_cells == 0 {
        0.0
    } else {
        placed_sessions as f64 / total_cells as f64
    };

    FitnessResult {
        score: (100.0 - 2.0 * std_dev).clamp(0.0, 100.0),
        components: FitnessComponents {
            workload_std_dev: std_dev,
            workload_variance: variance,
            utilization_rate,
            average_load: average,
        },
    }
}
