use rayon::{ThreadPoolBuilder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::utilities::{
    apply_correction::{CorrectionResult, apply_correction},
    calculate_baseline::CorrectionOptions,
    structs::SamplePoint,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub id: String,
    pub series: Vec<SamplePoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub id: String,
    pub index: usize,
    pub success: bool,
    pub result: Option<CorrectionResult>,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub average_improvement: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<BatchItemResult>,
    pub summary: BatchSummary,
}

pub fn batch_correction(
    items: &[BatchItem],
    options: &CorrectionOptions,
    cores: usize,
) -> BatchReport {
    let results: Vec<BatchItemResult> = if cores <= 1 || items.len() < 2 {
        items
            .iter()
            .enumerate()
            .map(|(i, it)| compute_one(i, it, options))
            .collect()
    } else {
        match ThreadPoolBuilder::new().num_threads(cores).build() {
            Ok(pool) => pool.install(|| {
                items
                    .par_iter()
                    .enumerate()
                    .map(|(i, it)| compute_one(i, it, options))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!("thread pool unavailable ({e}), running sequentially");
                items
                    .iter()
                    .enumerate()
                    .map(|(i, it)| compute_one(i, it, options))
                    .collect()
            }
        }
    };

    let summary = summarize(&results);
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch correction finished"
    );
    BatchReport { results, summary }
}

#[inline]
fn compute_one(index: usize, item: &BatchItem, options: &CorrectionOptions) -> BatchItemResult {
    match apply_correction(&item.series, options) {
        Ok(result) => BatchItemResult {
            id: item.id.clone(),
            index,
            success: true,
            result: Some(result),
            error: None,
        },
        Err(e) => {
            tracing::warn!(id = %item.id, index, "batch item failed: {e}");
            BatchItemResult {
                id: item.id.clone(),
                index,
                success: false,
                result: None,
                error: Some(e.to_string()),
            }
        }
    }
}

fn summarize(results: &[BatchItemResult]) -> BatchSummary {
    let mut succeeded = 0usize;
    let mut sum = 0.0f64;
    for r in results {
        if let Some(res) = &r.result {
            succeeded += 1;
            sum += res.statistics.improvement;
        }
    }
    BatchSummary {
        total: results.len(),
        succeeded,
        failed: results.len() - succeeded,
        average_improvement: if succeeded > 0 {
            sum / succeeded as f64
        } else {
            0.0
        },
    }
}
