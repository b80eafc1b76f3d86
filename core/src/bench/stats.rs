//! Score aggregation

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Confidence level of the reported error
pub const CONFIDENCE: f64 = 0.999;

/// Summary of a set of iteration scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub samples: usize,
    pub score: f64,
    /// Half-width of the confidence interval; `None` below two samples
    pub error: Option<f64>,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Statistics {
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }

        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (std_dev, error) = if scores.len() < 2 {
            (0.0, None)
        } else {
            let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let std_dev = variance.sqrt();
            let error = t_quantile(n - 1.0).map(|t| t * std_dev / n.sqrt());
            (std_dev, error)
        };

        Some(Self {
            samples: scores.len(),
            score: mean,
            error,
            std_dev,
            min,
            max,
        })
    }

    /// Confidence interval bounds
    pub fn interval(&self) -> Option<(f64, f64)> {
        self.error.map(|e| (self.score - e, self.score + e))
    }
}

/// Two-sided critical value of Student's t at [`CONFIDENCE`]
fn t_quantile(degrees_of_freedom: f64) -> Option<f64> {
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom).ok()?;
    Some(dist.inverse_cdf(1.0 - (1.0 - CONFIDENCE) / 2.0))
}
