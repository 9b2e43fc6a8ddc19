use serde::{Deserialize, Serialize};

/// Blend applied when an assessment was completed. Without one the interview score stands alone;
/// the assessment share is dropped rather than renormalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub interview: f64,
    pub assessment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interview: 0.6,
            assessment: 0.4,
        }
    }
}
