//! # Submission Outcomes
//!
//! One [`SubmissionResult`] per submitted proof, aggregated into an
//! [`AllProofsResult`]. Failures are data here, never errors: a rejected
//! proof is recorded and the batch continues.

use serde::{Deserialize, Serialize};

/// Outcome of submitting one proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub proof_index: usize,
    pub is_success: bool,
    /// Raw response body, when one was received.
    pub response: Option<String>,
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn success(proof_index: usize, response: impl Into<String>) -> Self {
        Self {
            proof_index,
            is_success: true,
            response: Some(response.into()),
            error: None,
        }
    }

    pub fn failure(
        proof_index: usize,
        response: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            proof_index,
            is_success: false,
            response,
            error: Some(error.into()),
        }
    }
}

/// Aggregate outcome of a submission batch.
///
/// `overall_success` is the AND over every `is_success`; an empty batch is
/// vacuously successful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllProofsResult {
    pub overall_success: bool,
    pub results: Vec<SubmissionResult>,
}

impl AllProofsResult {
    /// Build from results already in input-proof order.
    pub fn from_results(results: Vec<SubmissionResult>) -> Self {
        let overall_success = results.iter().all(|r| r.is_success);
        Self {
            overall_success,
            results,
        }
    }

    pub fn failed(&self) -> impl Iterator<Item = &SubmissionResult> {
        self.results.iter().filter(|r| !r.is_success)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
