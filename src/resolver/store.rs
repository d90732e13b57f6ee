//! Parameter store capability

use async_trait::async_trait;

use super::{normalize, Batch, Outcomes, ResolutionOutcome, MAX_BATCH_SIZE};
use crate::error::ParameterStoreError;

/// Values returned by one `get_parameters` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParametersResponse {
    /// `(name, value)` pairs, names as echoed by the store
    pub resolved: Vec<(String, String)>,
    /// Names the store does not know or cannot access
    pub invalid: Vec<String>,
}

impl ParametersResponse {
    /// Convert the response into outcomes for the names requested in `batch`.
    ///
    /// Outcomes are keyed by the requested name. An exact echo of the name is
    /// preferred; otherwise the name is matched case-insensitively. Anything
    /// the store returns that was not requested is dropped.
    pub fn into_outcomes(self, batch: &Batch) -> Outcomes {
        let mut outcomes = Outcomes::with_capacity(batch.len());

        for requested in &batch.names {
            if let Some(outcome) = self.outcome_for(requested) {
                outcomes.insert(requested.clone(), outcome);
            }
        }

        for (name, _) in &self.resolved {
            let key = normalize(name);
            if !batch.names.iter().any(|n| normalize(n) == key) {
                tracing::debug!(parameter = %name, "Ignoring unrequested parameter");
            }
        }

        outcomes
    }

    fn outcome_for(&self, requested: &str) -> Option<ResolutionOutcome> {
        self.find(|name| name == requested).or_else(|| {
            let key = normalize(requested);
            self.find(|name| normalize(name) == key)
        })
    }

    fn find(&self, matches: impl Fn(&str) -> bool) -> Option<ResolutionOutcome> {
        if let Some((_, value)) = self.resolved.iter().find(|(name, _)| matches(name.as_str())) {
            return Some(ResolutionOutcome::Resolved(value.clone()));
        }
        self.invalid
            .iter()
            .any(|name| matches(name.as_str()))
            .then_some(ResolutionOutcome::NotFound)
    }
}

/// Backend able to fetch parameters by name
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Most names accepted by a single call
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_SIZE
    }

    /// Fetch `names` in one request.
    ///
    /// Unknown names are reported in [`ParametersResponse::invalid`]; an `Err`
    /// means the request itself failed.
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<ParametersResponse, ParameterStoreError>;
}
