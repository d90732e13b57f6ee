//! Resolution orchestration

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

use super::{
    merge, plan, unique_names, Batch, ConfigMap, Outcomes, ParameterBinding, ParameterStore,
    ReferenceRule,
};
use crate::config::{DEFAULT_BATCH_SIZE, DEFAULT_CONCURRENCY};
use crate::error::{ParameterStoreError, ReferenceRuleError, Result};

/// What a resolution pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub bindings: usize,
    pub unique_names: usize,
    pub batches: usize,
    pub resolved: usize,
    pub invalid: usize,
    pub untouched: usize,
}

/// Resolves parameter references in a [`ConfigMap`] against a store.
pub struct SecretResolver {
    rule: ReferenceRule,
    store: Arc<dyn ParameterStore>,
    batch_size: usize,
    concurrency: usize,
    decrypt: bool,
}

impl SecretResolver {
    pub fn new(rule: ReferenceRule, store: Arc<dyn ParameterStore>) -> Self {
        Self {
            rule,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            decrypt: true,
        }
    }

    /// Set the number of names per request, capped by the store's limit
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set how many batch requests may be in flight at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Ask the store to decrypt SecureString values
    pub fn with_decrypt(mut self, decrypt: bool) -> Self {
        self.decrypt = decrypt;
        self
    }

    fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, self.store.max_batch_size().max(1))
    }

    /// Collect a binding for every entry whose value is a reference
    pub fn bindings(&self, config: &ConfigMap) -> Result<Vec<ParameterBinding>, ReferenceRuleError> {
        let mut bindings = Vec::new();
        for (name, value) in config {
            if let Some(parameter) = self.rule.parameter(name, value)? {
                bindings.push(ParameterBinding::new(name, parameter));
            }
        }
        Ok(bindings)
    }

    /// Replace every reference in `config` with its remote value.
    ///
    /// A failed request aborts the whole pass and leaves `config` untouched.
    pub async fn resolve(&self, config: &mut ConfigMap) -> Result<ResolutionReport> {
        let bindings = self.bindings(config)?;
        let unique = unique_names(&bindings).len();

        tracing::debug!(bindings = bindings.len(), unique_names = unique, "Matched references");

        if bindings.is_empty() {
            return Ok(ResolutionReport::default());
        }

        let batches = plan(&bindings, self.effective_batch_size());

        let mut per_batch: Vec<(usize, Outcomes)> = stream::iter(batches.iter())
            .map(|batch| async move {
                let outcomes = self.resolve_batch(batch).await?;
                Ok::<_, ParameterStoreError>((batch.index, outcomes))
            })
            .buffer_unordered(self.concurrency.max(1))
            .try_collect()
            .await?;

        // Completion order varies with concurrency; fold in plan order.
        per_batch.sort_unstable_by_key(|(index, _)| *index);
        let mut outcomes = Outcomes::new();
        for (_, batch_outcomes) in per_batch {
            outcomes.extend(batch_outcomes);
        }

        let summary = merge(&bindings, &outcomes, config);

        Ok(ResolutionReport {
            bindings: bindings.len(),
            unique_names: unique,
            batches: batches.len(),
            resolved: summary.resolved,
            invalid: summary.invalid,
            untouched: summary.untouched,
        })
    }

    async fn resolve_batch(&self, batch: &Batch) -> Result<Outcomes, ParameterStoreError> {
        tracing::debug!(batch = batch.index, names = batch.len(), "Requesting batch");

        let response = self
            .store
            .get_parameters(&batch.names, self.decrypt)
            .await?;

        tracing::debug!(
            batch = batch.index,
            resolved = response.resolved.len(),
            invalid = response.invalid.len(),
            "Batch completed"
        );

        Ok(response.into_outcomes(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TfConfigError;
    use crate::resolver::testing::InMemoryStore;
    use crate::resolver::{DEFAULT_REFERENCE_RULE, VALUE_NOT_EXISTS};
    use std::time::Duration;

    fn resolver(store: Arc<InMemoryStore>) -> SecretResolver {
        SecretResolver::new(ReferenceRule::new(DEFAULT_REFERENCE_RULE).unwrap(), store)
    }

    fn config(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_no_references_is_a_no_op() {
        let store = Arc::new(InMemoryStore::new([("db/pass", "secret")]));
        let original = config(&[("HOST", "localhost"), ("PORT", "5432")]);
        let mut map = original.clone();

        let report = resolver(store.clone()).resolve(&mut map).await.unwrap();

        assert_eq!(map, original);
        assert_eq!(report, ResolutionReport::default());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shared_reference_is_fetched_once() {
        let store = Arc::new(InMemoryStore::new([("db/pass", "secret123")]));
        let mut map = config(&[("A", "ssm://db/pass"), ("B", "plain"), ("C", "ssm://db/pass")]);

        let report = resolver(store.clone()).resolve(&mut map).await.unwrap();

        assert_eq!(
            map,
            config(&[("A", "secret123"), ("B", "plain"), ("C", "secret123")])
        );
        assert_eq!(store.calls(), vec![vec!["db/pass".to_string()]]);
        assert_eq!(report.bindings, 2);
        assert_eq!(report.unique_names, 1);
        assert_eq!(report.resolved, 2);
    }

    #[tokio::test]
    async fn test_twenty_three_references_use_three_calls() {
        let values: Vec<(String, String)> = (0..23)
            .map(|i| (format!("app/p{i:02}"), format!("v{i}")))
            .collect();
        let store = Arc::new(InMemoryStore::new(values.clone()));
        let mut map: ConfigMap = (0..23)
            .map(|i| (format!("VAR_{i}"), format!("ssm://app/p{i:02}")))
            .collect();

        let report = resolver(store.clone())
            .with_batch_size(10)
            .resolve(&mut map)
            .await
            .unwrap();

        let mut sizes: Vec<usize> = store.calls().iter().map(Vec::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(sizes, vec![10, 10, 3]);
        assert_eq!(report.batches, 3);
        assert_eq!(map["VAR_7"], "v7");
        assert_eq!(map["VAR_22"], "v22");
    }

    #[tokio::test]
    async fn test_batch_size_is_capped_by_store_limit() {
        let values: Vec<(String, String)> =
            (0..12).map(|i| (format!("p{i:02}"), "v".to_string())).collect();
        let store = Arc::new(InMemoryStore::new(values));
        let mut map: ConfigMap = (0..12)
            .map(|i| (format!("V{i}"), format!("ssm://p{i:02}")))
            .collect();

        resolver(store.clone())
            .with_batch_size(50)
            .resolve(&mut map)
            .await
            .unwrap();

        assert!(store.calls().iter().all(|names| names.len() <= 10));
        assert_eq!(store.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_echoed_case_still_resolves() {
        let store = Arc::new(InMemoryStore::new([("db/pass", "secret")]).echo_upper_case());
        let mut map = config(&[("A", "ssm://db/pass")]);

        resolver(store).resolve(&mut map).await.unwrap();
        assert_eq!(map["A"], "secret");
    }

    #[tokio::test]
    async fn test_invalid_parameter_does_not_abort() {
        let store = Arc::new(InMemoryStore::new([("db/pass", "secret")]));
        let mut map = config(&[("A", "ssm://db/pass"), ("B", "ssm://db/missing")]);

        let report = resolver(store).resolve(&mut map).await.unwrap();

        assert_eq!(map["A"], "secret");
        assert_eq!(map["B"], VALUE_NOT_EXISTS);
        assert_eq!(report.invalid, 1);
    }

    #[tokio::test]
    async fn test_decrypt_flag_is_forwarded() {
        let store = Arc::new(InMemoryStore::new([("k", "v")]));
        let mut map = config(&[("A", "ssm://k")]);

        resolver(store.clone())
            .with_decrypt(false)
            .resolve(&mut map)
            .await
            .unwrap();

        assert_eq!(store.decrypt_flags(), vec![false]);
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal_and_map_is_unchanged() {
        let store = Arc::new(InMemoryStore::new([("k", "v")]).failing());
        let original = config(&[("A", "ssm://k")]);
        let mut map = original.clone();

        let err = resolver(store).resolve(&mut map).await.unwrap_err();

        assert!(matches!(
            err,
            TfConfigError::ParameterStore(ParameterStoreError::Transport(_))
        ));
        assert_eq!(map, original);
    }

    #[tokio::test]
    async fn test_result_independent_of_concurrency() {
        let values: Vec<(String, String)> = (0..25)
            .map(|i| (format!("p{i:02}"), format!("value-{i}")))
            .collect();
        let input: ConfigMap = (0..25)
            .map(|i| (format!("V{i}"), format!("ssm://p{i:02}")))
            .collect();

        let mut sequential = input.clone();
        resolver(Arc::new(InMemoryStore::new(values.clone())))
            .with_batch_size(3)
            .with_concurrency(1)
            .resolve(&mut sequential)
            .await
            .unwrap();

        let mut concurrent = input.clone();
        resolver(Arc::new(InMemoryStore::new(values)))
            .with_batch_size(3)
            .with_concurrency(8)
            .resolve(&mut concurrent)
            .await
            .unwrap();

        assert_eq!(sequential, concurrent);
    }

    #[tokio::test]
    async fn test_case_variants_resolve_the_same_at_any_concurrency() {
        let input = config(&[("A", "ssm://db/pass"), ("B", "ssm://DB/PASS")]);
        let store = || {
            Arc::new(
                InMemoryStore::new([("db/pass", "secret")])
                    .with_delay("DB/PASS", Duration::from_millis(50)),
            )
        };

        let mut sequential = input.clone();
        resolver(store())
            .with_batch_size(1)
            .with_concurrency(1)
            .resolve(&mut sequential)
            .await
            .unwrap();

        let mut concurrent = input.clone();
        let report = resolver(store())
            .with_batch_size(1)
            .with_concurrency(4)
            .resolve(&mut concurrent)
            .await
            .unwrap();

        assert_eq!(report.batches, 2);
        assert_eq!(sequential, concurrent);
        assert_eq!(concurrent, config(&[("A", "secret"), ("B", "secret")]));
    }
}
