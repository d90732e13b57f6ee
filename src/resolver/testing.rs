//! In-memory parameter store for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{ParameterStore, ParametersResponse};
use crate::error::ParameterStoreError;

/// Store backed by a map that records every request it receives
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: HashMap<String, String>,
    echo_upper_case: bool,
    fail: bool,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(Vec<String>, bool)>>,
}

impl InMemoryStore {
    pub fn new<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Echo names back upper-cased, as a case-insensitive backend might
    pub fn echo_upper_case(mut self) -> Self {
        self.echo_upper_case = true;
        self
    }

    /// Fail every request with a transport error
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Hold any request containing `name` for `delay` before answering
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(names, _)| names.clone())
            .collect()
    }

    pub fn decrypt_flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(_, d)| *d).collect()
    }
}

#[async_trait]
impl ParameterStore for InMemoryStore {
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<ParametersResponse, ParameterStoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((names.to_vec(), with_decryption));

        let delay = names.iter().filter_map(|n| self.delays.get(n)).max().copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail {
            return Err(ParameterStoreError::Transport(
                "connection refused".to_string(),
            ));
        }

        let mut response = ParametersResponse::default();
        for name in names {
            match self.values.get(name) {
                Some(value) => {
                    let echoed = if self.echo_upper_case {
                        name.to_uppercase()
                    } else {
                        name.clone()
                    };
                    response.resolved.push((echoed, value.clone()));
                }
                None => response.invalid.push(name.clone()),
            }
        }
        Ok(response)
    }
}
