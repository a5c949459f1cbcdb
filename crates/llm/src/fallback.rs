//! Ordered provider fallback
//!
//! Wraps a non-empty list of backends and tries each in configuration order.
//! A turn only fails when every provider has failed; the last error is the
//! one surfaced.

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::GenerationBackend;
use crate::LlmError;

pub struct FallbackChain {
    backends: Vec<Arc<dyn GenerationBackend>>,
}

impl FallbackChain {
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>) -> Result<Self, LlmError> {
        if backends.is_empty() {
            return Err(LlmError::Configuration(
                "fallback chain needs at least one backend".to_string(),
            ));
        }
        Ok(Self { backends })
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait]
impl GenerationBackend for FallbackChain {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        let mut last_error = None;

        for backend in &self.backends {
            match backend.generate(prompt, system_instruction).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    tracing::warn!(
                        model = backend.model_name(),
                        error = %e,
                        "generation provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LlmError::Configuration("no generation backends configured".to_string())
        }))
    }

    fn model_name(&self) -> &str {
        self.backends
            .first()
            .map(|b| b.model_name())
            .unwrap_or("unconfigured")
    }

    async fn is_available(&self) -> bool {
        for backend in &self.backends {
            if backend.is_available().await {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Flaky {
        fail: bool,
        calls: AtomicUsize,
        name: &'static str,
    }

    impl Flaky {
        fn new(fail: bool, name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
                name,
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for Flaky {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LlmError::Network("connection refused".to_string()))
            } else {
                Ok(format!("reply from {}", self.name))
            }
        }

        fn model_name(&self) -> &str {
            self.name
        }
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(FallbackChain::new(Vec::new()).is_err());
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let primary = Flaky::new(false, "primary");
        let secondary = Flaky::new(false, "secondary");
        let chain = FallbackChain::new(vec![
            primary.clone() as Arc<dyn GenerationBackend>,
            secondary.clone(),
        ])
        .unwrap();

        let reply = chain.generate("hi", "sys").await.unwrap();
        assert_eq!(reply, "reply from primary");
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_through_to_second_provider() {
        let primary = Flaky::new(true, "primary");
        let secondary = Flaky::new(false, "secondary");
        let chain = FallbackChain::new(vec![
            primary.clone() as Arc<dyn GenerationBackend>,
            secondary,
        ])
        .unwrap();

        let reply = chain.generate("hi", "sys").await.unwrap();
        assert_eq!(reply, "reply from secondary");
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn all_failing_returns_last_error() {
        let chain = FallbackChain::new(vec![
            Flaky::new(true, "a") as Arc<dyn GenerationBackend>,
            Flaky::new(true, "b"),
        ])
        .unwrap();

        assert!(matches!(
            chain.generate("hi", "sys").await,
            Err(LlmError::Network(_))
        ));
    }
}
