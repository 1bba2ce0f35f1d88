use std::sync::Arc;
use std::time::Duration;

use aria_types::ContextInfo;
use parking_lot::RwLock;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ContextConfig;
use crate::provider::{ContextCompletion, ContextProvider};
use crate::redact::redact_for_namespace;

/// Shared handle to a registered provider. Identity is the allocation, not
/// the value: removing requires the same `Arc` that was added.
pub type ProviderRef = Arc<dyn ContextProvider>;

enum QueryOutcome {
    Completed(ContextInfo),
    Abandoned,
    TimedOut(Duration),
}

/// Registry of context providers answering aggregate snapshots.
pub struct ContextManager {
    config: ContextConfig,
    providers: RwLock<Vec<ProviderRef>>,
}

impl ContextManager {
    pub fn new(config: ContextConfig) -> Self {
        Self {
            config,
            providers: RwLock::new(Vec::new()),
        }
    }

    pub fn add_provider(&self, provider: ProviderRef) {
        let mut providers = self.providers.write();
        providers.push(provider);
        debug!(providers = providers.len(), "Context provider added");
    }

    /// Remove every registration of `provider`. No-op if it is absent.
    pub fn remove_provider(&self, provider: &ProviderRef) {
        let mut providers = self.providers.write();
        let before = providers.len();
        providers.retain(|p| !same_provider(p, provider));
        if providers.len() != before {
            debug!(providers = providers.len(), "Context provider removed");
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.read().len()
    }

    /// Query every provider in parallel and wait for all of them.
    ///
    /// Membership is captured when the call starts; providers added or
    /// removed meanwhile only affect later snapshots. Result order is
    /// completion order, not registration order.
    pub async fn get_contexts(&self) -> Vec<ContextInfo> {
        let providers: Vec<ProviderRef> = self.providers.read().clone();
        let timeout = self.config.provider_timeout();

        let mut queries = JoinSet::new();
        for provider in providers {
            queries.spawn(query_provider(provider, timeout));
        }

        let mut contexts = Vec::with_capacity(queries.len());
        while let Some(joined) = queries.join_next().await {
            match joined {
                Ok(QueryOutcome::Completed(info)) => contexts.push(info),
                Ok(QueryOutcome::Abandoned) => {
                    warn!("Context provider dropped its completion without answering");
                }
                Ok(QueryOutcome::TimedOut(limit)) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "Context provider timed out");
                }
                Err(e) => {
                    warn!(error = %e, "Context provider query failed");
                }
            }
        }

        debug!(contexts = contexts.len(), "Context snapshot collected");
        contexts
    }

    /// Snapshot with capabilities outside `namespace` reduced to their version.
    pub async fn get_contexts_for(&self, namespace: &str) -> Vec<ContextInfo> {
        self.get_contexts()
            .await
            .into_iter()
            .map(|info| redact_for_namespace(info, namespace))
            .collect()
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

fn same_provider(a: &ProviderRef, b: &ProviderRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

async fn query_provider(provider: ProviderRef, timeout: Option<Duration>) -> QueryOutcome {
    let (sender, receiver) = oneshot::channel();
    provider.query(ContextCompletion::new(sender));

    let answer = match timeout {
        Some(limit) => match tokio::time::timeout(limit, receiver).await {
            Ok(answer) => answer,
            Err(_) => return QueryOutcome::TimedOut(limit),
        },
        None => receiver.await,
    };

    match answer {
        Ok(info) => QueryOutcome::Completed(info),
        Err(_) => QueryOutcome::Abandoned,
    }
}
