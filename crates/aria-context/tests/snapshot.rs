use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use aria_context::{ContextCompletion, ContextConfig, ContextManager, ContextProvider, ProviderRef};
use aria_types::ContextInfo;
use rand::Rng;
use serde_json::json;
use tokio::sync::Notify;

/// Answers from a spawned task after a fixed delay.
struct DelayedProvider {
    name: String,
    delay: Duration,
}

impl ContextProvider for DelayedProvider {
    fn query(&self, completion: ContextCompletion) {
        let info = ContextInfo::capability(
            self.name.clone(),
            json!({ "version": "1.2", "detail": self.name.to_lowercase() }),
        );
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            completion.complete(info);
        });
    }
}

/// Holds its answer until released.
struct GatedProvider {
    name: String,
    queried: Arc<Notify>,
    gate: Arc<Notify>,
}

impl ContextProvider for GatedProvider {
    fn query(&self, completion: ContextCompletion) {
        let info = ContextInfo::capability(self.name.clone(), json!({ "version": "1.0" }));
        let gate = self.gate.clone();
        self.queried.notify_one();
        tokio::spawn(async move {
            gate.notified().await;
            completion.complete(info);
        });
    }
}

fn names(contexts: &[ContextInfo]) -> BTreeSet<String> {
    contexts.iter().map(|c| c.name.clone()).collect()
}

#[tokio::test]
async fn waits_for_every_provider_with_random_delays() {
    let manager = ContextManager::default();
    let mut rng = rand::thread_rng();
    let namespaces = ["TTS", "ASR", "AudioPlayer", "Alerts", "Speaker"];
    for name in namespaces {
        manager.add_provider(Arc::new(DelayedProvider {
            name: name.to_string(),
            delay: Duration::from_millis(rng.gen_range(0..40)),
        }));
    }

    let contexts = manager.get_contexts().await;
    assert_eq!(contexts.len(), namespaces.len());
    assert_eq!(
        names(&contexts),
        namespaces.iter().map(|n| n.to_string()).collect()
    );
}

#[tokio::test]
async fn redaction_keeps_only_the_requesting_capability_in_full() {
    let manager = ContextManager::default();
    for name in ["TTS", "ASR"] {
        manager.add_provider(Arc::new(DelayedProvider {
            name: name.to_string(),
            delay: Duration::from_millis(1),
        }));
    }
    manager.add_provider(Arc::new(|completion: ContextCompletion| {
        completion.complete(ContextInfo::client("device", json!({ "battery": 80 })));
    }));

    let contexts = manager.get_contexts_for("TTS").await;
    assert_eq!(contexts.len(), 3);
    for context in contexts {
        match context.name.as_str() {
            "TTS" => assert_eq!(context.payload, json!({ "version": "1.2", "detail": "tts" })),
            "ASR" => assert_eq!(context.payload, json!({ "version": "1.2" })),
            "device" => assert_eq!(context.payload, json!({ "battery": 80 })),
            other => panic!("unexpected context {other}"),
        }
    }
}

#[tokio::test]
async fn registry_changes_during_a_snapshot_apply_to_the_next_one() {
    let manager = Arc::new(ContextManager::default());
    let queried = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let gated: ProviderRef = Arc::new(GatedProvider {
        name: "TTS".to_string(),
        queried: queried.clone(),
        gate: gate.clone(),
    });
    manager.add_provider(gated.clone());

    let in_flight = {
        let manager = manager.clone();
        tokio::spawn(async move { manager.get_contexts().await })
    };
    queried.notified().await;

    let late: ProviderRef = Arc::new(DelayedProvider {
        name: "ASR".to_string(),
        delay: Duration::ZERO,
    });
    manager.add_provider(late);
    manager.remove_provider(&gated);
    gate.notify_one();

    let first = in_flight.await.unwrap();
    assert_eq!(names(&first), BTreeSet::from(["TTS".to_string()]));

    let second = manager.get_contexts().await;
    assert_eq!(names(&second), BTreeSet::from(["ASR".to_string()]));
}

#[tokio::test]
async fn removing_an_unknown_provider_is_a_no_op() {
    let manager = ContextManager::default();
    let known: ProviderRef = Arc::new(DelayedProvider {
        name: "TTS".to_string(),
        delay: Duration::ZERO,
    });
    let stranger: ProviderRef = Arc::new(DelayedProvider {
        name: "TTS".to_string(),
        delay: Duration::ZERO,
    });
    manager.add_provider(known);
    manager.remove_provider(&stranger);
    assert_eq!(manager.provider_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn timeout_bounds_slow_providers() {
    let manager = ContextManager::new(ContextConfig::with_provider_timeout(
        Duration::from_millis(50),
    ));
    manager.add_provider(Arc::new(DelayedProvider {
        name: "fast".to_string(),
        delay: Duration::from_millis(10),
    }));
    manager.add_provider(Arc::new(DelayedProvider {
        name: "slow".to_string(),
        delay: Duration::from_secs(60),
    }));

    let contexts = manager.get_contexts().await;
    assert_eq!(names(&contexts), BTreeSet::from(["fast".to_string()]));
}

#[tokio::test]
async fn concurrent_snapshots_are_independent() {
    let manager = Arc::new(ContextManager::default());
    for name in ["TTS", "ASR", "Alerts"] {
        manager.add_provider(Arc::new(DelayedProvider {
            name: name.to_string(),
            delay: Duration::from_millis(5),
        }));
    }

    let snapshots = futures::future::join_all((0..4).map(|_| {
        let manager = manager.clone();
        async move { manager.get_contexts().await }
    }))
    .await;

    for snapshot in snapshots {
        assert_eq!(snapshot.len(), 3);
    }
}
