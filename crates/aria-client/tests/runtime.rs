use std::sync::Arc;

use aria_client::{ClientConfig, ClientRuntime, ContextCompletion};
use aria_focus::testing::{ArbiterCall, RecordingArbiter};
use aria_types::{
    BlockingPolicy, ContextInfo, DialogState, DialogStateChanged, DirectiveNotification,
    DirectiveProcessing, DirectiveReceived, EventLifecycle, EventNotification, MediumSet,
};
use serde_json::json;

fn directive(directive_type: &str, message_id: &str, dialog: &str) -> DirectiveNotification {
    DirectiveNotification::new(
        directive_type,
        message_id,
        dialog,
        BlockingPolicy::new(Some(MediumSet::AUDIO_ONLY), Some(MediumSet::AUDIO_ONLY)),
    )
}

async fn start(config: &ClientConfig) -> (Arc<RecordingArbiter>, ClientRuntime) {
    let arbiter = Arc::new(RecordingArbiter::new());
    let runtime = ClientRuntime::start(config, arbiter.clone()).await;
    (arbiter, runtime)
}

#[tokio::test]
async fn voice_exchange_holds_focus_until_an_unrelated_directive() -> anyhow::Result<()> {
    let (arbiter, runtime) = start(&ClientConfig::default()).await;
    let bus = runtime.bus();
    let channel = runtime.focus().channel_id().clone();

    // Recognition result: wait for the server's answer to dialog d-1.
    bus.directive_receipts()
        .publish(DirectiveReceived {
            directive: directive("ASR.NotifyResult", "m-1", "d-1"),
        })
        .await?;
    assert!(runtime.focus().snapshot().await?.holding);

    // The answer is spoken.
    let speak = directive("TTS.Speak", "m-2", "d-1");
    bus.directive_receipts()
        .publish(DirectiveReceived {
            directive: speak.clone(),
        })
        .await?;
    bus.directive_processing()
        .publish(DirectiveProcessing::Prefetch(speak.clone()))
        .await?;
    bus.directive_processing()
        .publish(DirectiveProcessing::Complete(speak))
        .await?;

    let snap = runtime.focus().snapshot().await?;
    assert!(snap.holding);
    assert!(snap.in_flight_sound_directives.is_empty());
    assert_eq!(snap.pending_dialogs.len(), 1);

    // Anything outside the pending exchange ends it.
    bus.directive_receipts()
        .publish(DirectiveReceived {
            directive: directive("Display.Template", "m-3", "d-2"),
        })
        .await?;
    let snap = runtime.focus().snapshot().await?;
    assert!(!snap.holding);
    assert!(snap.pending_dialogs.is_empty());
    assert!(!arbiter.is_holding(&channel));
    assert_eq!(arbiter.acquisitions(), 1);
    assert_eq!(arbiter.calls().last(), Some(&ArbiterCall::Release));

    runtime.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn focus_targets_come_from_configuration() -> anyhow::Result<()> {
    let mut config = ClientConfig::default();
    config.focus.focus_targets = vec!["Alerts.AlertFinished".to_string()];
    let (arbiter, runtime) = start(&config).await;
    let bus = runtime.bus();

    bus.events()
        .publish(EventLifecycle::WillSend(EventNotification::new(
            "TTS.SpeechFinished",
            "m-1",
        )))
        .await?;
    assert!(!runtime.focus().snapshot().await?.holding);

    bus.events()
        .publish(EventLifecycle::WillSend(EventNotification::new(
            "Alerts.AlertFinished",
            "m-2",
        )))
        .await?;
    assert!(runtime.focus().snapshot().await?.holding);

    bus.events()
        .publish(EventLifecycle::Sent(EventNotification::new(
            "Alerts.AlertFinished",
            "m-2",
        )))
        .await?;
    assert!(!runtime.focus().snapshot().await?.holding);
    assert_eq!(arbiter.request_count(), 1);

    runtime.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn context_snapshot_runs_alongside_focus_coordination() -> anyhow::Result<()> {
    let (_arbiter, runtime) = start(&ClientConfig::default()).await;

    runtime
        .context()
        .add_provider(Arc::new(|completion: ContextCompletion| {
            completion.complete(ContextInfo::capability(
                "TTS",
                json!({ "version": "1.3", "ttsActivity": "IDLE" }),
            ));
        }));
    runtime
        .context()
        .add_provider(Arc::new(|completion: ContextCompletion| {
            completion.complete(ContextInfo::capability(
                "ASR",
                json!({ "version": "1.7", "state": "BUSY" }),
            ));
        }));

    runtime
        .bus()
        .dialog_states()
        .publish(DialogStateChanged {
            state: DialogState::Listening,
        })
        .await?;

    let mut contexts = runtime.context().get_contexts_for("ASR").await;
    contexts.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(
        contexts,
        vec![
            ContextInfo::capability("ASR", json!({ "version": "1.7", "state": "BUSY" })),
            ContextInfo::capability("TTS", json!({ "version": "1.3" })),
        ]
    );
    assert!(runtime.focus().snapshot().await?.holding);

    runtime.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn shutdown_releases_focus_and_closes_the_bus() -> anyhow::Result<()> {
    let (arbiter, runtime) = start(&ClientConfig::default()).await;
    let bus = runtime.bus().clone();
    let channel = runtime.focus().channel_id().clone();

    bus.dialog_states()
        .publish(DialogStateChanged {
            state: DialogState::Speaking,
        })
        .await?;
    assert!(runtime.focus().snapshot().await?.holding);
    assert_eq!(bus.subscription_count().await, 4);

    runtime.shutdown().await?;

    assert!(!arbiter.is_holding(&channel));
    assert_eq!(bus.subscription_count().await, 0);
    assert!(bus
        .dialog_states()
        .publish(DialogStateChanged {
            state: DialogState::Idle,
        })
        .await
        .is_err());
    Ok(())
}
