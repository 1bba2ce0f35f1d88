//! The background focus holder.
//!
//! Holds the focus channel at background priority while events or
//! directives are in flight, so a foreground requester cannot grab the
//! output in the middle of an exchange. All four notification streams
//! forward into one queue, consumed by a single worker task in arrival
//! order; the hold state is only ever touched by that task.

use std::sync::Arc;

use aria_fabric::{ClientBus, Forwarding};
use aria_types::{
    DialogStateChanged, DirectiveProcessing, DirectiveReceived, EventLifecycle,
    FocusChannelPriority, FocusState,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::arbiter::{FocusArbiter, FocusChannelDelegate, FocusChannelId};
use crate::config::FocusHolderConfig;
use crate::error::{FocusError, FocusResult};
use crate::state::{HoldDecision, HoldInput, HoldRules, HoldSnapshot, HoldState};

enum Command {
    FocusChanged(FocusState),
    Snapshot(oneshot::Sender<HoldSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Delegate registered with the arbiter. Forwards callbacks to the worker.
struct HolderDelegate {
    channel: FocusChannelId,
    commands: mpsc::UnboundedSender<Command>,
}

impl FocusChannelDelegate for HolderDelegate {
    fn focus_state_changed(&self, state: FocusState) {
        if self.commands.send(Command::FocusChanged(state)).is_err() {
            debug!(channel = %self.channel, %state, "Focus change after teardown, ignoring");
        }
    }
}

/// The four stream registrations feeding the worker's input queue.
struct Streams {
    events: Forwarding<EventLifecycle>,
    directive_receipts: Forwarding<DirectiveReceived>,
    directive_processing: Forwarding<DirectiveProcessing>,
    dialog_states: Forwarding<DialogStateChanged>,
}

impl Streams {
    async fn forward_into(bus: &ClientBus, inputs: mpsc::Sender<HoldInput>) -> Self {
        Self {
            events: bus.events().subscribe_into(inputs.clone(), HoldInput::Event).await,
            directive_receipts: bus
                .directive_receipts()
                .subscribe_into(inputs.clone(), HoldInput::DirectiveReceived)
                .await,
            directive_processing: bus
                .directive_processing()
                .subscribe_into(inputs.clone(), HoldInput::Directive)
                .await,
            dialog_states: bus
                .dialog_states()
                .subscribe_into(inputs, HoldInput::DialogState)
                .await,
        }
    }

    async fn cancel(&self) {
        self.events.cancel().await;
        self.directive_receipts.cancel().await;
        self.directive_processing.cancel().await;
        self.dialog_states.cancel().await;
    }
}

struct Worker {
    channel: FocusChannelId,
    rules: HoldRules,
    state: HoldState,
    arbiter: Arc<dyn FocusArbiter>,
    holding: bool,
    last_focus_state: FocusState,
    alive: bool,
    streams: Streams,
    inputs: mpsc::Receiver<HoldInput>,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl Worker {
    async fn new(
        channel: FocusChannelId,
        config: &FocusHolderConfig,
        arbiter: Arc<dyn FocusArbiter>,
        bus: &ClientBus,
        commands: mpsc::UnboundedReceiver<Command>,
    ) -> Self {
        let (input_tx, inputs) = mpsc::channel(bus.events().capacity());
        Self {
            channel,
            rules: HoldRules::from_config(config),
            state: HoldState::new(),
            arbiter,
            holding: false,
            last_focus_state: FocusState::Nothing,
            alive: true,
            streams: Streams::forward_into(bus, input_tx).await,
            inputs,
            commands,
        }
    }

    async fn run(mut self) {
        info!(channel = %self.channel, "Focus holder started");

        loop {
            // Inputs go first so that a snapshot observes everything
            // published before it was requested.
            tokio::select! {
                biased;
                Some(input) = self.inputs.recv() => self.on_input(input),
                command = self.commands.recv() => match command {
                    Some(Command::FocusChanged(state)) => self.on_focus_changed(state),
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.state.snapshot(self.holding, self.last_focus_state));
                    }
                    Some(Command::Shutdown(done)) => {
                        self.teardown().await;
                        let _ = done.send(());
                        break;
                    }
                    // Handle and delegate are gone.
                    None => {
                        self.teardown().await;
                        break;
                    }
                },
            }
        }

        info!(channel = %self.channel, "Focus holder stopped");
    }

    fn on_input(&mut self, input: HoldInput) {
        if !self.alive {
            debug!(channel = %self.channel, ?input, "Notification after teardown, ignoring");
            return;
        }

        let decision = self.state.apply(&self.rules, &input);
        debug!(channel = %self.channel, ?input, ?decision, "Notification applied");

        match decision {
            HoldDecision::RequestFocus => self.request_focus(),
            HoldDecision::TryRelease => self.try_release_focus(),
            HoldDecision::Unchanged => {}
        }
    }

    fn on_focus_changed(&mut self, state: FocusState) {
        // Observed only; focus changes never feed back into hold eligibility.
        debug!(channel = %self.channel, %state, "Focus state changed");
        self.last_focus_state = state;
    }

    fn request_focus(&mut self) {
        self.arbiter.request_focus(&self.channel);
        self.holding = true;
    }

    fn try_release_focus(&mut self) {
        if !self.holding || !self.state.is_releasable() {
            return;
        }
        self.arbiter.release_focus(&self.channel);
        self.holding = false;
        debug!(channel = %self.channel, "Focus released");
    }

    /// Deregister from the bus and give up any held focus. Inputs that were
    /// queued before deregistration finished are then discarded.
    async fn teardown(&mut self) {
        self.alive = false;
        self.streams.cancel().await;

        if self.holding {
            self.arbiter.release_focus(&self.channel);
            self.holding = false;
        }

        self.inputs.close();
        while let Ok(input) = self.inputs.try_recv() {
            self.on_input(input);
        }
        info!(channel = %self.channel, "Focus holder torn down");
    }
}

/// Handle to a running background focus holder.
///
/// Dropping the handle tears the holder down.
pub struct FocusHolder {
    channel: FocusChannelId,
    commands: mpsc::UnboundedSender<Command>,
    // The arbiter only has a weak reference.
    _delegate: Arc<dyn FocusChannelDelegate>,
    worker: JoinHandle<()>,
}

impl FocusHolder {
    /// Register with the arbiter at background priority, subscribe to the
    /// bus and start the worker. Must be called inside a Tokio runtime.
    pub async fn spawn(
        config: &FocusHolderConfig,
        arbiter: Arc<dyn FocusArbiter>,
        bus: &ClientBus,
    ) -> Self {
        let channel = FocusChannelId::new();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let delegate: Arc<dyn FocusChannelDelegate> = Arc::new(HolderDelegate {
            channel: channel.clone(),
            commands: commands.clone(),
        });
        arbiter.register(
            channel.clone(),
            FocusChannelPriority::Background,
            Arc::downgrade(&delegate),
        );

        let worker = Worker::new(channel.clone(), config, arbiter, bus, command_rx).await;
        let worker = tokio::spawn(worker.run());

        Self {
            channel,
            commands,
            _delegate: delegate,
            worker,
        }
    }

    pub fn channel_id(&self) -> &FocusChannelId {
        &self.channel
    }

    /// Read the hold state, serialized with every pending notification.
    pub async fn snapshot(&self) -> FocusResult<HoldSnapshot> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Snapshot(reply))
            .map_err(|_| FocusError::Stopped)?;
        response.await.map_err(|_| FocusError::Stopped)
    }

    /// Cancel the subscriptions, release any held focus and stop the worker.
    pub async fn shutdown(self) -> FocusResult<()> {
        let (done, finished) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(done))
            .map_err(|_| FocusError::Stopped)?;
        finished.await.map_err(|_| FocusError::Stopped)?;
        self.worker.await.map_err(|_| FocusError::Stopped)
    }
}
