use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::error::BusError;
use crate::types::SubscriptionId;

/// Delivery target of one registration.
#[async_trait]
trait Sink<T>: Send + Sync {
    /// `false` once the receiving side is gone.
    async fn deliver(&self, event: T) -> bool;
}

/// Queue sender with a conversion applied on delivery.
struct Forward<T, U> {
    sender: mpsc::Sender<U>,
    map: fn(T) -> U,
}

#[async_trait]
impl<T: Send + 'static, U: Send + 'static> Sink<T> for Forward<T, U> {
    async fn deliver(&self, event: T) -> bool {
        self.sender.send((self.map)(event)).await.is_ok()
    }
}

fn identity<T>(event: T) -> T {
    event
}

/// A registered subscriber.
struct Registration<T> {
    id: SubscriptionId,
    sink: Arc<dyn Sink<T>>,
}

struct ChannelState<T> {
    registrations: Vec<Registration<T>>,
    closed: bool,
}

struct ChannelInner<T> {
    name: String,
    capacity: usize,
    state: RwLock<ChannelState<T>>,
}

impl<T> ChannelInner<T> {
    async fn remove(&self, id: &SubscriptionId) -> bool {
        let mut state = self.state.write().await;
        let before = state.registrations.len();
        state.registrations.retain(|r| r.id != *id);
        before != state.registrations.len()
    }
}

/// One typed notification stream.
///
/// Every subscriber gets its own bounded queue. Publishing waits for queue
/// space instead of dropping, so a begin/end pair is never split.
pub struct EventChannel<T> {
    inner: Arc<ChannelInner<T>>,
}

impl<T> Clone for EventChannel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> EventChannel<T> {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                name: name.into(),
                capacity: capacity.max(1),
                state: RwLock::new(ChannelState {
                    registrations: Vec::new(),
                    closed: false,
                }),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Per-subscriber queue capacity.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Register a new subscriber.
    ///
    /// Subscribing to a closed stream yields a subscription that never
    /// receives anything.
    pub async fn subscribe(&self) -> Subscription<T> {
        let (sender, receiver) = mpsc::channel(self.inner.capacity);
        let id = self.register(Forward {
            sender,
            map: identity::<T>,
        })
        .await;

        Subscription {
            id,
            receiver,
            channel: Arc::downgrade(&self.inner),
        }
    }

    /// Register a subscriber that delivers into a queue it does not own.
    ///
    /// Several streams forwarding into one queue are observed in the order
    /// their publishes completed. The registration lives until cancelled,
    /// the stream is closed, or the queue's receiver is dropped.
    pub async fn subscribe_into<U: Send + 'static>(
        &self,
        sender: mpsc::Sender<U>,
        map: fn(T) -> U,
    ) -> Forwarding<T> {
        let id = self.register(Forward { sender, map }).await;
        Forwarding {
            id,
            channel: Arc::downgrade(&self.inner),
        }
    }

    async fn register<S: Sink<T> + 'static>(&self, sink: S) -> SubscriptionId {
        let id = SubscriptionId::new();
        let mut state = self.inner.state.write().await;
        if !state.closed {
            state.registrations.push(Registration {
                id: id.clone(),
                sink: Arc::new(sink),
            });
        }
        debug!(stream = %self.inner.name, subscription_id = %id, "New subscription registered");
        id
    }

    /// Deliver `event` to every live subscriber.
    /// Returns the number of subscribers that received it.
    pub async fn publish(&self, event: T) -> Result<usize, BusError> {
        let sinks: Vec<(SubscriptionId, Arc<dyn Sink<T>>)> = {
            let state = self.inner.state.read().await;
            if state.closed {
                return Err(BusError::Closed {
                    stream: self.inner.name.clone(),
                });
            }
            state
                .registrations
                .iter()
                .map(|r| (r.id.clone(), r.sink.clone()))
                .collect()
        };

        // Sends happen outside the lock so a full subscriber queue cannot
        // stall subscribe/unsubscribe.
        let mut delivered = 0;
        let mut closed_ids = Vec::new();
        for (id, sink) in sinks {
            if sink.deliver(event.clone()).await {
                delivered += 1;
            } else {
                closed_ids.push(id);
            }
        }

        if !closed_ids.is_empty() {
            let mut state = self.inner.state.write().await;
            state.registrations.retain(|r| !closed_ids.contains(&r.id));
            debug!(stream = %self.inner.name, removed = closed_ids.len(), "Cleaned up closed subscriptions");
        }

        Ok(delivered)
    }

    /// Remove a subscription by ID. No-op if it is not registered.
    pub async fn unsubscribe(&self, id: &SubscriptionId) {
        if self.inner.remove(id).await {
            debug!(stream = %self.inner.name, subscription_id = %id, "Subscription removed");
        }
    }

    /// Get the number of active subscriptions.
    pub async fn subscription_count(&self) -> usize {
        self.inner.state.read().await.registrations.len()
    }

    /// Close the stream: drop every subscriber and reject further publishes.
    pub async fn close(&self) {
        let mut state = self.inner.state.write().await;
        if state.closed {
            return;
        }
        state.closed = true;
        let dropped = state.registrations.len();
        state.registrations.clear();
        info!(stream = %self.inner.name, dropped, "Stream closed");
    }

    pub async fn is_closed(&self) -> bool {
        self.inner.state.read().await.closed
    }
}

/// Receiving end of one subscription.
///
/// [`cancel`](Subscription::cancel) deregisters it; dropping it has the same
/// effect lazily, on the next publish.
pub struct Subscription<T> {
    id: SubscriptionId,
    receiver: mpsc::Receiver<T>,
    channel: Weak<ChannelInner<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Wait for the next notification. `None` once cancelled (and drained)
    /// or once the stream is closed.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Stop further delivery. Idempotent.
    pub async fn cancel(&mut self) {
        self.receiver.close();
        deregister(&self.channel, &self.id).await;
    }
}

/// Handle to a registration made with [`EventChannel::subscribe_into`].
///
/// Dropping it does not deregister; call [`cancel`](Forwarding::cancel).
pub struct Forwarding<T> {
    id: SubscriptionId,
    channel: Weak<ChannelInner<T>>,
}

impl<T> Forwarding<T> {
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Stop further delivery into the queue. Idempotent; events already
    /// queued stay there.
    pub async fn cancel(&self) {
        deregister(&self.channel, &self.id).await;
    }
}

async fn deregister<T>(channel: &Weak<ChannelInner<T>>, id: &SubscriptionId) {
    if let Some(channel) = channel.upgrade() {
        if channel.remove(id).await {
            debug!(stream = %channel.name, subscription_id = %id, "Subscription cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_channel(capacity: usize) -> EventChannel<u32> {
        EventChannel::new("test", capacity)
    }

    #[tokio::test]
    async fn subscribe_and_receive() {
        let channel = test_channel(8);
        let mut sub = channel.subscribe().await;

        let delivered = channel.publish(7).await.unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(sub.recv().await, Some(7));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let channel = test_channel(8);
        let mut first = channel.subscribe().await;
        let mut second = channel.subscribe().await;

        assert_eq!(channel.publish(1).await.unwrap(), 2);
        assert_eq!(first.recv().await, Some(1));
        assert_eq!(second.recv().await, Some(1));
    }

    #[tokio::test]
    async fn unsubscribe() {
        let channel = test_channel(8);
        let sub = channel.subscribe().await;

        assert_eq!(channel.subscription_count().await, 1);
        channel.unsubscribe(sub.id()).await;
        assert_eq!(channel.subscription_count().await, 0);

        // Unknown ids are ignored.
        channel.unsubscribe(&SubscriptionId::new()).await;
    }

    #[tokio::test]
    async fn cancel_stops_delivery() {
        let channel = test_channel(8);
        let mut sub = channel.subscribe().await;

        sub.cancel().await;
        sub.cancel().await;
        assert_eq!(channel.subscription_count().await, 0);

        assert_eq!(channel.publish(3).await.unwrap(), 0);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn closed_subscriber_cleaned_up() {
        let channel = test_channel(8);
        let sub = channel.subscribe().await;
        drop(sub);

        assert_eq!(channel.publish(1).await.unwrap(), 0);
        assert_eq!(channel.subscription_count().await, 0);
    }

    #[tokio::test]
    async fn publish_after_close_fails() {
        let channel = test_channel(8);
        let mut sub = channel.subscribe().await;

        channel.close().await;
        assert!(channel.is_closed().await);
        assert_eq!(
            channel.publish(1).await,
            Err(BusError::Closed {
                stream: "test".into()
            })
        );
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn full_subscriber_applies_backpressure() {
        let channel = test_channel(1);
        let mut sub = channel.subscribe().await;

        channel.publish(1).await.unwrap();

        let publisher = channel.clone();
        let pending = tokio::spawn(async move { publisher.publish(2).await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!pending.is_finished());

        assert_eq!(sub.recv().await, Some(1));
        assert_eq!(pending.await.unwrap().unwrap(), 1);
        assert_eq!(sub.recv().await, Some(2));
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped() {
        let channel = test_channel(0);
        let mut sub = channel.subscribe().await;
        channel.publish(5).await.unwrap();
        assert_eq!(sub.try_recv(), Some(5));
        assert_eq!(sub.try_recv(), None);
    }

    #[derive(Debug, PartialEq)]
    enum Merged {
        Number(u32),
        Word(&'static str),
    }

    #[tokio::test]
    async fn forwarded_streams_keep_publish_order() {
        let numbers = test_channel(8);
        let words: EventChannel<&'static str> = EventChannel::new("words", 8);
        let (sender, mut merged) = mpsc::channel(8);
        let _numbers = numbers.subscribe_into(sender.clone(), Merged::Number).await;
        let _words = words.subscribe_into(sender, Merged::Word).await;

        numbers.publish(1).await.unwrap();
        words.publish("a").await.unwrap();
        numbers.publish(2).await.unwrap();
        words.publish("b").await.unwrap();

        assert_eq!(merged.recv().await, Some(Merged::Number(1)));
        assert_eq!(merged.recv().await, Some(Merged::Word("a")));
        assert_eq!(merged.recv().await, Some(Merged::Number(2)));
        assert_eq!(merged.recv().await, Some(Merged::Word("b")));
    }

    #[tokio::test]
    async fn forwarding_cancel_keeps_queued_events() {
        let channel = test_channel(8);
        let (sender, mut queue) = mpsc::channel(8);
        let forwarding = channel.subscribe_into(sender, identity::<u32>).await;

        channel.publish(1).await.unwrap();
        forwarding.cancel().await;
        forwarding.cancel().await;

        assert_eq!(channel.subscription_count().await, 0);
        assert_eq!(channel.publish(2).await.unwrap(), 0);
        assert_eq!(queue.recv().await, Some(1));
        // Every sender went with the registration.
        assert_eq!(queue.recv().await, None);
    }

    #[tokio::test]
    async fn forwarding_pruned_when_queue_dropped() {
        let channel = test_channel(8);
        let (sender, queue) = mpsc::channel::<u32>(8);
        let _forwarding = channel.subscribe_into(sender, identity::<u32>).await;
        drop(queue);

        assert_eq!(channel.publish(1).await.unwrap(), 0);
        assert_eq!(channel.subscription_count().await, 0);
    }
}
