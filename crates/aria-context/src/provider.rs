use aria_types::ContextInfo;
use tokio::sync::oneshot;

/// One-shot reply slot handed to a provider for a single query.
///
/// `complete` consumes the slot, so a provider can answer at most once.
/// Dropping it unanswered excludes the provider from that snapshot.
#[derive(Debug)]
pub struct ContextCompletion {
    sender: oneshot::Sender<ContextInfo>,
}

impl ContextCompletion {
    pub(crate) fn new(sender: oneshot::Sender<ContextInfo>) -> Self {
        Self { sender }
    }

    pub fn complete(self, info: ContextInfo) {
        // The snapshot may already have given up on this provider.
        let _ = self.sender.send(info);
    }
}

/// Supplies the current state of one capability (or of the client).
///
/// `query` must not block; answer through the completion, from any thread
/// or task, exactly once.
pub trait ContextProvider: Send + Sync {
    fn query(&self, completion: ContextCompletion);
}

impl<F> ContextProvider for F
where
    F: Fn(ContextCompletion) + Send + Sync,
{
    fn query(&self, completion: ContextCompletion) {
        self(completion)
    }
}
