//! Row-wise zip over any number of streams.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, Stream};

/// Stream returned by [`zip_many`].
#[must_use = "streams do nothing unless polled"]
pub struct ZipMany<S: Stream> {
    streams: Vec<S>,
    row: Vec<Option<S::Item>>,
    finished: bool,
}

/// Combine `streams` into one stream of rows.
///
/// A row holds the n-th element of every input, in input order, and is
/// emitted once all inputs have produced it. The zipped stream ends as soon
/// as any input ends. With no inputs it yields a single empty row.
pub fn zip_many<I, S>(streams: I) -> ZipMany<S>
where
    I: IntoIterator<Item = S>,
    S: Stream + Unpin,
{
    let streams: Vec<S> = streams.into_iter().collect();
    let mut row = Vec::with_capacity(streams.len());
    row.resize_with(streams.len(), || None);
    ZipMany {
        streams,
        row,
        finished: false,
    }
}

// No field is ever pin-projected; inputs are polled via `Pin::new` (S: Unpin).
impl<S: Stream> Unpin for ZipMany<S> {}

impl<S: Stream + Unpin> Stream for ZipMany<S> {
    type Item = Vec<S::Item>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.finished {
            return Poll::Ready(None);
        }
        if this.streams.is_empty() {
            this.finished = true;
            return Poll::Ready(Some(Vec::new()));
        }

        let mut complete = true;
        for (stream, slot) in this.streams.iter_mut().zip(this.row.iter_mut()) {
            if slot.is_some() {
                continue;
            }
            match Pin::new(stream).poll_next(cx) {
                Poll::Ready(Some(item)) => *slot = Some(item),
                Poll::Ready(None) => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => complete = false,
            }
        }

        if !complete {
            return Poll::Pending;
        }
        let row = this.row.iter_mut().filter_map(Option::take).collect();
        Poll::Ready(Some(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        if self.streams.is_empty() {
            return (1, Some(1));
        }
        self.streams
            .iter()
            .zip(&self.row)
            .map(|(stream, slot)| {
                let buffered = usize::from(slot.is_some());
                let (low, high) = stream.size_hint();
                (
                    low.saturating_add(buffered),
                    high.and_then(|h| h.checked_add(buffered)),
                )
            })
            .fold((usize::MAX, None::<usize>), |(low, high), (l, h)| {
                let high = match (high, h) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (Some(a), None) | (None, Some(a)) => Some(a),
                    (None, None) => None,
                };
                (low.min(l), high)
            })
    }
}

impl<S: Stream + Unpin> FusedStream for ZipMany<S> {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
