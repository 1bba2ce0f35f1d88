//! Fixed-capacity ring used to stage audio frames.
//!
//! Dequeued slots keep their value until a later `enqueue` overwrites them,
//! so a reader can rewind with [`RingBuffer::move_head`] and replay frames
//! (e.g. the pre-roll before a wake word).

/// Overwriting FIFO ring of fixed capacity.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Returns `None` for a zero capacity.
    pub fn new(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Some(Self {
            slots,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append `element`, dropping the oldest unread element when full.
    pub fn enqueue(&mut self, element: T) {
        self.slots[self.tail] = Some(element);
        self.tail = self.advance(self.tail);
        if self.is_full() {
            self.head = self.advance(self.head);
        } else {
            self.len += 1;
        }
    }

    /// Oldest unread element, without consuming it.
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    /// Move the read position to slot `index` (taken modulo capacity).
    ///
    /// Everything from that slot up to the write position becomes unread
    /// again. Returns `false` and leaves the ring untouched if the slot has
    /// never been written.
    pub fn move_head(&mut self, index: usize) -> bool {
        let capacity = self.capacity();
        let head = index % capacity;
        if self.slots[head].is_none() {
            return false;
        }
        self.len = match (self.tail + capacity - head) % capacity {
            // Only reachable once the ring has wrapped: replay all of it.
            0 => capacity,
            distance => distance,
        };
        self.head = head;
        true
    }

    /// Slot index of the oldest unread element.
    pub fn head(&self) -> usize {
        self.head
    }

    fn advance(&self, index: usize) -> usize {
        (index + 1) % self.capacity()
    }
}

impl<T: Clone> RingBuffer<T> {
    pub fn dequeue(&mut self) -> Option<T> {
        let element = self.peek().cloned()?;
        self.head = self.advance(self.head);
        self.len -= 1;
        Some(element)
    }
}
