//! Lock-free event hand-off from a control thread to the audio thread.
//!
//! The audio callback drains the ring buffer into a scratch vector reserved
//! up front, then passes the slice to the pipeline like any host event list.

use rtrb::{Consumer, Producer, RingBuffer};

use crate::io::midi::TimedEvent;

/// Create a queue holding up to `capacity` pending events.
///
/// The producer side goes to the control thread, the [`EventQueue`] to the
/// audio thread.
pub fn event_queue(capacity: usize) -> (Producer<TimedEvent>, EventQueue) {
    let (tx, rx) = RingBuffer::new(capacity);
    (
        tx,
        EventQueue {
            rx,
            scratch: Vec::with_capacity(capacity),
        },
    )
}

pub struct EventQueue {
    rx: Consumer<TimedEvent>,
    scratch: Vec<TimedEvent>,
}

impl EventQueue {
    /// Pop every pending event, up to the reserved capacity, in push order.
    ///
    /// Never allocates. Events beyond the capacity stay queued for the next
    /// call.
    pub fn drain(&mut self) -> &[TimedEvent] {
        self.scratch.clear();
        while self.scratch.len() < self.scratch.capacity() {
            match self.rx.pop() {
                Ok(event) => self.scratch.push(event),
                Err(_) => break,
            }
        }
        &self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_push_order() {
        let (mut tx, mut queue) = event_queue(8);
        tx.push(TimedEvent::midi(0, [0x90, 60, 100])).unwrap();
        tx.push(TimedEvent::midi(0, [0x80, 60, 0])).unwrap();

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].data, [0x90, 60, 100]);
        assert_eq!(drained[1].data, [0x80, 60, 0]);

        assert!(queue.drain().is_empty());
    }

    #[test]
    fn drain_does_not_grow_scratch() {
        let (mut tx, mut queue) = event_queue(2);
        let reserved = queue.scratch.capacity();
        tx.push(TimedEvent::midi(0, [0xB0, 1, 10])).unwrap();
        tx.push(TimedEvent::midi(0, [0xB0, 1, 20])).unwrap();

        assert_eq!(queue.drain().len(), 2);
        assert_eq!(queue.scratch.capacity(), reserved);
    }
}
