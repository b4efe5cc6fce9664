//! Completion queue for asynchronous container loads
//!
//! Hosts may finish loads from any thread. Completions are drained on the
//! tick thread at the start of the next frame. Completions that do not fit
//! in the channel are parked in an overflow list and drained with it, so
//! no finished load is ever lost.

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use super::ContainerId;

/// Capacity of the completion queue
const QUEUE_CAPACITY: usize = 64;

/// A container finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadEvent {
    pub container: ContainerId,
}

/// Ticket handed to [`SceneHost::request_load`](super::SceneHost::request_load)
#[derive(Debug)]
pub struct LoadCompletion {
    container: ContainerId,
    sender: Sender<LoadEvent>,
    overflow: Arc<Mutex<Vec<LoadEvent>>>,
}

impl LoadCompletion {
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// Signal that the load finished
    ///
    /// Returns `false` only if the queue is gone.
    pub fn complete(self) -> bool {
        match self.sender.try_send(LoadEvent {
            container: self.container,
        }) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!("Load completion queue full, deferring {:?}", self.container);
                self.overflow.lock().push(event);
                true
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("Load completion for {:?} after shutdown", self.container);
                false
            }
        }
    }
}

/// Queue of pending load completions
pub struct LoadQueue {
    sender: Sender<LoadEvent>,
    receiver: Receiver<LoadEvent>,
    overflow: Arc<Mutex<Vec<LoadEvent>>>,
}

impl Default for LoadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadQueue {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(QUEUE_CAPACITY);
        Self {
            sender,
            receiver,
            overflow: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a completion ticket for `container`
    pub fn ticket(&self, container: ContainerId) -> LoadCompletion {
        LoadCompletion {
            container,
            sender: self.sender.clone(),
            overflow: Arc::clone(&self.overflow),
        }
    }

    /// Take every queued completion
    pub fn drain(&self) -> Vec<LoadEvent> {
        let mut events: Vec<LoadEvent> = self.receiver.try_iter().take(QUEUE_CAPACITY).collect();
        events.append(&mut self.overflow.lock());
        events
    }

    /// Number of completions waiting
    pub fn len(&self) -> usize {
        self.receiver.len() + self.overflow.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_completes_into_queue() {
        let queue = LoadQueue::new();
        let ticket = queue.ticket(ContainerId(3));
        assert_eq!(ticket.container(), ContainerId(3));
        assert!(queue.is_empty());

        assert!(ticket.complete());
        assert_eq!(queue.len(), 1);
        assert_eq!(
            queue.drain(),
            vec![LoadEvent {
                container: ContainerId(3)
            }]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_complete_from_other_thread() {
        let queue = LoadQueue::new();
        let ticket = queue.ticket(ContainerId(1));
        std::thread::spawn(move || ticket.complete())
            .join()
            .unwrap();
        assert_eq!(queue.drain().len(), 1);
    }

    #[test]
    fn test_full_queue_defers_completions() {
        let queue = LoadQueue::new();
        let total = QUEUE_CAPACITY as u32 + 3;
        for id in 0..total {
            assert!(queue.ticket(ContainerId(id)).complete());
        }
        assert_eq!(queue.len(), total as usize);

        let drained = queue.drain();
        assert_eq!(drained.len(), total as usize);
        assert!(drained.contains(&LoadEvent {
            container: ContainerId(total - 1)
        }));
        assert!(queue.is_empty());
    }
}
