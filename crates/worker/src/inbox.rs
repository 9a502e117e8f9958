use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A single-slot mailbox.
///
/// Sending overwrites any value the receiver has not taken yet, so the
/// receiver only ever sees the latest one.
#[derive(Debug)]
pub struct Inbox<T> {
    slot: Mutex<Option<T>>,
    filled: Condvar,
}

impl<T> Inbox<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            filled: Condvar::new(),
        }
    }

    /// Stores `value`, returning the undelivered value it replaced.
    pub fn send(&self, value: T) -> Option<T> {
        let replaced = self.lock().replace(value);
        self.filled.notify_all();
        replaced
    }

    /// Takes the stored value without waiting.
    pub fn try_recv(&self) -> Option<T> {
        self.lock().take()
    }

    /// Takes the stored value, waiting up to `timeout` for one to arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let (mut slot, _) = self
            .filled
            .wait_timeout_while(self.lock(), timeout, |slot| slot.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for Inbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn keeps_only_the_latest_value() {
        let inbox = Inbox::new();

        assert_eq!(inbox.send(1), None);
        assert_eq!(inbox.send(2), Some(1));
        assert_eq!(inbox.try_recv(), Some(2));
        assert_eq!(inbox.try_recv(), None);
    }

    #[test]
    fn recv_timeout_waits_for_a_sender() {
        let inbox = Arc::new(Inbox::new());
        let sender = Arc::clone(&inbox);

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sender.send("done");
        });

        assert_eq!(inbox.recv_timeout(Duration::from_secs(5)), Some("done"));
        handle.join().unwrap();
    }

    #[test]
    fn recv_timeout_gives_up() {
        let inbox: Inbox<u8> = Inbox::new();

        assert_eq!(inbox.recv_timeout(Duration::from_millis(10)), None);
    }
}
