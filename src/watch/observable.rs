use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use super::Subscription;

struct Cell<T> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

/// A value plus the set of channels listening to it.
///
/// Clone-friendly via Arc: every clone reads and publishes to the same cell.
pub struct Observable<T> {
    cell: Arc<Mutex<Cell<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Default + Clone + Send + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Cell {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    // Poisoning is ignored: the value is always left whole.
    fn lock(&self) -> MutexGuard<'_, Cell<T>> {
        self.cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The last published value.
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Replace the value and publish it.
    pub fn set(&self, value: T) {
        let mut cell = self.lock();
        cell.value = value;
        Self::publish(&mut cell);
    }

    /// Compute the next value from the current one and publish it.
    ///
    /// Returns whatever the closure returns. The read and the write happen
    /// under one lock, so concurrent updates apply one after another.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut cell = self.lock();
        let result = f(&mut cell.value);
        Self::publish(&mut cell);
        result
    }

    /// Like `update`, but only publishes when the closure reports a change.
    ///
    /// Returns the new value when it was published.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> Option<T> {
        let mut cell = self.lock();
        if !f(&mut cell.value) {
            return None;
        }
        Self::publish(&mut cell);
        Some(cell.value.clone())
    }

    /// Subscribe to the value. The current value is delivered immediately.
    ///
    /// Each subscription has its own unbounded queue holding one clone per
    /// publish until it is read. Drain a subscription that is only sampled
    /// now and then with `Subscription::latest`, and drop it when done: the
    /// next publish prunes it and frees its queue.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = channel();
        let mut cell = self.lock();
        // The receiver is alive, so this send cannot fail.
        let _ = tx.send(cell.value.clone());
        cell.subscribers.push(tx);
        Subscription::new(rx)
    }

    /// Number of subscribers that were still connected at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn publish(cell: &mut Cell<T>) {
        let value = cell.value.clone();
        cell.subscribers
            .retain(|subscriber| subscriber.send(value.clone()).is_ok());
    }
}
