use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// The receiving end of an `Observable`.
///
/// Values arrive in publish order. Iterating blocks until the next value
/// and ends once every handle to the observable has been dropped.
pub struct Subscription<T> {
    rx: Receiver<T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(rx: Receiver<T>) -> Self {
        Self { rx }
    }

    /// Next pending value without blocking.
    pub fn try_next(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next value.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Some(value),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain every pending value and keep only the newest.
    pub fn latest(&mut self) -> Option<T> {
        let mut last = None;
        while let Some(value) = self.try_next() {
            last = Some(value);
        }
        last
    }

    /// Derive a stream by applying `f` to every value.
    pub fn map<U, F>(self, f: F) -> Derived<T, U>
    where
        F: Fn(&T) -> U + Send + 'static,
    {
        Derived {
            source: self,
            f: Box::new(f),
        }
    }
}

impl<T> Iterator for Subscription<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.rx.recv().ok()
    }
}

/// A subscription whose values are projected through a function.
pub struct Derived<T, U> {
    source: Subscription<T>,
    f: Box<dyn Fn(&T) -> U + Send>,
}

impl<T, U> Derived<T, U> {
    pub fn try_next(&mut self) -> Option<U> {
        self.source.try_next().map(|value| (self.f)(&value))
    }

    pub fn next_timeout(&mut self, timeout: Duration) -> Option<U> {
        self.source
            .next_timeout(timeout)
            .map(|value| (self.f)(&value))
    }

    pub fn latest(&mut self) -> Option<U> {
        self.source.latest().map(|value| (self.f)(&value))
    }
}

impl<T, U> Iterator for Derived<T, U> {
    type Item = U;

    fn next(&mut self) -> Option<U> {
        self.source.next().map(|value| (self.f)(&value))
    }
}
