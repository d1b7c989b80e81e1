use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};

/// Where remote favorites writes run relative to the call that triggered
/// them. Local storage is always written inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// The write finishes before `add`/`remove`/`sign_in` return.
    #[default]
    Inline,
    /// Each remote write runs on its own thread. Writes are not queued, so
    /// they may reach the store in a different order than they were issued.
    Detached,
}

/// What happened to one favorites write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Written to device-local storage.
    Local,
    /// Merge-written to the user's remote record.
    Remote { version: u64 },
    /// Nothing needed writing.
    Skipped,
    /// The write failed. The failure was already logged.
    Failed(String),
}

impl PersistOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistOutcome::Failed(_))
    }
}

enum Inner {
    Done(PersistOutcome),
    Pending(JoinHandle<PersistOutcome>),
}

/// Handle to a favorites write.
///
/// Dropping it is fine: the write still runs to completion.
pub struct PersistHandle {
    inner: Inner,
}

impl PersistHandle {
    pub(crate) fn done(outcome: PersistOutcome) -> Self {
        Self {
            inner: Inner::Done(outcome),
        }
    }

    pub(crate) fn run<F>(mode: PersistMode, job: F) -> Self
    where
        F: FnOnce() -> PersistOutcome + Send + 'static,
    {
        match mode {
            PersistMode::Inline => Self::done(job()),
            PersistMode::Detached => Self {
                inner: Inner::Pending(thread::spawn(job)),
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.inner {
            Inner::Done(_) => true,
            Inner::Pending(handle) => handle.is_finished(),
        }
    }

    /// Block until the write has finished.
    pub fn wait(self) -> PersistOutcome {
        match self.inner {
            Inner::Done(outcome) => outcome,
            Inner::Pending(handle) => handle.join().unwrap_or_else(|_| {
                log::error!("favorites persistence thread panicked");
                PersistOutcome::Failed("persistence thread panicked".to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn inline_runs_before_returning() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let handle = PersistHandle::run(PersistMode::Inline, move || {
            flag.store(true, Ordering::SeqCst);
            PersistOutcome::Local
        });

        assert!(ran.load(Ordering::SeqCst));
        assert!(handle.is_finished());
        assert_eq!(handle.wait(), PersistOutcome::Local);
    }

    #[test]
    fn detached_result_is_returned_by_wait() {
        let handle = PersistHandle::run(PersistMode::Detached, || PersistOutcome::Remote {
            version: 3,
        });
        assert_eq!(handle.wait(), PersistOutcome::Remote { version: 3 });
    }

    #[test]
    fn panicking_job_reports_failure() {
        let handle = PersistHandle::run(PersistMode::Detached, || panic!("boom"));
        assert!(handle.wait().is_failed());
    }
}
