//! Fan-in bookkeeping for enrichment requests.
//!
//! [`CompletionState`] is the per-fetch state machine (`Pending` to
//! `Dispatched`) deciding when a fetch is finished: all planned keys
//! completed, or the first failure. [`Dispatcher`] is a once-only result
//! cell that delivers a value to its consumer exactly once, no matter how
//! many producers race to settle it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::Stage;

/// Identifies an enrichment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnrichmentKey {
    Geo,
    Email,
}

impl EnrichmentKey {
    /// The error stage requests for this key report under.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Geo => Stage::Geo,
            Self::Email => Stage::Email,
        }
    }
}

impl fmt::Display for EnrichmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geo => f.write_str("geo"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Dispatch state of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Waiting for planned requests.
    Pending,
    /// A result has been delivered; later events have no effect.
    Dispatched,
}

/// Outcome of feeding an event to a [`CompletionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Still pending; more completions are needed.
    Waiting,
    /// All planned keys completed; dispatch success now.
    Complete,
    /// First failure; dispatch the error now.
    Failed,
    /// Already dispatched (or the key was never planned); ignore the event.
    Discarded,
}

/// Tracks planned and completed enrichment keys for one fetch.
#[derive(Debug, Clone)]
pub struct CompletionState {
    planned: BTreeSet<EnrichmentKey>,
    completed: BTreeSet<EnrichmentKey>,
    state: DispatchState,
}

impl CompletionState {
    /// Creates a pending state for a fixed set of planned keys.
    #[must_use]
    pub fn new(planned: impl IntoIterator<Item = EnrichmentKey>) -> Self {
        Self {
            planned: planned.into_iter().collect(),
            completed: BTreeSet::new(),
            state: DispatchState::Pending,
        }
    }

    /// Current dispatch state.
    #[must_use]
    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Keys fixed at plan time.
    #[must_use]
    pub fn planned(&self) -> &BTreeSet<EnrichmentKey> {
        &self.planned
    }

    /// Keys that have completed successfully so far.
    #[must_use]
    pub fn completed(&self) -> &BTreeSet<EnrichmentKey> {
        &self.completed
    }

    /// Returns `true` when every planned key has completed.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.completed == self.planned
    }

    /// Dispatches immediately if nothing was planned.
    pub fn check_empty(&mut self) -> Transition {
        if self.state == DispatchState::Pending && self.is_satisfied() {
            self.state = DispatchState::Dispatched;
            Transition::Complete
        } else {
            Transition::Waiting
        }
    }

    /// Records a successful completion.
    pub fn record_success(&mut self, key: EnrichmentKey) -> Transition {
        if self.state == DispatchState::Dispatched || !self.planned.contains(&key) {
            return Transition::Discarded;
        }

        self.completed.insert(key);
        if self.is_satisfied() {
            self.state = DispatchState::Dispatched;
            Transition::Complete
        } else {
            Transition::Waiting
        }
    }

    /// Records a failure. The first failure while pending wins.
    pub fn record_failure(&mut self, key: EnrichmentKey) -> Transition {
        if self.state == DispatchState::Dispatched || !self.planned.contains(&key) {
            return Transition::Discarded;
        }

        self.state = DispatchState::Dispatched;
        Transition::Failed
    }
}

type Deliver<T> = Box<dyn FnOnce(T) + Send>;

/// Delivers a value to a consumer at most once.
///
/// The first [`settle`](Self::settle) wins a compare-and-set on the
/// dispatched flag and runs the consumer; every later call returns `false`
/// and drops its value.
pub struct Dispatcher<T> {
    dispatched: AtomicBool,
    deliver: Mutex<Option<Deliver<T>>>,
}

impl<T> Dispatcher<T> {
    /// Creates a dispatcher delivering to a callback.
    pub fn new<C>(callback: C) -> Self
    where
        C: FnOnce(T) + Send + 'static,
    {
        Self {
            dispatched: AtomicBool::new(false),
            deliver: Mutex::new(Some(Box::new(callback))),
        }
    }

    /// Delivers `value` if nothing has been delivered yet.
    ///
    /// Returns `true` if this call delivered.
    pub fn settle(&self, value: T) -> bool {
        if self
            .dispatched
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let deliver = self
            .deliver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match deliver {
            Some(deliver) => {
                deliver(value);
                true
            }
            None => false,
        }
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("dispatched", &self.dispatched.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_empty_plan_completes_immediately() {
        let mut state = CompletionState::new([]);
        assert_eq!(state.check_empty(), Transition::Complete);
        assert_eq!(state.state(), DispatchState::Dispatched);
        assert_eq!(state.check_empty(), Transition::Waiting);
    }

    #[test]
    fn test_non_empty_plan_waits() {
        let mut state = CompletionState::new([EnrichmentKey::Email]);
        assert_eq!(state.check_empty(), Transition::Waiting);
        assert_eq!(state.state(), DispatchState::Pending);
    }

    #[test]
    fn test_completes_when_all_planned_keys_succeed() {
        let mut state = CompletionState::new([EnrichmentKey::Geo, EnrichmentKey::Email]);

        assert_eq!(state.record_success(EnrichmentKey::Email), Transition::Waiting);
        assert_eq!(state.state(), DispatchState::Pending);
        assert_eq!(state.record_success(EnrichmentKey::Geo), Transition::Complete);
        assert_eq!(state.state(), DispatchState::Dispatched);
        assert_eq!(state.completed(), state.planned());
    }

    #[test]
    fn test_completion_order_does_not_matter() {
        for order in [
            [EnrichmentKey::Geo, EnrichmentKey::Email],
            [EnrichmentKey::Email, EnrichmentKey::Geo],
        ] {
            let mut state = CompletionState::new(order);
            assert_eq!(state.record_success(order[0]), Transition::Waiting);
            assert_eq!(state.record_success(order[1]), Transition::Complete);
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let mut state = CompletionState::new([EnrichmentKey::Geo, EnrichmentKey::Email]);

        assert_eq!(state.record_failure(EnrichmentKey::Geo), Transition::Failed);
        assert_eq!(state.record_failure(EnrichmentKey::Email), Transition::Discarded);
        assert_eq!(state.record_success(EnrichmentKey::Email), Transition::Discarded);
        assert_eq!(state.state(), DispatchState::Dispatched);
    }

    #[test]
    fn test_failure_after_success_dispatch_is_discarded() {
        let mut state = CompletionState::new([EnrichmentKey::Email]);
        assert_eq!(state.record_success(EnrichmentKey::Email), Transition::Complete);
        assert_eq!(state.record_failure(EnrichmentKey::Email), Transition::Discarded);
    }

    #[test]
    fn test_unplanned_key_is_discarded() {
        let mut state = CompletionState::new([EnrichmentKey::Email]);
        assert_eq!(state.record_success(EnrichmentKey::Geo), Transition::Discarded);
        assert_eq!(state.record_failure(EnrichmentKey::Geo), Transition::Discarded);
        assert_eq!(state.state(), DispatchState::Pending);
    }

    #[test]
    fn test_dispatcher_settles_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let dispatcher = {
            let calls = calls.clone();
            let seen = seen.clone();
            Dispatcher::new(move |value: &'static str| {
                calls.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(value);
            })
        };

        assert!(dispatcher.settle("first"));
        assert!(!dispatcher.settle("second"));
        assert!(format!("{dispatcher:?}").contains("dispatched: true"));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["first"]);
    }

    #[tokio::test]
    async fn test_dispatcher_concurrent_settle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = {
            let calls = calls.clone();
            Arc::new(Dispatcher::new(move |_: usize| {
                calls.fetch_add(1, Ordering::SeqCst);
            }))
        };

        let mut handles = Vec::new();
        for i in 0..16 {
            let dispatcher = dispatcher.clone();
            handles.push(tokio::spawn(async move { dispatcher.settle(i) }));
        }

        let mut delivered = 0;
        for handle in handles {
            if handle.await.unwrap() {
                delivered += 1;
            }
        }

        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
