//! The coalescing scheduler.
//!
//! Each owner moves between three states:
//!
//! - idle: no fit is running
//! - running: a fit is running and nothing newer was submitted
//! - running with pending: a fit is running and a newer submission waits
//!
//! Submitting to an idle owner spawns a fitting thread. Submitting to a
//! running owner replaces its pending submission. When a fit finishes and a
//! pending submission exists, the result is dropped and the pending one is
//! fitted on the same thread; otherwise the result is delivered and the owner
//! goes idle. A fitter that panics counts as a failed fit.

use std::any::Any;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread;

use kurve_curves::optimizer::Config;
use kurve_curves::{BasicSpecification, Specification};

use crate::{
    CurveFitter, CurveOptimizer, Delivery, Fit, FitError, FitFailure, Fitter, Inbox, WorkerError,
};

/// Fits curves in the background, keeping only the freshest request per owner.
///
/// Cloning the worker is cheap; clones share owners and the fitter.
pub struct OptimizationWorker<K, F = CurveFitter> {
    fitter: Arc<F>,
    owners: Arc<RwLock<HashMap<K, Arc<Owner>>>>,
}

/// Per-owner scheduling state and mailbox.
#[derive(Debug)]
struct Owner {
    state: Mutex<State>,
    inbox: Arc<Inbox<Delivery>>,
}

#[derive(Debug)]
struct State {
    specification: Specification,
    generation: u64,
    running: bool,
    pending: Option<Submission>,
}

#[derive(Debug)]
struct Submission {
    generation: u64,
    basic: BasicSpecification,
}

impl<K, F> Clone for OptimizationWorker<K, F> {
    fn clone(&self) -> Self {
        Self {
            fitter: Arc::clone(&self.fitter),
            owners: Arc::clone(&self.owners),
        }
    }
}

impl<K> OptimizationWorker<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    /// Creates a worker that solves and normalizes with `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_fitter(CurveFitter::new(config))
    }
}

impl<K> Default for OptimizationWorker<K>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
{
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<K, F> OptimizationWorker<K, F>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    F: Fitter,
{
    /// Creates a worker that runs `fitter` for every fit.
    #[must_use]
    pub fn with_fitter(fitter: F) -> Self {
        Self {
            fitter: Arc::new(fitter),
            owners: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers `owner`, whose first fit warm-starts from `specification`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::AlreadyRegistered`] if `owner` is registered.
    pub fn register(
        &self,
        owner: K,
        specification: Specification,
    ) -> Result<CurveOptimizer<K, F>, WorkerError> {
        let mut owners = self.owners.write().unwrap_or_else(PoisonError::into_inner);
        if owners.contains_key(&owner) {
            return Err(WorkerError::AlreadyRegistered);
        }

        let entry = Arc::new(Owner {
            state: Mutex::new(State {
                specification,
                generation: 0,
                running: false,
                pending: None,
            }),
            inbox: Arc::new(Inbox::new()),
        });
        let inbox = Arc::clone(&entry.inbox);
        owners.insert(owner.clone(), entry);
        log::debug!("registered {owner:?}");

        Ok(CurveOptimizer::new(self.clone(), owner, inbox))
    }

    /// Removes `owner`.
    ///
    /// A fit already running for it finishes, but its result is never read.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownOwner`] if `owner` is not registered.
    pub fn unregister(&self, owner: &K) -> Result<(), WorkerError> {
        let removed = self
            .owners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(owner);
        match removed {
            Some(_) => {
                log::debug!("unregistered {owner:?}");
                Ok(())
            }
            None => Err(WorkerError::UnknownOwner),
        }
    }

    /// Submits a new basic specification for `owner` and returns its
    /// generation.
    ///
    /// Generations count up from 1 per owner. If a fit is running, the
    /// submission waits for it and replaces any submission already waiting.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownOwner`] if `owner` is not registered, or
    /// [`WorkerError::Spawn`] if no fitting thread could be started.
    pub fn submit(&self, owner: &K, basic: BasicSpecification) -> Result<u64, WorkerError> {
        let entry = self.owner(owner)?;
        let mut state = lock(&entry.state);
        state.generation += 1;
        let generation = state.generation;
        let submission = Submission { generation, basic };

        if state.running {
            if let Some(superseded) = state.pending.replace(submission) {
                log::debug!(
                    "{owner:?}: generation {} superseded by {generation} before starting",
                    superseded.generation,
                );
            } else {
                log::trace!("{owner:?}: generation {generation} waits for the running fit");
            }
            return Ok(generation);
        }

        log::trace!("{owner:?}: starting generation {generation}");
        state.running = true;
        drop(state);

        let fitter = Arc::clone(&self.fitter);
        let name = owner.clone();
        let worker_entry = Arc::clone(&entry);
        let spawned = thread::Builder::new()
            .name("kurve-worker".to_owned())
            .spawn(move || run(fitter.as_ref(), &name, &worker_entry, submission));

        if let Err(error) = spawned {
            log::error!("{owner:?}: could not spawn fitting thread: {error}");
            let mut state = lock(&entry.state);
            state.running = false;
            state.pending = None;
            return Err(error.into());
        }
        Ok(generation)
    }

    /// Returns the specification the next fit of `owner` will start from.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownOwner`] if `owner` is not registered.
    pub fn specification(&self, owner: &K) -> Result<Specification, WorkerError> {
        let entry = self.owner(owner)?;
        let state = lock(&entry.state);
        Ok(state.specification.clone())
    }

    fn owner(&self, owner: &K) -> Result<Arc<Owner>, WorkerError> {
        self.owners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(owner)
            .cloned()
            .ok_or(WorkerError::UnknownOwner)
    }
}

/// Fits `submission` and any submissions that arrive meanwhile.
fn run<K: Debug>(fitter: &impl Fitter, owner: &K, entry: &Owner, mut submission: Submission) {
    loop {
        let start = {
            let state = lock(&entry.state);
            let previous = state.specification.basic().segment_count();
            let requested = submission.basic.segment_count();
            if previous != requested {
                log::debug!("{owner:?}: segment count changed from {previous} to {requested}");
            }
            state.specification.rebase(submission.basic.clone())
        };

        let result = match panic::catch_unwind(AssertUnwindSafe(|| fitter.fit(&start))) {
            Ok(fitted) => fitted.map_err(FitFailure::from),
            Err(payload) => Err(FitFailure::Panicked(panic_message(payload.as_ref()))),
        };

        let mut state = lock(&entry.state);
        if let Ok(solution) = &result {
            state.specification = solution.specification.clone();
        }

        if let Some(next) = state.pending.take() {
            log::debug!(
                "{owner:?}: dropping generation {} in favor of {}",
                submission.generation,
                next.generation,
            );
            submission = next;
            continue;
        }

        state.running = false;
        let generation = submission.generation;
        let delivery = match result {
            Ok(solution) => {
                log::debug!(
                    "{owner:?}: delivering generation {generation}, converged: {}",
                    solution.is_converged(),
                );
                Ok(Fit {
                    generation,
                    basic: submission.basic,
                    converged: solution.is_converged(),
                    specification: solution.specification,
                    curve: solution.curve,
                })
            }
            Err(source) => {
                log::error!("{owner:?}: generation {generation} failed: {source}");
                Err(FitError { generation, source })
            }
        };

        // Sent under the state lock so a later fit cannot deliver first.
        if entry.inbox.send(delivery).is_some() {
            log::trace!("{owner:?}: replaced an undelivered fit");
        }
        return;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
