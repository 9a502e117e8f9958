use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use kurve_curves::{BasicSpecification, Specification};

use crate::{CurveFitter, Delivery, Fitter, Inbox, OptimizationWorker, WorkerError};

/// One owner's view of an [`OptimizationWorker`].
///
/// Deliveries wait in the owner's inbox until the owner takes them, so
/// callbacks passed to [`dispatch`](Self::dispatch) run on whichever thread
/// calls it and never on a fitting thread.
pub struct CurveOptimizer<K, F = CurveFitter> {
    worker: OptimizationWorker<K, F>,
    owner: K,
    inbox: Arc<Inbox<Delivery>>,
}

impl<K, F> CurveOptimizer<K, F>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    F: Fitter,
{
    pub(crate) fn new(worker: OptimizationWorker<K, F>, owner: K, inbox: Arc<Inbox<Delivery>>) -> Self {
        Self {
            worker,
            owner,
            inbox,
        }
    }

    #[must_use]
    pub fn owner(&self) -> &K {
        &self.owner
    }

    /// Submits a new basic specification; see [`OptimizationWorker::submit`].
    ///
    /// # Errors
    ///
    /// Returns an error if the owner was unregistered or no fitting thread
    /// could be started.
    pub fn submit(&self, basic: BasicSpecification) -> Result<u64, WorkerError> {
        self.worker.submit(&self.owner, basic)
    }

    /// Returns the warm start of the next fit.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::UnknownOwner`] if the owner was unregistered.
    pub fn specification(&self) -> Result<Specification, WorkerError> {
        self.worker.specification(&self.owner)
    }

    /// Takes the latest delivery, if any.
    pub fn try_recv(&self) -> Option<Delivery> {
        self.inbox.try_recv()
    }

    /// Takes the latest delivery, waiting up to `timeout` for one.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Delivery> {
        self.inbox.recv_timeout(timeout)
    }

    /// Hands the latest delivery, if any, to `callback` on the calling thread.
    ///
    /// Returns `true` if a delivery was dispatched.
    pub fn dispatch(&self, callback: impl FnOnce(Delivery)) -> bool {
        match self.inbox.try_recv() {
            Some(delivery) => {
                callback(delivery);
                true
            }
            None => false,
        }
    }
}
