//! Background curve fitting for interactive editors.
//!
//! An [`OptimizationWorker`] fits curves off the caller's thread. Each
//! registered owner (typically one curve in an editor) gets a
//! [`CurveOptimizer`] handle. Submissions made while a fit is running are
//! coalesced: only the most recent one is fitted next, and the superseded
//! result is dropped. Finished fits land in the owner's single-slot
//! [`Inbox`], which the owner drains from its own thread.
//!
//! Every finished fit becomes the warm start of the owner's next one.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use kurve_curves::{BasicSpecification, SegmentTemplate, Specification};
//! use kurve_worker::OptimizationWorker;
//!
//! let worker: OptimizationWorker<&str> = OptimizationWorker::default();
//! let basic = BasicSpecification::new(100.0, 2, SegmentTemplate::CUBIC, Vec::new())?;
//! let optimizer = worker.register("left rail", Specification::initial(basic.clone()))?;
//!
//! optimizer.submit(basic.with_curve_length(120.0)?)?;
//! if let Some(Ok(fit)) = optimizer.recv_timeout(Duration::from_secs(1)) {
//!     println!("generation {} converged: {}", fit.generation, fit.converged);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod fit;
mod handle;
mod inbox;
mod worker;

pub use error::{FitError, FitFailure, WorkerError};
pub use fit::{CurveFitter, Delivery, Fit, Fitter};
pub use handle::CurveOptimizer;
pub use inbox::Inbox;
pub use worker::OptimizationWorker;
