use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use kurve_curves::optimizer::{self, Solution};
use kurve_curves::{
    BasicSpecification, Curve, PointCurveSpecification, SegmentTemplate, Specification,
    SpecificationError,
};
use kurve_worker::{CurveFitter, FitFailure, Fitter, OptimizationWorker, WorkerError};

const TIMEOUT: Duration = Duration::from_secs(30);

fn basic(length: f64, segments: usize) -> BasicSpecification {
    let specs = vec![
        PointCurveSpecification::new(0.0, (0.0, 0.0)).unwrap().into(),
        PointCurveSpecification::new(1.0, (60.0, 30.0)).unwrap().into(),
    ];
    BasicSpecification::new(length, segments, SegmentTemplate::CUBIC, specs).unwrap()
}

/// Reports when each fit starts and holds it until released.
struct GatedFitter {
    inner: CurveFitter,
    started: Sender<()>,
    release: Mutex<Receiver<()>>,
}

impl Fitter for GatedFitter {
    fn fit(&self, specification: &Specification) -> Result<Solution, optimizer::Error> {
        self.started.send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.fit(specification)
    }
}

struct FailingFitter;

impl Fitter for FailingFitter {
    fn fit(&self, _specification: &Specification) -> Result<Solution, optimizer::Error> {
        Err(SpecificationError::ZeroSegmentCount.into())
    }
}

/// Panics on its first fit, then fits normally.
struct PanicOnceFitter {
    panicked: AtomicBool,
}

impl Fitter for PanicOnceFitter {
    fn fit(&self, specification: &Specification) -> Result<Solution, optimizer::Error> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("fitter blew up");
        }
        CurveFitter::default().fit(specification)
    }
}

#[test]
fn only_the_latest_submission_is_delivered() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let worker = OptimizationWorker::with_fitter(GatedFitter {
        inner: CurveFitter::default(),
        started: started_tx,
        release: Mutex::new(release_rx),
    });
    let optimizer = worker
        .register(7, Specification::initial(basic(100.0, 1)))
        .unwrap();

    assert_eq!(optimizer.submit(basic(100.0, 1)).unwrap(), 1);
    started_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(optimizer.submit(basic(110.0, 1)).unwrap(), 2);
    assert_eq!(optimizer.submit(basic(120.0, 1)).unwrap(), 3);

    // Finishing the first fit starts the third submission right away.
    release_tx.send(()).unwrap();
    started_rx.recv_timeout(TIMEOUT).unwrap();
    assert!(optimizer.try_recv().is_none());
    release_tx.send(()).unwrap();

    let fit = optimizer.recv_timeout(TIMEOUT).unwrap().unwrap();
    assert_eq!(fit.generation, 3);
    assert_eq!(fit.basic, basic(120.0, 1));
    assert!(optimizer.recv_timeout(Duration::from_millis(100)).is_none());
    assert!(started_rx.try_recv().is_err());
}

#[test]
fn dispatch_runs_on_the_owner_thread_and_updates_the_warm_start() {
    let worker: OptimizationWorker<&str> = OptimizationWorker::default();
    let optimizer = worker
        .register("curve", Specification::initial(basic(90.0, 1)))
        .unwrap();
    let owner_thread = thread::current().id();

    optimizer.submit(basic(90.0, 2)).unwrap();

    let mut delivered = None;
    let deadline = Instant::now() + TIMEOUT;
    while !optimizer.dispatch(|delivery| {
        assert_eq!(thread::current().id(), owner_thread);
        delivered = Some(delivery);
    }) {
        assert!(Instant::now() < deadline, "no delivery");
        thread::sleep(Duration::from_millis(5));
    }

    let fit = delivered.unwrap().unwrap();
    assert_eq!(fit.generation, 1);
    assert_eq!(fit.curve.segment_count(), 2);
    assert_eq!(optimizer.specification().unwrap(), fit.specification);
}

#[test]
fn fit_failures_are_delivered_as_errors() {
    let worker = OptimizationWorker::with_fitter(FailingFitter);
    let start = Specification::initial(basic(100.0, 1));
    let optimizer = worker.register("broken", start.clone()).unwrap();

    optimizer.submit(basic(100.0, 1)).unwrap();

    let Some(Err(error)) = optimizer.recv_timeout(TIMEOUT) else {
        panic!("expected a failed fit");
    };
    assert_eq!(error.generation, 1);
    assert!(matches!(
        error.source,
        FitFailure::Optimizer(optimizer::Error::Specification(
            SpecificationError::ZeroSegmentCount
        ))
    ));
    assert_eq!(optimizer.specification().unwrap(), start);
}

#[test]
fn a_panicking_fit_does_not_wedge_the_owner() {
    let worker = OptimizationWorker::with_fitter(PanicOnceFitter {
        panicked: AtomicBool::new(false),
    });
    let start = Specification::initial(basic(100.0, 1));
    let optimizer = worker.register("fragile", start.clone()).unwrap();

    optimizer.submit(basic(100.0, 1)).unwrap();
    let Some(Err(error)) = optimizer.recv_timeout(TIMEOUT) else {
        panic!("expected the panic to be delivered");
    };
    assert_eq!(error.generation, 1);
    assert!(matches!(&error.source, FitFailure::Panicked(message) if message == "fitter blew up"));
    assert_eq!(optimizer.specification().unwrap(), start);

    optimizer.submit(basic(110.0, 1)).unwrap();
    let fit = optimizer
        .recv_timeout(Duration::from_secs(5))
        .expect("the owner should accept new work")
        .unwrap();
    assert_eq!(fit.generation, 2);
}

#[test]
fn default_worker_fits_the_long_single_segment() {
    let length = 1000.0;
    let specs = vec![
        PointCurveSpecification::new(0.0, (0.0, 0.0)).unwrap().into(),
        PointCurveSpecification::new(1.0, (100.0, 100.0)).unwrap().into(),
    ];
    let scenario = BasicSpecification::new(length, 1, SegmentTemplate::CUBIC, specs).unwrap();
    let worker: OptimizationWorker<&str> = OptimizationWorker::default();
    let optimizer = worker
        .register("long", Specification::initial(scenario.clone()))
        .unwrap();

    optimizer.submit(scenario).unwrap();
    let fit = optimizer.recv_timeout(TIMEOUT).unwrap().unwrap();

    assert!(fit.converged);
    let tolerance = 1e-6 * length;
    let (first, last) = (fit.curve.point(0.0), fit.curve.point(1.0));
    assert_relative_eq!(first.x, 0.0, epsilon = tolerance);
    assert_relative_eq!(first.y, 0.0, epsilon = tolerance);
    assert_relative_eq!(last.x, 100.0, epsilon = tolerance);
    assert_relative_eq!(last.y, 100.0, epsilon = tolerance);
}

#[test]
fn registration_is_checked() {
    let worker: OptimizationWorker<&str> = OptimizationWorker::default();
    let start = Specification::initial(basic(100.0, 1));

    let optimizer = worker.register("a", start.clone()).unwrap();
    assert!(matches!(
        worker.register("a", start.clone()),
        Err(WorkerError::AlreadyRegistered)
    ));

    worker.unregister(&"a").unwrap();
    assert!(matches!(worker.unregister(&"a"), Err(WorkerError::UnknownOwner)));
    assert!(matches!(
        optimizer.submit(basic(100.0, 1)),
        Err(WorkerError::UnknownOwner)
    ));
    assert!(matches!(
        worker.specification(&"b"),
        Err(WorkerError::UnknownOwner)
    ));
}
