/// A diagnostics sink and control hook for iterative solvers.
///
/// A solver hands every event of type `E` to its observer. Returning
/// `Some(action)` asks the solver to act (for example to stop early);
/// returning `None` lets it carry on.
///
/// Closures `FnMut(&E) -> Option<A>` are observers, so an observer that must
/// follow several consecutive solves can be lent out as
/// `|event| observer.observe(event)`. The unit type `()` ignores every event.
pub trait Observer<E, A> {
    /// Receives one event.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
