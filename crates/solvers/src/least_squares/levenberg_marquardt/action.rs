/// Actions an observer can take during a Levenberg–Marquardt solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current point.
    StopEarly,
}
