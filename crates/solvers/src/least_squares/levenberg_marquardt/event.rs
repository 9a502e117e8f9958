/// Events emitted by the Levenberg–Marquardt solver, one per trial step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The trial lowered the objective and became the current point.
    Accepted {
        /// Trial number, starting at 1.
        iter: usize,

        /// Objective at the new point.
        objective: f64,

        /// Gradient norm at the new point.
        gradient_norm: f64,

        /// Damping for the next trial.
        damping: f64,
    },

    /// The trial did not lower the objective and was discarded.
    Rejected {
        /// Trial number, starting at 1.
        iter: usize,

        /// Objective at the unchanged current point.
        objective: f64,

        /// Objective at the discarded trial point, possibly non-finite.
        trial_objective: f64,

        /// Damping for the next trial.
        damping: f64,
    },
}

impl Event {
    /// Returns the trial number.
    #[must_use]
    pub fn iter(&self) -> usize {
        match self {
            Self::Accepted { iter, .. } | Self::Rejected { iter, .. } => *iter,
        }
    }

    /// Returns the objective at the current point after this trial.
    #[must_use]
    pub fn objective(&self) -> f64 {
        match self {
            Self::Accepted { objective, .. } | Self::Rejected { objective, .. } => *objective,
        }
    }

    /// Returns the damping for the next trial.
    #[must_use]
    pub fn damping(&self) -> f64 {
        match self {
            Self::Accepted { damping, .. } | Self::Rejected { damping, .. } => *damping,
        }
    }
}
