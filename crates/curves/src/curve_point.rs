use kurve_core::Term;

/// The symbolic point of a curve at a fixed position.
///
/// `x` and `y` are the instantiated segment functions evaluated at
/// `position`, so they are terms in that segment's coefficient variables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    position: f64,
    x: Term,
    y: Term,
}

impl CurvePoint {
    #[must_use]
    pub fn new(position: f64, x: Term, y: Term) -> Self {
        Self { position, x, y }
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn x(&self) -> Term {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> Term {
        self.y
    }
}
