use kurve_core::{Constraint, TermGraph, Variable, VirtualObject};

use crate::CurvePoint;

/// A shared logical point that several curve positions must meet.
///
/// The point introduces the unknowns `p_{index}_x` and `p_{index}_y` and two
/// equality constraints per attachment, one for each coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualPoint {
    index: usize,
    variables: [Variable; 2],
    constraints: Vec<Constraint>,
}

impl VirtualPoint {
    pub fn new(graph: &mut TermGraph, index: usize, attachments: &[CurvePoint]) -> Self {
        let x = Variable::new(format!("p_{index}_x"));
        let y = Variable::new(format!("p_{index}_y"));
        let x_term = graph.variable(x.clone());
        let y_term = graph.variable(y.clone());

        let constraints = attachments
            .iter()
            .flat_map(|attachment| {
                [
                    Constraint::equality(x_term, attachment.x()),
                    Constraint::equality(y_term, attachment.y()),
                ]
            })
            .collect();

        Self {
            index,
            variables: [x, y],
            constraints,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn x(&self) -> &Variable {
        &self.variables[0]
    }

    #[must_use]
    pub fn y(&self) -> &Variable {
        &self.variables[1]
    }
}

impl VirtualObject for VirtualPoint {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}
