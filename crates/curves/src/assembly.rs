//! Turns a [`BasicSpecification`] into a symbolic least-squares problem.
//!
//! The curve is split into equal segments, each an instance of the segment
//! template with its own coefficient variables `s_{i}_x_{k}` and
//! `s_{i}_y_{k}`. The residuals are, in order:
//!
//! 1. continuity at every internal knot, for each matched derivative order
//!    and coordinate
//! 2. both coordinates of every point specification, in specification order
//! 3. the constraints of every virtual point, in order of first attachment
//! 4. the curve-length residual
//! 5. the speed residuals at every quadrature node, when requested
//!
//! The objective is the sum of their squares. Every constraint is soft.

use kurve_core::{Function, SymbolicProblem, Term, TermError, TermGraph, Variable, VirtualObject};

use crate::quadrature;
use crate::{
    BasicSpecification, CurvePoint, CurveSpecification, SegmentTemplate, VirtualPoint, locate,
};

/// Whether the assembled objective also constrains the parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedTerm {
    /// Leave the parameterization free.
    Free,

    /// Add `weight · ∫₀¹ (|C'(t)| − L)² dt`, which favors constant speed.
    ///
    /// A small weight leaves the specifications and the length in charge and
    /// only picks the most uniform of the curves that satisfy them.
    Uniform { weight: f64 },
}

/// The symbolic form of a specification.
#[derive(Debug, Clone)]
pub struct Assembly {
    graph: TermGraph,
    objective: Term,
    residuals: Vec<Term>,
    variables: Vec<Variable>,
    coefficient_count: usize,
    virtual_points: Vec<VirtualPoint>,
    anchors: Vec<f64>,
}

impl Assembly {
    #[must_use]
    pub fn graph(&self) -> &TermGraph {
        &self.graph
    }

    #[must_use]
    pub fn objective(&self) -> Term {
        self.objective
    }

    #[must_use]
    pub fn residuals(&self) -> &[Term] {
        &self.residuals
    }

    /// Coefficient variables in parameter-vector order, then the virtual-point
    /// variables.
    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Number of leading variables that are curve coefficients.
    #[must_use]
    pub fn coefficient_count(&self) -> usize {
        self.coefficient_count
    }

    #[must_use]
    pub fn virtual_points(&self) -> &[VirtualPoint] {
        &self.virtual_points
    }

    /// Position of the first attachment of each virtual point.
    #[must_use]
    pub fn anchors(&self) -> &[f64] {
        &self.anchors
    }

    /// Differentiates the assembly into a solvable problem.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::UnboundVariable`] if a term mentions a variable
    /// the assembly did not declare.
    pub fn into_problem(self) -> Result<SymbolicProblem, TermError> {
        SymbolicProblem::new(self.graph, self.objective, self.residuals, self.variables)
    }
}

/// One instantiated segment: coefficient terms for each coordinate.
struct Segment {
    variables: Vec<Variable>,
    x: Vec<Term>,
    y: Vec<Term>,
}

impl Segment {
    fn new(graph: &mut TermGraph, index: usize, template: SegmentTemplate) -> Self {
        let count = template.coefficient_count();
        let variables: Vec<Variable> = ["x", "y"]
            .iter()
            .flat_map(|axis| {
                (0..count).map(move |k| Variable::new(format!("s_{index}_{axis}_{k}")))
            })
            .collect();
        let terms: Vec<Term> = variables
            .iter()
            .map(|variable| graph.variable(variable.clone()))
            .collect();
        let (x, y) = terms.split_at(count);

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            variables,
        }
    }

    /// Symbolic `order`-th derivative at local `u`, as `(x, y)`.
    fn at(
        &self,
        graph: &mut TermGraph,
        template: SegmentTemplate,
        order: usize,
        u: f64,
    ) -> (Term, Term) {
        let x = template.instantiate(graph, &self.x, order, u);
        let y = template.instantiate(graph, &self.y, order, u);
        (x, y)
    }
}

/// Builds the objective, residuals, and variables for `basic`.
#[must_use]
pub fn assemble(basic: &BasicSpecification, speed: SpeedTerm) -> Assembly {
    let template = basic.template();
    let segment_count = basic.segment_count();
    let mut graph = TermGraph::new();

    let segments: Vec<Segment> = (0..segment_count)
        .map(|index| Segment::new(&mut graph, index, template))
        .collect();
    let mut variables: Vec<Variable> = segments
        .iter()
        .flat_map(|segment| segment.variables.iter().cloned())
        .collect();
    let coefficient_count = variables.len();

    let mut residuals = Vec::new();

    for pair in segments.windows(2) {
        for order in 0..=template.continuity_order() {
            let (left_x, left_y) = pair[0].at(&mut graph, template, order, 1.0);
            let (right_x, right_y) = pair[1].at(&mut graph, template, order, 0.0);
            residuals.push(graph.difference(left_x, right_x));
            residuals.push(graph.difference(left_y, right_y));
        }
    }

    let mut attachments: Vec<(usize, Vec<CurvePoint>)> = Vec::new();
    for spec in basic.curve_specifications() {
        let curve_point = curve_point(&mut graph, &segments, basic, spec.position());
        match spec {
            CurveSpecification::Point(point) => {
                residuals.extend(point.residuals(&mut graph, &curve_point));
            }
            CurveSpecification::Attachment(attachment) => {
                match attachments
                    .iter_mut()
                    .find(|(index, _)| *index == attachment.index())
                {
                    Some((_, points)) => points.push(curve_point),
                    None => attachments.push((attachment.index(), vec![curve_point])),
                }
            }
        }
    }

    let mut virtual_points = Vec::with_capacity(attachments.len());
    let mut anchors = Vec::with_capacity(attachments.len());
    for (index, points) in &attachments {
        let point = VirtualPoint::new(&mut graph, *index, points);
        for constraint in point.constraints() {
            residuals.push(constraint.residual(&mut graph));
        }
        variables.extend(point.variables().iter().cloned());
        anchors.push(points[0].position());
        virtual_points.push(point);
    }

    let nodes = speed_nodes(&mut graph, &segments, template);
    let summands: Vec<Term> = nodes
        .iter()
        .map(|&(weight, speed)| {
            let weight = graph.constant(weight);
            graph.product([weight, speed])
        })
        .collect();
    let measured = graph.sum(summands);
    let requested = graph.constant(basic.curve_length());
    residuals.push(graph.difference(measured, requested));

    if let SpeedTerm::Uniform { weight } = speed {
        // Global speed is n·|S'(u)|, and dt = du / n within a segment.
        let count = segment_count as f64;
        let target = graph.constant(basic.curve_length());
        let scale = graph.constant(count);
        for &(node_weight, local_speed) in &nodes {
            let global_speed = graph.product([scale, local_speed]);
            let deviation = graph.difference(global_speed, target);
            let factor = graph.constant((weight * node_weight / count).sqrt());
            residuals.push(graph.product([factor, deviation]));
        }
    }

    let objective = graph.norm_squared(residuals.iter().copied());

    Assembly {
        graph,
        objective,
        residuals,
        variables,
        coefficient_count,
        virtual_points,
        anchors,
    }
}

fn curve_point(
    graph: &mut TermGraph,
    segments: &[Segment],
    basic: &BasicSpecification,
    position: f64,
) -> CurvePoint {
    let (segment, u) = locate(position, basic.segment_count());
    let (x, y) = segments[segment].at(graph, basic.template(), 0, u);
    CurvePoint::new(position, x, y)
}

/// Quadrature weight and symbolic local speed `|S'(u)|` at every node of
/// every segment.
fn speed_nodes(
    graph: &mut TermGraph,
    segments: &[Segment],
    template: SegmentTemplate,
) -> Vec<(f64, Term)> {
    let mut nodes = Vec::with_capacity(segments.len() * 8);
    for segment in segments {
        for (weight, u) in quadrature::nodes(0.0, 1.0) {
            let (dx, dy) = segment.at(graph, template, 1, u);
            let speed_squared = graph.norm_squared([dx, dy]);
            nodes.push((weight, graph.apply(Function::Sqrt, speed_squared)));
        }
    }
    nodes
}
