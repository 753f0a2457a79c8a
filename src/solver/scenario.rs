//! Simulation scenario definition
//!
//! A scenario combines the physical parameters, the boundary values and the
//! spatial grid. This is the "WHAT to solve"; the solver configuration is
//! the "HOW".

use crate::error::{SolverError, SolverResult};
use crate::physics::BioheatParameters;
use crate::solver::boundary::DirichletBoundaries;
use nalgebra::DVector;

// =================================================================================================
// Grid
// =================================================================================================

/// Uniform grid of interior nodes on (0, L)
///
/// With `N` interior nodes the step is `h = L / (N + 1)` and node `i`
/// (0-based) sits at `x_i = (i + 1) h`. The boundary nodes x = 0 and x = L
/// are not unknowns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    length: f64,
    interior_nodes: usize,
}

impl Grid {
    /// Create a grid, rejecting `N = 0` and non-positive lengths
    pub fn new(length: f64, interior_nodes: usize) -> SolverResult<Self> {
        if interior_nodes == 0 {
            return Err(SolverError::invalid(
                "Grid must have at least one interior node",
            ));
        }
        if !(length.is_finite() && length > 0.0) {
            return Err(SolverError::invalid(format!(
                "Grid length must be positive and finite, got {}",
                length
            )));
        }
        Ok(Self {
            length,
            interior_nodes,
        })
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of unknowns N
    pub fn interior_nodes(&self) -> usize {
        self.interior_nodes
    }

    /// Step size h = L / (N + 1)
    pub fn step(&self) -> f64 {
        self.length / (self.interior_nodes as f64 + 1.0)
    }

    /// Position of interior node `i`
    pub fn position(&self, i: usize) -> f64 {
        // computed from the index, never accumulated
        (i as f64 + 1.0) * self.step()
    }

    /// Positions of all interior nodes
    pub fn positions(&self) -> DVector<f64> {
        DVector::from_fn(self.interior_nodes, |i, _| self.position(i))
    }
}

// =================================================================================================
// Scenario
// =================================================================================================

/// Simulation scenario
///
/// # Design
///
/// The same scenario can be solved with different numerical methods:
///
/// ```rust
/// use bioheat_rs::physics::BioheatParameters;
/// use bioheat_rs::solver::{DirectSolver, DirichletBoundaries, Scenario, Solver};
///
/// let scenario = Scenario::new(
///     BioheatParameters::tissue().without_source(),
///     DirichletBoundaries::tissue(),
///     20,
/// ).unwrap();
///
/// let solution = DirectSolver::new().solve_scenario(&scenario).unwrap();
/// assert_eq!(solution.values.len(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    /// Physical parameters (equation)
    pub parameters: BioheatParameters,

    /// Dirichlet values at both ends
    pub boundaries: DirichletBoundaries,

    /// Spatial discretization
    pub grid: Grid,
}

impl Scenario {
    /// Create a scenario with `interior_nodes` unknowns on the parameters' domain
    pub fn new(
        parameters: BioheatParameters,
        boundaries: DirichletBoundaries,
        interior_nodes: usize,
    ) -> SolverResult<Self> {
        parameters.validate()?;
        boundaries.validate()?;
        let grid = Grid::new(parameters.length(), interior_nodes)?;
        Ok(Self {
            parameters,
            boundaries,
            grid,
        })
    }

    /// Tissue preset on `interior_nodes` unknowns
    pub fn tissue(interior_nodes: usize) -> SolverResult<Self> {
        Self::new(
            BioheatParameters::tissue(),
            DirichletBoundaries::tissue(),
            interior_nodes,
        )
    }

    /// Number of unknowns
    pub fn size(&self) -> usize {
        self.grid.interior_nodes()
    }

    /// Step size h
    pub fn step(&self) -> f64 {
        self.grid.step()
    }
}
