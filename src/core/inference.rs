use std::fmt::Debug;

use crate::core::{
    error::{DaiError, DaiResult, ErrorKind},
    factor::Factor,
    factor_graph::FactorGraph,
    properties::PropertySet,
    var::{Var, VarSet},
};

/// Common interface of approximate inference algorithms operating on a factor graph
///
/// # Notes
///
/// Queries an algorithm can not answer return [`ErrorKind::NotImplemented`],
/// this is what the default implementations do
pub trait InferenceAlgorithm: Debug + Send {
    /// Name and properties of an algorithm, used for logging
    fn identify(&self) -> String;

    /// A factor graph an algorithm operates on
    fn factor_graph(&self) -> &FactorGraph;

    /// Current properties of an algorithm
    fn properties(&self) -> PropertySet;

    /// Resets all internal state
    fn init(&mut self);

    /// Resets internal state related to the given variables only
    fn init_vars(&mut self, ns: &VarSet);

    /// Runs an algorithm and returns the final maximal difference
    /// between beliefs of two subsequent iterations
    ///
    /// # Notes
    ///
    /// Reaching the iteration limit is not an error, compare the returned value
    /// with the tolerance to check convergence
    fn run(&mut self) -> DaiResult<f64>;

    /// Maximal difference between beliefs of the last two iterations
    fn max_diff(&self) -> f64;

    /// Number of iterations performed by the last run
    fn iterations(&self) -> usize;

    /// Approximate marginal of a single variable
    fn belief_var(&self, var: &Var) -> DaiResult<Factor> {
        Err(not_implemented(self, &format!("belief of {}", var)))
    }

    /// Approximate marginal of a set of variables
    fn belief(&self, ns: &VarSet) -> DaiResult<Factor> {
        Err(not_implemented(self, &format!("belief of {}", ns)))
    }

    /// All beliefs an algorithm maintains
    fn beliefs(&self) -> DaiResult<Vec<Factor>> {
        Err(not_implemented(self, "beliefs"))
    }

    /// Approximation of the logarithm of the partition sum
    fn log_z(&self) -> DaiResult<f64> {
        Err(not_implemented(self, "logZ"))
    }
}

#[inline]
fn not_implemented<A: InferenceAlgorithm + ?Sized>(alg: &A, query: &str) -> DaiError {
    DaiError::new(
        ErrorKind::NotImplemented,
        format!("{} does not support {}", alg.identify(), query),
    )
}
