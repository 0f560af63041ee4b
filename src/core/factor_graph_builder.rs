use crate::core::{
    error::{DaiError, DaiResult, ErrorKind},
    factor::Factor,
    factor_graph::FactorGraph,
    var::Var,
};

// public methods ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
/// A factor graph builder
pub struct FactorGraphBuilder {
    vars: Vec<Var>,
    factors: Vec<Factor>,
}

impl FactorGraphBuilder {
    /// Creates an empty builder
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::FactorGraphBuilder;
    ///
    /// let fgb = FactorGraphBuilder::new();
    /// ```
    #[inline]
    pub fn new() -> Self {
        FactorGraphBuilder {
            vars: Vec::new(),
            factors: Vec::new(),
        }
    }

    /// Creates a builder with variables labeled 0, 1, ..., `variables_number - 1`
    /// and preallocated memory for factors
    ///
    /// # Arguments
    ///
    /// * `variables_number` - A number of variables
    /// * `states` - A number of states of every variable
    /// * `factors_capacity` - A number of factors we need to preallocate memory for
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::FactorGraphBuilder;
    ///
    /// let fgb = FactorGraphBuilder::new_with_variables(3, 2, 2);
    /// assert_eq!(fgb.vars().len(), 3);
    /// ```
    #[inline]
    pub fn new_with_variables(
        variables_number: usize,
        states: usize,
        factors_capacity: usize,
    ) -> Self {
        let vars = (0..variables_number)
            .map(|label| Var::new(label as i64, states))
            .collect();
        let factors = Vec::with_capacity(factors_capacity);
        FactorGraphBuilder { vars, factors }
    }

    /// Declared variables, sorted by label
    #[inline(always)]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// Declares a variable
    ///
    /// # Notes
    ///
    /// Declaring a label twice with the same number of states is a no-op,
    /// with a different number of states it is an error
    pub fn add_variable(&mut self, var: Var) -> DaiResult<()> {
        match self.vars.binary_search(&var) {
            Ok(pos) => {
                let known = self.vars[pos];
                if known.states() != var.states() {
                    return Err(DaiError::new(
                        ErrorKind::DimensionMismatch,
                        format!(
                            "variable {} is declared with {} states, got {}",
                            var,
                            known.states(),
                            var.states()
                        ),
                    ));
                }
            }
            Err(pos) => self.vars.insert(pos, var),
        }
        Ok(())
    }

    /// Adds a factor to a factor graph
    ///
    /// # Arguments
    ///
    /// * `factor` - A new factor
    ///
    /// # Notes
    ///
    /// If a factor mentions an undeclared variable, or a declared one with
    /// a different number of states, the method returns an error
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::{Factor, FactorGraphBuilder, Var, VarSet};
    ///
    /// let mut fgb = FactorGraphBuilder::new_with_variables(10, 2, 1);
    /// let vars: VarSet = [Var::new(3, 2), Var::new(8, 2)].into_iter().collect();
    /// fgb.add_factor(Factor::new(vars, vec![1., 2., 3., 4.]).unwrap()).unwrap();
    /// let unknown: VarSet = [Var::new(3, 2), Var::new(10, 2)].into_iter().collect();
    /// assert!(fgb.add_factor(Factor::uniform(unknown)).is_err());
    /// ```
    pub fn add_factor(&mut self, factor: Factor) -> DaiResult<()> {
        for var in factor.vars() {
            let known = match self.vars.binary_search(var) {
                Ok(pos) => self.vars[pos],
                Err(_) => {
                    return Err(DaiError::new(
                        ErrorKind::ObjectNotFound,
                        format!("variable {} is not declared", var),
                    ))
                }
            };
            if known.states() != var.states() {
                return Err(DaiError::new(
                    ErrorKind::DimensionMismatch,
                    format!(
                        "variable {} has {} states but the factor assumes {}",
                        var,
                        known.states(),
                        var.states()
                    ),
                ));
            }
        }
        self.factors.push(factor);
        Ok(())
    }

    /// Returns a factor graph
    ///
    /// # Notes
    ///
    /// Declared variables that no factor mentions are kept as isolated nodes
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::{Factor, FactorGraphBuilder, Var, VarSet};
    ///
    /// let mut fgb = FactorGraphBuilder::new_with_variables(10, 2, 9);
    /// for i in 0..9 {
    ///     let vars: VarSet = [Var::new(i, 2), Var::new(i + 1, 2)].into_iter().collect();
    ///     fgb.add_factor(Factor::uniform(vars)).unwrap();
    /// }
    /// let fg = fgb.build();
    /// assert_eq!(fg.nr_factors(), 9);
    /// assert!(fg.is_connected());
    /// ```
    #[inline]
    pub fn build(self) -> FactorGraph {
        FactorGraph::from_parts(self.vars, self.factors)
    }

    /// Returns a factor graph, failing if it is not connected
    pub fn build_connected(self) -> DaiResult<FactorGraph> {
        let fg = self.build();
        if fg.is_connected() {
            Ok(fg)
        } else {
            Err(DaiError::new(
                ErrorKind::GraphNotConnected,
                format!("{} variables, {} factors", fg.nr_vars(), fg.nr_factors()),
            ))
        }
    }
}
