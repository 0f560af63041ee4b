use serde::{Deserialize, Serialize};

use crate::core::{
    bipartite_graph::{BipartiteGraph, Neighbor},
    error::{DaiError, DaiResult, ErrorKind},
    factor::Factor,
    var::{Var, VarSet},
};

/// A factor graph: discrete variables, factors over subsets of them
/// and the bipartite adjacency between both
///
/// # Notes
///
/// Variables are the first layer of the underlying graph and are sorted by label,
/// factors are the second layer and keep the order they were given in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorGraph {
    vars: Vec<Var>,
    factors: Vec<Factor>,
    graph: BipartiteGraph,
}

impl FactorGraph {
    /// Creates a factor graph from a list of factors. Variables are
    /// collected from the factors' scopes
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::{Factor, FactorGraph, Var, VarSet};
    ///
    /// let (x0, x1, x2) = (Var::new(0, 2), Var::new(1, 2), Var::new(2, 2));
    /// let f01 = Factor::uniform([x0, x1].into_iter().collect());
    /// let f12 = Factor::uniform([x1, x2].into_iter().collect());
    /// let fg = FactorGraph::new(vec![f01, f12]).unwrap();
    /// assert_eq!(fg.nr_vars(), 3);
    /// assert_eq!(fg.nr_edges(), 4);
    /// assert_eq!(fg.nb_v(1).len(), 2);
    /// ```
    pub fn new(factors: Vec<Factor>) -> DaiResult<Self> {
        let all_vars: VarSet = factors
            .iter()
            .flat_map(|f| f.vars().iter().copied())
            .collect();
        let vars = all_vars.vars().to_vec();
        for factor in &factors {
            for v in factor.vars() {
                // identical labels must agree on the number of states
                let known = match vars.binary_search(v) {
                    Ok(pos) => &vars[pos],
                    Err(_) => continue,
                };
                if known.states() != v.states() {
                    return Err(DaiError::new(
                        ErrorKind::DimensionMismatch,
                        format!(
                            "variable {} has {} states in one factor and {} in another",
                            v,
                            known.states(),
                            v.states()
                        ),
                    ));
                }
            }
        }
        Ok(Self::from_parts(vars, factors))
    }

    /// Assembles a factor graph from sorted distinct variables and factors over them
    pub(crate) fn from_parts(vars: Vec<Var>, factors: Vec<Factor>) -> Self {
        let edges: Vec<(usize, usize)> = factors
            .iter()
            .enumerate()
            .flat_map(|(pos, f)| {
                f.vars()
                    .iter()
                    .filter_map(|v| vars.binary_search(v).ok())
                    .map(move |i| (i, pos))
                    .collect::<Vec<_>>()
            })
            .collect();
        let graph = BipartiteGraph::from_edges(vars.len(), factors.len(), edges);
        FactorGraph {
            vars,
            factors,
            graph,
        }
    }

    #[inline(always)]
    pub fn nr_vars(&self) -> usize {
        self.vars.len()
    }

    #[inline(always)]
    pub fn nr_factors(&self) -> usize {
        self.factors.len()
    }

    #[inline]
    pub fn nr_edges(&self) -> usize {
        self.graph.nr_edges()
    }

    #[inline(always)]
    pub fn var(&self, i: usize) -> &Var {
        &self.vars[i]
    }

    #[inline(always)]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    #[inline(always)]
    pub fn factor(&self, big_i: usize) -> &Factor {
        &self.factors[big_i]
    }

    #[inline(always)]
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Factors adjacent to the `i`-th variable
    #[inline(always)]
    pub fn nb_v(&self, i: usize) -> &[Neighbor] {
        self.graph.nb1(i)
    }

    /// Variables adjacent to the `big_i`-th factor
    #[inline(always)]
    pub fn nb_f(&self, big_i: usize) -> &[Neighbor] {
        self.graph.nb2(big_i)
    }

    #[inline(always)]
    pub fn graph(&self) -> &BipartiteGraph {
        &self.graph
    }

    /// Returns the index of a variable
    #[inline]
    pub fn find_var(&self, var: &Var) -> Option<usize> {
        self.vars.binary_search(var).ok()
    }

    /// Returns distinct scopes of factors that are not strictly contained
    /// in the scope of another factor
    pub fn cliques(&self) -> Vec<VarSet> {
        let mut result: Vec<VarSet> = Vec::new();
        for (pos, factor) in self.factors.iter().enumerate() {
            let scope = factor.vars();
            let maximal = self.factors.iter().enumerate().all(|(other_pos, other)| {
                other_pos == pos || scope == other.vars() || !scope.is_subset_of(other.vars())
            });
            if maximal && !result.contains(scope) {
                result.push(scope.clone());
            }
        }
        result
    }

    /// Checks that every variable can be reached from every other one
    pub fn is_connected(&self) -> bool {
        if self.vars.is_empty() {
            return true;
        }
        let mut seen = vec![false; self.vars.len()];
        let mut stack = vec![0];
        seen[0] = true;
        while let Some(i) = stack.pop() {
            for big_i in self.nb_v(i) {
                for j in self.nb_f(big_i.node) {
                    if !seen[j.node] {
                        seen[j.node] = true;
                        stack.push(j.node);
                    }
                }
            }
        }
        seen.into_iter().all(|x| x)
    }
}
