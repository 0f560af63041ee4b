use std::fmt::Display;

use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::core::{
    error::{DaiError, DaiResult, ErrorKind},
    prob::{self, Prob},
    var::{Var, VarSet},
};

/// A non-negative function of a set of discrete variables stored as a flat table
///
/// # Notes
///
/// Entries are laid out so that the first (lowest label) variable varies fastest:
/// for variables x0 (S0 states) and x1 the entry of (x0 = a, x1 = b) is at a + S0 * b
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    vars: VarSet,
    p: Prob,
}

impl Factor {
    /// Creates a factor from its table
    ///
    /// # Arguments
    ///
    /// * `vars` - Variables a factor depends on
    /// * `values` - A table with `vars.nr_states()` entries
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::{Factor, Var, VarSet};
    ///
    /// let vars: VarSet = [Var::new(0, 2), Var::new(1, 2)].into_iter().collect();
    /// let factor = Factor::new(vars, vec![2., 1., 1., 2.]).unwrap();
    /// assert_eq!(factor.states(), 4);
    /// assert!(Factor::new(factor.vars().clone(), vec![1.]).is_err());
    /// ```
    #[inline]
    pub fn new(vars: VarSet, values: Vec<f64>) -> DaiResult<Self> {
        Self::from_prob(vars, Array1::from_vec(values))
    }

    #[inline]
    pub fn from_prob(vars: VarSet, p: Prob) -> DaiResult<Self> {
        if vars.nr_states() != p.len() {
            return Err(DaiError::new(
                ErrorKind::DimensionMismatch,
                format!(
                    "factor over {} needs {} entries, got {}",
                    vars,
                    vars.nr_states(),
                    p.len()
                ),
            ));
        }
        Ok(Factor { vars, p })
    }

    /// Creates a normalized uniform factor
    #[inline]
    pub fn uniform(vars: VarSet) -> Self {
        let p = prob::uniform(vars.nr_states());
        Factor { vars, p }
    }

    /// Creates a single variable factor
    #[inline]
    pub fn from_var(var: Var, p: Prob) -> DaiResult<Self> {
        Self::from_prob(VarSet::from(var), p)
    }

    /// Creates a factor with entries exp(beta * w) where w are
    /// independent standard normal samples
    pub fn random_exp_gauss(vars: VarSet, beta: f64, rng: &mut impl Rng) -> Self {
        let p = (0..vars.nr_states())
            .map(|_| {
                let w: f64 = StandardNormal.sample(&mut *rng);
                (beta * w).exp()
            })
            .collect();
        Factor { vars, p }
    }

    #[inline(always)]
    pub fn vars(&self) -> &VarSet {
        &self.vars
    }

    #[inline(always)]
    pub fn p(&self) -> &Prob {
        &self.p
    }

    #[inline(always)]
    pub fn p_mut(&mut self) -> &mut Prob {
        &mut self.p
    }

    /// Number of entries in a table
    #[inline(always)]
    pub fn states(&self) -> usize {
        self.p.len()
    }

    /// Normalizes a factor in place and returns the previous sum of entries
    #[inline]
    pub fn normalize(&mut self) -> DaiResult<f64> {
        prob::normalize(&mut self.p)
    }

    #[inline]
    pub fn normalized(&self) -> DaiResult<Self> {
        let mut result = self.clone();
        result.normalize()?;
        Ok(result)
    }

    #[inline]
    pub fn entropy(&self) -> f64 {
        prob::entropy(&self.p)
    }

    /// Returns a table mapping every joint state of a factor to
    /// the corresponding state of `var`
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::core::{Factor, Var, VarSet};
    ///
    /// let (x0, x1) = (Var::new(0, 2), Var::new(1, 3));
    /// let vars: VarSet = [x0, x1].into_iter().collect();
    /// let factor = Factor::uniform(vars);
    /// assert_eq!(factor.index_for(&x0).unwrap(), vec![0, 1, 0, 1, 0, 1]);
    /// assert_eq!(factor.index_for(&x1).unwrap(), vec![0, 0, 1, 1, 2, 2]);
    /// ```
    pub fn index_for(&self, var: &Var) -> DaiResult<Vec<usize>> {
        let mut stride = 1;
        for v in self.vars.iter() {
            if v == var {
                let states = v.states();
                return Ok((0..self.states()).map(|r| (r / stride) % states).collect());
            }
            stride *= v.states();
        }
        Err(DaiError::new(
            ErrorKind::ObjectNotFound,
            format!("variable {} is not in factor over {}", var, self.vars),
        ))
    }

    /// Sums out all variables not in `ns` and normalizes the result
    ///
    /// # Notes
    ///
    /// `ns` must be a subset of the factor's variables
    pub fn marginal(&self, ns: &VarSet) -> DaiResult<Factor> {
        if !ns.is_subset_of(&self.vars) {
            return Err(DaiError::new(
                ErrorKind::ObjectNotFound,
                format!("{} is not a subset of {}", ns, self.vars),
            ));
        }
        // (stride in self, states, stride in ns) for every variable kept
        let mut layout = Vec::with_capacity(ns.len());
        let mut self_stride = 1;
        let mut ns_stride = 1;
        for v in self.vars.iter() {
            if ns.contains(v) {
                layout.push((self_stride, v.states(), ns_stride));
                ns_stride *= v.states();
            }
            self_stride *= v.states();
        }
        let mut p: Prob = Array1::zeros(ns.nr_states());
        for (r, value) in self.p.iter().enumerate() {
            let target: usize = layout
                .iter()
                .map(|(stride, states, ns_stride)| ((r / stride) % states) * ns_stride)
                .sum();
            p[target] += value;
        }
        prob::normalize(&mut p)?;
        Ok(Factor {
            vars: ns.clone(),
            p,
        })
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.vars, self.p)
    }
}
