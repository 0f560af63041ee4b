use ndarray::Array1;
use rand::Rng;
use rand_distr::Uniform;

use crate::core::{prob, Factor, FactorGraph, Prob, PropertySet, Var, VarSet};

/// Exact single variable marginals and ln Z computed by enumerating all joint states
pub(super) fn exact_marginals(fg: &FactorGraph) -> (Vec<Prob>, f64) {
    let vars = fg.vars();
    let joint_states: usize = vars.iter().map(|v| v.states()).product();
    let mut marginals: Vec<Prob> = vars.iter().map(|v| Array1::zeros(v.states())).collect();
    let mut z = 0f64;
    let mut config = vec![0usize; vars.len()];
    for s in 0..joint_states {
        let mut rest = s;
        for (x, v) in config.iter_mut().zip(vars) {
            *x = rest % v.states();
            rest /= v.states();
        }
        let mut weight = 1f64;
        for factor in fg.factors() {
            let mut r = 0;
            let mut stride = 1;
            for v in factor.vars().iter() {
                let i = fg.find_var(v).unwrap();
                r += config[i] * stride;
                stride *= v.states();
            }
            weight *= factor.p()[r];
        }
        z += weight;
        for (marginal, x) in marginals.iter_mut().zip(&config) {
            marginal[*x] += weight;
        }
    }
    for marginal in &mut marginals {
        prob::normalize(marginal).unwrap();
    }
    (marginals, z.ln())
}

/// A random tree of pairwise factors with a random unary factor on every variable
pub(super) fn gen_random_tree(rng: &mut impl Rng, nodes_number: usize, beta: f64) -> FactorGraph {
    let states_distr = Uniform::new(2, 4);
    let vars: Vec<Var> = (0..nodes_number)
        .map(|label| Var::new(label as i64, rng.sample(states_distr)))
        .collect();
    let mut factors = Vec::with_capacity(2 * nodes_number);
    for (pos, var) in vars.iter().enumerate() {
        factors.push(Factor::random_exp_gauss(VarSet::from(*var), beta, rng));
        if pos > 0 {
            let parent = vars[rng.gen_range(0..pos)];
            let scope: VarSet = [parent, *var].into_iter().collect();
            factors.push(Factor::random_exp_gauss(scope, beta, rng));
        }
    }
    FactorGraph::new(factors).unwrap()
}

/// A square lattice of binary variables with periodic boundary conditions
/// and random pairwise and unary factors
pub(super) fn gen_random_torus(rng: &mut impl Rng, side: usize, beta: f64) -> FactorGraph {
    let var = |x: usize, y: usize| Var::new((x % side + side * (y % side)) as i64, 2);
    let mut factors = Vec::with_capacity(3 * side * side);
    for x in 0..side {
        for y in 0..side {
            factors.push(Factor::random_exp_gauss(VarSet::from(var(x, y)), beta, rng));
            let right: VarSet = [var(x, y), var(x + 1, y)].into_iter().collect();
            let down: VarSet = [var(x, y), var(x, y + 1)].into_iter().collect();
            factors.push(Factor::random_exp_gauss(right, beta, rng));
            factors.push(Factor::random_exp_gauss(down, beta, rng));
        }
    }
    FactorGraph::new(factors).unwrap()
}

pub(super) fn bp_properties(updates: &str, logdomain: bool) -> PropertySet {
    PropertySet::new()
        .with("maxiter", 1000)
        .with("tol", 1e-12)
        .with("logdomain", u8::from(logdomain))
        .with("updates", updates)
}

#[inline]
pub(super) fn max_abs_diff(lhs: &Prob, rhs: &Prob) -> f64 {
    prob::dist_linf(lhs, rhs)
}
