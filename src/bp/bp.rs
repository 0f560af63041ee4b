use std::time::Instant;

use log::{debug, info, warn};
use ndarray::Array1;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::{IntoParallelIterator, ParallelIterator};

use crate::{
    bp::properties::{BPProperties, UpdateType},
    core::{
        prob::{self, Prob},
        DaiError, DaiResult, ErrorKind, Factor, FactorGraph, InferenceAlgorithm, PropertySet,
        Var, VarSet,
    },
};

// ------------------------------------------------------------------------------------------

/// State of the edge between a variable and one of its factors
#[derive(Debug, Clone)]
pub(crate) struct EdgeProp {
    /// For every joint state of the factor, the corresponding state of the variable
    pub(crate) index: Vec<usize>,
    /// Current message from the factor to the variable
    pub(crate) message: Prob,
    /// Message computed by the last update, not applied yet
    pub(crate) new_message: Prob,
    /// L-infinity distance between `new_message` and `message`
    pub(crate) residual: f64,
}

/// Loopy belief propagation on a factor graph.
///
/// # Notes
///
/// Messages go from factors to variables, `edges[i][pos]` holds the message sent to
/// the `i`-th variable by its `pos`-th factor. Messages from variables to factors are
/// products of the other incoming messages and are not stored. With `logdomain`
/// set, messages hold logarithms
///
/// # Example
///
/// ```
/// use dairs::bp::BP;
/// use dairs::core::{Factor, FactorGraph, InferenceAlgorithm, PropertySet, Var, VarSet};
///
/// let (x0, x1) = (Var::new(0, 2), Var::new(1, 2));
/// let vars: VarSet = [x0, x1].into_iter().collect();
/// let fg = FactorGraph::new(vec![Factor::new(vars, vec![3., 1., 1., 1.]).unwrap()]).unwrap();
/// let opts = PropertySet::new()
///     .with("maxiter", 100)
///     .with("tol", 1e-9)
///     .with("logdomain", 0)
///     .with("updates", "PARALL");
/// let mut bp = BP::new(fg, &opts).unwrap();
/// bp.run().unwrap();
/// let b0 = bp.belief_v(0).unwrap();
/// assert!((b0.p()[0] - 4. / 6.).abs() < 1e-9);
/// assert!((bp.log_z().unwrap() - 6f64.ln()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct BP {
    fg: FactorGraph,
    pub(crate) edges: Vec<Vec<EdgeProp>>,
    maxdiff: f64,
    iters: usize,
    props: BPProperties,
    rng: StdRng,
}

impl BP {
    pub const NAME: &'static str = "BP";

    /// Creates belief propagation over a factor graph
    ///
    /// # Arguments
    ///
    /// * `fg` - A factor graph
    /// * `opts` - Properties, see [`BPProperties::from_property_set`]
    ///
    /// # Notes
    ///
    /// Malformed properties are reported before any message is allocated
    pub fn new(fg: FactorGraph, opts: &PropertySet) -> DaiResult<Self> {
        let props = BPProperties::from_property_set(opts)?;
        Self::with_properties(fg, props)
    }

    /// Creates belief propagation from already validated properties
    pub fn with_properties(fg: FactorGraph, props: BPProperties) -> DaiResult<Self> {
        let mut edges = Vec::with_capacity(fg.nr_vars());
        for i in 0..fg.nr_vars() {
            let var = fg.var(i);
            let mut var_edges = Vec::with_capacity(fg.nb_v(i).len());
            for big_i in fg.nb_v(i) {
                let index = fg.factor(big_i.node).index_for(var).map_err(|err| {
                    DaiError::new(ErrorKind::InternalError, err.context)
                })?;
                var_edges.push(EdgeProp {
                    index,
                    message: Array1::zeros(var.states()),
                    new_message: Array1::zeros(var.states()),
                    residual: 0f64,
                });
            }
            edges.push(var_edges);
        }
        let mut bp = BP {
            fg,
            edges,
            maxdiff: 0f64,
            iters: 0,
            props,
            rng: StdRng::from_entropy(),
        };
        bp.init();
        Ok(bp)
    }

    #[inline(always)]
    pub fn props(&self) -> &BPProperties {
        &self.props
    }

    /// Resets the generator used to shuffle the `SEQRND` schedule
    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// The message the `i`-th variable currently receives from its `pos`-th factor
    #[inline(always)]
    pub fn message(&self, i: usize, pos: usize) -> &Prob {
        &self.edges[i][pos].message
    }

    #[inline(always)]
    fn neutral(&self) -> f64 {
        if self.props.logdomain {
            0f64
        } else {
            1f64
        }
    }

    fn reset_edges_of(&mut self, i: usize) {
        let c = self.neutral();
        for edge in &mut self.edges[i] {
            edge.message.fill(c);
            edge.new_message.fill(c);
            edge.residual = 0f64;
        }
    }

    /// Product (sum in the log domain) of the messages the `i`-th variable
    /// receives from its factors, skipping the factor at position `skip`
    fn incoming_product(&self, i: usize, skip: Option<usize>) -> Prob {
        let logdomain = self.props.logdomain;
        let mut prod = Array1::from_elem(self.fg.var(i).states(), self.neutral());
        for (pos, edge) in self.edges[i].iter().enumerate() {
            if Some(pos) == skip {
                continue;
            }
            if logdomain {
                prod += &edge.message;
            } else {
                prod *= &edge.message;
            }
        }
        prod
    }

    /// The `big_i`-th factor (its logarithm in the log domain) multiplied by the
    /// messages from all its variables except `skip`
    fn factor_product(&self, big_i: usize, skip: Option<usize>) -> Prob {
        let logdomain = self.props.logdomain;
        let factor = self.fg.factor(big_i);
        let mut prod = if logdomain {
            factor.p().mapv(f64::ln)
        } else {
            factor.p().clone()
        };
        for j in self.fg.nb_f(big_i) {
            if Some(j.node) == skip {
                continue;
            }
            let prod_j = self.incoming_product(j.node, Some(j.dual));
            let ind = &self.edges[j.node][j.dual].index;
            for (x, r) in prod.iter_mut().zip(ind) {
                if logdomain {
                    *x += prod_j[*r];
                } else {
                    *x *= prod_j[*r];
                }
            }
        }
        prod
    }

    /// Computes the message the `big_i_pos`-th factor of the `i`-th variable sends to it
    pub(crate) fn calc_new_message(&self, i: usize, big_i_pos: usize) -> DaiResult<Prob> {
        let big_i = self.fg.nb_v(i)[big_i_pos].node;
        let mut prod = self.factor_product(big_i, Some(i));
        if self.props.logdomain {
            let shift = prob::max(&prod);
            prod.mapv_inplace(|x| (x - shift).exp());
        }
        // marginalize onto the i-th variable
        let mut marg: Prob = Array1::zeros(self.fg.var(i).states());
        for (x, r) in prod.iter().zip(&self.edges[i][big_i_pos].index) {
            marg[*r] += x;
        }
        prob::normalize(&mut marg)?;
        if self.props.logdomain {
            marg.mapv_inplace(f64::ln);
        }
        Ok(marg)
    }

    /// Replaces a message by its new value, damped if requested
    ///
    /// # Notes
    ///
    /// A damped message still differs from `new_message`, the residual keeps that
    /// difference so `SEQMAX` comes back to the edge
    pub(crate) fn update_message(&mut self, i: usize, big_i_pos: usize) -> DaiResult<()> {
        let damping = self.props.damping;
        let logdomain = self.props.logdomain;
        let edge = &mut self.edges[i][big_i_pos];
        if damping == 0f64 {
            edge.message.assign(&edge.new_message);
            edge.residual = 0f64;
            return Ok(());
        }
        if logdomain {
            let mixed = &edge.message * damping + &edge.new_message * (1f64 - damping);
            edge.message = prob::normalized_exp(&mixed)?.mapv(f64::ln);
        } else {
            let mut damped: Prob = edge
                .message
                .iter()
                .zip(&edge.new_message)
                .map(|(old, new)| old.powf(damping) * new.powf(1f64 - damping))
                .collect();
            prob::normalize(&mut damped)?;
            edge.message = damped;
        }
        edge.residual = prob::dist_linf(&edge.new_message, &edge.message);
        Ok(())
    }

    /// Returns the edge with the largest residual, the first one on ties
    fn find_max_residual(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, var_edges) in self.edges.iter().enumerate() {
            for (pos, edge) in var_edges.iter().enumerate() {
                if best.map_or(true, |(_, _, r)| edge.residual > r) {
                    best = Some((i, pos, edge.residual));
                }
            }
        }
        best
    }

    fn calc_residual(&mut self, i: usize, big_i_pos: usize) -> DaiResult<()> {
        let new_message = self.calc_new_message(i, big_i_pos)?;
        let edge = &mut self.edges[i][big_i_pos];
        edge.residual = prob::dist_linf(&new_message, &edge.message);
        edge.new_message = new_message;
        Ok(())
    }

    /// Residual belief propagation: a pass consists of (at most) as many
    /// single message updates as there are edges
    fn pass_seqmax(&mut self) -> DaiResult<()> {
        for _ in 0..self.fg.nr_edges() {
            let (i, big_i_pos) = match self.find_max_residual() {
                Some((i, pos, residual)) if residual > self.props.tol => (i, pos),
                _ => break,
            };
            self.update_message(i, big_i_pos)?;
            // messages J -> j with J in nb(i) \ I and j in nb(J) \ i depend on I -> i
            let dependents: Vec<(usize, usize)> = self
                .fg
                .nb_v(i)
                .iter()
                .filter(|big_j| big_j.iter != big_i_pos)
                .flat_map(|big_j| self.fg.nb_f(big_j.node).iter())
                .filter(|j| j.node != i)
                .map(|j| (j.node, j.dual))
                .collect();
            for (j, big_j_pos) in dependents {
                self.calc_residual(j, big_j_pos)?;
            }
        }
        Ok(())
    }

    fn pass_parallel(&mut self) -> DaiResult<()> {
        let this = &*self;
        let new_messages: Vec<Vec<Prob>> = (0..this.fg.nr_vars())
            .into_par_iter()
            .map(|i| {
                (0..this.edges[i].len())
                    .map(|pos| this.calc_new_message(i, pos))
                    .collect::<DaiResult<Vec<_>>>()
            })
            .collect::<DaiResult<Vec<_>>>()?;
        for (i, var_messages) in new_messages.into_iter().enumerate() {
            for (pos, new_message) in var_messages.into_iter().enumerate() {
                self.edges[i][pos].new_message = new_message;
                self.update_message(i, pos)?;
            }
        }
        Ok(())
    }

    fn pass_sequential(&mut self, update_seq: &[(usize, usize)]) -> DaiResult<()> {
        for (i, big_i_pos) in update_seq {
            self.edges[*i][*big_i_pos].new_message = self.calc_new_message(*i, *big_i_pos)?;
            self.update_message(*i, *big_i_pos)?;
        }
        Ok(())
    }

    /// Runs belief propagation until the maximal change of single variable beliefs
    /// over a pass drops to `tol` or `maxiter` passes are done.
    ///
    /// # Notes
    ///
    /// Not converging is not an error: the returned value (also available through
    /// [`BP::max_diff`]) tells how far from convergence the run stopped. An error is
    /// returned only if a message can not be normalized, e.g. because of contradicting evidence
    pub fn run(&mut self) -> DaiResult<f64> {
        let tic = Instant::now();
        let tol = self.props.tol;
        let mut old_beliefs = (0..self.fg.nr_vars())
            .map(|i| self.belief_v(i))
            .collect::<DaiResult<Vec<_>>>()?;
        let mut update_seq: Vec<(usize, usize)> = (0..self.fg.nr_factors())
            .flat_map(|big_i| self.fg.nb_f(big_i).iter().map(|i| (i.node, i.dual)))
            .collect();
        if self.props.updates == UpdateType::SeqMax {
            for i in 0..self.edges.len() {
                for pos in 0..self.edges[i].len() {
                    self.calc_residual(i, pos)?;
                }
            }
        }
        // beliefs are distributions, their L-infinity distance never exceeds one
        let mut maxdiff = 1f64;
        self.iters = 0;
        while self.iters < self.props.maxiter && maxdiff > tol {
            match self.props.updates {
                UpdateType::SeqMax => self.pass_seqmax()?,
                UpdateType::Parall => self.pass_parallel()?,
                UpdateType::SeqFix => self.pass_sequential(&update_seq)?,
                UpdateType::SeqRnd => {
                    update_seq.shuffle(&mut self.rng);
                    self.pass_sequential(&update_seq)?
                }
            }
            maxdiff = 0f64;
            for (i, old_belief) in old_beliefs.iter_mut().enumerate() {
                let belief = self.belief_v(i)?;
                maxdiff = maxdiff.max(prob::dist_linf(belief.p(), old_belief.p()));
                *old_belief = belief;
            }
            self.iters += 1;
            if self.props.verbose >= 3 {
                debug!(
                    "{}::run: maxdiff {} after {} passes",
                    Self::NAME,
                    maxdiff,
                    self.iters
                );
            }
        }
        self.maxdiff = maxdiff;
        if self.props.verbose >= 1 {
            if maxdiff > tol {
                warn!(
                    "{}::run: not converged within {} passes ({:?}), final maxdiff: {}",
                    Self::NAME,
                    self.props.maxiter,
                    tic.elapsed(),
                    maxdiff
                );
            } else {
                info!(
                    "{}::run: converged in {} passes ({:?})",
                    Self::NAME,
                    self.iters,
                    tic.elapsed()
                );
            }
        }
        Ok(maxdiff)
    }

    /// Belief of the `i`-th variable
    pub fn belief_v(&self, i: usize) -> DaiResult<Factor> {
        let prod = self.incoming_product(i, None);
        let p = if self.props.logdomain {
            prob::normalized_exp(&prod)?
        } else {
            let mut p = prod;
            prob::normalize(&mut p)?;
            p
        };
        Factor::from_var(*self.fg.var(i), p)
    }

    /// Belief of the variables of the `big_i`-th factor
    pub fn belief_f(&self, big_i: usize) -> DaiResult<Factor> {
        let prod = self.factor_product(big_i, None);
        let p = if self.props.logdomain {
            prob::normalized_exp(&prod)?
        } else {
            let mut p = prod;
            prob::normalize(&mut p)?;
            p
        };
        Factor::from_prob(self.fg.factor(big_i).vars().clone(), p)
    }
}

impl InferenceAlgorithm for BP {
    fn identify(&self) -> String {
        format!("{}{}", Self::NAME, self.props)
    }

    #[inline(always)]
    fn factor_graph(&self) -> &FactorGraph {
        &self.fg
    }

    #[inline]
    fn properties(&self) -> PropertySet {
        self.props.to_property_set()
    }

    fn init(&mut self) {
        for i in 0..self.edges.len() {
            self.reset_edges_of(i);
        }
        self.maxdiff = 0f64;
        self.iters = 0;
    }

    fn init_vars(&mut self, ns: &VarSet) {
        for i in 0..self.fg.nr_vars() {
            if ns.contains(self.fg.var(i)) {
                self.reset_edges_of(i);
            }
        }
    }

    #[inline]
    fn run(&mut self) -> DaiResult<f64> {
        BP::run(self)
    }

    #[inline(always)]
    fn max_diff(&self) -> f64 {
        self.maxdiff
    }

    #[inline(always)]
    fn iterations(&self) -> usize {
        self.iters
    }

    fn belief_var(&self, var: &Var) -> DaiResult<Factor> {
        match self.fg.find_var(var) {
            Some(i) => self.belief_v(i),
            None => Err(DaiError::new(
                ErrorKind::ObjectNotFound,
                format!("variable {} is not in the factor graph", var),
            )),
        }
    }

    /// For more than one variable, the belief of the first factor containing
    /// all of them is marginalized
    fn belief(&self, ns: &VarSet) -> DaiResult<Factor> {
        if let [var] = ns.vars() {
            return self.belief_var(var);
        }
        match (0..self.fg.nr_factors()).find(|big_i| self.fg.factor(*big_i).vars().is_superset_of(ns)) {
            Some(big_i) => self.belief_f(big_i)?.marginal(ns),
            None => Err(DaiError::new(
                ErrorKind::BeliefNotAvailable,
                format!("no factor of the graph contains {}", ns),
            )),
        }
    }

    fn beliefs(&self) -> DaiResult<Vec<Factor>> {
        let var_beliefs = (0..self.fg.nr_vars()).map(|i| self.belief_v(i));
        let factor_beliefs = (0..self.fg.nr_factors()).map(|big_i| self.belief_f(big_i));
        var_beliefs.chain(factor_beliefs).collect()
    }

    /// Bethe approximation of the log partition sum
    fn log_z(&self) -> DaiResult<f64> {
        let mut sum = 0f64;
        for i in 0..self.fg.nr_vars() {
            let degree = self.fg.nb_v(i).len() as f64;
            sum += (1f64 - degree) * self.belief_v(i)?.entropy();
        }
        for big_i in 0..self.fg.nr_factors() {
            sum -= prob::dist_kl(self.belief_f(big_i)?.p(), self.fg.factor(big_i).p());
        }
        Ok(sum)
    }
}
