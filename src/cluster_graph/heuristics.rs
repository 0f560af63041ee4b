//! Heuristics choosing the next variable in [`ClusterGraph::var_elim`].
//!
//! A cost function scores the elimination of a single variable, a choice
//! function picks the cheapest of the remaining variables. Ties are broken
//! in favour of the lowest variable index so orderings are reproducible.

use std::collections::BTreeSet;

use crate::cluster_graph::ClusterGraph;

/// Indices of pairs of neighbors of the `i`-th variable that do not share a cluster yet
fn fill_pairs(cl: &ClusterGraph, i: usize) -> Vec<(usize, usize)> {
    let neighbors: Vec<usize> = cl
        .delta(i)
        .iter()
        .filter_map(|var| cl.find_var(var))
        .collect();
    let mut pairs = Vec::new();
    for (pos, j) in neighbors.iter().enumerate() {
        for k in &neighbors[(pos + 1)..] {
            if !cl.adj(*j, *k) {
                pairs.push((*j, *k));
            }
        }
    }
    pairs
}

/// Cost of eliminating the `i`-th variable measured as the number of edges
/// added to the adjacency graph, i.e. the graph connecting two variables iff
/// they occur together in some cluster
pub fn elimination_cost_min_fill(cl: &ClusterGraph, i: usize) -> usize {
    fill_pairs(cl, i).len()
}

/// Same as [`elimination_cost_min_fill`] but every added edge is weighted by
/// the product of the numbers of states of its endpoints, saturating at `usize::MAX`
pub fn elimination_cost_weighted_min_fill(cl: &ClusterGraph, i: usize) -> usize {
    let vars = cl.vars();
    fill_pairs(cl, i)
        .into_iter()
        .map(|(j, k)| vars[j].states().saturating_mul(vars[k].states()))
        .fold(0, usize::saturating_add)
}

/// Cost of eliminating the `i`-th variable measured as the number of its neighbors
pub fn elimination_cost_min_neighbors(cl: &ClusterGraph, i: usize) -> usize {
    cl.delta(i).len()
}

/// Cost of eliminating the `i`-th variable measured as the number of joint
/// states of its neighbors, saturating at `usize::MAX`
pub fn elimination_cost_min_weight(cl: &ClusterGraph, i: usize) -> usize {
    cl.delta(i).nr_states()
}

/// Turns a cost function into a choice function for [`ClusterGraph::var_elim`]
/// that greedily picks the cheapest remaining variable
///
/// # Example
///
/// ```
/// use dairs::cluster_graph::{elimination_cost_min_neighbors, greedy_choice, ClusterGraph};
/// use dairs::core::{Var, VarSet};
///
/// let x: Vec<_> = (0..3).map(|l| Var::new(l, 2)).collect();
/// let star: Vec<VarSet> = vec![
///     [x[0], x[1]].into_iter().collect(),
///     [x[0], x[2]].into_iter().collect(),
/// ];
/// let cl = ClusterGraph::from_clusters(&star);
/// let choose = greedy_choice(elimination_cost_min_neighbors);
/// let remaining = (0..3).collect();
/// // leaves have a single neighbor, the lowest index wins
/// assert_eq!(choose(&cl, &remaining), 1);
/// ```
pub fn greedy_choice<C>(cost: C) -> impl Fn(&ClusterGraph, &BTreeSet<usize>) -> usize
where
    C: Fn(&ClusterGraph, usize) -> usize,
{
    move |cl, remaining| {
        // min_by_key keeps the first of equally cheap candidates
        match remaining.iter().copied().min_by_key(|i| cost(cl, *i)) {
            Some(i) => i,
            None => panic!("No variables left to choose from, it is a bug"),
        }
    }
}

/// Returns the remaining variable with the lowest MinFill cost
pub fn elimination_choice_min_fill(cl: &ClusterGraph, remaining: &BTreeSet<usize>) -> usize {
    greedy_choice(elimination_cost_min_fill)(cl, remaining)
}
