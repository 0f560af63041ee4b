use std::{collections::BTreeSet, fmt::Display};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    cluster_graph::heuristics::elimination_choice_min_fill,
    core::{BipartiteGraph, DaiError, DaiResult, ErrorKind, Var, VarSet},
};

/// A hypergraph with variables as nodes and clusters (sets of variables) as hyperedges,
/// stored as a bipartite graph between variable indices and cluster indices.
///
/// # Notes
///
/// Variable `i` is a neighbor of cluster `big_i` in the bipartite graph
/// iff `vars[i]` belongs to `clusters[big_i]`. Clusters are pairwise distinct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterGraph {
    graph: BipartiteGraph,
    vars: Vec<Var>,
    clusters: Vec<VarSet>,
}

impl ClusterGraph {
    /// Creates an empty cluster graph
    #[inline]
    pub fn new() -> Self {
        ClusterGraph {
            graph: BipartiteGraph::new(),
            vars: Vec::new(),
            clusters: Vec::new(),
        }
    }

    /// Creates a cluster graph from a list of clusters, duplicates are skipped
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::cluster_graph::ClusterGraph;
    /// use dairs::core::{Var, VarSet};
    ///
    /// let x: Vec<_> = (0..3).map(|l| Var::new(l, 2)).collect();
    /// let c01: VarSet = [x[0], x[1]].into_iter().collect();
    /// let c12: VarSet = [x[1], x[2]].into_iter().collect();
    /// let cl = ClusterGraph::from_clusters(&[c01.clone(), c12, c01]);
    /// assert_eq!(cl.size(), 2);
    /// assert_eq!(cl.vars().len(), 3);
    /// ```
    pub fn from_clusters(clusters: &[VarSet]) -> Self {
        let mut cl = ClusterGraph::new();
        for cluster in clusters {
            cl.insert(cluster.clone());
        }
        cl
    }

    /// Returns the clusters
    #[inline(always)]
    pub fn clusters(&self) -> &[VarSet] {
        &self.clusters
    }

    /// Returns the variables in order of their appearance
    #[inline(always)]
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    #[inline(always)]
    pub fn graph(&self) -> &BipartiteGraph {
        &self.graph
    }

    /// Returns the number of clusters
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.graph.nr_nodes2()
    }

    /// Returns clusters as an owned vector
    #[inline]
    pub fn to_vec(&self) -> Vec<VarSet> {
        self.clusters.clone()
    }

    /// Returns the index of a variable
    #[inline]
    pub fn find_var(&self, var: &Var) -> Option<usize> {
        self.vars.iter().position(|v| v == var)
    }

    /// Union of all clusters containing the `i`-th variable (including the variable itself)
    pub fn delta_inclusive(&self, i: usize) -> VarSet {
        self.graph
            .nb1(i)
            .iter()
            .fold(VarSet::new(), |acc, big_i| &acc | &self.clusters[big_i.node])
    }

    /// Union of all clusters containing the `i`-th variable, without the variable itself
    #[inline]
    pub fn delta(&self, i: usize) -> VarSet {
        &self.delta_inclusive(i) / &self.vars[i]
    }

    /// Returns true if the `i1`-th and `i2`-th variables share a cluster
    pub fn adj(&self, i1: usize, i2: usize) -> bool {
        self.graph
            .nb1(i1)
            .iter()
            .any(|big_i| self.graph.nb2(big_i.node).iter().any(|j| j.node == i2))
    }

    /// Returns true if the `big_i`-th cluster is not contained in another cluster
    ///
    /// # Notes
    ///
    /// Only clusters sharing a variable with the `big_i`-th one are inspected
    pub fn is_maximal(&self, big_i: usize) -> bool {
        assert!(
            big_i < self.size(),
            "Cluster index {big_i} is out of range of [0..{}], it is a bug",
            self.size()
        );
        let cluster = &self.clusters[big_i];
        // the same cluster may be tested several times
        !self.graph.nb2(big_i).iter().any(|i| {
            self.graph
                .nb1(i.node)
                .iter()
                .any(|big_j| big_j.node != big_i && cluster.is_subset_of(&self.clusters[big_j.node]))
        })
    }

    /// Inserts a cluster if it is not present yet. Variables seen
    /// for the first time are appended to the variables list
    pub fn insert(&mut self, cluster: VarSet) {
        if self.clusters.contains(&cluster) {
            return;
        }
        let mut nbs = Vec::with_capacity(cluster.len());
        for var in cluster.iter() {
            let i = match self.find_var(var) {
                Some(i) => i,
                None => {
                    self.vars.push(*var);
                    self.graph.add_node1()
                }
            };
            nbs.push(i);
        }
        self.clusters.push(cluster);
        self.graph.add_node2(nbs);
    }

    /// Erases all clusters contained in another cluster
    pub fn erase_non_maximal(&mut self) -> &mut Self {
        let mut big_i = 0;
        while big_i < self.size() {
            if self.is_maximal(big_i) {
                big_i += 1;
            } else {
                self.erase_cluster(big_i);
            }
        }
        self
    }

    /// Erases all clusters containing the `i`-th variable
    pub fn erase_subsuming(&mut self, i: usize) -> &mut Self {
        while let Some(big_i) = self.graph.nb1(i).first().map(|nb| nb.node) {
            self.erase_cluster(big_i);
        }
        self
    }

    #[inline]
    fn erase_cluster(&mut self, big_i: usize) {
        self.clusters.remove(big_i);
        self.graph.erase_node2(big_i);
    }

    /// Performs variable elimination keeping track of the interactions only.
    ///
    /// # Arguments
    ///
    /// * `choose` - Returns the index of the next variable to eliminate given
    ///     the current cluster graph and indices of the remaining variables
    ///
    /// # Notes
    ///
    /// Returns the elimination cliques in the order they were created.
    /// `self` is not modified, elimination works on a copy
    ///
    /// # Example
    ///
    /// ```
    /// use dairs::cluster_graph::{elimination_choice_min_fill, ClusterGraph};
    /// use dairs::core::{Var, VarSet};
    ///
    /// // a 4-cycle x0 - x1 - x2 - x3 - x0
    /// let x: Vec<_> = (0..4).map(|l| Var::new(l, 2)).collect();
    /// let clusters: Vec<VarSet> = (0..4)
    ///     .map(|i| [x[i], x[(i + 1) % 4]].into_iter().collect())
    ///     .collect();
    /// let cl = ClusterGraph::from_clusters(&clusters);
    /// let cliques = cl.var_elim(elimination_choice_min_fill);
    /// assert_eq!(cliques.size(), 4);
    /// assert!(cliques.clusters().iter().all(|c| c.len() <= 3));
    /// ```
    pub fn var_elim<F>(&self, mut choose: F) -> ClusterGraph
    where
        F: FnMut(&ClusterGraph, &BTreeSet<usize>) -> usize,
    {
        let mut cl = self.clone();
        cl.erase_non_maximal();
        let mut result = ClusterGraph::new();
        let mut remaining: BTreeSet<usize> = (0..self.vars.len()).collect();
        while !remaining.is_empty() {
            let i = choose(&cl, &remaining);
            assert!(
                remaining.contains(&i),
                "Variable {i} was chosen for elimination but it is not among the remaining ones, it is a bug"
            );
            cl.eliminate(i, &mut result);
            remaining.remove(&i);
        }
        result
    }

    /// Performs variable elimination with the MinFill heuristic
    #[inline]
    pub fn var_elim_min_fill(&self) -> ClusterGraph {
        self.var_elim(elimination_choice_min_fill)
    }

    /// Performs variable elimination in a given order
    ///
    /// # Notes
    ///
    /// Variables not listed in `sequence` are not eliminated. A variable that
    /// is not in the cluster graph is an error
    pub fn var_elim_sequence(&self, sequence: &[Var]) -> DaiResult<ClusterGraph> {
        let mut cl = self.clone();
        cl.erase_non_maximal();
        let mut result = ClusterGraph::new();
        for var in sequence {
            let i = cl.find_var(var).ok_or_else(|| {
                DaiError::new(
                    ErrorKind::ObjectNotFound,
                    format!("variable {} is not in the cluster graph", var),
                )
            })?;
            cl.eliminate(i, &mut result);
        }
        Ok(result)
    }

    fn eliminate(&mut self, i: usize, cliques: &mut ClusterGraph) {
        trace!("eliminating {} with clique {}", self.vars[i], self.delta_inclusive(i));
        cliques.insert(self.delta_inclusive(i));
        let delta = self.delta(i);
        if !delta.is_empty() {
            self.insert(delta);
        }
        self.erase_subsuming(i);
        self.erase_non_maximal();
    }
}

impl Display for ClusterGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (pos, cluster) in self.clusters.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", cluster)?;
        }
        write!(f, "]")
    }
}
