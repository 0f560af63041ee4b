use serde::{Deserialize, Serialize};

/// An entry of a neighbor list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Position of this entry in the neighbor list it belongs to
    pub iter: usize,
    /// Index of the neighboring node (in the other layer)
    pub node: usize,
    /// Position of the reverse entry in the neighbor list of `node`
    pub dual: usize,
}

/// A graph with two layers of nodes where edges only connect nodes
/// from different layers.
///
/// # Notes
///
/// Nodes of both layers are addressed by indices. Erasing a node of the
/// second layer shifts indices of all the following nodes down by one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BipartiteGraph {
    nb1: Vec<Vec<Neighbor>>,
    nb2: Vec<Vec<Neighbor>>,
}

impl BipartiteGraph {
    #[inline]
    pub fn new() -> Self {
        BipartiteGraph {
            nb1: Vec::new(),
            nb2: Vec::new(),
        }
    }

    /// Creates a graph with given numbers of nodes and edges
    ///
    /// # Arguments
    ///
    /// * `nr_nodes1` - A number of nodes in the first layer
    /// * `nr_nodes2` - A number of nodes in the second layer
    /// * `edges` - Pairs (node1, node2), duplicates are ignored
    pub fn from_edges(
        nr_nodes1: usize,
        nr_nodes2: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut graph = BipartiteGraph {
            nb1: vec![Vec::new(); nr_nodes1],
            nb2: vec![Vec::new(); nr_nodes2],
        };
        for (n1, n2) in edges {
            graph.add_edge(n1, n2);
        }
        graph
    }

    #[inline(always)]
    pub fn nr_nodes1(&self) -> usize {
        self.nb1.len()
    }

    #[inline(always)]
    pub fn nr_nodes2(&self) -> usize {
        self.nb2.len()
    }

    #[inline]
    pub fn nr_edges(&self) -> usize {
        self.nb1.iter().map(|x| x.len()).sum()
    }

    /// Neighbors (in the second layer) of a node of the first layer
    #[inline(always)]
    pub fn nb1(&self, n1: usize) -> &[Neighbor] {
        &self.nb1[n1]
    }

    /// Neighbors (in the first layer) of a node of the second layer
    #[inline(always)]
    pub fn nb2(&self, n2: usize) -> &[Neighbor] {
        &self.nb2[n2]
    }

    /// Adds an isolated node to the first layer and returns its index
    #[inline]
    pub fn add_node1(&mut self) -> usize {
        self.nb1.push(Vec::new());
        self.nb1.len() - 1
    }

    /// Adds a node to the second layer connected to the given nodes
    /// of the first layer and returns its index
    ///
    /// # Notes
    ///
    /// Every index in `nbs` must be a valid first layer node
    pub fn add_node2(&mut self, nbs: impl IntoIterator<Item = usize>) -> usize {
        self.nb2.push(Vec::new());
        let n2 = self.nb2.len() - 1;
        for n1 in nbs {
            self.add_edge(n1, n2);
        }
        n2
    }

    /// Connects two nodes, returns false if they were already connected
    pub fn add_edge(&mut self, n1: usize, n2: usize) -> bool {
        if self.nb1[n1].iter().any(|nb| nb.node == n2) {
            return false;
        }
        let iter1 = self.nb1[n1].len();
        let iter2 = self.nb2[n2].len();
        self.nb1[n1].push(Neighbor {
            iter: iter1,
            node: n2,
            dual: iter2,
        });
        self.nb2[n2].push(Neighbor {
            iter: iter2,
            node: n1,
            dual: iter1,
        });
        true
    }

    /// Removes a node of the second layer together with its edges
    ///
    /// # Notes
    ///
    /// Indices of second layer nodes following `n2` decrease by one
    pub fn erase_node2(&mut self, n2: usize) {
        assert!(
            n2 < self.nb2.len(),
            "Second layer node {n2} is out of range of [0..{}], it is a bug",
            self.nb2.len()
        );
        let touched: Vec<usize> = self.nb2[n2].iter().map(|nb| nb.node).collect();
        self.nb2.remove(n2);
        for list in self.nb1.iter_mut() {
            list.retain(|nb| nb.node != n2);
            for nb in list.iter_mut() {
                if nb.node > n2 {
                    nb.node -= 1;
                }
            }
        }
        // only the lists of former neighbors were compacted
        for n1 in touched {
            for pos in 0..self.nb1[n1].len() {
                let Neighbor { node, dual, .. } = self.nb1[n1][pos];
                self.nb1[n1][pos].iter = pos;
                self.nb2[node][dual].dual = pos;
            }
        }
    }

    /// Returns true if back references of all neighbor entries are consistent
    pub fn is_consistent(&self) -> bool {
        let check = |lhs: &[Vec<Neighbor>], rhs: &[Vec<Neighbor>]| {
            lhs.iter().enumerate().all(|(n, list)| {
                list.iter().enumerate().all(|(pos, nb)| {
                    nb.iter == pos
                        && rhs
                            .get(nb.node)
                            .and_then(|other| other.get(nb.dual))
                            .map(|back| back.node == n && back.dual == pos)
                            .unwrap_or(false)
                })
            })
        };
        check(&self.nb1, &self.nb2) && check(&self.nb2, &self.nb1)
    }
}
