#[allow(clippy::module_inception)]
mod cluster_graph;
mod heuristics;

pub use cluster_graph::ClusterGraph;
pub use heuristics::{
    elimination_choice_min_fill, elimination_cost_min_fill, elimination_cost_min_neighbors,
    elimination_cost_min_weight, elimination_cost_weighted_min_fill, greedy_choice,
};
