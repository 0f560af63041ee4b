mod bipartite_graph;
mod error;
mod factor;
mod factor_graph;
mod factor_graph_builder;
mod inference;
pub mod prob;
mod properties;
mod var;

pub use bipartite_graph::{BipartiteGraph, Neighbor};
pub use error::{DaiError, DaiResult, ErrorKind};
pub use factor::Factor;
pub use factor_graph::FactorGraph;
pub use factor_graph_builder::FactorGraphBuilder;
pub use inference::InferenceAlgorithm;
pub use prob::Prob;
pub use properties::PropertySet;
pub use var::{Var, VarSet};
