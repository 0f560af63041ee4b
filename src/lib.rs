/// A module containing factor graphs and the shared inference interface
pub mod core;
/// A module containing cluster graphs and variable elimination heuristics
pub mod cluster_graph;
/// A module containing loopy belief propagation
pub mod bp;
/// A module constructing inference algorithms by name
pub mod algorithms;

#[cfg(test)]
mod tests;
