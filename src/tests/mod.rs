mod cluster_graph_tests;
mod properties_tests;
mod utils;
