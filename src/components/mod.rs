pub mod chrome;
pub mod force_graph;
pub mod node_map;
pub mod panels;
