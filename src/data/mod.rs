//! Input data loading module

pub mod node_link;

pub use node_link::{load_node_link, parse_node_link};
