//! Client-local graph state: nodes, edges, category selection and pickers.

mod edges;
pub mod picker;
mod selection;
mod types;

pub use edges::EdgeList;
pub use selection::{Selection, products_in_category, visible_nodes};
pub use types::{
	Category, CategoryId, Connection, EdgeChange, GraphEdge, GraphNode, NodeChange, Position,
	Product, apply_node_changes,
};
