use std::collections::BTreeSet;
use std::fmt;

/// Spacing of the initial diagonal layout, in graph units.
pub const LAYOUT_STEP: f64 = 100.0;

/// Canonical category identifier. Only turned into a string for DOM ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
	pub id: CategoryId,
	pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
	pub name: String,
	pub categories: BTreeSet<CategoryId>,
}

impl Product {
	pub fn belongs_to(&self, category: CategoryId) -> bool {
		self.categories.contains(&category)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub category_id: CategoryId,
	pub label: String,
	pub position: Position,
	pub selected: bool,
}

impl GraphNode {
	/// Places the `index`-th fetched category on the diagonal.
	pub fn laid_out(index: usize, category: &Category) -> Self {
		let offset = LAYOUT_STEP * index as f64;
		Self {
			category_id: category.id,
			label: category.name.clone(),
			position: Position {
				x: offset,
				y: offset,
			},
			selected: false,
		}
	}

	/// Identifier used on the DOM side.
	pub fn id(&self) -> String {
		self.category_id.to_string()
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: CategoryId,
	pub target: CategoryId,
	pub selected: bool,
}

/// A finished connect gesture as reported by the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
	pub source: CategoryId,
	pub target: CategoryId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
	Position { id: CategoryId, position: Position },
	Select { id: CategoryId, selected: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeChange {
	Select { id: String, selected: bool },
	Remove { id: String },
}

/// Merges canvas notifications into the node list.
pub fn apply_node_changes(nodes: &mut [GraphNode], changes: Vec<NodeChange>) {
	for change in changes {
		match change {
			NodeChange::Position { id, position } => {
				if let Some(node) = nodes.iter_mut().find(|n| n.category_id == id) {
					node.position = position;
				}
			}
			NodeChange::Select { id, selected } => {
				if let Some(node) = nodes.iter_mut().find(|n| n.category_id == id) {
					node.selected = selected;
				}
			}
		}
	}
}
