use std::collections::BTreeSet;

use super::types::{CategoryId, GraphNode, Product};

/// Categories ticked in the filter panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<CategoryId>);

impl Selection {
	/// Adds the id if absent, removes it otherwise. Returns whether it is now selected.
	pub fn toggle(&mut self, id: CategoryId) -> bool {
		if self.0.remove(&id) {
			false
		} else {
			self.0.insert(id);
			true
		}
	}

	pub fn contains(&self, id: CategoryId) -> bool {
		self.0.contains(&id)
	}
}

impl FromIterator<CategoryId> for Selection {
	fn from_iter<I: IntoIterator<Item = CategoryId>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Nodes whose category is selected, in node order. Nothing when the selection is empty.
pub fn visible_nodes(nodes: &[GraphNode], selection: &Selection) -> Vec<GraphNode> {
	nodes
		.iter()
		.filter(|node| selection.contains(node.category_id))
		.cloned()
		.collect()
}

/// Names of the products in `category`, in fetch order.
pub fn products_in_category(products: &[Product], category: CategoryId) -> Vec<String> {
	products
		.iter()
		.filter(|p| p.belongs_to(category))
		.map(|p| p.name.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::Category;

	fn nodes() -> Vec<GraphNode> {
		[(1, "Fruit"), (2, "Veg"), (3, "Grain")]
			.iter()
			.enumerate()
			.map(|(i, (id, name))| {
				GraphNode::laid_out(
					i,
					&Category {
						id: CategoryId(*id),
						name: (*name).into(),
					},
				)
			})
			.collect()
	}

	fn product(name: &str, categories: &[i64]) -> Product {
		Product {
			name: name.into(),
			categories: categories.iter().copied().map(CategoryId).collect(),
		}
	}

	fn labels(nodes: &[GraphNode]) -> Vec<&str> {
		nodes.iter().map(|n| n.label.as_str()).collect()
	}

	#[test]
	fn empty_selection_shows_nothing() {
		assert!(visible_nodes(&nodes(), &Selection::default()).is_empty());
	}

	#[test]
	fn toggling_twice_deselects() {
		let mut sel = Selection::default();
		assert!(sel.toggle(CategoryId(2)));
		assert!(!sel.toggle(CategoryId(2)));
		assert_eq!(sel, Selection::default());
	}

	#[test]
	fn filter_ignores_construction_order() {
		let forward: Selection = [CategoryId(1), CategoryId(3)].into_iter().collect();
		let mut backward = Selection::default();
		backward.toggle(CategoryId(3));
		backward.toggle(CategoryId(1));

		let all = nodes();
		assert_eq!(labels(&visible_nodes(&all, &forward)), ["Fruit", "Grain"]);
		assert_eq!(visible_nodes(&all, &forward), visible_nodes(&all, &backward));
	}

	#[test]
	fn unknown_ids_select_nothing() {
		let sel: Selection = [CategoryId(77)].into_iter().collect();
		assert!(visible_nodes(&nodes(), &sel).is_empty());
	}

	#[test]
	fn products_filtered_by_membership_in_fetch_order() {
		let products = vec![
			product("Apple", &[1]),
			product("Carrot", &[2]),
			product("Tomato", &[1, 2]),
			product("Orphan", &[]),
		];
		assert_eq!(products_in_category(&products, CategoryId(1)), ["Apple", "Tomato"]);
		assert_eq!(products_in_category(&products, CategoryId(2)), ["Carrot", "Tomato"]);
		assert!(products_in_category(&products, CategoryId(3)).is_empty());
	}
}
