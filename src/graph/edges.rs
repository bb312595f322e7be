use super::types::{Connection, EdgeChange, GraphEdge};

/// User-drawn edges. Every connection is accepted, duplicates and self-loops included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeList {
	edges: Vec<GraphEdge>,
	next_id: u64,
}

impl EdgeList {
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn connect(&mut self, connection: Connection) -> &GraphEdge {
		let id = format!(
			"edge-{}-{}-{}",
			connection.source, connection.target, self.next_id
		);
		self.next_id += 1;
		self.edges.push(GraphEdge {
			id,
			source: connection.source,
			target: connection.target,
			selected: false,
		});
		&self.edges[self.edges.len() - 1]
	}

	pub fn apply_changes(&mut self, changes: Vec<EdgeChange>) {
		for change in changes {
			match change {
				EdgeChange::Select { id, selected } => {
					if let Some(edge) = self.edges.iter_mut().find(|e| e.id == id) {
						edge.selected = selected;
					}
				}
				EdgeChange::Remove { id } => self.edges.retain(|e| e.id != id),
			}
		}
	}
}
