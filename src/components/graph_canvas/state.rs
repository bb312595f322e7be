use crate::graph::{CategoryId, EdgeChange, GraphEdge, GraphNode, NodeChange, Position};

pub const NODE_WIDTH: f64 = 150.0;
pub const NODE_HEIGHT: f64 = 64.0;
/// Handle hit radius in graph units.
pub const HANDLE_RADIUS: f64 = 8.0;
/// Edge hit distance in screen pixels.
pub const EDGE_HIT_WIDTH: f64 = 6.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;
const FIT_PADDING: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position {
			x: (sx - self.x) / self.k,
			y: (sy - self.y) / self.k,
		}
	}

	/// Scales by `factor` keeping the graph point under `(sx, sy)` in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Transform that shows every node inside a `width` x `height` viewport.
	pub fn fit(nodes: &[GraphNode], width: f64, height: f64) -> Option<Self> {
		let (min, max) = bounds(nodes)?;
		let (bw, bh) = (max.x - min.x, max.y - min.y);
		let k = (width / (bw * (1.0 + 2.0 * FIT_PADDING)))
			.min(height / (bh * (1.0 + 2.0 * FIT_PADDING)))
			.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = (min.x + bw / 2.0, min.y + bh / 2.0);
		Some(Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		})
	}

	/// CSS for the HTML node layer so it tracks the canvas.
	pub fn css(&self) -> String {
		format!(
			"transform: translate({}px, {}px) scale({});",
			self.x, self.y, self.k
		)
	}
}

/// Top-left and bottom-right corners of all node boxes.
pub fn bounds(nodes: &[GraphNode]) -> Option<(Position, Position)> {
	nodes.iter().fold(None, |acc, node| {
		let (lo, hi) = (
			node.position,
			Position {
				x: node.position.x + NODE_WIDTH,
				y: node.position.y + NODE_HEIGHT,
			},
		);
		Some(match acc {
			None => (lo, hi),
			Some((min, max)) => (
				Position {
					x: min.x.min(lo.x),
					y: min.y.min(lo.y),
				},
				Position {
					x: max.x.max(hi.x),
					y: max.y.max(hi.y),
				},
			),
		})
	})
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleKind {
	Source,
	Target,
}

pub fn source_anchor(node: &GraphNode) -> Position {
	Position {
		x: node.position.x + NODE_WIDTH,
		y: node.position.y + NODE_HEIGHT / 2.0,
	}
}

pub fn target_anchor(node: &GraphNode) -> Position {
	Position {
		x: node.position.x,
		y: node.position.y + NODE_HEIGHT / 2.0,
	}
}

fn distance(a: Position, b: Position) -> f64 {
	((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 < f64::EPSILON {
		return distance(p, a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	distance(
		p,
		Position {
			x: a.x + t * dx,
			y: a.y + t * dy,
		},
	)
}

/// Topmost node whose box contains `p`. Later nodes paint over earlier ones.
pub fn node_at(nodes: &[GraphNode], p: Position) -> Option<CategoryId> {
	nodes
		.iter()
		.rev()
		.find(|n| {
			p.x >= n.position.x
				&& p.x <= n.position.x + NODE_WIDTH
				&& p.y >= n.position.y
				&& p.y <= n.position.y + NODE_HEIGHT
		})
		.map(|n| n.category_id)
}

pub fn handle_at(nodes: &[GraphNode], p: Position) -> Option<(CategoryId, HandleKind)> {
	nodes.iter().rev().find_map(|n| {
		if distance(p, source_anchor(n)) <= HANDLE_RADIUS {
			Some((n.category_id, HandleKind::Source))
		} else if distance(p, target_anchor(n)) <= HANDLE_RADIUS {
			Some((n.category_id, HandleKind::Target))
		} else {
			None
		}
	})
}

/// Both anchors of an edge, if both endpoints are among `nodes`.
pub fn edge_endpoints(nodes: &[GraphNode], edge: &GraphEdge) -> Option<(Position, Position)> {
	let source = nodes.iter().find(|n| n.category_id == edge.source)?;
	let target = nodes.iter().find(|n| n.category_id == edge.target)?;
	Some((source_anchor(source), target_anchor(target)))
}

pub fn edge_at(nodes: &[GraphNode], edges: &[GraphEdge], p: Position, k: f64) -> Option<String> {
	edges
		.iter()
		.rev()
		.find(|edge| {
			edge_endpoints(nodes, edge)
				.is_some_and(|(a, b)| distance_to_segment(p, a, b) <= EDGE_HIT_WIDTH / k)
		})
		.map(|edge| edge.id.clone())
}

/// What a primary-button press landed on.
#[derive(Clone, Debug, PartialEq)]
pub enum Press {
	SourceHandle(CategoryId),
	Node { id: CategoryId, origin: Position },
	Edge(String),
	Background,
}

pub fn classify_press(nodes: &[GraphNode], edges: &[GraphEdge], p: Position, k: f64) -> Press {
	let on_node = match handle_at(nodes, p) {
		Some((id, HandleKind::Source)) => return Press::SourceHandle(id),
		Some((id, HandleKind::Target)) => Some(id),
		None => node_at(nodes, p),
	};
	if let Some(id) = on_node {
		let origin = nodes
			.iter()
			.find(|n| n.category_id == id)
			.map(|n| n.position)
			.unwrap_or_default();
		return Press::Node { id, origin };
	}
	edge_at(nodes, edges, p, k).map_or(Press::Background, Press::Edge)
}

/// Changes that leave only `keep` selected among the nodes.
pub fn node_selection(nodes: &[GraphNode], keep: Option<CategoryId>) -> Vec<NodeChange> {
	nodes
		.iter()
		.filter_map(|n| {
			let want = Some(n.category_id) == keep;
			(n.selected != want).then_some(NodeChange::Select {
				id: n.category_id,
				selected: want,
			})
		})
		.collect()
}

/// Changes that leave only `keep` selected among the edges.
pub fn edge_selection(edges: &[GraphEdge], keep: Option<&str>) -> Vec<EdgeChange> {
	edges
		.iter()
		.filter_map(|e| {
			let want = Some(e.id.as_str()) == keep;
			(e.selected != want).then(|| EdgeChange::Select {
				id: e.id.clone(),
				selected: want,
			})
		})
		.collect()
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<CategoryId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// An in-progress drag from a source handle.
#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<CategoryId>,
	pub cursor: Position,
}

/// Gesture and viewport bookkeeping that does not need to be reactive.
#[derive(Clone, Debug, Default)]
pub struct CanvasState {
	pub width: f64,
	pub height: f64,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	pub fitted: bool,
}

impl CanvasState {
	pub fn reset_gestures(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.connect = ConnectState::default();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Category;

	fn node(i: usize, id: i64) -> GraphNode {
		GraphNode::laid_out(
			i,
			&Category {
				id: CategoryId(id),
				name: format!("c{id}"),
			},
		)
	}

	fn edge(id: &str, source: i64, target: i64) -> GraphEdge {
		GraphEdge {
			id: id.into(),
			source: CategoryId(source),
			target: CategoryId(target),
			selected: false,
		}
	}

	#[test]
	fn zoom_is_clamped_and_keeps_cursor_point() {
		let mut t = ViewTransform {
			x: 40.0,
			y: -10.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(200.0, 120.0);
		t.zoom_at(200.0, 120.0, 1.5);
		let after = t.screen_to_graph(200.0, 120.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);

		for _ in 0..20 {
			t.zoom_at(0.0, 0.0, 1.1);
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..40 {
			t.zoom_at(0.0, 0.0, 0.9);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn fit_centers_the_nodes() {
		let nodes = vec![node(0, 1), node(1, 2)];
		assert_eq!(ViewTransform::fit(&[], 800.0, 600.0), None);

		let t = ViewTransform::fit(&nodes, 800.0, 600.0).unwrap();
		assert!((MIN_ZOOM..=MAX_ZOOM).contains(&t.k));
		let (min, max) = bounds(&nodes).unwrap();
		let centre = t.screen_to_graph(400.0, 300.0);
		assert!((centre.x - (min.x + max.x) / 2.0).abs() < 1e-9);
		assert!((centre.y - (min.y + max.y) / 2.0).abs() < 1e-9);
	}

	#[test]
	fn hit_testing_prefers_the_topmost_node() {
		let overlapping = GraphNode {
			position: Position { x: 100.0, y: 30.0 },
			..node(1, 2)
		};
		let nodes = vec![node(0, 1), overlapping];
		assert_eq!(node_at(&nodes, Position { x: 120.0, y: 40.0 }), Some(CategoryId(2)));
		assert_eq!(node_at(&nodes, Position { x: 20.0, y: 10.0 }), Some(CategoryId(1)));
		assert_eq!(node_at(&nodes, Position { x: -5.0, y: -5.0 }), None);
	}

	#[test]
	fn handles_sit_on_the_node_sides() {
		let nodes = vec![node(0, 7)];
		let right = Position {
			x: NODE_WIDTH + 3.0,
			y: NODE_HEIGHT / 2.0,
		};
		let left = Position {
			x: -3.0,
			y: NODE_HEIGHT / 2.0,
		};
		assert_eq!(handle_at(&nodes, right), Some((CategoryId(7), HandleKind::Source)));
		assert_eq!(handle_at(&nodes, left), Some((CategoryId(7), HandleKind::Target)));
		assert_eq!(classify_press(&nodes, &[], right, 1.0), Press::SourceHandle(CategoryId(7)));
		assert_eq!(
			classify_press(&nodes, &[], left, 1.0),
			Press::Node {
				id: CategoryId(7),
				origin: Position::default(),
			}
		);
	}

	#[test]
	fn edges_hit_only_when_both_ends_are_shown() {
		let far = GraphNode {
			position: Position { x: 600.0, y: 0.0 },
			..node(0, 2)
		};
		let nodes = vec![node(0, 1), far];
		let edges = vec![edge("a", 1, 2), edge("hidden", 1, 99)];
		let mid = Position {
			x: 375.0,
			y: NODE_HEIGHT / 2.0 + 2.0,
		};
		assert_eq!(edge_at(&nodes, &edges, mid, 1.0), Some("a".to_string()));
		assert_eq!(classify_press(&nodes, &edges, mid, 1.0), Press::Edge("a".into()));
		assert_eq!(
			classify_press(&nodes, &edges, Position { x: 375.0, y: 300.0 }, 1.0),
			Press::Background
		);
	}

	#[test]
	fn selection_changes_are_minimal() {
		let mut nodes = vec![node(0, 1), node(1, 2)];
		nodes[0].selected = true;
		assert_eq!(
			node_selection(&nodes, Some(CategoryId(2))),
			vec![
				NodeChange::Select {
					id: CategoryId(1),
					selected: false,
				},
				NodeChange::Select {
					id: CategoryId(2),
					selected: true,
				},
			]
		);
		assert!(node_selection(&nodes, Some(CategoryId(1))).is_empty());

		let mut edges = vec![edge("a", 1, 2), edge("b", 2, 1)];
		edges[1].selected = true;
		assert_eq!(
			edge_selection(&edges, None),
			vec![EdgeChange::Select {
				id: "b".into(),
				selected: false,
			}]
		);
	}
}
