use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{
	CanvasState, NODE_HEIGHT, NODE_WIDTH, ViewTransform, bounds, edge_endpoints, source_anchor,
};
use crate::graph::{GraphEdge, GraphNode, Position};

const GRID_STEP: f64 = 20.0;
const MINIMAP_WIDTH: f64 = 200.0;
const MINIMAP_HEIGHT: f64 = 150.0;
const MINIMAP_MARGIN: f64 = 15.0;

/// Everything one frame needs.
pub struct Scene<'a> {
	pub state: &'a CanvasState,
	pub transform: ViewTransform,
	pub nodes: &'a [GraphNode],
	pub edges: &'a [GraphEdge],
}

pub fn render(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let (w, h, t) = (scene.state.width, scene.state.height, scene.transform);
	ctx.set_fill_style_str("#fafafa");
	ctx.fill_rect(0.0, 0.0, w, h);
	ctx.save();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_grid(scene, ctx);
	draw_edges(scene, ctx);
	draw_pending_connection(scene, ctx);
	ctx.restore();
	draw_minimap(scene, ctx);
}

fn draw_grid(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let t = scene.transform;
	if GRID_STEP * t.k < 8.0 {
		return;
	}
	let top_left = t.screen_to_graph(0.0, 0.0);
	let bottom_right = t.screen_to_graph(scene.state.width, scene.state.height);
	let dot = 1.0 / t.k;
	ctx.set_fill_style_str("#c8c8d0");
	let mut x = (top_left.x / GRID_STEP).floor() * GRID_STEP;
	while x <= bottom_right.x {
		let mut y = (top_left.y / GRID_STEP).floor() * GRID_STEP;
		while y <= bottom_right.y {
			ctx.fill_rect(x - dot / 2.0, y - dot / 2.0, dot, dot);
			y += GRID_STEP;
		}
		x += GRID_STEP;
	}
}

/// A solid edge line ending at the base of a filled arrowhead.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Arrow {
	line_end: Position,
	tip: Position,
	wings: (Position, Position),
}

/// `None` when the endpoints coincide.
fn arrow_between(from: Position, to: Position, size: f64) -> Option<Arrow> {
	let (dx, dy) = (to.x - from.x, to.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let back = Position {
		x: to.x - ux * size,
		y: to.y - uy * size,
	};
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	Some(Arrow {
		line_end: back,
		tip: to,
		wings: (
			Position {
				x: back.x + px,
				y: back.y + py,
			},
			Position {
				x: back.x - px,
				y: back.y - py,
			},
		),
	})
}

fn draw_edges(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let k = scene.transform.k;
	let (line_width, arrow_size) = (1.5 / k, 8.0 / k);

	for edge in scene.edges {
		// hidden endpoint: kept in state, not drawn
		let Some((from, to)) = edge_endpoints(scene.nodes, edge) else {
			continue;
		};
		let Some(arrow) = arrow_between(from, to, arrow_size) else {
			continue;
		};

		let (color, width) = if edge.selected {
			("rgba(255, 0, 114, 0.9)", line_width * 1.6)
		} else {
			("rgba(110, 110, 130, 0.8)", line_width)
		};

		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(arrow.line_end.x, arrow.line_end.y);
		ctx.stroke();

		ctx.set_fill_style_str(color);
		ctx.begin_path();
		ctx.move_to(arrow.tip.x, arrow.tip.y);
		ctx.line_to(arrow.wings.0.x, arrow.wings.0.y);
		ctx.line_to(arrow.wings.1.x, arrow.wings.1.y);
		ctx.close_path();
		ctx.fill();
	}
}

fn draw_pending_connection(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let connect = &scene.state.connect;
	let Some(source) = connect
		.source
		.and_then(|id| scene.nodes.iter().find(|n| n.category_id == id))
	else {
		return;
	};
	let from = source_anchor(source);
	let k = scene.transform.k;
	ctx.set_stroke_style_str("rgba(110, 110, 130, 0.9)");
	ctx.set_line_width(1.5 / k);
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(connect.cursor.x, connect.cursor.y);
	ctx.stroke();
	ctx.begin_path();
	let _ = ctx.arc(connect.cursor.x, connect.cursor.y, 3.0 / k, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("rgba(110, 110, 130, 0.9)");
	ctx.fill();
}

/// Overview in the bottom-right corner: node boxes plus the current viewport.
fn draw_minimap(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	let Some((min, max)) = bounds(scene.nodes) else {
		return;
	};
	let (w, h, t) = (scene.state.width, scene.state.height, scene.transform);
	let view_min = t.screen_to_graph(0.0, 0.0);
	let view_max = t.screen_to_graph(w, h);
	let (lo, hi) = (
		Position {
			x: min.x.min(view_min.x),
			y: min.y.min(view_min.y),
		},
		Position {
			x: max.x.max(view_max.x),
			y: max.y.max(view_max.y),
		},
	);
	let scale = (MINIMAP_WIDTH / (hi.x - lo.x)).min(MINIMAP_HEIGHT / (hi.y - lo.y));
	if !scale.is_finite() || scale <= 0.0 {
		return;
	}
	let (ox, oy) = (
		w - MINIMAP_WIDTH - MINIMAP_MARGIN,
		h - MINIMAP_HEIGHT - MINIMAP_MARGIN,
	);
	let project = |p: Position| (ox + (p.x - lo.x) * scale, oy + (p.y - lo.y) * scale);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(ox, oy, MINIMAP_WIDTH, MINIMAP_HEIGHT);
	ctx.set_stroke_style_str("#dddddd");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(ox, oy, MINIMAP_WIDTH, MINIMAP_HEIGHT);

	for node in scene.nodes {
		let (x, y) = project(node.position);
		ctx.set_fill_style_str(if node.selected { "#ff0072" } else { "#b8b8c4" });
		ctx.fill_rect(x, y, NODE_WIDTH * scale, NODE_HEIGHT * scale);
	}

	let (vx, vy) = project(view_min);
	ctx.set_stroke_style_str("rgba(80, 80, 100, 0.7)");
	ctx.stroke_rect(
		vx,
		vy,
		(view_max.x - view_min.x) * scale,
		(view_max.y - view_min.y) * scale,
	);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn line_stops_at_arrow_base() {
		let from = Position { x: 0.0, y: 0.0 };
		let to = Position { x: 100.0, y: 0.0 };
		let arrow = arrow_between(from, to, 8.0).unwrap();
		assert_eq!(arrow.line_end, Position { x: 92.0, y: 0.0 });
		assert_eq!(arrow.tip, to);
		assert_eq!(
			arrow.wings,
			(Position { x: 92.0, y: 4.0 }, Position { x: 92.0, y: -4.0 })
		);
	}

	#[test]
	fn coincident_endpoints_draw_nothing() {
		let at = Position { x: 5.0, y: 5.0 };
		assert_eq!(arrow_between(at, at, 8.0), None);
	}
}
