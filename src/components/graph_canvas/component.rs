use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::render::{self, Scene};
use super::state::{
	CanvasState, ConnectState, DragState, HandleKind, NODE_HEIGHT, NODE_WIDTH, Press,
	ViewTransform, classify_press, edge_selection, handle_at, node_selection,
};
use crate::graph::{Connection, EdgeChange, GraphEdge, GraphNode, NodeChange, Position};

const ZOOM_STEP: f64 = 1.2;

/// Pointer position relative to the canvas container.
fn local_point(container: NodeRef<Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let el = container.get_untracked()?;
	let rect = el.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Sizes the canvas to its container and records the size.
fn fit_to_parent(canvas: &HtmlCanvasElement, state: &RefCell<CanvasState>) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 600.0));
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	state.borrow_mut().resize(w, h);
}

/// Pan/zoom graph surface.
///
/// Edges, the background and the minimap are painted on a `<canvas>`; nodes
/// are HTML so `render_node` can put interactive content in them. All state
/// changes are reported through the callbacks; the canvas only keeps gesture
/// and viewport bookkeeping.
#[component]
pub fn GraphCanvas(
	#[prop(into)] nodes: Signal<Vec<GraphNode>>,
	#[prop(into)] edges: Signal<Vec<GraphEdge>>,
	#[prop(into)] on_nodes_change: Callback<Vec<NodeChange>>,
	#[prop(into)] on_edges_change: Callback<Vec<EdgeChange>>,
	#[prop(into)] on_connect: Callback<Connection>,
	#[prop(into)] render_node: Callback<GraphNode, AnyView>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let container_ref = NodeRef::<Div>::new();
	let transform = RwSignal::new(ViewTransform::default());
	let state: Rc<RefCell<CanvasState>> = Rc::new(RefCell::new(CanvasState::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let running = Arc::new(AtomicBool::new(true));
	on_cleanup({
		let running = running.clone();
		move || running.store(false, Ordering::Relaxed)
	});

	let state_resize = state.clone();
	let resize = window_event_listener(ev::resize, move |_| {
		if let Some(canvas) = canvas_ref.get_untracked() {
			let canvas: HtmlCanvasElement = canvas.into();
			fit_to_parent(&canvas, &state_resize);
		}
	});
	on_cleanup(move || resize.remove());

	let (state_init, animate_init) = (state.clone(), animate.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, graph canvas stays blank");
			return;
		};

		fit_to_parent(&canvas, &state_init);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("canvas 2d context unavailable");
				return;
			}
		};

		let (state_anim, animate_inner, running) =
			(state_init.clone(), animate_init.clone(), running.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running.load(Ordering::Relaxed) {
				return;
			}
			let s = state_anim.borrow();
			let drawn = nodes.try_with_untracked(|nodes| {
				edges.try_with_untracked(|edges| {
					let scene = Scene {
						state: &s,
						transform: transform.get_untracked(),
						nodes,
						edges,
					};
					render::render(&scene, &ctx);
				})
			});
			if drawn.flatten().is_none() {
				return;
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// fit once, the first time anything is visible
	let state_fit = state.clone();
	Effect::new(move |_| {
		let visible = nodes.get();
		let mut s = state_fit.borrow_mut();
		if s.fitted || s.width == 0.0 {
			return;
		}
		if let Some(fitted) = ViewTransform::fit(&visible, s.width, s.height) {
			transform.set(fitted);
			s.fitted = true;
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((sx, sy)) = local_point(container_ref, &ev) else {
			return;
		};
		let t = transform.get_untracked();
		let p = t.screen_to_graph(sx, sy);
		let press = nodes.with_untracked(|nodes| {
			edges.with_untracked(|edges| classify_press(nodes, edges, p, t.k))
		});

		let (node_changes, edge_changes) = {
			let mut s = state_md.borrow_mut();
			match press {
				Press::SourceHandle(id) => {
					debug!("connect gesture from {id}");
					s.connect = ConnectState {
						source: Some(id),
						cursor: p,
					};
					(Vec::new(), Vec::new())
				}
				Press::Node { id, origin } => {
					s.drag = DragState {
						active: true,
						node: Some(id),
						start_x: sx,
						start_y: sy,
						node_start: origin,
					};
					(
						nodes.with_untracked(|n| node_selection(n, Some(id))),
						edges.with_untracked(|e| edge_selection(e, None)),
					)
				}
				Press::Edge(id) => (
					nodes.with_untracked(|n| node_selection(n, None)),
					edges.with_untracked(|e| edge_selection(e, Some(id.as_str()))),
				),
				Press::Background => {
					s.pan.active = true;
					s.pan.start_x = sx;
					s.pan.start_y = sy;
					s.pan.transform_start_x = t.x;
					s.pan.transform_start_y = t.y;
					(
						nodes.with_untracked(|n| node_selection(n, None)),
						edges.with_untracked(|e| edge_selection(e, None)),
					)
				}
			}
		};
		if !node_changes.is_empty() {
			on_nodes_change.run(node_changes);
		}
		if !edge_changes.is_empty() {
			on_edges_change.run(edge_changes);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(container_ref, &ev) else {
			return;
		};
		let t = transform.get_untracked();
		let moved = {
			let mut s = state_mm.borrow_mut();
			if s.connect.source.is_some() {
				s.connect.cursor = t.screen_to_graph(x, y);
				None
			} else if s.drag.active {
				s.drag.node.map(|id| NodeChange::Position {
					id,
					position: Position {
						x: s.drag.node_start.x + (x - s.drag.start_x) / t.k,
						y: s.drag.node_start.y + (y - s.drag.start_y) / t.k,
					},
				})
			} else {
				if s.pan.active {
					let (px, py) = (
						s.pan.transform_start_x + (x - s.pan.start_x),
						s.pan.transform_start_y + (y - s.pan.start_y),
					);
					transform.update(|t| {
						t.x = px;
						t.y = py;
					});
				}
				None
			}
		};
		if let Some(change) = moved {
			on_nodes_change.run(vec![change]);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let point = local_point(container_ref, &ev);
		let source = {
			let mut s = state_mu.borrow_mut();
			let source = s.connect.source;
			s.reset_gestures();
			source
		};
		let (Some(source), Some((x, y))) = (source, point) else {
			return;
		};
		let p = transform.get_untracked().screen_to_graph(x, y);
		match nodes.with_untracked(|nodes| handle_at(nodes, p)) {
			Some((target, HandleKind::Target)) => {
				info!("connected {source} -> {target}");
				on_connect.run(Connection { source, target });
			}
			_ => debug!("connect gesture from {source} dropped"),
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().reset_gestures();
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(container_ref, &ev) else {
			return;
		};
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		transform.update(|t| t.zoom_at(x, y, factor));
	};

	let on_keydown = move |ev: KeyboardEvent| {
		if !matches!(ev.key().as_str(), "Delete" | "Backspace") {
			return;
		}
		let removals: Vec<EdgeChange> = edges.with_untracked(|edges| {
			edges
				.iter()
				.filter(|e| e.selected)
				.map(|e| EdgeChange::Remove { id: e.id.clone() })
				.collect()
		});
		if !removals.is_empty() {
			info!("removing {} edge(s)", removals.len());
			on_edges_change.run(removals);
		}
	};

	let (state_in, state_out, state_fit_btn) = (state.clone(), state.clone(), state.clone());
	let zoom_centre = move |state: &Rc<RefCell<CanvasState>>, factor: f64| {
		let (w, h) = {
			let s = state.borrow();
			(s.width, s.height)
		};
		transform.update(|t| t.zoom_at(w / 2.0, h / 2.0, factor));
	};
	let fit_view = move |_: MouseEvent| {
		let (w, h) = {
			let s = state_fit_btn.borrow();
			(s.width, s.height)
		};
		if let Some(fitted) = nodes.with_untracked(|nodes| ViewTransform::fit(nodes, w, h)) {
			transform.set(fitted);
		}
	};

	view! {
		<div
			node_ref=container_ref
			class="graph-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:keydown=on_keydown
		>
			<canvas node_ref=canvas_ref class="graph-canvas-surface" />
			<div class="graph-node-layer" style=move || transform.get().css()>
				<For
					each=move || nodes.get()
					key=|node| node.category_id
					children=move |node| {
						let id = node.category_id;
						let dom_id = node.id();
						let body = render_node.run(node);
						let frame = move || {
							nodes
								.with(|all| {
									all.iter()
										.find(|n| n.category_id == id)
										.map(|n| (n.position, n.selected))
								})
								.unwrap_or_default()
						};
						view! {
							<div
								class="graph-node"
								id=format!("node-{dom_id}")
								data-node-id=dom_id.clone()
								class:selected=move || frame().1
								style=move || {
									let (p, _) = frame();
									format!(
										"left: {}px; top: {}px; width: {}px; height: {}px;",
										p.x,
										p.y,
										NODE_WIDTH,
										NODE_HEIGHT,
									)
								}
							>
								<div class="graph-handle target"></div>
								{body}
								<div class="graph-handle source"></div>
							</div>
						}
					}
				/>
			</div>
			<div class="graph-controls" on:mousedown=|ev: MouseEvent| ev.stop_propagation()>
				<button title="zoom in" on:click=move |_| zoom_centre(&state_in, ZOOM_STEP)>
					"+"
				</button>
				<button title="zoom out" on:click=move |_| zoom_centre(&state_out, 1.0 / ZOOM_STEP)>
					"−"
				</button>
				<button title="fit view" on:click=fit_view>
					"⤢"
				</button>
			</div>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use std::cell::Cell;

	use wasm_bindgen_test::*;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn window_resize_after_unmount_raises_nothing() {
		let window = web_sys::window().unwrap();
		let document = window.document().unwrap();
		let host: web_sys::HtmlElement = document.create_element("div").unwrap().unchecked_into();
		document.body().unwrap().append_child(&host).unwrap();

		let mounted = leptos::mount::mount_to(host, || {
			view! {
				<GraphCanvas
					nodes=Signal::stored(Vec::new())
					edges=Signal::stored(Vec::new())
					on_nodes_change=|_: Vec<NodeChange>| {}
					on_edges_change=|_: Vec<EdgeChange>| {}
					on_connect=|_: Connection| {}
					render_node=|_: GraphNode| ().into_any()
				/>
			}
		});
		drop(mounted);

		let raised = Rc::new(Cell::new(false));
		let on_error = {
			let raised = raised.clone();
			Closure::<dyn FnMut(web_sys::Event)>::new(move |_| raised.set(true))
		};
		window
			.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
			.unwrap();
		window
			.dispatch_event(&web_sys::Event::new("resize").unwrap())
			.unwrap();
		window
			.remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
			.unwrap();

		assert!(!raised.get());
	}
}
