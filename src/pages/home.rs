use leptos::prelude::*;
use log::{debug, info};

use crate::catalog::use_catalog;
use crate::components::category_node::CategoryNode;
use crate::components::category_panel::CategoryPanel;
use crate::components::graph_canvas::GraphCanvas;
use crate::graph::picker::{PickerBook, PickerEvent};
use crate::graph::{
	CategoryId, Connection, EdgeChange, EdgeList, GraphNode, NodeChange, Selection,
	apply_node_changes, visible_nodes,
};

/// Category graph page: filter panel on the left, graph on the right.
///
/// All interaction state lives here and flows down as read-only signals;
/// children change it only through the callbacks below.
#[component]
pub fn Home() -> impl IntoView {
	let catalog = use_catalog();
	let (nodes, products) = (catalog.nodes, catalog.products);
	let selection = RwSignal::new(Selection::default());
	let edges = RwSignal::new(EdgeList::default());
	let pickers = RwSignal::new(PickerBook::default());

	let visible = Memo::new(move |_| {
		nodes.with(|all| selection.with(|selected| visible_nodes(all, selected)))
	});
	let edge_list = Memo::new(move |_| edges.with(|list| list.edges().to_vec()));

	let on_toggle = Callback::new(move |id: CategoryId| {
		selection.update(|s| {
			let shown = s.toggle(id);
			debug!("category {id} {}", if shown { "shown" } else { "hidden" });
		});
	});
	let on_nodes_change = Callback::new(move |changes: Vec<NodeChange>| {
		nodes.update(|all| apply_node_changes(all, changes));
	});
	let on_edges_change = Callback::new(move |changes: Vec<EdgeChange>| {
		edges.update(|list| list.apply_changes(changes));
	});
	let on_connect = Callback::new(move |connection: Connection| {
		edges.update(|list| {
			let edge = list.connect(connection);
			info!("edge {} added", edge.id);
		});
	});
	let on_picker = Callback::new(move |(id, event): (CategoryId, PickerEvent)| {
		pickers.update(|book| book.apply(id, event));
	});
	let render_node = Callback::new(move |node: GraphNode| {
		let id = node.category_id;
		let entry = Memo::new(move |_| pickers.with(|book| book.entry(id)));
		view! { <CategoryNode node products picker=entry on_picker /> }.into_any()
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="graph-page">
				<CategoryPanel categories=catalog.categories selection on_toggle />
				<div class="graph-area">
					<GraphCanvas
						nodes=visible
						edges=edge_list
						on_nodes_change
						on_edges_change
						on_connect
						render_node
					/>
				</div>
			</div>
		</ErrorBoundary>
	}
}
