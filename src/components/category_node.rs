use leptos::prelude::*;
use log::debug;
use web_sys::MouseEvent;

use super::product_picker::ProductPicker;
use crate::graph::picker::{PickerEntry, PickerEvent};
use crate::graph::{CategoryId, GraphNode, Product, products_in_category};

/// Body of a graph node: the category label and the picker toggle.
///
/// Picker state is owned by the page; this component reads it through
/// `picker` and reports user actions through `on_picker`.
#[component]
pub fn CategoryNode(
	node: GraphNode,
	/// Every loaded product; the node filters it when the picker opens.
	#[prop(into)]
	products: Signal<Vec<Product>>,
	#[prop(into)] picker: Signal<PickerEntry>,
	on_picker: Callback<(CategoryId, PickerEvent)>,
) -> impl IntoView {
	let id = node.category_id;
	let label = node.label;
	let title = label.clone();

	let toggle = move |_: MouseEvent| {
		let listing = if picker.with_untracked(PickerEntry::is_open) {
			Vec::new()
		} else {
			products.with_untracked(|all| products_in_category(all, id))
		};
		debug!("picker {id}: toggle with {} product(s)", listing.len());
		on_picker.run((id, PickerEvent::Toggle { listing }));
	};

	view! {
		<div class="category-node">
			<div class="category-node-label">{label}</div>
			<button
				class="category-node-toggle"
				on:mousedown=|ev: MouseEvent| ev.stop_propagation()
				on:click=toggle
			>
				{move || picker.with(|p| p.chosen.clone()).unwrap_or_else(|| "+".to_owned())}
			</button>
			<ProductPicker
				title
				group=format!("product-{id}")
				open=Signal::derive(move || picker.with(PickerEntry::is_open))
				listing=Signal::derive(move || picker.with(|p| p.listing().to_vec()))
				chosen=Signal::derive(move || picker.with(|p| p.chosen.clone()))
				on_close=Callback::new(move |()| on_picker.run((id, PickerEvent::RequestClose)))
				on_select=Callback::new(move |name| on_picker.run((id, PickerEvent::Select(name))))
			/>
		</div>
	}
}
