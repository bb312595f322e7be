use leptos::prelude::*;

use crate::graph::{Category, CategoryId, Selection};

/// Sidebar checklist; one checkbox per loaded category.
#[component]
pub fn CategoryPanel(
	#[prop(into)] categories: Signal<Vec<Category>>,
	#[prop(into)] selection: Signal<Selection>,
	on_toggle: Callback<CategoryId>,
) -> impl IntoView {
	view! {
		<aside class="category-panel">
			<h3>"Categories"</h3>
			<For
				each=move || categories.get()
				key=|category| category.id
				children=move |category| {
					let id = category.id;
					let input_id = format!("category-{id}");
					view! {
						<div class="category-option">
							<input
								type="checkbox"
								id=input_id.clone()
								prop:checked=move || selection.with(|s| s.contains(id))
								on:change=move |_| on_toggle.run(id)
							/>
							<label for=input_id>{category.name}</label>
						</div>
					}
				}
			/>
		</aside>
	}
}
