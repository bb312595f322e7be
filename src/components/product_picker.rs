//! Modal list of products for one category node.

use leptos::ev;
use leptos::portal::Portal;
use leptos::prelude::*;
use web_sys::MouseEvent;

/// Shows the modal while `open` is true. Rendered into `<body>` so the graph
/// transform does not apply to it.
#[component]
pub fn ProductPicker(
	/// Category label, used in the heading.
	title: String,
	/// Radio group name, unique per node.
	group: String,
	#[prop(into)] open: Signal<bool>,
	#[prop(into)] listing: Signal<Vec<String>>,
	#[prop(into)] chosen: Signal<Option<String>>,
	on_close: Callback<()>,
	on_select: Callback<String>,
) -> impl IntoView {
	let heading = StoredValue::new(format!("{title} products"));
	let group = StoredValue::new(group);

	view! {
		<Show when=move || open.get()>
			<Portal>
				<PickerDialog
					heading=heading.get_value()
					group=group.get_value()
					listing
					chosen
					on_close
					on_select
				/>
			</Portal>
		</Show>
	}
}

#[component]
fn PickerDialog(
	heading: String,
	group: String,
	listing: Signal<Vec<String>>,
	chosen: Signal<Option<String>>,
	on_close: Callback<()>,
	on_select: Callback<String>,
) -> impl IntoView {
	let escape = window_event_listener(ev::keydown, move |ev| {
		if ev.key() == "Escape" {
			on_close.run(());
		}
	});
	on_cleanup(move || escape.remove());

	let group = StoredValue::new(group);
	let aria_label = heading.clone();

	view! {
		<div class="picker-backdrop" on:click=move |_| on_close.run(())>
			<div
				class="picker-modal"
				role="dialog"
				aria-label=aria_label
				on:click=|ev: MouseEvent| ev.stop_propagation()
			>
				<h2>{heading}</h2>
				<button class="picker-close" on:click=move |_| on_close.run(())>
					"Close"
				</button>
				<ul class="picker-list">
					<For
						each=move || listing.get().into_iter().enumerate()
						key=|(i, name)| (*i, name.clone())
						children=move |(i, name)| {
							let input_id = format!("{}-{i}", group.get_value());
							let checked_name = name.clone();
							let picked_name = name.clone();
							view! {
								<li>
									<input
										type="radio"
										name=group.get_value()
										id=input_id.clone()
										prop:checked=move || {
											chosen.with(|c| c.as_deref() == Some(checked_name.as_str()))
										}
										on:click=move |_| on_select.run(picked_name.clone())
									/>
									<label for=input_id>{name}</label>
								</li>
							}
						}
					/>
				</ul>
			</div>
		</div>
	}
}
