//! Per-node product picker state.
//!
//! Each node owns a two-state machine (`Closed`/`Open`) plus the product it
//! has chosen. The book keeps one entry per category id; nodes read their
//! entry and send [`PickerEvent`]s back.

use std::collections::HashMap;

use log::debug;

use super::types::CategoryId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PickerState {
	#[default]
	Closed,
	/// Holds the product names computed when the picker was opened.
	Open { products: Vec<String> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerEntry {
	pub state: PickerState,
	pub chosen: Option<String>,
}

impl PickerEntry {
	pub fn is_open(&self) -> bool {
		matches!(self.state, PickerState::Open { .. })
	}

	/// Products listed while open, empty while closed.
	pub fn listing(&self) -> &[String] {
		match &self.state {
			PickerState::Open { products } => products,
			PickerState::Closed => &[],
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerEvent {
	/// Toggle button. `listing` is what to show if this opens the picker.
	Toggle { listing: Vec<String> },
	/// Close button, backdrop click or Escape.
	RequestClose,
	Select(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PickerBook(HashMap<CategoryId, PickerEntry>);

impl PickerBook {
	pub fn entry(&self, id: CategoryId) -> PickerEntry {
		self.0.get(&id).cloned().unwrap_or_default()
	}

	pub fn apply(&mut self, id: CategoryId, event: PickerEvent) {
		let entry = self.0.entry(id).or_default();
		match event {
			PickerEvent::Toggle { listing } => {
				entry.state = match entry.state {
					PickerState::Closed => PickerState::Open { products: listing },
					PickerState::Open { .. } => PickerState::Closed,
				};
			}
			PickerEvent::RequestClose => entry.state = PickerState::Closed,
			PickerEvent::Select(name) => {
				if !entry.is_open() {
					debug!("ignoring product choice for closed picker {id}");
					return;
				}
				entry.chosen = Some(name);
				entry.state = PickerState::Closed;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const FRUIT: CategoryId = CategoryId(1);

	fn open(book: &mut PickerBook, listing: &[&str]) {
		book.apply(
			FRUIT,
			PickerEvent::Toggle {
				listing: listing.iter().map(|s| s.to_string()).collect(),
			},
		);
	}

	#[test]
	fn starts_closed_with_nothing_chosen() {
		let book = PickerBook::default();
		let entry = book.entry(FRUIT);
		assert!(!entry.is_open());
		assert_eq!(entry.chosen, None);
		assert!(entry.listing().is_empty());
	}

	#[test]
	fn toggle_opens_then_closes() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple", "Tomato"]);
		assert_eq!(book.entry(FRUIT).listing(), ["Apple", "Tomato"]);

		open(&mut book, &["ignored"]);
		assert!(!book.entry(FRUIT).is_open());
	}

	#[test]
	fn reopening_uses_fresh_listing() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple"]);
		book.apply(FRUIT, PickerEvent::RequestClose);
		open(&mut book, &["Apple", "Banana"]);
		assert_eq!(book.entry(FRUIT).listing(), ["Apple", "Banana"]);
	}

	#[test]
	fn second_choice_replaces_first() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple", "Tomato"]);
		book.apply(FRUIT, PickerEvent::Select("Apple".into()));
		assert!(!book.entry(FRUIT).is_open());
		assert_eq!(book.entry(FRUIT).chosen.as_deref(), Some("Apple"));

		open(&mut book, &["Apple", "Tomato"]);
		book.apply(FRUIT, PickerEvent::Select("Tomato".into()));
		let entry = book.entry(FRUIT);
		assert!(!entry.is_open());
		assert_eq!(entry.chosen.as_deref(), Some("Tomato"));
	}

	#[test]
	fn choosing_the_same_product_again_closes() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple", "Tomato"]);
		book.apply(FRUIT, PickerEvent::Select("Apple".into()));

		open(&mut book, &["Apple", "Tomato"]);
		book.apply(FRUIT, PickerEvent::Select("Apple".into()));
		let entry = book.entry(FRUIT);
		assert!(!entry.is_open());
		assert_eq!(entry.chosen.as_deref(), Some("Apple"));
	}

	#[test]
	fn choice_while_closed_is_ignored() {
		let mut book = PickerBook::default();
		book.apply(FRUIT, PickerEvent::Select("Apple".into()));
		assert_eq!(book.entry(FRUIT).chosen, None);
	}

	#[test]
	fn request_close_keeps_choice() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple"]);
		book.apply(FRUIT, PickerEvent::Select("Apple".into()));
		open(&mut book, &["Apple"]);
		book.apply(FRUIT, PickerEvent::RequestClose);
		let entry = book.entry(FRUIT);
		assert!(!entry.is_open());
		assert_eq!(entry.chosen.as_deref(), Some("Apple"));
	}

	#[test]
	fn nodes_are_independent() {
		let mut book = PickerBook::default();
		open(&mut book, &["Apple"]);
		assert!(!book.entry(CategoryId(2)).is_open());
	}
}
