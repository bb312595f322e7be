use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};

use super::rows::{
	CATEGORY_COLUMNS, CATEGORY_TABLE, PRODUCT_COLUMNS, PRODUCT_TABLE, parse_categories,
	parse_products,
};
use super::source::{PostgrestSource, TableSource};
use crate::config::DataServiceConfig;
use crate::error::FetchError;
use crate::graph::{Category, GraphNode, Product};

/// Result of a category load: the categories and one laid-out node per category.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedCategories {
	pub categories: Vec<Category>,
	pub nodes: Vec<GraphNode>,
}

/// One node per category, diagonally placed in fetch order.
pub fn layout_nodes(categories: &[Category]) -> Vec<GraphNode> {
	categories
		.iter()
		.enumerate()
		.map(|(i, category)| GraphNode::laid_out(i, category))
		.collect()
}

pub async fn load_categories<S: TableSource>(source: &S) -> Result<LoadedCategories, FetchError> {
	let body = source.select(CATEGORY_TABLE, CATEGORY_COLUMNS).await?;
	let categories = parse_categories(&body)?;
	let nodes = layout_nodes(&categories);
	Ok(LoadedCategories { categories, nodes })
}

pub async fn load_all_products<S: TableSource>(source: &S) -> Result<Vec<Product>, FetchError> {
	let body = source.select(PRODUCT_TABLE, PRODUCT_COLUMNS).await?;
	parse_products(&body)
}

/// Hands a load result to `set` while the view is alive. Errors are logged,
/// late results dropped; in both cases `set` is not called.
fn publish<T>(
	alive: &AtomicBool,
	what: &str,
	result: Result<T, FetchError>,
	set: impl FnOnce(T),
) -> bool {
	match result {
		Ok(_) if !alive.load(Ordering::Relaxed) => {
			debug!("view disposed, dropping {what}");
			false
		}
		Ok(loaded) => {
			set(loaded);
			true
		}
		Err(err) => {
			error!("Error fetching {what}: {err}");
			false
		}
	}
}

/// Collections published by [`use_catalog`]. Empty until (and unless) their load succeeds.
#[derive(Clone, Copy)]
pub struct Catalog {
	pub categories: ReadSignal<Vec<Category>>,
	pub nodes: RwSignal<Vec<GraphNode>>,
	pub products: ReadSignal<Vec<Product>>,
}

/// Starts both loads for the current view. Late results after disposal are dropped.
pub fn use_catalog() -> Catalog {
	let (categories, set_categories) = signal(Vec::<Category>::new());
	let (products, set_products) = signal(Vec::<Product>::new());
	let nodes = RwSignal::new(Vec::<GraphNode>::new());

	let alive = Arc::new(AtomicBool::new(true));
	on_cleanup({
		let alive = alive.clone();
		move || alive.store(false, Ordering::Relaxed)
	});

	let source = match DataServiceConfig::from_build_env() {
		Ok(config) => PostgrestSource::new(config),
		Err(err) => {
			error!("Error fetching categories: {err}");
			error!("Error fetching products: {err}");
			return Catalog {
				categories,
				nodes,
				products,
			};
		}
	};

	{
		let (source, alive) = (source.clone(), alive.clone());
		spawn_local(async move {
			let result = load_categories(&source).await;
			publish(&alive, "categories", result, |loaded| {
				info!("loaded {} categories", loaded.categories.len());
				set_categories.set(loaded.categories);
				nodes.set(loaded.nodes);
			});
		});
	}

	spawn_local(async move {
		let result = load_all_products(&source).await;
		publish(&alive, "products", result, |loaded| {
			info!("loaded {} products", loaded.len());
			set_products.set(loaded);
		});
	});

	Catalog {
		categories,
		nodes,
		products,
	}
}
